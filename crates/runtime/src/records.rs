//! Typed records on top of raw documents.
//!
//! Each persisted type declares its collection and a `type` discriminator
//! written into the document body. Decoding checks the discriminator before
//! touching the rest of the body and then goes through the [`KINDS`] table,
//! so every load dispatches on the discriminator instead of guessing from
//! the shape of the data.

use game_core::{Game, InteractionData};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::store::VersionedDocument;

pub const TYPE_FIELD: &str = "type";

pub const GAMES: &str = "games";
pub const INTERACTIONS: &str = "interactions";

/// A type persisted as a document.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;
    const KIND: &'static str;

    fn document_id(&self) -> String;

    /// Unwraps the matching [`AnyRecord`] variant.
    fn from_any(record: AnyRecord) -> Option<Self>;
}

impl Record for Game {
    const COLLECTION: &'static str = GAMES;
    const KIND: &'static str = "game";

    fn document_id(&self) -> String {
        self.id.as_str().to_string()
    }

    fn from_any(record: AnyRecord) -> Option<Self> {
        match record {
            AnyRecord::Game(game) => Some(*game),
            _ => None,
        }
    }
}

impl Record for InteractionData {
    const COLLECTION: &'static str = INTERACTIONS;
    const KIND: &'static str = "interaction";

    fn document_id(&self) -> String {
        self.id.as_str().to_string()
    }

    fn from_any(record: AnyRecord) -> Option<Self> {
        match record {
            AnyRecord::Interaction(data) => Some(*data),
            _ => None,
        }
    }
}

type Decoder = fn(&Value) -> Result<AnyRecord, RecordError>;

/// Every discriminator the runtime knows, with its decoder.
pub const KINDS: &[(&str, Decoder)] = &[
    (<Game as Record>::KIND, decode_game),
    (<InteractionData as Record>::KIND, decode_interaction),
];

fn decode_game(body: &Value) -> Result<AnyRecord, RecordError> {
    Ok(AnyRecord::Game(Box::new(decode_body(body)?)))
}

fn decode_interaction(body: &Value) -> Result<AnyRecord, RecordError> {
    Ok(AnyRecord::Interaction(Box::new(decode_body(body)?)))
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("document has no {TYPE_FIELD:?} discriminator")]
    MissingKind,

    #[error("expected a {expected} record, found {found}")]
    WrongKind {
        expected: &'static str,
        found: String,
    },

    #[error("unknown record kind {0:?}")]
    UnknownKind(String),

    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A record decoded through the discriminator table.
#[derive(Clone, Debug, PartialEq)]
pub enum AnyRecord {
    Game(Box<Game>),
    Interaction(Box<InteractionData>),
}

pub fn encode<R: Record>(record: &R) -> Result<Value, RecordError> {
    let mut body = serde_json::to_value(record)?;
    let object = body.as_object_mut().ok_or(RecordError::NotAnObject)?;
    object.insert(TYPE_FIELD.to_string(), Value::String(R::KIND.to_string()));
    Ok(body)
}

/// Decodes a body that must hold an `R`. The discriminator is checked before
/// anything else is read.
pub fn decode<R: Record>(body: &Value) -> Result<R, RecordError> {
    let found = kind_of(body)?;
    if found != R::KIND {
        return Err(RecordError::WrongKind {
            expected: R::KIND,
            found: found.to_string(),
        });
    }
    R::from_any(decode_any(body)?).ok_or_else(|| RecordError::WrongKind {
        expected: R::KIND,
        found: found.to_string(),
    })
}

pub fn decode_document<R: Record>(doc: &VersionedDocument) -> Result<R, RecordError> {
    decode(&doc.body)
}

/// Decodes any known record by looking its discriminator up in [`KINDS`].
pub fn decode_any(body: &Value) -> Result<AnyRecord, RecordError> {
    let kind = kind_of(body)?;
    let (_, decoder) = KINDS
        .iter()
        .find(|(known, _)| *known == kind)
        .ok_or_else(|| RecordError::UnknownKind(kind.to_string()))?;
    decoder(body)
}

fn decode_body<T: DeserializeOwned>(body: &Value) -> Result<T, RecordError> {
    let mut body = body.clone();
    if let Some(object) = body.as_object_mut() {
        object.remove(TYPE_FIELD);
    }
    Ok(serde_json::from_value(body)?)
}

fn kind_of(body: &Value) -> Result<&str, RecordError> {
    body.get(TYPE_FIELD)
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingKind)
}
