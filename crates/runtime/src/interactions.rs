//! Interaction staging for one transaction.
//!
//! The rules only see [`InteractionSink`]; this type records what they issue
//! and which interaction the current response consumed, and turns both into
//! store writes once the transaction commits. New interactions get their
//! revision stamped at commit time, when it is known whether the game moved.

use game_core::{GameId, InteractionData, InteractionId, InteractionPayload, InteractionSink, PlayerId};
use uuid::Uuid;

use crate::records::{self, Record, RecordError};
use crate::store::{Expect, Write};

/// An interaction loaded from the store, with the version it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredInteraction {
    pub data: InteractionData,
    pub version: u64,
}

#[derive(Debug)]
pub struct InteractionStore {
    game_id: GameId,
    offered: Vec<InteractionData>,
    consumed: Option<StoredInteraction>,
}

impl InteractionStore {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            offered: Vec::new(),
            consumed: None,
        }
    }

    /// Stages a new interaction and returns its id.
    pub fn offer(&mut self, allowed: &[PlayerId], payload: InteractionPayload) -> InteractionId {
        let id = InteractionId::new(Uuid::new_v4().simple().to_string());
        self.offered.push(InteractionData::new(
            id.clone(),
            self.game_id.clone(),
            allowed.to_vec(),
            0,
            payload,
        ));
        id
    }

    /// Marks `interaction` consumed by this transaction.
    pub fn consume(
        &mut self,
        mut interaction: StoredInteraction,
        by: Option<PlayerId>,
        at_revision: u64,
    ) -> Result<(), game_core::InteractionError> {
        interaction.data.consume(by, at_revision)?;
        self.consumed = Some(interaction);
        Ok(())
    }

    pub fn offered(&self) -> &[InteractionData] {
        &self.offered
    }

    pub fn is_empty(&self) -> bool {
        self.offered.is_empty() && self.consumed.is_none()
    }

    /// Store writes for everything staged, stamping new interactions with
    /// `revision`.
    pub fn into_writes(self, revision: u64) -> Result<Vec<Write>, RecordError> {
        let mut writes = Vec::with_capacity(self.offered.len() + 1);
        if let Some(consumed) = self.consumed {
            let mut data = consumed.data;
            if let Some(consumption) = data.consumed.as_mut() {
                consumption.at_revision = revision;
            }
            writes.push(Write::Put {
                collection: InteractionData::COLLECTION,
                id: data.document_id(),
                expect: Expect::Version(consumed.version),
                body: records::encode(&data)?,
            });
        }
        for mut data in self.offered {
            data.game_revision = revision;
            writes.push(Write::Put {
                collection: InteractionData::COLLECTION,
                id: data.document_id(),
                expect: Expect::Absent,
                body: records::encode(&data)?,
            });
        }
        Ok(writes)
    }
}

impl InteractionSink for InteractionStore {
    fn issue(&mut self, allowed: &[PlayerId], payload: InteractionPayload) -> InteractionId {
        self.offer(allowed, payload)
    }
}
