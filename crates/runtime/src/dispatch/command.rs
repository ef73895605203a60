//! Typed chat commands.

use std::str::FromStr;

use game_core::{Coordinate, TechId};
use strum::{EnumMessage, IntoEnumIterator};

use crate::api::{Result, RuntimeError};

/// Every command the chat adapter may send, by its kebab-case name.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::EnumMessage,
    strum::VariantNames,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Command {
    #[strum(message = "open a new game in this channel")]
    Create,
    #[strum(message = "take a seat in the channel's game")]
    Join,
    #[strum(message = "deal the board and begin play")]
    Start,
    #[strum(message = "show the board and your options")]
    Status,
    #[strum(message = "move forces into a planet, e.g. `move 1,0`")]
    Move,
    #[strum(message = "produce at a planet you control, e.g. `produce 2,0`")]
    Produce,
    #[strum(message = "ready your exhausted planets and technologies")]
    Refresh,
    #[strum(message = "buy a technology from the market")]
    BuyTech,
    #[strum(message = "discard a technology you own, e.g. `scrap-tech fortified-worlds`")]
    ScrapTech,
    #[strum(message = "pass the turn to the next player")]
    EndTurn,
    #[strum(message = "delete the channel's game")]
    Abandon,
    #[strum(message = "list commands")]
    Help,
}

impl Command {
    pub fn parse(name: &str) -> Result<Self> {
        Command::from_str(name.trim()).map_err(|_| RuntimeError::UnknownCommand(name.to_string()))
    }

    /// One `name: summary` line per command.
    pub fn usage() -> Vec<String> {
        Command::iter()
            .map(|command| {
                format!(
                    "{command}: {}",
                    command.get_message().unwrap_or_default()
                )
            })
            .collect()
    }
}

/// A planet coordinate given either as `q,r` or as two arguments.
pub fn coordinate_arg(args: &[String]) -> Result<Coordinate> {
    let raw = match args {
        [] => return Err(RuntimeError::MissingArgument("coordinate")),
        [single] => single.clone(),
        [q, r, ..] => format!("{},{}", q.trim_end_matches(','), r),
    };
    raw.parse().map_err(|_| RuntimeError::InvalidArgument {
        name: "coordinate",
        value: raw,
    })
}

pub fn tech_arg(args: &[String]) -> Result<TechId> {
    let raw = args
        .first()
        .map(|arg| arg.trim())
        .filter(|arg| !arg.is_empty())
        .ok_or(RuntimeError::MissingArgument("technology"))?;
    Ok(TechId::new(raw.to_ascii_lowercase()))
}
