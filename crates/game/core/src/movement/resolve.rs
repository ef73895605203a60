//! Deterministic resolution of a committed move.
//!
//! Four stages, each narrated with one log line:
//!
//! 1. **Withdraw**: take the planned amounts off every source.
//! 2. **Contact**: join a friendly or empty destination, or fight the
//!    defender. Combat losses are `min(moving, defender + defender_bonus)`
//!    for the attacker and `min(defender, moving + attacker_bonus)` for the
//!    defender; at most one side survives.
//! 3. **Capacity**: forces above the planet's capacity are destroyed.
//! 4. **Commit**: the survivor holds the planet, or it becomes neutral.
//!
//! Every check runs before the first mutation, so a rejected plan leaves the
//! game untouched.

use std::collections::BTreeMap;

use crate::error::{ExecuteError, InvariantViolation, RuleError};
use crate::state::{Coordinate, Game, PlannedMove, PlayerId};

/// Strength adjustments applied during contact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatModifiers {
    pub attacker_bonus: u32,
    pub defender_bonus: u32,
}

/// Result of [`resolve_move`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub mover: PlayerId,
    pub destination: Coordinate,
    /// Forces withdrawn from all sources.
    pub moved: u32,
    /// Forces on the destination before contact.
    pub existing: u32,
    /// Controller of the destination before the move.
    pub previous_controller: Option<PlayerId>,
    /// Set only when contact was a fight.
    pub defender: Option<PlayerId>,
    pub attacker_losses: u32,
    pub defender_losses: u32,
    pub capacity_loss: u32,
    pub final_forces: u32,
    pub controller: Option<PlayerId>,
    pub log: Vec<String>,
}

impl MoveOutcome {
    fn declined(mover: PlayerId, destination: Coordinate, log: Vec<String>) -> Self {
        Self {
            mover,
            destination,
            moved: 0,
            existing: 0,
            previous_controller: None,
            defender: None,
            attacker_losses: 0,
            defender_losses: 0,
            capacity_loss: 0,
            final_forces: 0,
            controller: None,
            log,
        }
    }

    /// A plan without forces resolves to nothing.
    pub fn is_declined(&self) -> bool {
        self.moved == 0
    }

    /// The mover took a planet it did not control before.
    pub fn captured(&self) -> bool {
        !self.is_declined()
            && self.controller == Some(self.mover)
            && self.previous_controller != Some(self.mover)
    }

    /// Forces that entered contact equal forces left plus forces destroyed.
    pub fn is_conserved(&self) -> bool {
        self.moved + self.existing
            == self.final_forces + self.attacker_losses + self.defender_losses + self.capacity_loss
    }
}

/// Resolves `plan` for `mover` against the current board.
pub fn resolve_move(
    game: &mut Game,
    mover: PlayerId,
    plan: &PlannedMove,
    modifiers: CombatModifiers,
) -> Result<MoveOutcome, ExecuteError> {
    let mover_name = game
        .player(mover)
        .map(|p| p.name.clone())
        .ok_or(InvariantViolation::MissingPlayer(mover))?;
    let destination = plan.destination;

    // Duplicate source entries are merged; zero amounts are dropped.
    let mut withdrawals: BTreeMap<Coordinate, u32> = BTreeMap::new();
    for source in plan.sources.iter().filter(|s| s.amount > 0) {
        *withdrawals.entry(source.coordinate).or_default() += source.amount;
    }

    if withdrawals.is_empty() {
        clear_plan(game, mover);
        return Ok(MoveOutcome::declined(
            mover,
            destination,
            vec![format!("{mover_name} declined to move.")],
        ));
    }

    let target = game
        .board
        .planet(destination)
        .ok_or(RuleError::UnknownPlanet(destination))?;
    let existing = target.forces;
    let previous_controller = target.controller();
    let capacity = target.capacity;

    for (&from, &amount) in &withdrawals {
        if from == destination {
            return Err(RuleError::InvalidSource { from, destination }.into());
        }
        let planet = game
            .board
            .planet(from)
            .ok_or(RuleError::UnknownPlanet(from))?;
        if !planet.is_controlled_by(mover) {
            return Err(RuleError::NotControlled(from).into());
        }
        if amount > planet.forces {
            return Err(RuleError::InsufficientForces {
                from,
                requested: amount,
                available: planet.forces,
            }
            .into());
        }
    }

    let mut log = Vec::with_capacity(4);

    // Withdraw
    let mut moved = 0;
    for (&from, &amount) in &withdrawals {
        let planet = game
            .board
            .planet_mut(from)
            .ok_or(InvariantViolation::MissingPlanet(from))?;
        planet.forces -= amount;
        moved += amount;
    }
    let sources: Vec<String> = withdrawals
        .iter()
        .map(|(from, amount)| format!("{amount} from {from}"))
        .collect();
    log.push(format!(
        "{mover_name} withdrew {moved} forces ({}).",
        sources.join(", ")
    ));

    // Contact
    let mut attacker_losses = 0;
    let mut defender_losses = 0;
    let mut defender = None;
    let (mut total, mut controller) = match previous_controller {
        Some(owner) if owner != mover => {
            defender = Some(owner);
            attacker_losses = moved.min(existing + modifiers.defender_bonus);
            defender_losses = existing.min(moved + modifiers.attacker_bonus);
            let attackers_left = moved - attacker_losses;
            let defenders_left = existing - defender_losses;
            log.push(format!(
                "Combat at {destination}: {moved} attackers against {existing} defenders; \
                 attackers lost {attacker_losses}, defenders lost {defender_losses}."
            ));
            if defenders_left > 0 {
                (defenders_left, Some(owner))
            } else {
                (attackers_left, Some(mover))
            }
        }
        _ => {
            log.push(format!(
                "{moved} forces joined {existing} already at {destination}."
            ));
            (moved + existing, Some(mover))
        }
    };

    // Capacity
    let mut capacity_loss = 0;
    if total > capacity {
        capacity_loss = total - capacity;
        total = capacity;
        log.push(format!(
            "{capacity_loss} forces exceeded the capacity of {destination} and were lost."
        ));
    } else {
        log.push(format!("{destination} holds {total} of {capacity}."));
    }

    // Commit
    if total == 0 {
        controller = None;
    }
    let planet = game
        .board
        .planet_mut(destination)
        .ok_or(InvariantViolation::MissingPlanet(destination))?;
    planet.forces = total;
    planet.owner = controller;
    if controller == Some(mover) {
        planet.exhausted = true;
    }
    clear_plan(game, mover);

    log.push(match controller {
        Some(owner) if owner == mover => {
            format!("{mover_name} now holds {destination} with {total} forces.")
        }
        Some(owner) => format!(
            "{} kept {destination} with {total} forces.",
            game.player_name(owner)
        ),
        None => format!("{destination} is left empty."),
    });

    Ok(MoveOutcome {
        mover,
        destination,
        moved,
        existing,
        previous_controller,
        defender,
        attacker_losses,
        defender_losses,
        capacity_loss,
        final_forces: total,
        controller,
        log,
    })
}

fn clear_plan(game: &mut Game, mover: PlayerId) {
    if let Some(player) = game.player_mut(mover) {
        player.planned_move = None;
    }
}
