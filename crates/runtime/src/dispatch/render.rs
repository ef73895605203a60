//! Text rendering of game state and the per-turn action menu.

use game_core::{
    Game, GameEnv, InteractionPayload, InteractionSink, Phase, PlayerId, Prompt, movement,
};

/// Board, players and market as chat lines.
pub fn status_lines(game: &Game, env: GameEnv<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    match game.phase() {
        Phase::Setup => {
            lines.push(format!(
                "Waiting to start: {}/{} players seated (need {}).",
                game.players.len(),
                game.config.max_players,
                game.config.min_players
            ));
            for player in &game.players {
                lines.push(format!("- {}", player.name));
            }
            return lines;
        }
        Phase::Play => {
            let current = game
                .current_player()
                .map(|p| game.player_name(p))
                .unwrap_or_default();
            lines.push(format!(
                "Round {}, {current} to act. First to {} VP wins.",
                game.turn.number, game.config.victory_points
            ));
        }
        Phase::Finished => lines.push("The game is over.".to_string()),
    }

    for player in &game.players {
        let techs: Vec<String> = player
            .techs
            .iter()
            .map(|owned| {
                let name = env.tech_name(&owned.id);
                if owned.exhausted {
                    format!("{name} (exhausted)")
                } else {
                    name
                }
            })
            .collect();
        lines.push(format!(
            "{}: {} VP, {} science, techs: {}",
            player.name,
            player.victory_points,
            player.science,
            if techs.is_empty() {
                "none".to_string()
            } else {
                techs.join(", ")
            }
        ));
    }

    for planet in game.board.planets() {
        let holder = match planet.controller() {
            Some(owner) => game.player_name(owner),
            None if planet.forces > 0 => "neutral".to_string(),
            None => "empty".to_string(),
        };
        lines.push(format!(
            "{}: {}/{} forces ({holder}), yields {}P {}S {}*{}",
            planet.coordinate,
            planet.forces,
            planet.capacity,
            planet.production,
            planet.science,
            planet.stars,
            if planet.exhausted { ", exhausted" } else { "" }
        ));
    }

    if !game.market.offered.is_empty() {
        let offered: Vec<String> = game
            .market
            .offered
            .iter()
            .map(|id| match env.techs.definition(id) {
                Some(def) => format!("{} ({})", def.name, def.cost),
                None => id.to_string(),
            })
            .collect();
        lines.push(format!("Market: {}", offered.join(", ")));
    }
    lines
}

/// "Waiting on ..." line for a prompt aimed at specific players.
pub fn waiting_on(game: &Game, prompt: &Prompt) -> Option<String> {
    if prompt.audience.is_empty() {
        return None;
    }
    let names: Vec<String> = prompt
        .audience
        .iter()
        .map(|p| game.player_name(*p))
        .collect();
    Some(format!("Waiting on {}.", names.join(", ")))
}

/// Buttons for whatever the current player may do next.
///
/// Nothing is offered outside of play or while a decision is pending.
pub fn action_menu(game: &Game, sink: &mut dyn InteractionSink) -> Option<Prompt> {
    if game.is_resolving() {
        return None;
    }
    let player = game.current_player()?;
    let name = game.player_name(player);

    if game.turn.action_taken {
        return Some(Prompt::issue(
            sink,
            format!("{name}, your action is done."),
            vec![player],
            vec![("End turn".to_string(), InteractionPayload::EndTurn)],
        ));
    }

    let mut options = Vec::new();
    for planet in game.board.controlled_by(player) {
        if !planet.exhausted {
            options.push((
                format!("Produce {}", planet.coordinate),
                InteractionPayload::Produce {
                    planet: planet.coordinate,
                },
            ));
        }
    }
    for destination in move_targets(game, player) {
        options.push((
            format!("Move to {destination}"),
            InteractionPayload::BeginMove { destination },
        ));
    }
    if has_exhausted(game, player) {
        options.push(("Refresh".to_string(), InteractionPayload::Refresh));
    }
    options.push(("Buy tech".to_string(), InteractionPayload::BuyTech));
    options.push(("End turn".to_string(), InteractionPayload::EndTurn));

    Some(Prompt::issue(
        sink,
        format!("{name}, choose an action."),
        vec![player],
        options,
    ))
}

fn move_targets(game: &Game, player: PlayerId) -> Vec<game_core::Coordinate> {
    game.board
        .planets()
        .map(|planet| planet.coordinate)
        .filter(|destination| !movement::valid_sources(game, player, *destination).is_empty())
        .collect()
}

fn has_exhausted(game: &Game, player: PlayerId) -> bool {
    game.board
        .controlled_by(player)
        .any(|planet| planet.exhausted)
        || game
            .player(player)
            .is_some_and(|p| p.techs.iter().any(|t| t.exhausted))
}

#[cfg(test)]
mod tests {
    use game_content::TechCatalogue;
    use game_core::{
        Board, ChannelId, Coordinate, EffectRegistry, GameConfig, GameId, Planet, RecordingSink,
    };

    use super::*;

    const A: PlayerId = PlayerId(0);
    const B: PlayerId = PlayerId(1);

    fn started() -> Game {
        let mut game = Game::new(GameId::new("g"), ChannelId::new("c"), GameConfig::default());
        game.add_player("a", "Ada").unwrap();
        game.add_player("b", "Bo").unwrap();
        let board = Board::from_planets([
            Planet::new(Coordinate::ORIGIN, 12)
                .with_yield(1, 1, 1)
                .with_forces(A, 3),
            Planet::new(Coordinate::new(1, 0), 12),
            Planet::new(Coordinate::new(3, 0), 12)
                .with_yield(1, 1, 1)
                .with_forces(B, 3),
        ]);
        game.start(board, Vec::new()).unwrap();
        game
    }

    fn labels(prompt: &Prompt) -> Vec<&str> {
        prompt.options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn menu_offers_the_current_players_actions() {
        let game = started();
        let mut sink = RecordingSink::new();
        let menu = action_menu(&game, &mut sink).unwrap();

        assert_eq!(menu.audience, vec![A]);
        assert_eq!(
            labels(&menu),
            vec!["Produce 0,0", "Move to 1,0", "Buy tech", "End turn"]
        );
        assert_eq!(sink.issued.len(), 4);
    }

    #[test]
    fn after_the_action_only_end_turn_remains() {
        let mut game = started();
        game.turn.action_taken = true;
        game.board.planet_mut(Coordinate::ORIGIN).unwrap().exhausted = true;
        let menu = action_menu(&game, &mut RecordingSink::new()).unwrap();
        assert_eq!(labels(&menu), vec!["End turn"]);

        game.turn.action_taken = false;
        let menu = action_menu(&game, &mut RecordingSink::new()).unwrap();
        assert!(labels(&menu).contains(&"Refresh"));
        assert!(!labels(&menu).contains(&"Produce 0,0"));
    }

    #[test]
    fn no_menu_before_play() {
        let game = Game::new(GameId::new("g"), ChannelId::new("c"), GameConfig::default());
        assert!(action_menu(&game, &mut RecordingSink::new()).is_none());
    }

    #[test]
    fn status_shows_players_planets_and_market() {
        let mut game = started();
        let techs = TechCatalogue::standard();
        let effects = EffectRegistry::empty();
        game.market.offered = techs.ids().into_iter().take(1).collect();

        let lines = status_lines(&game, GameEnv::new(&techs, &effects));
        assert!(lines[0].starts_with("Round 1, Ada to act"));
        assert!(lines.iter().any(|l| l.starts_with("Bo: 0 VP")));
        assert!(lines.iter().any(|l| l.starts_with("1,0: 0/12 forces (empty)")));
        assert!(lines.iter().any(|l| l.starts_with("Market: ")));
    }
}
