use pokemon_battle_engine::{
    spawn_encounter, BattlePlayer, BattleState, GameState, MoveId, PlayerAction, PokemonInst, RandomSource, RuleData,
    RuleDataResult, SeededRandom, SpeciesId,
};
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play a seeded demo battle and print its event log.
#[derive(Parser, Debug)]
#[command(name = "battle-sim")]
#[command(about = "Run a deterministic demo battle", long_about = None)]
#[command(version)]
struct Cli {
    /// Seed for the encounter's random source
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Rule data to load instead of the built-in tables (.ron or .json, file or directory)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(long, default_value_t = 50)]
    turns: u32,
}

fn build_pokemon(rules: &RuleData, species: &str, moves: &[&str]) -> RuleDataResult<PokemonInst> {
    let moves: Vec<MoveId> = moves.iter().map(|id| MoveId::from(*id)).collect();
    PokemonInst::new(rules, &SpeciesId::from(species), 50, &moves)
}

fn demo_battle(rules: &RuleData) -> Result<BattleState, Box<dyn Error>> {
    let red = BattlePlayer::new(
        "red".to_string(),
        "Red".to_string(),
        0,
        vec![
            build_pokemon(rules, "pikachu", &["thunderbolt", "quick-attack", "thunder-wave", "volt-switch"])?,
            build_pokemon(rules, "charmander", &["flamethrower", "will-o-wisp", "slash", "dragon-rage"])?,
        ],
    );
    let blue = BattlePlayer::new(
        "blue".to_string(),
        "Blue".to_string(),
        1,
        vec![
            build_pokemon(rules, "squirtle", &["surf", "bite", "ice-beam", "rain-dance"])?,
            build_pokemon(rules, "bulbasaur", &["giga-drain", "leech-seed", "sleep-powder", "sludge-bomb"])?,
        ],
    );
    Ok(BattleState::new("demo".to_string(), vec![red, blue])?)
}

/// A random move with PP left for every participant that can act.
fn choose_actions(state: &BattleState, chooser: &mut SeededRandom) -> Vec<(usize, PlayerAction)> {
    let mut actions = Vec::new();
    for (player_index, player) in state.players.iter().enumerate() {
        if player.forced_move().is_some() || player.must_recharge() {
            continue;
        }
        let Some(pokemon) = player.live_active_pokemon() else {
            continue;
        };
        let usable: Vec<usize> = pokemon
            .moves
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.pp > 0)
            .map(|(index, _)| index)
            .collect();
        if usable.is_empty() {
            continue;
        }
        let pick = usable[chooser.next_below(usable.len() as u32, "Demo Move Choice") as usize];
        actions.push((player_index, PlayerAction::UseMove { move_index: pick, target: None }));
    }
    actions
}

fn choose_replacements(state: &BattleState) -> Vec<(usize, usize)> {
    state
        .players_needing_replacement()
        .into_iter()
        .filter_map(|player_index| {
            state.players[player_index]
                .available_replacements()
                .first()
                .map(|team_index| (player_index, *team_index))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let options = Cli::parse();

    let rules = match &options.rules {
        Some(path) => RuleData::load_from_path(path)?,
        None => RuleData::standard(),
    };
    let rules = Arc::new(rules);
    let state = demo_battle(&rules)?;
    info!(seed = options.seed, turns = options.turns, "starting demo battle");

    let encounter = spawn_encounter(state, Arc::clone(&rules), options.seed);
    let mut chooser = SeededRandom::new(options.seed.wrapping_add(1));

    for _ in 0..options.turns {
        let state = encounter.snapshot().await?;
        let report = match state.game_state {
            GameState::WaitingForActions => encounter.submit_turn(choose_actions(&state, &mut chooser)).await?,
            GameState::WaitingForReplacements => encounter.submit_replacements(choose_replacements(&state)).await?,
            _ => break,
        };

        for event in &report.events {
            if let Some(line) = event.format(&report.state) {
                println!("{}", line);
            }
        }
        if report.state.is_over() {
            break;
        }
    }

    let final_state = encounter.snapshot().await?;
    match final_state.game_state {
        GameState::SideWon(side) => println!("Side {} wins after {} turns.", side, final_state.turn_number - 1),
        GameState::Draw => println!("The battle ends in a draw."),
        _ => println!("Stopped after {} turns.", final_state.turn_number - 1),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["battle-sim"]).expect("no flags parse");
        assert_eq!(cli.seed, 1);
        assert_eq!(cli.turns, 50);
        assert_eq!(cli.rules, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["battle-sim", "--seed", "7", "--rules", "rules/gen3.ron", "--turns", "10"])
            .expect("flags parse");
        assert_eq!(cli.seed, 7);
        assert_eq!(cli.turns, 10);
        assert_eq!(cli.rules, Some(PathBuf::from("rules/gen3.ron")));
    }

    #[test]
    fn test_cli_rejects_bad_values() {
        assert!(Cli::try_parse_from(["battle-sim", "--seed", "minus-one"]).is_err());
        assert!(Cli::try_parse_from(["battle-sim", "--colour"]).is_err());
    }
}
