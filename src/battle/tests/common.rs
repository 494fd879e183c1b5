use crate::battle::engine::resolve_turn;
use crate::battle::state::{BattleState, EventBus};
use crate::player::{BattlePlayer, PlayerAction};
use crate::pokemon::{MoveInstance, PokemonInst, StatusCondition};
use crate::rng::{RandomSource, TurnRng};
use crate::rule_data::RuleData;
use schema::{AbilityId, ItemId, MoveId, PokemonType};

/// A builder for creating test Pokemon instances with common defaults.
///
/// Stats default to a flat line (150 HP, 100 elsewhere) at level 50 so that
/// damage numbers in scenarios are easy to work out by hand.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new("Pikachu")
///     .types(vec![PokemonType::Electric])
///     .moves(&["tackle"])
///     .status(StatusCondition::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    level: u8,
    types: Vec<PokemonType>,
    stats: [u16; 6],
    moves: Vec<String>,
    status: Option<StatusCondition>,
    current_hp: Option<u16>,
    ability: Option<String>,
    item: Option<String>,
}

impl TestPokemonBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 50,
            types: vec![PokemonType::Normal],
            stats: [150, 100, 100, 100, 100, 100],
            moves: vec!["tackle".to_string()],
            status: None,
            current_hp: None,
            ability: None,
            item: None,
        }
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn types(mut self, types: Vec<PokemonType>) -> Self {
        self.types = types;
        self
    }

    /// HP, Atk, Def, SpAtk, SpDef, Spe.
    pub fn stats(mut self, stats: [u16; 6]) -> Self {
        self.stats = stats;
        self
    }

    pub fn speed(mut self, speed: u16) -> Self {
        self.stats[5] = speed;
        self
    }

    pub fn moves(mut self, moves: &[&str]) -> Self {
        self.moves = moves.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn status(mut self, status: StatusCondition) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP for the test Pokemon. If not set, HP will be max.
    pub fn hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn ability(mut self, ability: &str) -> Self {
        self.ability = Some(ability.to_string());
        self
    }

    pub fn item(mut self, item: &str) -> Self {
        self.item = Some(item.to_string());
        self
    }

    /// Builds the `PokemonInst`, reading PP from the standard rule set.
    pub fn build(self) -> PokemonInst {
        let rules = RuleData::standard();
        let moves = self
            .moves
            .iter()
            .map(|id| {
                let move_id = MoveId::from(id.as_str());
                let move_data = rules
                    .move_data(&move_id)
                    .unwrap_or_else(|err| panic!("unknown test move {}: {}", id, err));
                MoveInstance::new(move_id, move_data.pp)
            })
            .collect();

        let mut pokemon = PokemonInst::new_for_test(&self.name, self.level, self.types, self.stats, moves);
        if let Some(ability) = self.ability {
            pokemon = pokemon
                .with_ability(&rules, AbilityId::from(ability.as_str()))
                .expect("known test ability");
        }
        if let Some(item) = self.item {
            pokemon = pokemon
                .with_item(&rules, ItemId::from(item.as_str()))
                .expect("known test item");
        }
        pokemon.status = self.status;
        if let Some(hp) = self.current_hp {
            pokemon.set_hp(hp).expect("test HP within bounds");
        }
        pokemon
    }
}

/// Creates a default test player with a given ID, name, side and team.
pub fn create_test_player(id: &str, name: &str, side: usize, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(id.to_string(), name.to_string(), side, team)
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(p1_pokemon: PokemonInst, p2_pokemon: PokemonInst) -> BattleState {
    create_team_battle(vec![p1_pokemon], vec![p2_pokemon])
}

/// Two sides, one participant each, with full teams.
pub fn create_team_battle(p1_team: Vec<PokemonInst>, p2_team: Vec<PokemonInst>) -> BattleState {
    let player1 = create_test_player("p1", "Player 1", 0, p1_team);
    let player2 = create_test_player("p2", "Player 2", 1, p2_team);
    BattleState::new("test_battle".to_string(), vec![player1, player2]).expect("valid test battle")
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// At 50 no critical hit, paralysis, thaw or confusion self-hit fires, and
/// damage variance is 92.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Move in `move_index` against the default target.
pub fn use_move(move_index: usize) -> PlayerAction {
    PlayerAction::UseMove { move_index, target: None }
}

pub fn switch_to(team_index: usize) -> PlayerAction {
    PlayerAction::SwitchPokemon { team_index }
}

/// Resolves one turn against the standard rule set, panicking on rejection.
pub fn run_turn(state: &mut BattleState, actions: &[(usize, PlayerAction)], rng: &mut dyn RandomSource) -> EventBus {
    resolve_turn(state, &RuleData::standard(), actions, rng).expect("turn should resolve")
}
