use crate::battle::abilities::apply_entry_ability;
use crate::battle::action_stack::ActionStack;
use crate::battle::calculators::DamageCalculator;
use crate::battle::commands::{execute_command_batch, BattleCommand, PlayerTarget};
use crate::battle::conditions::{PokemonCondition, PokemonConditionType};
use crate::battle::field::{field_timer_commands, item_heal_commands, terrain_heal_commands, weather_damage_commands};
use crate::battle::resolver::{resolve_action, switch_in, BattleContext};
use crate::battle::state::{BattleEvent, BattleState, EventBus, GameState};
use crate::battle::status::{
    duration_commands, leech_seed_commands, multi_turn_commands, status_damage_commands, trap_commands,
};
use crate::errors::{ActionError, BattleResult};
use crate::player::{PendingSwitch, PlayerAction};
use crate::pokemon::StatusCondition;
use crate::rng::RandomSource;
use crate::rule_data::RuleData;
use schema::MoveTarget;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Main entry point for turn resolution.
/// Validates the submitted actions, executes one complete turn with the
/// standard damage modifiers, and returns every event in order. A rejected
/// action set leaves the state untouched.
pub fn resolve_turn(
    battle_state: &mut BattleState,
    rules: &RuleData,
    actions: &[(usize, PlayerAction)],
    rng: &mut dyn RandomSource,
) -> BattleResult<EventBus> {
    let calculator = DamageCalculator::standard();
    resolve_turn_with(battle_state, &BattleContext::new(rules, &calculator), actions, rng)
}

/// As `resolve_turn`, with a caller-supplied calculator.
pub fn resolve_turn_with(
    battle_state: &mut BattleState,
    ctx: &BattleContext<'_>,
    actions: &[(usize, PlayerAction)],
    rng: &mut dyn RandomSource,
) -> BattleResult<EventBus> {
    let turn_actions = match validate_actions(battle_state, ctx.rules, actions) {
        Ok(turn_actions) => turn_actions,
        Err(err) => {
            warn!(battle = %battle_state.battle_id, error = %err, "rejected action set");
            return Err(err.into());
        }
    };

    let turn_number = battle_state.turn_number;
    info!(battle = %battle_state.battle_id, turn = turn_number, "turn started");
    let mut bus = EventBus::new();

    // Sleep and confusion only count down for the Pokemon that had them going
    // in, so each is keyed by the team index that was active at the start.
    let asleep_at_start: Vec<Option<usize>> = battle_state
        .players
        .iter()
        .map(|player| {
            matches!(player.active_pokemon().and_then(|p| p.status), Some(StatusCondition::Sleep { .. }))
                .then_some(player.active_pokemon_index)
        })
        .collect();
    let confused_at_start: Vec<Option<usize>> = battle_state
        .players
        .iter()
        .map(|player| {
            player
                .has_condition(PokemonConditionType::Confused)
                .then_some(player.active_pokemon_index)
        })
        .collect();
    let living_at_start = battle_state.living_sides();

    // 1. Initialization
    execute_command_batch(
        vec![
            BattleCommand::SetGameState(GameState::TurnInProgress),
            BattleCommand::EmitEvent(BattleEvent::TurnStarted { turn_number }),
        ],
        battle_state,
        &mut bus,
    )?;

    // Leads announce their entry abilities before the first action.
    if turn_number == 1 {
        for player_index in 0..battle_state.players.len() {
            apply_entry_ability(battle_state, ctx.rules, player_index, &mut bus)?;
        }
    }

    // 2. Build initial action stack from player actions
    let mut action_stack = ActionStack::build_initial(battle_state, ctx.rules, &turn_actions, rng)?;
    debug!(order = ?action_stack.iter().map(|a| a.player_index()).collect::<Vec<_>>(), "action order");

    // 3. Execute actions from stack until empty
    while let Some(action) = action_stack.pop_front() {
        let player_index = action.player_index();
        if battle_state.players[player_index].live_active_pokemon().is_none() {
            debug!(player = player_index, "skipping action of fainted Pokemon");
            continue;
        }
        let events = resolve_action(battle_state, ctx, &action, rng)?;
        bus.extend(events);

        if battle_state.living_sides().len() <= 1 {
            break;
        }
    }

    // 4. End-of-Turn Phase (only if battle is still ongoing)
    if battle_state.living_sides().len() > 1 {
        execute_end_turn_phase(battle_state, ctx.rules, &asleep_at_start, &confused_at_start, &mut bus)?;
    }

    // 5. Cleanup & Finalization
    finalize_turn(battle_state, &living_at_start, &mut bus)?;
    Ok(bus)
}

/// Checks every submitted action against the current state and returns the
/// complete action list for the turn. Participants locked into a charge or
/// recharge need not submit anything; a placeholder is added for them.
pub fn validate_actions(
    battle_state: &BattleState,
    rules: &RuleData,
    actions: &[(usize, PlayerAction)],
) -> Result<Vec<(usize, PlayerAction)>, ActionError> {
    if battle_state.game_state != GameState::WaitingForActions {
        return Err(ActionError::NotAcceptingActions);
    }

    let mut submitted: BTreeMap<usize, &PlayerAction> = BTreeMap::new();
    for (player_index, action) in actions {
        if *player_index >= battle_state.players.len() {
            return Err(ActionError::InvalidPlayerIndex(*player_index));
        }
        if submitted.insert(*player_index, action).is_some() {
            return Err(ActionError::DuplicateAction(*player_index));
        }
    }

    let mut turn_actions = Vec::new();
    for (player_index, player) in battle_state.players.iter().enumerate() {
        let action = submitted.get(&player_index).copied();
        let locked = player.forced_move().is_some() || player.must_recharge();

        if player.live_active_pokemon().is_none() {
            if action.is_some() {
                return Err(ActionError::NoActivePokemon(player_index));
            }
            continue;
        }

        match action {
            None if locked => {
                turn_actions.push((player_index, PlayerAction::UseMove { move_index: 0, target: None }));
            }
            None => return Err(ActionError::MissingAction(player_index)),
            Some(action) => {
                validate_player_action(battle_state, rules, player_index, action, locked)?;
                turn_actions.push((player_index, action.clone()));
            }
        }
    }
    Ok(turn_actions)
}

/// Validates a player action for detailed correctness
/// Checks move PP, bounds, targets, switch targets and trapping.
pub fn validate_player_action(
    battle_state: &BattleState,
    rules: &RuleData,
    player_index: usize,
    action: &PlayerAction,
    locked: bool,
) -> Result<(), ActionError> {
    let player = &battle_state.players[player_index];

    match action {
        PlayerAction::UseMove { move_index, target } => {
            if locked {
                // The forced action replaces whatever was chosen.
                return Ok(());
            }
            let pokemon = player
                .live_active_pokemon()
                .ok_or(ActionError::NoActivePokemon(player_index))?;
            let slot = pokemon
                .moves
                .get(*move_index)
                .ok_or(ActionError::InvalidMoveIndex(*move_index))?;
            let move_data = rules
                .move_data(&slot.move_id)
                .map_err(|_| ActionError::UnknownMove(slot.move_id.clone()))?;
            if slot.pp == 0 {
                return Err(ActionError::NoPpRemaining(slot.move_id.clone()));
            }
            if let Some(PokemonCondition::ChoiceLocked { move_used }) =
                player.get_condition(PokemonConditionType::ChoiceLocked)
            {
                if *move_used != slot.move_id {
                    return Err(ActionError::ChoiceLocked(move_used.clone()));
                }
            }
            if let Some(target_index) = target {
                let valid = *target_index < battle_state.players.len()
                    && (move_data.target != MoveTarget::Opponent
                        || battle_state.are_opponents(player_index, *target_index));
                if !valid {
                    return Err(ActionError::InvalidTarget(*target_index));
                }
            }
        }
        PlayerAction::SwitchPokemon { team_index } => {
            if locked {
                return Err(ActionError::LockedIntoMove(player_index));
            }
            let target_pokemon = player
                .team
                .get(*team_index)
                .ok_or(ActionError::InvalidPokemonIndex(*team_index))?;
            if *team_index == player.active_pokemon_index {
                return Err(ActionError::AlreadyActive(*team_index));
            }
            if target_pokemon.is_fainted() {
                return Err(ActionError::SwitchToFainted(*team_index));
            }
            if player.has_condition(PokemonConditionType::Trapped) {
                return Err(ActionError::Trapped(player_index));
            }
        }
    }

    Ok(())
}

/// End-of-turn phases, in order. Each batch is generated from the state the
/// previous one left, so a Pokemon that faints drops out of later phases.
pub fn execute_end_turn_phase(
    battle_state: &mut BattleState,
    rules: &RuleData,
    asleep_at_start: &[Option<usize>],
    confused_at_start: &[Option<usize>],
    bus: &mut EventBus,
) -> BattleResult<()> {
    let player_count = battle_state.players.len();

    // 1. Residual damage
    for player_index in 0..player_count {
        let commands = status_damage_commands(battle_state, player_index);
        execute_command_batch(commands, battle_state, bus)?;
        let commands = leech_seed_commands(battle_state, player_index);
        execute_command_batch(commands, battle_state, bus)?;
        let commands = trap_commands(battle_state, player_index);
        execute_command_batch(commands, battle_state, bus)?;
    }

    // 2. Weather, terrain and items
    for player_index in 0..player_count {
        let commands = weather_damage_commands(battle_state, player_index);
        execute_command_batch(commands, battle_state, bus)?;
        let commands = terrain_heal_commands(battle_state, rules, player_index);
        execute_command_batch(commands, battle_state, bus)?;
        let commands = item_heal_commands(battle_state, rules, player_index);
        execute_command_batch(commands, battle_state, bus)?;
    }

    // 3. Field timers
    let commands = field_timer_commands(battle_state);
    execute_command_batch(commands, battle_state, bus)?;

    // 4. Status durations, 5. multi-turn advancement
    for player_index in 0..player_count {
        let active = Some(battle_state.players[player_index].active_pokemon_index);
        let asleep = asleep_at_start.get(player_index).copied().flatten() == active;
        let confused = confused_at_start.get(player_index).copied().flatten() == active;
        let commands = duration_commands(battle_state, player_index, asleep, confused);
        execute_command_batch(commands, battle_state, bus)?;
    }
    for player_index in 0..player_count {
        let commands = multi_turn_commands(battle_state, player_index);
        execute_command_batch(commands, battle_state, bus)?;
    }

    Ok(())
}

fn finalize_turn(battle_state: &mut BattleState, living_at_start: &[usize], bus: &mut EventBus) -> BattleResult<()> {
    update_game_state(battle_state, living_at_start, bus)?;

    let turn_number = battle_state.turn_number;
    execute_command_batch(
        vec![
            BattleCommand::EmitEvent(BattleEvent::TurnEnded { turn_number }),
            BattleCommand::IncrementTurnNumber,
        ],
        battle_state,
        bus,
    )?;
    info!(battle = %battle_state.battle_id, turn = turn_number, state = ?battle_state.game_state, "turn ended");
    Ok(())
}

/// Win check first; otherwise request replacements for fainted actives and
/// pick the next phase.
fn update_game_state(battle_state: &mut BattleState, living_before: &[usize], bus: &mut EventBus) -> BattleResult<()> {
    let living = battle_state.living_sides();
    let mut commands = Vec::new();

    for side in living_before.iter().filter(|side| !living.contains(side)) {
        commands.push(BattleCommand::EmitEvent(BattleEvent::SideDefeated { side: *side }));
    }

    if living.len() <= 1 {
        let winning_side = living.first().copied();
        let final_state = match winning_side {
            Some(side) => GameState::SideWon(side),
            None => GameState::Draw,
        };
        commands.push(BattleCommand::SetGameState(final_state));
        commands.push(BattleCommand::EmitEvent(BattleEvent::BattleEnded { winning_side }));
        execute_command_batch(commands, battle_state, bus)?;
        info!(battle = %battle_state.battle_id, ?winning_side, "battle ended");
        return Ok(());
    }

    let mut any_pending = false;
    for (player_index, player) in battle_state.players.iter().enumerate() {
        let fainted = player.active_pokemon().map_or(false, |pokemon| pokemon.is_fainted());
        let has_bench = !player.available_replacements().is_empty();
        if fainted && has_bench {
            any_pending = true;
            if player.pending_switch != Some(PendingSwitch::Fainted) {
                commands.push(BattleCommand::SetPendingSwitch {
                    target: PlayerTarget::from_index(player_index),
                    reason: Some(PendingSwitch::Fainted),
                });
                commands.push(BattleCommand::EmitEvent(BattleEvent::SwitchRequired {
                    player_index,
                    reason: PendingSwitch::Fainted,
                }));
            }
        } else if fainted && player.pending_switch.is_some() {
            // Nothing left to bring in.
            commands.push(BattleCommand::SetPendingSwitch {
                target: PlayerTarget::from_index(player_index),
                reason: None,
            });
        } else if player.pending_switch.is_some() {
            any_pending = true;
        }
    }

    let next_state = if any_pending {
        GameState::WaitingForReplacements
    } else {
        GameState::WaitingForActions
    };
    commands.push(BattleCommand::SetGameState(next_state));
    execute_command_batch(commands, battle_state, bus)
}

/// Brings in the chosen replacements for every participant that owes a
/// switch. Baton Pass replacements keep the outgoing stat stages; hazards
/// apply on entry, and a hazard knockout can require another replacement.
pub fn submit_replacements(
    battle_state: &mut BattleState,
    rules: &RuleData,
    replacements: &[(usize, usize)],
    rng: &mut dyn RandomSource,
) -> BattleResult<EventBus> {
    validate_replacements(battle_state, replacements).map_err(|err| {
        warn!(battle = %battle_state.battle_id, error = %err, "rejected replacements");
        err
    })?;

    let living_before = battle_state.living_sides();
    let mut ordered = replacements.to_vec();
    ordered.sort_unstable();

    let mut bus = EventBus::new();
    for (player_index, team_index) in ordered {
        let carry_stages = battle_state.players[player_index]
            .pending_switch
            .map_or(false, PendingSwitch::carries_stages);
        debug!(player = player_index, team_index, carry_stages, "replacement");
        switch_in(battle_state, rules, player_index, team_index, carry_stages, rng, &mut bus)?;
    }

    update_game_state(battle_state, &living_before, &mut bus)?;
    Ok(bus)
}

fn validate_replacements(battle_state: &BattleState, replacements: &[(usize, usize)]) -> Result<(), ActionError> {
    if battle_state.game_state != GameState::WaitingForReplacements {
        return Err(ActionError::NotAcceptingActions);
    }
    let needed = battle_state.players_needing_replacement();
    let mut seen = Vec::new();

    for (player_index, team_index) in replacements {
        let player = battle_state
            .players
            .get(*player_index)
            .ok_or(ActionError::InvalidPlayerIndex(*player_index))?;
        if seen.contains(player_index) {
            return Err(ActionError::DuplicateAction(*player_index));
        }
        seen.push(*player_index);
        if !needed.contains(player_index) {
            return Err(ActionError::ReplacementNotNeeded(*player_index));
        }
        let pokemon = player
            .team
            .get(*team_index)
            .ok_or(ActionError::InvalidPokemonIndex(*team_index))?;
        if *team_index == player.active_pokemon_index {
            return Err(ActionError::AlreadyActive(*team_index));
        }
        if pokemon.is_fainted() {
            return Err(ActionError::SwitchToFainted(*team_index));
        }
    }

    if let Some(missing) = needed.iter().find(|index| !seen.contains(index)) {
        return Err(ActionError::MissingAction(*missing));
    }
    Ok(())
}
