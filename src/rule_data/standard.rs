use super::RuleData;
use schema::{
    AbilityData, AbilityEffect, BaseStats, FixedDamage, Hazard, HitCount, ItemData, ItemEffect,
    MoveCategory, MoveData, MoveEffect, MoveTarget, NatureData, PokemonType, SpeciesData, StatType,
    StatusType, Target, TeamCondition, Terrain, VolatileType, Weather,
};

use MoveCategory::{Physical, Special, Status};
use PokemonType::*;

/// A compact built-in rule set used by the demo binary and the tests.
pub fn standard_rules() -> RuleData {
    let mut rules = RuleData::new();
    for move_data in standard_moves() {
        rules = rules.with_move(move_data);
    }
    for ability in standard_abilities() {
        rules = rules.with_ability(ability);
    }
    for item in standard_items() {
        rules = rules.with_item(item);
    }
    for nature in standard_natures() {
        rules = rules.with_nature(nature);
    }
    for species in standard_species() {
        rules = rules.with_species(species);
    }
    rules
}

fn stat_change(target: Target, stat: StatType, stages: i8, chance: u8) -> MoveEffect {
    MoveEffect::StatChange {
        target,
        stat,
        stages,
        chance,
    }
}

fn inflict(status: StatusType, chance: u8) -> MoveEffect {
    MoveEffect::InflictStatus { status, chance }
}

fn volatile(volatile: VolatileType, chance: u8) -> MoveEffect {
    MoveEffect::ApplyVolatile {
        volatile,
        target: Target::Target,
        chance,
    }
}

fn attack(id: &str, name: &str, move_type: PokemonType, category: MoveCategory, power: u16, accuracy: u8) -> MoveData {
    MoveData::new(id, name, move_type, category)
        .power(power)
        .accuracy(accuracy)
}

fn status_move(id: &str, name: &str, move_type: PokemonType) -> MoveData {
    MoveData::new(id, name, move_type, Status)
}

fn self_status_move(id: &str, name: &str, move_type: PokemonType) -> MoveData {
    status_move(id, name, move_type).target(MoveTarget::User)
}

fn field_move(id: &str, name: &str, move_type: PokemonType, effect: MoveEffect) -> MoveData {
    status_move(id, name, move_type)
        .target(MoveTarget::Field)
        .effect(effect)
}

fn standard_moves() -> Vec<MoveData> {
    vec![
        // Plain attacks
        attack("tackle", "Tackle", Normal, Physical, 40, 100).pp(35),
        attack("scratch", "Scratch", Normal, Physical, 40, 100).pp(35),
        attack("quick-attack", "Quick Attack", Normal, Physical, 40, 100).pp(30).priority(1),
        attack("slash", "Slash", Normal, Physical, 70, 100).pp(20).crit_tier(1),
        attack("headbutt", "Headbutt", Normal, Physical, 70, 100)
            .pp(15)
            .effect(volatile(VolatileType::Flinch, 30)),
        attack("swift", "Swift", Normal, Special, 60, 100).pp(20),
        attack("water-gun", "Water Gun", Water, Special, 40, 100).pp(25),
        attack("surf", "Surf", Water, Special, 90, 100).pp(15),
        attack("earthquake", "Earthquake", Ground, Physical, 100, 100),
        attack("dragon-claw", "Dragon Claw", Dragon, Physical, 80, 100).pp(15),
        attack("vine-whip", "Vine Whip", Grass, Physical, 45, 100).pp(25),
        attack("razor-leaf", "Razor Leaf", Grass, Physical, 55, 95).pp(25).crit_tier(1),
        attack("karate-chop", "Karate Chop", Fighting, Physical, 50, 100).pp(25).crit_tier(1),
        attack("frost-breath", "Frost Breath", Ice, Special, 60, 90).crit_tier(3),
        // Secondary-effect attacks
        attack("ember", "Ember", Fire, Special, 40, 100).pp(25).effect(inflict(StatusType::Burn, 10)),
        attack("flamethrower", "Flamethrower", Fire, Special, 90, 100)
            .pp(15)
            .effect(inflict(StatusType::Burn, 10)),
        attack("thunder-shock", "Thunder Shock", Electric, Special, 40, 100)
            .pp(30)
            .effect(inflict(StatusType::Paralysis, 10)),
        attack("thunderbolt", "Thunderbolt", Electric, Special, 90, 100)
            .pp(15)
            .effect(inflict(StatusType::Paralysis, 10)),
        attack("ice-beam", "Ice Beam", Ice, Special, 90, 100)
            .effect(inflict(StatusType::Freeze, 10)),
        attack("blizzard", "Blizzard", Ice, Special, 110, 70)
            .pp(5)
            .effect(inflict(StatusType::Freeze, 10)),
        attack("poison-sting", "Poison Sting", Poison, Physical, 15, 100)
            .pp(35)
            .effect(inflict(StatusType::Poison, 30)),
        attack("sludge-bomb", "Sludge Bomb", Poison, Special, 90, 100)
            .effect(inflict(StatusType::Poison, 30)),
        attack("bite", "Bite", Dark, Physical, 60, 100)
            .pp(25)
            .effect(volatile(VolatileType::Flinch, 30)),
        attack("rock-slide", "Rock Slide", Rock, Physical, 75, 90)
            .effect(volatile(VolatileType::Flinch, 30)),
        attack("air-slash", "Air Slash", Flying, Special, 75, 95)
            .pp(15)
            .effect(volatile(VolatileType::Flinch, 30)),
        attack("psybeam", "Psybeam", Psychic, Special, 65, 100)
            .pp(20)
            .effect(volatile(VolatileType::Confusion, 10)),
        attack("psychic", "Psychic", Psychic, Special, 90, 100)
            .effect(stat_change(Target::Target, StatType::SpDef, -1, 10)),
        attack("shadow-ball", "Shadow Ball", Ghost, Special, 80, 100)
            .pp(15)
            .effect(stat_change(Target::Target, StatType::SpDef, -1, 20)),
        attack("moonblast", "Moonblast", Fairy, Special, 95, 100)
            .pp(15)
            .effect(stat_change(Target::Target, StatType::SpAtk, -1, 30)),
        attack("metal-claw", "Metal Claw", Steel, Physical, 50, 95)
            .pp(35)
            .effect(stat_change(Target::User, StatType::Atk, 1, 10)),
        attack("close-combat", "Close Combat", Fighting, Physical, 120, 100)
            .pp(5)
            .effect(stat_change(Target::User, StatType::Def, -1, 100))
            .effect(stat_change(Target::User, StatType::SpDef, -1, 100)),
        // Trapping
        attack("wrap", "Wrap", Normal, Physical, 15, 90)
            .pp(20)
            .effect(volatile(VolatileType::Trap, 100)),
        attack("fire-spin", "Fire Spin", Fire, Special, 35, 85)
            .pp(15)
            .effect(volatile(VolatileType::Trap, 100)),
        // Drain, recoil and crash
        attack("absorb", "Absorb", Grass, Special, 20, 100).pp(25).effect(MoveEffect::Drain(50)),
        attack("giga-drain", "Giga Drain", Grass, Special, 75, 100).effect(MoveEffect::Drain(50)),
        attack("double-edge", "Double-Edge", Normal, Physical, 120, 100)
            .pp(15)
            .effect(MoveEffect::Recoil(33)),
        attack("take-down", "Take Down", Normal, Physical, 90, 85)
            .pp(20)
            .effect(MoveEffect::Recoil(25)),
        attack("struggle", "Struggle", Typeless, Physical, 50, 100)
            .pp(1)
            .effect(MoveEffect::RecoilMaxHp(25)),
        attack("high-jump-kick", "High Jump Kick", Fighting, Physical, 130, 90)
            .effect(MoveEffect::CrashOnMiss(50)),
        // Multi-hit
        attack("fury-attack", "Fury Attack", Normal, Physical, 15, 85)
            .pp(20)
            .hits(HitCount::Range { min: 2, max: 5 }),
        attack("double-kick", "Double Kick", Fighting, Physical, 30, 100)
            .pp(30)
            .hits(HitCount::Fixed(2)),
        attack("triple-kick", "Triple Kick", Fighting, Physical, 10, 90)
            .hits(HitCount::Fixed(3))
            .per_hit_accuracy(),
        // Multi-turn
        attack("solar-beam", "Solar Beam", Grass, Special, 120, 100).effect(MoveEffect::ChargeTurn),
        attack("hyper-beam", "Hyper Beam", Normal, Special, 150, 90)
            .pp(5)
            .effect(MoveEffect::Recharge),
        // Switching
        attack("u-turn", "U-turn", Bug, Physical, 70, 100).pp(20).effect(MoveEffect::SelfSwitch),
        attack("volt-switch", "Volt Switch", Electric, Special, 70, 100)
            .pp(20)
            .effect(MoveEffect::SelfSwitch),
        self_status_move("baton-pass", "Baton Pass", Normal)
            .pp(40)
            .effect(MoveEffect::BatonPass),
        // Self-destruct
        attack("explosion", "Explosion", Normal, Physical, 250, 100)
            .pp(5)
            .effect(MoveEffect::SelfDestruct),
        // Fixed damage
        MoveData::new("seismic-toss", "Seismic Toss", Fighting, Physical)
            .accuracy(100)
            .pp(20)
            .fixed_damage(FixedDamage::UserLevel),
        MoveData::new("night-shade", "Night Shade", Ghost, Special)
            .accuracy(100)
            .pp(15)
            .fixed_damage(FixedDamage::UserLevel),
        MoveData::new("dragon-rage", "Dragon Rage", Dragon, Special)
            .accuracy(100)
            .pp(10)
            .fixed_damage(FixedDamage::Flat(40)),
        MoveData::new("sonic-boom", "Sonic Boom", Normal, Special)
            .accuracy(90)
            .pp(20)
            .fixed_damage(FixedDamage::Flat(20)),
        MoveData::new("super-fang", "Super Fang", Normal, Physical)
            .accuracy(90)
            .fixed_damage(FixedDamage::PercentOfTargetCurrentHp(50)),
        // One-hit KO
        MoveData::new("horn-drill", "Horn Drill", Normal, Physical)
            .accuracy(30)
            .pp(5)
            .effect(MoveEffect::Ohko),
        MoveData::new("fissure", "Fissure", Ground, Physical)
            .accuracy(30)
            .pp(5)
            .effect(MoveEffect::Ohko),
        // Status infliction
        status_move("thunder-wave", "Thunder Wave", Electric)
            .accuracy(90)
            .pp(20)
            .effect(inflict(StatusType::Paralysis, 100)),
        status_move("will-o-wisp", "Will-O-Wisp", Fire)
            .accuracy(85)
            .pp(15)
            .effect(inflict(StatusType::Burn, 100)),
        status_move("toxic", "Toxic", Poison)
            .accuracy(90)
            .effect(inflict(StatusType::BadlyPoisoned, 100)),
        status_move("sleep-powder", "Sleep Powder", Grass)
            .accuracy(75)
            .pp(15)
            .effect(inflict(StatusType::Sleep, 100)),
        status_move("confuse-ray", "Confuse Ray", Ghost)
            .accuracy(100)
            .effect(volatile(VolatileType::Confusion, 100)),
        status_move("supersonic", "Supersonic", Normal)
            .accuracy(55)
            .pp(20)
            .effect(volatile(VolatileType::Confusion, 100)),
        status_move("leech-seed", "Leech Seed", Grass)
            .accuracy(90)
            .effect(volatile(VolatileType::LeechSeed, 100)),
        // Stat stages
        status_move("growl", "Growl", Normal)
            .accuracy(100)
            .pp(40)
            .effect(stat_change(Target::Target, StatType::Atk, -1, 100)),
        status_move("tail-whip", "Tail Whip", Normal)
            .accuracy(100)
            .pp(30)
            .effect(stat_change(Target::Target, StatType::Def, -1, 100)),
        status_move("sand-attack", "Sand Attack", Ground)
            .accuracy(100)
            .pp(15)
            .effect(stat_change(Target::Target, StatType::Acc, -1, 100)),
        self_status_move("swords-dance", "Swords Dance", Normal)
            .pp(20)
            .effect(stat_change(Target::User, StatType::Atk, 2, 100)),
        self_status_move("agility", "Agility", Psychic)
            .pp(30)
            .effect(stat_change(Target::User, StatType::Spe, 2, 100)),
        self_status_move("double-team", "Double Team", Normal)
            .pp(15)
            .effect(stat_change(Target::User, StatType::Eva, 1, 100)),
        field_move("haze", "Haze", Ice, MoveEffect::Haze).pp(30),
        // Healing and protection
        self_status_move("recover", "Recover", Normal).effect(MoveEffect::Heal(50)),
        self_status_move("synthesis", "Synthesis", Grass)
            .pp(5)
            .effect(MoveEffect::WeatherHeal),
        self_status_move("protect", "Protect", Normal)
            .priority(4)
            .effect(MoveEffect::ApplyVolatile {
                volatile: VolatileType::Protect,
                target: Target::User,
                chance: 100,
            }),
        self_status_move("focus-energy", "Focus Energy", Normal)
            .pp(30)
            .effect(MoveEffect::ApplyVolatile {
                volatile: VolatileType::FocusEnergy,
                target: Target::User,
                chance: 100,
            }),
        self_status_move("splash", "Splash", Normal).pp(40),
        // Field
        field_move("rain-dance", "Rain Dance", Water, MoveEffect::SetWeather { weather: Weather::Rain, turns: 5 }).pp(5),
        field_move("sunny-day", "Sunny Day", Fire, MoveEffect::SetWeather { weather: Weather::Sun, turns: 5 }).pp(5),
        field_move("sandstorm", "Sandstorm", Rock, MoveEffect::SetWeather { weather: Weather::Sandstorm, turns: 5 }).pp(10),
        field_move("hail", "Hail", Ice, MoveEffect::SetWeather { weather: Weather::Hail, turns: 5 }).pp(10),
        field_move("electric-terrain", "Electric Terrain", Electric, MoveEffect::SetTerrain { terrain: Terrain::Electric, turns: 5 }),
        field_move("grassy-terrain", "Grassy Terrain", Grass, MoveEffect::SetTerrain { terrain: Terrain::Grassy, turns: 5 }),
        field_move("spikes", "Spikes", Ground, MoveEffect::SetHazard(Hazard::Spikes)).pp(20),
        field_move("toxic-spikes", "Toxic Spikes", Poison, MoveEffect::SetHazard(Hazard::ToxicSpikes)).pp(20),
        field_move("stealth-rock", "Stealth Rock", Rock, MoveEffect::SetHazard(Hazard::StealthRock)).pp(20),
        field_move("sticky-web", "Sticky Web", Bug, MoveEffect::SetHazard(Hazard::StickyWeb)).pp(20),
        field_move("reflect", "Reflect", Psychic, MoveEffect::SetScreen { screen: TeamCondition::Reflect, turns: 5 }).pp(20),
        field_move("light-screen", "Light Screen", Psychic, MoveEffect::SetScreen { screen: TeamCondition::LightScreen, turns: 5 }).pp(30),
        field_move("mist", "Mist", Ice, MoveEffect::SetScreen { screen: TeamCondition::Mist, turns: 5 }).pp(30),
    ]
}

fn standard_abilities() -> Vec<AbilityData> {
    vec![
        AbilityData::new("overgrow", "Overgrow", vec![AbilityEffect::PinchBoost(Grass)]),
        AbilityData::new("blaze", "Blaze", vec![AbilityEffect::PinchBoost(Fire)]),
        AbilityData::new("torrent", "Torrent", vec![AbilityEffect::PinchBoost(Water)]),
        AbilityData::new("levitate", "Levitate", vec![AbilityEffect::TypeImmunity(Ground)]),
        AbilityData::new("volt-absorb", "Volt Absorb", vec![AbilityEffect::TypeImmunity(Electric)]),
        AbilityData::new("limber", "Limber", vec![AbilityEffect::StatusImmunity(StatusType::Paralysis)]),
        AbilityData::new("insomnia", "Insomnia", vec![AbilityEffect::StatusImmunity(StatusType::Sleep)]),
        AbilityData::new("swift-swim", "Swift Swim", vec![AbilityEffect::WeatherSpeed(Weather::Rain)]),
        AbilityData::new("chlorophyll", "Chlorophyll", vec![AbilityEffect::WeatherSpeed(Weather::Sun)]),
        AbilityData::new("battle-armor", "Battle Armor", vec![AbilityEffect::CriticalImmunity]),
        AbilityData::new("sturdy", "Sturdy", vec![AbilityEffect::OhkoImmunity]),
        AbilityData::new("drizzle", "Drizzle", vec![AbilityEffect::EntryWeather(Weather::Rain)]),
        AbilityData::new("drought", "Drought", vec![AbilityEffect::EntryWeather(Weather::Sun)]),
        AbilityData::new("sand-stream", "Sand Stream", vec![AbilityEffect::EntryWeather(Weather::Sandstorm)]),
        AbilityData::new("snow-warning", "Snow Warning", vec![AbilityEffect::EntryWeather(Weather::Hail)]),
        AbilityData::new("electric-surge", "Electric Surge", vec![AbilityEffect::EntryTerrain(Terrain::Electric)]),
        AbilityData::new("grassy-surge", "Grassy Surge", vec![AbilityEffect::EntryTerrain(Terrain::Grassy)]),
        AbilityData::new(
            "intimidate",
            "Intimidate",
            vec![AbilityEffect::EntryStatDrop { stat: StatType::Atk, stages: -1 }],
        ),
        AbilityData::new("thick-fat", "Thick Fat", vec![]),
        AbilityData::new("inner-focus", "Inner Focus", vec![]),
    ]
}

fn standard_items() -> Vec<ItemData> {
    vec![
        ItemData::new("leftovers", "Leftovers", vec![ItemEffect::EndOfTurnHeal(16)]),
        ItemData::new("charcoal", "Charcoal", vec![ItemEffect::TypeBoost { move_type: Fire, percent: 20 }]),
        ItemData::new("mystic-water", "Mystic Water", vec![ItemEffect::TypeBoost { move_type: Water, percent: 20 }]),
        ItemData::new("magnet", "Magnet", vec![ItemEffect::TypeBoost { move_type: Electric, percent: 20 }]),
        ItemData::new("life-orb", "Life Orb", vec![ItemEffect::DamageBoost(30)]),
        ItemData::new("choice-scarf", "Choice Scarf", vec![ItemEffect::SpeedBoost(50), ItemEffect::ChoiceLock]),
        ItemData::new("choice-band", "Choice Band", vec![ItemEffect::DamageBoost(50), ItemEffect::ChoiceLock]),
        ItemData::new(
            "focus-sash",
            "Focus Sash",
            vec![ItemEffect::SurviveLethalHit { requires_full_hp: true, chance: 100, single_use: true }],
        ),
        ItemData::new(
            "focus-band",
            "Focus Band",
            vec![ItemEffect::SurviveLethalHit { requires_full_hp: false, chance: 10, single_use: false }],
        ),
    ]
}

fn standard_natures() -> Vec<NatureData> {
    vec![
        NatureData::new("hardy", "Hardy", None, None),
        NatureData::new("adamant", "Adamant", Some(StatType::Atk), Some(StatType::SpAtk)),
        NatureData::new("modest", "Modest", Some(StatType::SpAtk), Some(StatType::Atk)),
        NatureData::new("jolly", "Jolly", Some(StatType::Spe), Some(StatType::SpAtk)),
        NatureData::new("timid", "Timid", Some(StatType::Spe), Some(StatType::Atk)),
        NatureData::new("bold", "Bold", Some(StatType::Def), Some(StatType::Atk)),
        NatureData::new("brave", "Brave", Some(StatType::Atk), Some(StatType::Spe)),
    ]
}

const COMMON_MOVES: &[&str] = &[
    "tackle", "scratch", "quick-attack", "headbutt", "swift", "double-edge", "take-down",
    "struggle", "protect", "splash", "baton-pass", "growl", "tail-whip", "double-team",
    "swords-dance", "focus-energy", "recover", "explosion", "fury-attack", "hyper-beam", "horn-drill",
    "super-fang", "sonic-boom",
];

fn species(
    id: &str,
    name: &str,
    types: Vec<PokemonType>,
    stats: (u8, u8, u8, u8, u8, u8),
    abilities: &[&str],
    signature_moves: &[&str],
) -> SpeciesData {
    let learnset: Vec<&str> = COMMON_MOVES
        .iter()
        .chain(signature_moves.iter())
        .copied()
        .collect();
    SpeciesData::new(
        id,
        name,
        types,
        BaseStats::new(stats.0, stats.1, stats.2, stats.3, stats.4, stats.5),
    )
    .abilities(abilities)
    .learnset(&learnset)
}

fn standard_species() -> Vec<SpeciesData> {
    vec![
        species("pikachu", "Pikachu", vec![Electric], (35, 55, 40, 50, 50, 90), &["limber"],
            &["thunder-shock", "thunderbolt", "thunder-wave", "volt-switch", "agility", "electric-terrain", "light-screen"]),
        species("charmander", "Charmander", vec![Fire], (39, 52, 43, 60, 50, 65), &["blaze"],
            &["ember", "flamethrower", "will-o-wisp", "fire-spin", "slash", "sunny-day", "dragon-rage"]),
        species("squirtle", "Squirtle", vec![Water], (44, 48, 65, 50, 64, 43), &["torrent"],
            &["water-gun", "surf", "bite", "rain-dance", "ice-beam", "haze", "mist"]),
        species("bulbasaur", "Bulbasaur", vec![Grass, Poison], (45, 49, 49, 65, 65, 45), &["overgrow", "chlorophyll"],
            &["vine-whip", "razor-leaf", "absorb", "giga-drain", "leech-seed", "sleep-powder", "solar-beam", "synthesis", "toxic", "grassy-terrain", "sludge-bomb"]),
        species("gengar", "Gengar", vec![Ghost, Poison], (60, 65, 60, 130, 75, 110), &["levitate"],
            &["shadow-ball", "night-shade", "confuse-ray", "sludge-bomb", "toxic", "toxic-spikes", "psychic"]),
        species("snorlax", "Snorlax", vec![Normal], (160, 110, 65, 65, 110, 30), &["thick-fat"],
            &["earthquake", "close-combat", "seismic-toss", "rock-slide"]),
        species("onix", "Onix", vec![Rock, Ground], (35, 45, 160, 30, 45, 70), &["sturdy"],
            &["rock-slide", "earthquake", "sandstorm", "stealth-rock", "wrap", "fissure"]),
        species("geodude", "Geodude", vec![Rock, Ground], (40, 80, 100, 30, 30, 20), &["sturdy"],
            &["rock-slide", "earthquake", "sandstorm", "stealth-rock", "fissure"]),
        species("magnemite", "Magnemite", vec![Electric, Steel], (25, 35, 70, 95, 55, 45), &["sturdy"],
            &["thunder-shock", "thunderbolt", "thunder-wave", "volt-switch", "metal-claw", "reflect"]),
        species("persian", "Persian", vec![Normal], (65, 70, 60, 65, 65, 115), &["limber"],
            &["slash", "bite", "u-turn", "agility"]),
        species("kabuto", "Kabuto", vec![Rock, Water], (30, 80, 90, 55, 45, 55), &["battle-armor", "swift-swim"],
            &["water-gun", "surf", "rock-slide", "slash", "rain-dance"]),
        species("jigglypuff", "Jigglypuff", vec![Normal, Fairy], (115, 45, 20, 45, 25, 20), &["inner-focus"],
            &["moonblast", "light-screen", "reflect", "seismic-toss"]),
        species("dragonite", "Dragonite", vec![Dragon, Flying], (91, 134, 95, 100, 100, 80), &["inner-focus"],
            &["dragon-claw", "air-slash", "earthquake", "thunderbolt", "ice-beam", "dragon-rage", "wrap"]),
        species("pidgey", "Pidgey", vec![Normal, Flying], (40, 45, 40, 35, 35, 56), &["inner-focus"],
            &["air-slash", "sand-attack", "u-turn"]),
        species("alakazam", "Alakazam", vec![Psychic], (55, 50, 45, 135, 95, 120), &["inner-focus"],
            &["psychic", "psybeam", "reflect", "light-screen", "recover", "confuse-ray"]),
        species("machop", "Machop", vec![Fighting], (70, 80, 50, 35, 35, 35), &["inner-focus"],
            &["karate-chop", "double-kick", "triple-kick", "high-jump-kick", "seismic-toss", "close-combat", "rock-slide"]),
        species("lapras", "Lapras", vec![Water, Ice], (130, 85, 80, 85, 95, 60), &["inner-focus"],
            &["surf", "ice-beam", "blizzard", "frost-breath", "hail", "rain-dance", "mist", "psychic"]),
        species("scyther", "Scyther", vec![Bug, Flying], (70, 110, 80, 55, 80, 105), &["inner-focus"],
            &["slash", "u-turn", "air-slash", "agility", "sticky-web", "spikes"]),
    ]
}
