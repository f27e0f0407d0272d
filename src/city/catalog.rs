//! Static catalogs: upgrades, generators and the rebirth skill tree.
//!
//! Ids are stable across releases; save files refer to entries by id.

use super::state::{
    Generator, GeneratorTier, Skill, SkillEffect, SpecialEffect, SpecialEffectKind, Upgrade,
    UpgradeTier,
};

/// The tier-1 click skill. Its bonus is added to the click multiplier instead
/// of compounding like the higher click tiers.
pub const BASE_CLICK_SKILL: &str = "click-power";

fn upgrade(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    tier: UpgradeTier,
    cost: f64,
    click_multiplier: f64,
) -> Upgrade {
    Upgrade {
        id,
        name,
        description,
        tier,
        cost,
        click_multiplier,
        generator_boost: None,
        special_effect: None,
        required_rebirths: None,
        purchased: false,
    }
}

impl Upgrade {
    fn boosting_generators(mut self, boost: f64) -> Self {
        self.generator_boost = Some(boost);
        self
    }

    fn prestige(mut self, kind: SpecialEffectKind, value: f64, required_rebirths: u32) -> Self {
        self.special_effect = Some(SpecialEffect { kind, value });
        self.required_rebirths = Some(required_rebirths);
        self
    }
}

/// All upgrades in display order.
pub fn upgrades() -> Vec<Upgrade> {
    use UpgradeTier::*;
    vec![
        // Pixel Generation
        upgrade("basic-upgrade", "Basic Upgrade", "Click power x1.4", PixelGeneration, 200.0, 1.4),
        upgrade("advanced-upgrade", "Advanced Upgrade", "Click power x1.8", PixelGeneration, 1_600.0, 1.8),
        upgrade("premium-upgrade", "Premium Upgrade", "Click power x2.2", PixelGeneration, 18_000.0, 2.2),
        upgrade("elite-upgrade", "Elite Upgrade", "Click power x2.6", PixelGeneration, 200_000.0, 2.6),
        upgrade("quantum-upgrade", "Quantum Upgrade", "Click power x3.2", PixelGeneration, 2_100_000.0, 3.2),
        upgrade("pixel-synergy", "Pixel Synergy", "Click power x3.8, generators +15%", PixelGeneration, 12_000_000.0, 3.8)
            .boosting_generators(0.15),
        // AI Revolution
        upgrade("neural-upgrade", "Neural Network", "Click power x6.5", AiRevolution, 80_000_000.0, 6.5),
        upgrade("deep-learning", "Deep Learning", "Click power x9", AiRevolution, 600_000_000.0, 9.0),
        upgrade("ai-sentience", "AI Sentience", "Click power x15", AiRevolution, 2_500_000_000.0, 15.0),
        upgrade("distributed-computing", "Distributed Computing", "Click power x8, generators +30%", AiRevolution, 1e10, 8.0)
            .boosting_generators(0.3),
        // Multiversal Tech
        upgrade("dimensional-upgrade", "Dimensional Shift", "Click power x20", MultiversalTech, 5e10, 20.0),
        upgrade("multiverse-harvester", "Multiverse Harvester", "Click power x25", MultiversalTech, 2.5e11, 25.0),
        upgrade("quantum-entanglement", "Quantum Entanglement", "Click power x35", MultiversalTech, 1e12, 35.0),
        upgrade("reality-merger", "Reality Merger", "Click power x30, generators +40%", MultiversalTech, 5e12, 30.0)
            .boosting_generators(0.4),
        // Cosmic Ascension
        upgrade("cosmic-upgrade", "Cosmic Consciousness", "Click power x50", CosmicAscension, 2e13, 50.0),
        upgrade("galactic-hivemind", "Galactic Hivemind", "Click power x75", CosmicAscension, 1e14, 75.0),
        upgrade("universal-singularity", "Universal Singularity", "Click power x100", CosmicAscension, 5e14, 100.0),
        upgrade("omnipresent-intelligence", "Omnipresent Intelligence", "Click power x85, generators +60%", CosmicAscension, 2e15, 85.0)
            .boosting_generators(0.6),
        // Transcendence
        upgrade("pixel-transcendence", "Pixel Transcendence", "Click power x150", Transcendence, 1e16, 150.0),
        upgrade("reality-architect", "Reality Architect", "Click power x250", Transcendence, 5e16, 250.0),
        upgrade("cosmic-omnipotence", "Cosmic Omnipotence", "Click power x500", Transcendence, 2e17, 500.0),
        upgrade("creator-of-worlds", "Creator of Worlds", "Click power x400, generators x2", Transcendence, 1e18, 400.0)
            .boosting_generators(1.0),
        // Prestige (unlocked by rebirths)
        upgrade("critical-pixel", "Critical Pixels", "Click power x12, 10% critical clicks", Prestige, 2.5e11, 12.0)
            .prestige(SpecialEffectKind::CriticalClicks, 0.1, 1),
        upgrade("time-warp", "Time Warp", "Click power x18, generators 12% faster", Prestige, 1.1e12, 18.0)
            .prestige(SpecialEffectKind::AutoClickSpeed, 0.12, 2),
        upgrade("combo-master", "Combo Master", "Click power x25, clicks build a combo (up to 2x)", Prestige, 5e12, 25.0)
            .prestige(SpecialEffectKind::ComboMultiplier, 0.01, 3),
        upgrade("pixel-generator", "Pixel Generator", "Click power x30, 1% of click power per second", Prestige, 2e13, 30.0)
            .prestige(SpecialEffectKind::PassiveIncome, 0.01, 4),
        upgrade("rebirth-mastery", "Rebirth Mastery", "Click power x40, +20% rebirth points", Prestige, 1e14, 40.0)
            .prestige(SpecialEffectKind::RebirthBonus, 0.2, 5),
    ]
}

fn generator(
    id: &'static str,
    name: &'static str,
    tier: GeneratorTier,
    cost: f64,
    pixels_per_second: f64,
) -> Generator {
    Generator {
        id,
        name,
        description: "",
        tier,
        base_cost: cost,
        cost,
        pixels_per_second,
        count: 0,
    }
}

/// All generators in display order.
pub fn generators() -> Vec<Generator> {
    use GeneratorTier::*;
    let mut all = vec![
        generator("auto-clicker-1", "Auto Clicker I", Basic, 100.0, 1.0),
        generator("auto-clicker-2", "Auto Clicker II", Basic, 750.0, 5.0),
        generator("auto-clicker-3", "Auto Clicker III", Basic, 5_000.0, 20.0),
        generator("auto-clicker-4", "Pixel Factory", Industrial, 30_000.0, 100.0),
        generator("pixel-assembly-line", "Pixel Assembly Line", Industrial, 100_000.0, 250.0),
        generator("auto-clicker-5", "Pixel Reactor", Industrial, 350_000.0, 500.0),
        generator("nanobot-swarm", "Nanobot Swarm", Futuristic, 250_000.0, 1_200.0),
        generator("auto-clicker-6", "Quantum Generator", Futuristic, 750_000.0, 2_500.0),
        generator("temporal-duplicator", "Temporal Duplicator", Futuristic, 2_000_000.0, 5_000.0),
        generator("auto-clicker-7", "Cosmic Harvester", Cosmic, 5_000_000.0, 10_000.0),
        generator("nebula-extractor", "Nebula Extractor", Cosmic, 20_000_000.0, 25_000.0),
        generator("black-hole-compressor", "Black Hole Compressor", Cosmic, 100_000_000.0, 100_000.0),
    ];
    for g in &mut all {
        g.description = match g.tier {
            Basic => "Entry-level automation",
            Industrial => "Mass pixel production",
            Futuristic => "Tomorrow's technology",
            Cosmic => "Harvests pixels from the stars",
        };
    }
    all
}

/// The rebirth skill tree, tier by tier.
pub fn skills() -> Vec<Skill> {
    vec![
        // Tier 1
        Skill {
            id: BASE_CLICK_SKILL,
            name: "Enhanced Clicking",
            description: "+1 click multiplier per level",
            cost: 3,
            effect: SkillEffect::ClickMultiplier,
            value_per_level: 1.0,
            max_level: 10,
            level: 0,
            requires: &[],
        },
        Skill {
            id: "auto-efficiency",
            name: "Automation Mastery",
            description: "Generators +10% per level",
            cost: 3,
            effect: SkillEffect::GeneratorEfficiency,
            value_per_level: 0.1,
            max_level: 10,
            level: 0,
            requires: &[],
        },
        Skill {
            id: "starting-pixels",
            name: "Pixel Cache",
            description: "Start each run with 1,000 pixels per level",
            cost: 3,
            effect: SkillEffect::StartingPixels,
            value_per_level: 1_000.0,
            max_level: 10,
            level: 0,
            requires: &[],
        },
        // Tier 2
        Skill {
            id: "upgrade-discount",
            name: "Bargain Hunter",
            description: "Upgrades 5% cheaper per level",
            cost: 8,
            effect: SkillEffect::UpgradeCostReduction,
            value_per_level: 0.05,
            max_level: 5,
            level: 0,
            requires: &[BASE_CLICK_SKILL],
        },
        Skill {
            id: "autoclicker-discount",
            name: "Mass Production",
            description: "Generators 5% cheaper per level",
            cost: 8,
            effect: SkillEffect::GeneratorCostReduction,
            value_per_level: 0.05,
            max_level: 5,
            level: 0,
            requires: &["auto-efficiency"],
        },
        // Tier 3
        Skill {
            id: "click-mastery",
            name: "Click Mastery",
            description: "Click multiplier x(1 + 2 per level)",
            cost: 15,
            effect: SkillEffect::ClickMultiplier,
            value_per_level: 2.0,
            max_level: 3,
            level: 0,
            requires: &[BASE_CLICK_SKILL, "upgrade-discount"],
        },
        Skill {
            id: "automation-empire",
            name: "Automation Empire",
            description: "Generators +100% per level",
            cost: 15,
            effect: SkillEffect::GeneratorEfficiency,
            value_per_level: 1.0,
            max_level: 3,
            level: 0,
            requires: &["auto-efficiency", "autoclicker-discount"],
        },
        // Tier 4
        Skill {
            id: "pixel-singularity",
            name: "Pixel Singularity",
            description: "Click multiplier x11",
            cost: 50,
            effect: SkillEffect::ClickMultiplier,
            value_per_level: 10.0,
            max_level: 1,
            level: 0,
            requires: &["click-mastery", "automation-empire"],
        },
    ]
}

/// Prerequisite edges `(required, dependent)` of the skill tree, for drawing it.
pub fn skill_edges() -> Vec<(&'static str, &'static str)> {
    skills()
        .iter()
        .flat_map(|s| s.requires.iter().map(move |r| (*r, s.id)))
        .collect()
}
