//! Minimal Pixel City game state definitions.

use super::catalog;

/// Upgrade groups, in unlock order. Used for grouping in the upgrade list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeTier {
    PixelGeneration,
    AiRevolution,
    MultiversalTech,
    CosmicAscension,
    Transcendence,
    Prestige,
}

impl UpgradeTier {
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeTier::PixelGeneration => "Pixel Generation",
            UpgradeTier::AiRevolution => "AI Revolution",
            UpgradeTier::MultiversalTech => "Multiversal Tech",
            UpgradeTier::CosmicAscension => "Cosmic Ascension",
            UpgradeTier::Transcendence => "Transcendence",
            UpgradeTier::Prestige => "Prestige",
        }
    }
}

/// Generator groups, in unlock order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorTier {
    Basic,
    Industrial,
    Futuristic,
    Cosmic,
}

impl GeneratorTier {
    pub fn name(&self) -> &'static str {
        match self {
            GeneratorTier::Basic => "Basic",
            GeneratorTier::Industrial => "Industrial",
            GeneratorTier::Futuristic => "Futuristic",
            GeneratorTier::Cosmic => "Cosmic",
        }
    }
}

/// Which accumulator in [`SpecialEffects`] a prestige upgrade feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialEffectKind {
    CriticalClicks,
    AutoClickSpeed,
    ComboMultiplier,
    PassiveIncome,
    RebirthBonus,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpecialEffect {
    pub kind: SpecialEffectKind,
    pub value: f64,
}

/// A one-time click power upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: UpgradeTier,
    pub cost: f64,
    /// Click power is multiplied by this on purchase.
    pub click_multiplier: f64,
    /// Fractional boost applied to every generator's rate (0.15 = +15%).
    pub generator_boost: Option<f64>,
    pub special_effect: Option<SpecialEffect>,
    /// Minimum rebirth count before the upgrade can be bought.
    pub required_rebirths: Option<u32>,
    pub purchased: bool,
}

/// An automated pixel generator ("auto clicker").
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: GeneratorTier,
    /// Catalog price of the first unit.
    pub base_cost: f64,
    /// Current price of the next unit (before skill discounts).
    pub cost: f64,
    /// Pixels per second per unit, including permanent upgrade boosts.
    pub pixels_per_second: f64,
    pub count: u32,
}

impl Generator {
    /// Pixels per second produced by all owned units, before bonuses.
    pub fn output(&self) -> f64 {
        self.pixels_per_second * self.count as f64
    }
}

/// What a rebirth skill improves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillEffect {
    ClickMultiplier,
    GeneratorEfficiency,
    StartingPixels,
    UpgradeCostReduction,
    GeneratorCostReduction,
}

/// A node of the rebirth skill tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Price per level, in rebirth points.
    pub cost: u64,
    pub effect: SkillEffect,
    pub value_per_level: f64,
    pub max_level: u32,
    pub level: u32,
    /// Skills that must have at least one level before this one can be bought.
    pub requires: &'static [&'static str],
}

impl Skill {
    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }

    /// Total magnitude at the current level.
    pub fn magnitude(&self) -> f64 {
        self.value_per_level * self.level as f64
    }
}

/// Accumulated bonuses from prestige upgrades.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpecialEffects {
    /// Probability that a click is critical (2x).
    pub critical_click_chance: f64,
    /// Fractional speed-up of all generators.
    pub auto_click_speed_boost: f64,
    /// Combo gained per click.
    pub combo_rate: f64,
    /// Current combo accumulator in [0, 1]; click gain is scaled by `1 + current_combo`.
    pub current_combo: f64,
    /// Fraction of click power earned passively every second.
    pub passive_income_rate: f64,
    /// Fractional bonus on rebirth points.
    pub rebirth_bonus: f64,
}

impl SpecialEffects {
    /// Add a prestige upgrade's value into its accumulator.
    pub fn accumulate(&mut self, effect: &SpecialEffect) {
        let slot = match effect.kind {
            SpecialEffectKind::CriticalClicks => &mut self.critical_click_chance,
            SpecialEffectKind::AutoClickSpeed => &mut self.auto_click_speed_boost,
            SpecialEffectKind::ComboMultiplier => &mut self.combo_rate,
            SpecialEffectKind::PassiveIncome => &mut self.passive_income_rate,
            SpecialEffectKind::RebirthBonus => &mut self.rebirth_bonus,
        };
        if effect.value.is_finite() && effect.value > 0.0 {
            *slot += effect.value;
        }
    }
}

/// Full state of a Minimal Pixel City game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Spendable pixels.
    pub pixels: f64,
    /// Pixels earned across all runs; never reset by rebirth.
    pub lifetime_pixels: f64,
    /// Pixels per click before bonuses.
    pub click_power: f64,
    pub total_clicks: u64,
    /// Milestone level derived from lifetime pixels (starts at 1).
    pub society_level: u32,
    pub upgrades: Vec<Upgrade>,
    pub generators: Vec<Generator>,
    pub rebirth_points: u64,
    pub rebirth_count: u32,
    pub rebirth_skills: Vec<Skill>,
    pub special_effects: SpecialEffects,
    /// xorshift state for critical-click rolls.
    pub rng_state: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            pixels: 0.0,
            lifetime_pixels: 0.0,
            click_power: 1.0,
            total_clicks: 0,
            society_level: 1,
            upgrades: catalog::upgrades(),
            generators: catalog::generators(),
            rebirth_points: 0,
            rebirth_count: 0,
            rebirth_skills: catalog::skills(),
            special_effects: SpecialEffects::default(),
            rng_state: 42,
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&Upgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.rebirth_skills.iter().find(|s| s.id == id)
    }

    /// Advance the xorshift32 generator and return the next value.
    pub fn next_random(&mut self) -> u32 {
        let mut x = if self.rng_state == 0 { 0x9E37_79B9 } else { self.rng_state };
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Uniform sample in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        self.next_random() as f64 / (u32::MAX as f64 + 1.0)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_catalogs() {
        let state = GameState::new();
        assert_eq!(state.pixels, 0.0);
        assert_eq!(state.click_power, 1.0);
        assert_eq!(state.society_level, 1);
        assert_eq!(state.upgrades.len(), catalog::upgrades().len());
        assert!(state.upgrades.iter().all(|u| !u.purchased));
        assert!(state.generators.iter().all(|g| g.count == 0 && g.cost == g.base_cost));
        assert!(state.rebirth_skills.iter().all(|s| s.level == 0));
    }

    #[test]
    fn lookups_by_id() {
        let state = GameState::new();
        assert_eq!(state.upgrade("basic-upgrade").map(|u| u.cost), Some(200.0));
        assert_eq!(state.generator("auto-clicker-1").map(|g| g.cost), Some(100.0));
        assert_eq!(state.skill("click-power").map(|s| s.max_level), Some(10));
        assert!(state.upgrade("nope").is_none());
    }

    #[test]
    fn generator_output_scales_with_count() {
        let mut g = GameState::new().generators[1].clone();
        assert_eq!(g.output(), 0.0);
        g.count = 3;
        assert!((g.output() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn special_effects_accumulate_additively() {
        let mut fx = SpecialEffects::default();
        let crit = SpecialEffect {
            kind: SpecialEffectKind::CriticalClicks,
            value: 0.1,
        };
        fx.accumulate(&crit);
        fx.accumulate(&crit);
        assert!((fx.critical_click_chance - 0.2).abs() < 1e-9);
        assert_eq!(fx.combo_rate, 0.0);
    }

    #[test]
    fn special_effects_ignore_degenerate_values() {
        let mut fx = SpecialEffects::default();
        fx.accumulate(&SpecialEffect {
            kind: SpecialEffectKind::PassiveIncome,
            value: f64::NAN,
        });
        fx.accumulate(&SpecialEffect {
            kind: SpecialEffectKind::PassiveIncome,
            value: -1.0,
        });
        assert_eq!(fx.passive_income_rate, 0.0);
    }

    #[test]
    fn rng_is_deterministic_and_in_range() {
        let mut a = GameState::new();
        let mut b = GameState::new();
        for _ in 0..100 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn rng_recovers_from_zero_state() {
        let mut state = GameState::new();
        state.rng_state = 0;
        assert_ne!(state.next_random(), 0);
    }

    #[test]
    fn skill_magnitude_and_max() {
        let mut skill = GameState::new().skill("auto-efficiency").cloned().unwrap();
        skill.level = 3;
        assert!((skill.magnitude() - 0.3).abs() < 1e-9);
        assert!(!skill.is_maxed());
        skill.level = skill.max_level;
        assert!(skill.is_maxed());
    }
}
