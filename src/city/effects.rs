//! Aggregate bonuses derived from rebirth skill levels.

use super::catalog::BASE_CLICK_SKILL;
use super::state::{Skill, SkillEffect};

/// Totals of every skill effect at the current skill levels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectBundle {
    /// Multiplies every click.
    pub click_multiplier: f64,
    /// Multiplies generator output.
    pub generator_efficiency: f64,
    /// Pixels granted at the start of each run.
    pub starting_pixels: f64,
    /// Fractional discount on upgrades.
    pub upgrade_cost_reduction: f64,
    /// Fractional discount on generators.
    pub generator_cost_reduction: f64,
}

impl Default for EffectBundle {
    fn default() -> Self {
        Self {
            click_multiplier: 1.0,
            generator_efficiency: 1.0,
            starting_pixels: 0.0,
            upgrade_cost_reduction: 0.0,
            generator_cost_reduction: 0.0,
        }
    }
}

impl EffectBundle {
    /// Apply a fractional reduction to a price and floor it.
    /// The multiplier never drops below zero, so a price can reach 0 but not go negative.
    pub fn discount(cost: f64, reduction: f64) -> f64 {
        let factor = (1.0 - reduction).max(0.0);
        let price = (cost * factor).floor();
        if price.is_finite() {
            price.max(0.0)
        } else {
            cost
        }
    }

    pub fn upgrade_price(&self, cost: f64) -> f64 {
        Self::discount(cost, self.upgrade_cost_reduction)
    }

    pub fn generator_price(&self, cost: f64) -> f64 {
        Self::discount(cost, self.generator_cost_reduction)
    }
}

/// Fold the skill tree into an [`EffectBundle`].
///
/// The base click skill adds to the click multiplier; every other click skill
/// multiplies it by `1 + value * level`, so higher tiers compound on top of
/// the flat tier-1 bonus.
pub fn compute_effects(skills: &[Skill]) -> EffectBundle {
    let mut effects = EffectBundle::default();
    for skill in skills.iter().filter(|s| s.level > 0) {
        let amount = skill.magnitude();
        match skill.effect {
            SkillEffect::ClickMultiplier if skill.id == BASE_CLICK_SKILL => {
                effects.click_multiplier += amount;
            }
            SkillEffect::ClickMultiplier => {
                effects.click_multiplier *= 1.0 + amount;
            }
            SkillEffect::GeneratorEfficiency => effects.generator_efficiency += amount,
            SkillEffect::StartingPixels => effects.starting_pixels += amount,
            SkillEffect::UpgradeCostReduction => effects.upgrade_cost_reduction += amount,
            SkillEffect::GeneratorCostReduction => effects.generator_cost_reduction += amount,
        }
    }
    effects
}
