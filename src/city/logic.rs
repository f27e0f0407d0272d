//! Minimal Pixel City game logic: pure functions over [`GameState`].
//!
//! Every transition either applies completely and returns `true` (or a
//! positive amount), or rejects and leaves the state untouched.

use std::rc::Rc;

use super::actions::Command;
use super::catalog;
use super::config::EngineConfig;
use super::effects::compute_effects;
use super::state::{GameState, Skill, SpecialEffects, Upgrade};

/// Critical clicks earn this many times the normal gain.
const CRITICAL_MULTIPLIER: f64 = 2.0;
/// Upper bound of the combo accumulator (a full combo doubles clicks).
const COMBO_CAP: f64 = 1.0;
/// Generator price growth per purchase, before the per-rate surcharge.
const BASE_COST_SCALE: f64 = 1.15;
/// Extra price growth per pixel/sec of the generator being bought.
const COST_SCALE_PER_RATE: f64 = 1.0 / 1000.0;
/// Lifetime pixels are divided by this before taking the cube root.
const REBIRTH_DIVISOR: f64 = 1000.0;

/// Apply a command to a snapshot. A rejected command returns the same `Rc`.
pub fn apply(state: &Rc<GameState>, command: &Command, config: &EngineConfig) -> Rc<GameState> {
    let mut next = GameState::clone(state);
    let changed = match command {
        Command::Click => {
            click(&mut next);
            true
        }
        Command::BuyUpgrade(id) => buy_upgrade(&mut next, id),
        Command::BuyGenerator(id) => buy_generator(&mut next, id),
        Command::Rebirth => rebirth(&mut next, config) > 0,
        Command::BuySkill(id) => buy_skill(&mut next, id),
        Command::Reset => {
            reset(&mut next);
            true
        }
        Command::Tick => tick(&mut next),
    };
    if changed {
        Rc::new(next)
    } else {
        Rc::clone(state)
    }
}

/// Add earned pixels to both the wallet and the lifetime total.
/// Non-finite or non-positive amounts are dropped.
fn earn(state: &mut GameState, amount: f64) -> bool {
    if !amount.is_finite() || amount <= 0.0 {
        return false;
    }
    let pixels = state.pixels + amount;
    let lifetime = state.lifetime_pixels + amount;
    if !pixels.is_finite() || !lifetime.is_finite() {
        return false;
    }
    state.pixels = pixels;
    state.lifetime_pixels = lifetime;
    true
}

/// Society level reached at a given lifetime total: one level per 1000x.
pub fn society_level_for(lifetime_pixels: f64) -> u32 {
    let magnitude = (lifetime_pixels.max(1.0).log10() / 3.0).floor();
    if magnitude.is_finite() {
        (magnitude as u32).saturating_add(1)
    } else {
        u32::MAX
    }
}

fn update_society_level(state: &mut GameState) {
    let level = society_level_for(state.lifetime_pixels);
    if level > state.society_level {
        state.society_level = level;
    }
}

/// Manual click. Returns the pixels gained.
pub fn click(state: &mut GameState) -> f64 {
    let effects = compute_effects(&state.rebirth_skills);
    let mut multiplier = 1.0;

    let chance = state.special_effects.critical_click_chance;
    if chance > 0.0 && state.next_unit() < chance {
        multiplier *= CRITICAL_MULTIPLIER;
    }

    let rate = state.special_effects.combo_rate;
    if rate > 0.0 {
        let combo = (state.special_effects.current_combo + rate).min(COMBO_CAP);
        state.special_effects.current_combo = combo;
        multiplier *= 1.0 + combo;
    }

    let gain = state.click_power * multiplier * effects.click_multiplier;
    let gained = if earn(state, gain) { gain } else { 0.0 };
    state.total_clicks = state.total_clicks.saturating_add(1);
    update_society_level(state);
    gained
}

/// Whether the rebirth gate of an upgrade is satisfied.
pub fn is_upgrade_unlocked(state: &GameState, upgrade: &Upgrade) -> bool {
    upgrade
        .required_rebirths
        .map_or(true, |required| state.rebirth_count >= required)
}

/// Price of an upgrade after skill discounts.
pub fn upgrade_price(state: &GameState, id: &str) -> Option<f64> {
    let upgrade = state.upgrade(id)?;
    Some(compute_effects(&state.rebirth_skills).upgrade_price(upgrade.cost))
}

/// Price of the next unit of a generator after skill discounts.
pub fn generator_price(state: &GameState, id: &str) -> Option<f64> {
    let generator = state.generator(id)?;
    Some(compute_effects(&state.rebirth_skills).generator_price(generator.cost))
}

/// Whether `buy_upgrade(id)` would currently succeed.
pub fn can_buy_upgrade(state: &GameState, id: &str) -> bool {
    match (state.upgrade(id), upgrade_price(state, id)) {
        (Some(u), Some(price)) => {
            !u.purchased && is_upgrade_unlocked(state, u) && state.pixels >= price
        }
        _ => false,
    }
}

/// Whether `buy_generator(id)` would currently succeed.
pub fn can_buy_generator(state: &GameState, id: &str) -> bool {
    generator_price(state, id).map_or(false, |price| state.pixels >= price)
}

/// Try to buy an upgrade by id. Returns true if successful.
pub fn buy_upgrade(state: &mut GameState, id: &str) -> bool {
    let idx = match state.upgrades.iter().position(|u| u.id == id) {
        Some(i) => i,
        None => return false,
    };
    let upgrade = &state.upgrades[idx];
    if upgrade.purchased || !is_upgrade_unlocked(state, upgrade) {
        return false;
    }
    let price = compute_effects(&state.rebirth_skills).upgrade_price(upgrade.cost);
    if state.pixels < price {
        return false;
    }

    let upgrade = upgrade.clone();
    state.pixels = (state.pixels - price).max(0.0);
    let click_power = state.click_power * upgrade.click_multiplier;
    if click_power.is_finite() {
        state.click_power = click_power;
    }
    state.upgrades[idx].purchased = true;

    if let Some(boost) = upgrade.generator_boost {
        for g in &mut state.generators {
            let rate = g.pixels_per_second * (1.0 + boost);
            if rate.is_finite() {
                g.pixels_per_second = rate;
            }
        }
    }
    if let Some(effect) = &upgrade.special_effect {
        state.special_effects.accumulate(effect);
    }
    true
}

/// Try to buy one generator by id. Returns true if successful.
pub fn buy_generator(state: &mut GameState, id: &str) -> bool {
    let idx = match state.generators.iter().position(|g| g.id == id) {
        Some(i) => i,
        None => return false,
    };
    let price = compute_effects(&state.rebirth_skills).generator_price(state.generators[idx].cost);
    if state.pixels < price {
        return false;
    }

    state.pixels = (state.pixels - price).max(0.0);
    let g = &mut state.generators[idx];
    g.count = g.count.saturating_add(1);
    // Stronger generators get steeper price curves
    let scale = BASE_COST_SCALE + g.pixels_per_second * COST_SCALE_PER_RATE;
    let next_cost = (g.cost * scale).floor();
    if next_cost.is_finite() && next_cost > g.cost {
        g.cost = next_cost;
    }
    true
}

/// Rebirth points a rebirth would grant right now.
pub fn pending_rebirth_points(state: &GameState) -> u64 {
    let base = (state.lifetime_pixels / REBIRTH_DIVISOR).cbrt().floor();
    let total = (base * (1.0 + state.special_effects.rebirth_bonus)).floor();
    if total.is_finite() && total >= 1.0 {
        total as u64
    } else {
        0
    }
}

/// Reset the run in exchange for rebirth points. Returns the points earned
/// (0 means the rebirth was rejected and nothing changed).
pub fn rebirth(state: &mut GameState, config: &EngineConfig) -> u64 {
    let gain = pending_rebirth_points(state);
    if gain == 0 {
        return 0;
    }
    let effects = compute_effects(&state.rebirth_skills);

    let mut next = GameState::new();
    next.rebirth_points = state.rebirth_points.saturating_add(gain);
    next.rebirth_count = state.rebirth_count.saturating_add(1);
    next.rebirth_skills = std::mem::take(&mut state.rebirth_skills);
    next.lifetime_pixels = state.lifetime_pixels;
    next.society_level = state.society_level;
    next.special_effects = SpecialEffects {
        current_combo: 0.0,
        ..state.special_effects.clone()
    };
    next.rng_state = state.rng_state;
    if config.seed_starting_pixels
        && effects.starting_pixels.is_finite()
        && effects.starting_pixels > 0.0
    {
        next.pixels = effects.starting_pixels;
    }

    *state = next;
    gain
}

/// Whether every prerequisite of a skill has at least one level.
/// A prerequisite that is missing from the catalog counts as unmet.
pub fn prerequisites_met(state: &GameState, skill: &Skill) -> bool {
    skill
        .requires
        .iter()
        .all(|req| state.skill(req).map_or(false, |s| s.level > 0))
}

/// Whether a skill can be levelled once enough points are available.
pub fn skill_available(state: &GameState, id: &str) -> bool {
    state
        .skill(id)
        .map_or(false, |s| !s.is_maxed() && prerequisites_met(state, s))
}

/// Try to buy one level of a rebirth skill. Returns true if the state changed.
///
/// An empty skill catalog (e.g. from a damaged save) is reinstated from the
/// defaults instead of purchasing.
pub fn buy_skill(state: &mut GameState, id: &str) -> bool {
    if state.rebirth_skills.is_empty() {
        state.rebirth_skills = catalog::skills();
        return true;
    }
    let idx = match state.rebirth_skills.iter().position(|s| s.id == id) {
        Some(i) => i,
        None => return false,
    };
    let skill = &state.rebirth_skills[idx];
    if skill.is_maxed() || state.rebirth_points < skill.cost || !prerequisites_met(state, skill) {
        return false;
    }

    state.rebirth_points -= skill.cost;
    state.rebirth_skills[idx].level += 1;
    true
}

/// Start over from scratch, skills included.
pub fn reset(state: &mut GameState) {
    let rng_state = state.rng_state;
    *state = GameState::new();
    state.rng_state = rng_state;
}

/// Pixels produced per second by generators and passive income.
pub fn pixels_per_second(state: &GameState) -> f64 {
    let effects = compute_effects(&state.rebirth_skills);
    let base: f64 = state.generators.iter().map(|g| g.output()).sum();
    let speed = 1.0 + state.special_effects.auto_click_speed_boost;
    let generator_output = base * effects.generator_efficiency * speed;

    let rate = state.special_effects.passive_income_rate;
    let passive = if rate > 0.0 { state.click_power * rate } else { 0.0 };

    let total = generator_output + passive;
    if total.is_finite() && total > 0.0 {
        total
    } else {
        0.0
    }
}

/// Apply one second of passive production. Returns false when nothing is produced.
pub fn tick(state: &mut GameState) -> bool {
    let production = pixels_per_second(state);
    if !earn(state, production) {
        return false;
    }
    update_society_level(state);
    true
}

/// Format a number with commas (e.g. 1234567 → "1,234,567").
/// Very large values switch to scientific notation.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n >= 1e15 {
        return format!("{:.3e}", n);
    }
    let tenths = (n * 10.0).round() as u64;
    let int_part = tenths / 10;
    let frac = tenths % 10;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0 {
        format!("{}.{}", result, frac)
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn set_level(state: &mut GameState, id: &str, level: u32) {
        let skill = state.rebirth_skills.iter_mut().find(|s| s.id == id).unwrap();
        skill.level = level;
    }

    #[test]
    fn click_from_initial_state() {
        let mut state = GameState::new();
        let gained = click(&mut state);
        assert_eq!(gained, 1.0);
        assert_eq!(state.pixels, 1.0);
        assert_eq!(state.lifetime_pixels, 1.0);
        assert_eq!(state.total_clicks, 1);
    }

    #[test]
    fn click_applies_skill_multiplier() {
        let mut state = GameState::new();
        state.click_power = 2.0;
        set_level(&mut state, "click-power", 2); // multiplier 3
        click(&mut state);
        assert!((state.pixels - 6.0).abs() < 1e-9);
    }

    #[test]
    fn certain_critical_doubles_click() {
        let mut state = GameState::new();
        state.special_effects.critical_click_chance = 1.0;
        click(&mut state);
        assert_eq!(state.pixels, 2.0);
    }

    #[test]
    fn critical_roll_advances_rng_only_when_enabled() {
        let mut state = GameState::new();
        let before = state.rng_state;
        click(&mut state);
        assert_eq!(state.rng_state, before);
        state.special_effects.critical_click_chance = 0.5;
        click(&mut state);
        assert_ne!(state.rng_state, before);
    }

    #[test]
    fn combo_builds_and_caps() {
        let mut state = GameState::new();
        state.special_effects.combo_rate = 0.4;
        assert!((click(&mut state) - 1.4).abs() < 1e-9);
        assert!((click(&mut state) - 1.8).abs() < 1e-9);
        assert!((click(&mut state) - 2.0).abs() < 1e-9);
        assert!((click(&mut state) - 2.0).abs() < 1e-9);
        assert_eq!(state.special_effects.current_combo, 1.0);
    }

    #[test]
    fn society_level_thresholds() {
        assert_eq!(society_level_for(0.0), 1);
        assert_eq!(society_level_for(999.0), 1);
        assert_eq!(society_level_for(1_000.0), 2);
        assert_eq!(society_level_for(1e6), 3);
        assert_eq!(society_level_for(f64::NAN), 1);
        assert_eq!(society_level_for(f64::INFINITY), u32::MAX);
    }

    #[test]
    fn society_level_never_decreases() {
        let mut state = GameState::new();
        state.society_level = 5;
        click(&mut state);
        assert_eq!(state.society_level, 5);
    }

    #[test]
    fn click_updates_society_level() {
        let mut state = GameState::new();
        state.lifetime_pixels = 999_999.0;
        click(&mut state);
        assert_eq!(state.society_level, 3);
    }

    #[test]
    fn buy_upgrade_success() {
        let mut state = GameState::new();
        state.pixels = 250.0;
        assert!(buy_upgrade(&mut state, "basic-upgrade"));
        assert!((state.pixels - 50.0).abs() < 1e-9);
        assert!((state.click_power - 1.4).abs() < 1e-9);
        assert!(state.upgrade("basic-upgrade").unwrap().purchased);
    }

    #[test]
    fn buy_upgrade_twice_is_noop() {
        let mut state = GameState::new();
        state.pixels = 250.0;
        assert!(buy_upgrade(&mut state, "basic-upgrade"));
        let after_first = state.clone();
        assert!(!buy_upgrade(&mut state, "basic-upgrade"));
        assert_eq!(state, after_first);
    }

    #[test]
    fn buy_upgrade_already_purchased_even_if_rich() {
        let mut state = GameState::new();
        state.pixels = 1e6;
        assert!(buy_upgrade(&mut state, "basic-upgrade"));
        assert!(!buy_upgrade(&mut state, "basic-upgrade"));
    }

    #[test]
    fn buy_upgrade_insufficient_funds() {
        let mut state = GameState::new();
        state.pixels = 199.0;
        let before = state.clone();
        assert!(!buy_upgrade(&mut state, "basic-upgrade"));
        assert_eq!(state, before);
    }

    #[test]
    fn buy_upgrade_unknown_id() {
        let mut state = GameState::new();
        state.pixels = 1e30;
        assert!(!buy_upgrade(&mut state, "does-not-exist"));
    }

    #[test]
    fn buy_upgrade_respects_rebirth_gate() {
        let mut state = GameState::new();
        state.pixels = 1e12;
        assert!(!buy_upgrade(&mut state, "critical-pixel"));
        state.rebirth_count = 1;
        assert!(buy_upgrade(&mut state, "critical-pixel"));
        assert!((state.special_effects.critical_click_chance - 0.1).abs() < 1e-9);
        assert!((state.click_power - 12.0).abs() < 1e-9);
    }

    #[test]
    fn buy_upgrade_with_discount() {
        let mut state = GameState::new();
        set_level(&mut state, "upgrade-discount", 2); // 10% off
        state.pixels = 180.0;
        assert_eq!(upgrade_price(&state, "basic-upgrade"), Some(180.0));
        assert!(buy_upgrade(&mut state, "basic-upgrade"));
        assert_eq!(state.pixels, 0.0);
    }

    #[test]
    fn generator_boost_applies_to_every_generator() {
        let mut state = GameState::new();
        state.generators[0].count = 4;
        state.pixels = 12_000_000.0;
        let rates: Vec<f64> = state.generators.iter().map(|g| g.pixels_per_second).collect();
        assert!(buy_upgrade(&mut state, "pixel-synergy"));
        for (g, before) in state.generators.iter().zip(rates) {
            assert!((g.pixels_per_second - before * 1.15).abs() < 1e-6);
        }
        assert!((pixels_per_second(&state) - 4.0 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn special_effect_upgrades_feed_accumulators() {
        let mut state = GameState::new();
        state.rebirth_count = 5;
        state.pixels = 1e15;
        for id in ["time-warp", "combo-master", "pixel-generator", "rebirth-mastery"] {
            assert!(buy_upgrade(&mut state, id), "{}", id);
        }
        let fx = &state.special_effects;
        assert!((fx.auto_click_speed_boost - 0.12).abs() < 1e-9);
        assert!((fx.combo_rate - 0.01).abs() < 1e-9);
        assert!((fx.passive_income_rate - 0.01).abs() < 1e-9);
        assert!((fx.rebirth_bonus - 0.2).abs() < 1e-9);
    }

    #[test]
    fn buy_generator_cost_escalates() {
        let mut state = GameState::new();
        state.pixels = 100.0;
        assert!(buy_generator(&mut state, "auto-clicker-1"));
        let g = state.generator("auto-clicker-1").unwrap();
        assert_eq!(g.count, 1);
        assert_eq!(state.pixels, 0.0);
        assert!(g.cost > 100.0);
        assert_eq!(g.cost, (100.0_f64 * 1.151).floor());
    }

    #[test]
    fn stronger_generators_escalate_faster() {
        let mut state = GameState::new();
        state.pixels = 1e12;
        assert!(buy_generator(&mut state, "auto-clicker-1"));
        assert!(buy_generator(&mut state, "black-hole-compressor"));
        let weak = state.generator("auto-clicker-1").unwrap();
        let strong = state.generator("black-hole-compressor").unwrap();
        assert!(strong.cost / strong.base_cost > weak.cost / weak.base_cost);
    }

    #[test]
    fn buy_generator_insufficient_funds() {
        let mut state = GameState::new();
        state.pixels = 99.0;
        let before = state.clone();
        assert!(!buy_generator(&mut state, "auto-clicker-1"));
        assert_eq!(state, before);
    }

    #[test]
    fn buy_generator_with_discount_keeps_catalog_cost() {
        let mut state = GameState::new();
        set_level(&mut state, "autoclicker-discount", 5); // 25% off
        state.pixels = 75.0;
        assert!(buy_generator(&mut state, "auto-clicker-1"));
        assert_eq!(state.pixels, 0.0);
        // Escalation is computed from the undiscounted price
        assert_eq!(state.generator("auto-clicker-1").unwrap().cost, 115.0);
    }

    #[test]
    fn rebirth_below_threshold_is_rejected() {
        let mut state = GameState::new();
        state.lifetime_pixels = 999.0;
        state.pixels = 999.0;
        let before = state.clone();
        assert_eq!(rebirth(&mut state, &config()), 0);
        assert_eq!(state, before);
    }

    #[test]
    fn rebirth_gain_formula() {
        let mut state = GameState::new();
        state.lifetime_pixels = 1_000.0;
        assert_eq!(pending_rebirth_points(&state), 1);
        state.lifetime_pixels = 8_000_000.0; // cbrt(8000) = 20
        assert_eq!(pending_rebirth_points(&state), 20);
        state.special_effects.rebirth_bonus = 0.2;
        assert_eq!(pending_rebirth_points(&state), 24);
        state.lifetime_pixels = f64::NAN;
        assert_eq!(pending_rebirth_points(&state), 0);
    }

    #[test]
    fn rebirth_resets_run_and_keeps_prestige() {
        let mut state = GameState::new();
        state.pixels = 5_000.0;
        state.lifetime_pixels = 27_000.0; // cbrt(27) = 3
        state.click_power = 9.0;
        state.total_clicks = 77;
        state.society_level = 2;
        state.upgrades[0].purchased = true;
        state.generators[0].count = 3;
        state.generators[0].cost = 200.0;
        state.rebirth_points = 4;
        state.rebirth_count = 1;
        set_level(&mut state, "auto-efficiency", 1);
        state.special_effects.critical_click_chance = 0.1;
        state.special_effects.current_combo = 0.5;
        let skills = state.rebirth_skills.clone();

        assert_eq!(rebirth(&mut state, &config()), 3);
        assert_eq!(state.rebirth_points, 7);
        assert_eq!(state.rebirth_count, 2);
        assert_eq!(state.rebirth_skills, skills);
        assert_eq!(state.lifetime_pixels, 27_000.0);
        assert_eq!(state.society_level, 2);
        assert_eq!(state.pixels, 0.0);
        assert_eq!(state.click_power, 1.0);
        assert_eq!(state.total_clicks, 0);
        assert!(state.upgrades.iter().all(|u| !u.purchased));
        assert_eq!(state.generators[0].count, 0);
        assert_eq!(state.generators[0].cost, 100.0);
        assert!((state.special_effects.critical_click_chance - 0.1).abs() < 1e-9);
        assert_eq!(state.special_effects.current_combo, 0.0);
    }

    #[test]
    fn rebirth_seeds_starting_pixels() {
        let mut state = GameState::new();
        state.lifetime_pixels = 1e6;
        set_level(&mut state, "starting-pixels", 3);
        rebirth(&mut state, &config());
        assert_eq!(state.pixels, 3_000.0);
        // Seeded pixels are not earned pixels
        assert_eq!(state.lifetime_pixels, 1e6);
    }

    #[test]
    fn rebirth_without_seeding() {
        let mut state = GameState::new();
        state.lifetime_pixels = 1e6;
        set_level(&mut state, "starting-pixels", 3);
        let config = EngineConfig {
            seed_starting_pixels: false,
            ..EngineConfig::default()
        };
        rebirth(&mut state, &config);
        assert_eq!(state.pixels, 0.0);
    }

    #[test]
    fn buy_skill_success() {
        let mut state = GameState::new();
        state.rebirth_points = 5;
        assert!(buy_skill(&mut state, "click-power"));
        assert_eq!(state.rebirth_points, 2);
        assert_eq!(state.skill("click-power").unwrap().level, 1);
    }

    #[test]
    fn buy_skill_insufficient_points() {
        let mut state = GameState::new();
        state.rebirth_points = 2;
        let before = state.clone();
        assert!(!buy_skill(&mut state, "click-power"));
        assert_eq!(state, before);
    }

    #[test]
    fn buy_skill_requires_prerequisites() {
        let mut state = GameState::new();
        state.rebirth_points = 1_000;
        assert!(!buy_skill(&mut state, "upgrade-discount"));
        assert!(buy_skill(&mut state, "click-power"));
        assert!(buy_skill(&mut state, "upgrade-discount"));
        // click-mastery needs both click-power and upgrade-discount
        assert!(buy_skill(&mut state, "click-mastery"));
        // pixel-singularity still needs automation-empire
        assert!(!buy_skill(&mut state, "pixel-singularity"));
    }

    #[test]
    fn buy_skill_stops_at_max_level() {
        let mut state = GameState::new();
        state.rebirth_points = 1_000;
        for _ in 0..10 {
            assert!(buy_skill(&mut state, "auto-efficiency"));
        }
        let before = state.clone();
        assert!(!buy_skill(&mut state, "auto-efficiency"));
        assert_eq!(state, before);
        assert_eq!(state.rebirth_points, 970);
    }

    #[test]
    fn buy_skill_missing_prerequisite_is_unmet() {
        let mut state = GameState::new();
        state.rebirth_points = 1_000;
        state.rebirth_skills.retain(|s| s.id != "click-power");
        assert!(!buy_skill(&mut state, "upgrade-discount"));
    }

    #[test]
    fn buy_skill_heals_empty_catalog() {
        let mut state = GameState::new();
        state.rebirth_points = 10;
        state.rebirth_skills.clear();
        assert!(buy_skill(&mut state, "click-power"));
        assert_eq!(state.rebirth_skills, catalog::skills());
        assert_eq!(state.rebirth_points, 10);
    }

    #[test]
    fn skill_availability() {
        let mut state = GameState::new();
        assert!(skill_available(&state, "click-power"));
        assert!(!skill_available(&state, "upgrade-discount"));
        set_level(&mut state, "click-power", 10);
        assert!(!skill_available(&state, "click-power"));
        assert!(skill_available(&state, "upgrade-discount"));
        assert!(!skill_available(&state, "unknown"));
    }

    #[test]
    fn tick_produces_from_generators() {
        let mut state = GameState::new();
        state.generators[0].count = 3; // 3 pps
        state.generators[1].count = 2; // 10 pps
        assert!(tick(&mut state));
        assert!((state.pixels - 13.0).abs() < 1e-9);
        assert!((state.lifetime_pixels - 13.0).abs() < 1e-9);
    }

    #[test]
    fn tick_applies_efficiency_speed_and_passive_income() {
        let mut state = GameState::new();
        state.generators[0].count = 10; // 10 pps
        set_level(&mut state, "auto-efficiency", 5); // x1.5
        state.special_effects.auto_click_speed_boost = 0.2; // x1.2
        state.click_power = 100.0;
        state.special_effects.passive_income_rate = 0.01; // +1
        let expected = 10.0 * 1.5 * 1.2 + 1.0;
        assert!((pixels_per_second(&state) - expected).abs() < 1e-9);
        tick(&mut state);
        assert!((state.pixels - expected).abs() < 1e-9);
    }

    #[test]
    fn tick_without_production_is_rejected() {
        let mut state = GameState::new();
        let before = state.clone();
        assert!(!tick(&mut state));
        assert_eq!(state, before);
    }

    #[test]
    fn tick_never_writes_non_finite_values() {
        let mut state = GameState::new();
        state.generators[0].count = 1;
        state.generators[0].pixels_per_second = f64::MAX;
        set_level(&mut state, "auto-efficiency", 10);
        assert!(!tick(&mut state));
        assert!(state.pixels.is_finite());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut state = GameState::new();
        state.pixels = 1e9;
        state.rebirth_points = 50;
        set_level(&mut state, "click-power", 4);
        reset(&mut state);
        let mut fresh = GameState::new();
        fresh.rng_state = state.rng_state;
        assert_eq!(state, fresh);
    }

    #[test]
    fn apply_returns_same_rc_on_rejection() {
        let state = Rc::new(GameState::new());
        let next = apply(&state, &Command::BuyUpgrade("basic-upgrade".into()), &config());
        assert!(Rc::ptr_eq(&state, &next));
        let next = apply(&state, &Command::Rebirth, &config());
        assert!(Rc::ptr_eq(&state, &next));
        let next = apply(&state, &Command::Tick, &config());
        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn apply_returns_new_rc_on_success() {
        let state = Rc::new(GameState::new());
        let next = apply(&state, &Command::Click, &config());
        assert!(!Rc::ptr_eq(&state, &next));
        assert_eq!(next.pixels, 1.0);
        // The previous snapshot is untouched
        assert_eq!(state.pixels, 0.0);
    }

    #[test]
    fn affordability_helpers() {
        let mut state = GameState::new();
        assert!(!can_buy_upgrade(&state, "basic-upgrade"));
        assert!(!can_buy_generator(&state, "auto-clicker-1"));
        state.pixels = 1e13;
        assert!(can_buy_upgrade(&state, "basic-upgrade"));
        assert!(!can_buy_upgrade(&state, "critical-pixel"));
        assert!(can_buy_generator(&state, "auto-clicker-1"));
        assert!(!can_buy_generator(&state, "nope"));
    }

    #[test]
    fn format_number_basic() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
        assert_eq!(format_number(1.4), "1.4");
        assert_eq!(format_number(-2_500.0), "-2,500");
    }

    #[test]
    fn format_number_rounds_into_next_integer() {
        assert_eq!(format_number(1.97), "2");
        assert_eq!(format_number(999.96), "1,000");
    }

    #[test]
    fn format_number_large_and_degenerate() {
        assert_eq!(format_number(1.5e18), "1.500e18");
        assert_eq!(format_number(f64::NAN), "0");
    }
}
