//! Minimal Pixel City save/load.
//!
//! ## Format
//!
//! One JSON object under [`STORAGE_KEY`], camelCase, catalog entries stored as
//! arrays of `{id, ...}` objects. Snapshots written before versioning was
//! introduced have no `version` field and load as version 0.
//!
//! Loading merges the snapshot over a fresh [`GameState`]: missing fields keep
//! their initial values, unknown ids and fields are ignored, and numbers that
//! are negative, non-finite or `null` are clamped back into range. A damaged
//! field or list entry falls back on its own; only text that is not a JSON
//! object at all discards the save.
//!
//! A snapshot from a newer `SAVE_VERSION` is left untouched in storage and the
//! game runs read-only so it is never overwritten.

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::catalog;
use super::logic::society_level_for;
use super::state::{GameState, SpecialEffects};
use crate::platform;

/// Current save format version. Bump when a field changes meaning.
pub const SAVE_VERSION: u32 = 1;

/// localStorage key.
pub const STORAGE_KEY: &str = "minimalPixelCity";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected the write: {0}")]
    Write(String),
}

/// Where snapshots live. The browser uses [`LocalStorage`]; native builds and
/// tests use [`MemoryStore`].
pub trait SnapshotStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, json: &str) -> Result<(), SaveError>;
    fn remove(&mut self);
}

/// Access localStorage. Only works under WASM.
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    key: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        Self { key: STORAGE_KEY }
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for LocalStorage {
    fn read(&self) -> Option<String> {
        get_storage()?.get_item(self.key).ok()?
    }

    fn write(&mut self, json: &str) -> Result<(), SaveError> {
        let storage = get_storage().ok_or(SaveError::Unavailable)?;
        storage
            .set_item(self.key, json)
            .map_err(|e| SaveError::Write(format!("{e:?}")))
    }

    fn remove(&mut self) {
        if let Some(storage) = get_storage() {
            let _ = storage.remove_item(self.key);
        }
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    data: Option<String>,
    #[cfg(test)]
    writes: u32,
    #[cfg(test)]
    fail_writes: bool,
}

/// In-memory store. Clones share the same slot, so a test can hand one clone
/// to the game and inspect the other.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<MemorySlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_data(json: impl Into<String>) -> Self {
        let store = Self::default();
        store.slot.borrow_mut().data = Some(json.into());
        store
    }

    pub fn data(&self) -> Option<String> {
        self.slot.borrow().data.clone()
    }

    /// Number of successful writes.
    #[cfg(test)]
    pub fn writes(&self) -> u32 {
        self.slot.borrow().writes
    }

    /// Make every following write fail, as a full quota would.
    #[cfg(test)]
    pub fn set_fail_writes(&self, fail: bool) {
        self.slot.borrow_mut().fail_writes = fail;
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.data()
    }

    fn write(&mut self, json: &str) -> Result<(), SaveError> {
        let mut slot = self.slot.borrow_mut();
        #[cfg(test)]
        {
            if slot.fail_writes {
                return Err(SaveError::Write("quota exceeded".into()));
            }
            slot.writes += 1;
        }
        slot.data = Some(json.to_string());
        Ok(())
    }

    fn remove(&mut self) {
        self.slot.borrow_mut().data = None;
    }
}

/// Deserialize a field, mapping `null` or a value of the wrong type to `None`
/// so one damaged field never discards the rest of the snapshot.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Deserialize a list, dropping entries that do not parse. Anything other
/// than an array is `None`.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| T::deserialize(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct UpgradeSave {
    #[serde(deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    purchased: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct GeneratorSave {
    #[serde(deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    count: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    cost: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pixels_per_second: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct SkillSave {
    #[serde(deserialize_with = "lenient")]
    id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    level: Option<f64>,
}

/// Prestige accumulators with the browser field names.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct SpecialEffectsSave {
    #[serde(deserialize_with = "lenient")]
    critical_click_chance: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    auto_click_speed_boost: Option<f64>,
    #[serde(rename = "comboMultiplier", deserialize_with = "lenient")]
    combo_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    current_combo: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    passive_income_rate: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    rebirth_bonus: Option<f64>,
}

/// Serialized snapshot. Every field is optional: missing, `null` (JSON's
/// NaN) and wrongly typed values all fall back to the initial state.
#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct SaveData {
    #[serde(deserialize_with = "lenient")]
    version: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pixels: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    lifetime_pixels: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    click_power: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    total_clicks: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    society_level: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    upgrades: Option<Vec<UpgradeSave>>,
    #[serde(deserialize_with = "lenient_list")]
    auto_clickers: Option<Vec<GeneratorSave>>,
    #[serde(deserialize_with = "lenient")]
    rebirth_points: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    rebirth_count: Option<f64>,
    #[serde(deserialize_with = "lenient_list")]
    rebirth_skills: Option<Vec<SkillSave>>,
    #[serde(deserialize_with = "lenient")]
    special_effects: Option<SpecialEffectsSave>,
    #[serde(deserialize_with = "lenient")]
    rng_state: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    last_saved: Option<f64>,
}

/// A decoded snapshot.
#[derive(Debug)]
pub struct Restored {
    pub state: GameState,
    /// Wall-clock stamp of the save, in ms since the epoch.
    pub last_saved: Option<f64>,
    /// True when the state came from storage rather than a fresh start.
    pub loaded: bool,
    /// Set when storage holds data this build must not overwrite.
    pub read_only: bool,
}

fn extract_save(state: &GameState, now_ms: f64) -> SaveData {
    SaveData {
        version: Some(SAVE_VERSION),
        pixels: Some(state.pixels),
        lifetime_pixels: Some(state.lifetime_pixels),
        click_power: Some(state.click_power),
        total_clicks: Some(state.total_clicks as f64),
        society_level: Some(state.society_level as f64),
        upgrades: Some(
            state
                .upgrades
                .iter()
                .map(|u| UpgradeSave {
                    id: Some(u.id.to_string()),
                    purchased: Some(u.purchased),
                })
                .collect(),
        ),
        auto_clickers: Some(
            state
                .generators
                .iter()
                .map(|g| GeneratorSave {
                    id: Some(g.id.to_string()),
                    count: Some(g.count as f64),
                    cost: Some(g.cost),
                    pixels_per_second: Some(g.pixels_per_second),
                })
                .collect(),
        ),
        rebirth_points: Some(state.rebirth_points as f64),
        rebirth_count: Some(state.rebirth_count as f64),
        rebirth_skills: Some(
            state
                .rebirth_skills
                .iter()
                .map(|s| SkillSave {
                    id: Some(s.id.to_string()),
                    level: Some(s.level as f64),
                })
                .collect(),
        ),
        special_effects: Some(effects_save(&state.special_effects)),
        rng_state: Some(state.rng_state),
        last_saved: Some(now_ms),
    }
}

/// Finite and non-negative, or `None`.
fn amount(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

fn whole_u64(value: Option<f64>) -> u64 {
    amount(value).map_or(0, |v| v.floor() as u64)
}

fn whole_u32(value: Option<f64>) -> u32 {
    amount(value).map_or(0, |v| v.floor() as u32)
}

fn effects_save(fx: &SpecialEffects) -> SpecialEffectsSave {
    SpecialEffectsSave {
        critical_click_chance: Some(fx.critical_click_chance),
        auto_click_speed_boost: Some(fx.auto_click_speed_boost),
        combo_rate: Some(fx.combo_rate),
        current_combo: Some(fx.current_combo),
        passive_income_rate: Some(fx.passive_income_rate),
        rebirth_bonus: Some(fx.rebirth_bonus),
    }
}

fn sanitize_effects(fx: SpecialEffectsSave) -> SpecialEffects {
    let clean = |v: Option<f64>| amount(v).unwrap_or(0.0);
    SpecialEffects {
        critical_click_chance: clean(fx.critical_click_chance),
        auto_click_speed_boost: clean(fx.auto_click_speed_boost),
        combo_rate: clean(fx.combo_rate),
        current_combo: clean(fx.current_combo).min(1.0),
        passive_income_rate: clean(fx.passive_income_rate),
        rebirth_bonus: clean(fx.rebirth_bonus),
    }
}

/// Merge a snapshot over the initial state.
fn apply_save(save: SaveData) -> GameState {
    let mut state = GameState::new();

    state.pixels = amount(save.pixels).unwrap_or(0.0);
    // An unset or zero lifetime total falls back to the wallet
    state.lifetime_pixels = amount(save.lifetime_pixels)
        .filter(|v| *v > 0.0)
        .unwrap_or(state.pixels);
    if let Some(power) = amount(save.click_power).filter(|v| *v > 0.0) {
        state.click_power = power;
    }
    state.total_clicks = whole_u64(save.total_clicks);
    state.society_level = whole_u32(save.society_level)
        .max(society_level_for(state.lifetime_pixels))
        .max(1);

    for saved in save.upgrades.iter().flatten() {
        let Some(id) = saved.id.as_deref() else { continue };
        if let Some(u) = state.upgrades.iter_mut().find(|u| u.id == id) {
            u.purchased = saved.purchased.unwrap_or(false);
        }
    }

    for saved in save.auto_clickers.iter().flatten() {
        let Some(id) = saved.id.as_deref() else { continue };
        if let Some(g) = state.generators.iter_mut().find(|g| g.id == id) {
            g.count = whole_u32(saved.count);
            if let Some(cost) = amount(saved.cost) {
                g.cost = cost;
            }
            if let Some(rate) = amount(saved.pixels_per_second) {
                g.pixels_per_second = rate;
            }
        }
    }

    state.rebirth_points = whole_u64(save.rebirth_points);
    state.rebirth_count = whole_u32(save.rebirth_count);

    // A missing or empty skill list keeps the default catalog
    if let Some(skills) = save.rebirth_skills.filter(|s| !s.is_empty()) {
        state.rebirth_skills = catalog::skills();
        for saved in &skills {
            let Some(id) = saved.id.as_deref() else { continue };
            if let Some(s) = state.rebirth_skills.iter_mut().find(|s| s.id == id) {
                s.level = whole_u32(saved.level).min(s.max_level);
            }
        }
    }

    if let Some(fx) = save.special_effects {
        state.special_effects = sanitize_effects(fx);
    }
    if let Some(rng) = save.rng_state {
        state.rng_state = rng;
    }

    state
}

/// Serialize a state for storage, stamping it with `now_ms`.
pub fn encode(state: &GameState, now_ms: f64) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state, now_ms))?)
}

/// Parse a stored snapshot.
pub fn decode(json: &str) -> Result<Restored, LoadError> {
    let save: SaveData = serde_json::from_str(json)?;
    // Unversioned (or unreadable) versions load as 0
    let version = save.version.unwrap_or(0);
    if version > SAVE_VERSION {
        return Err(LoadError::UnsupportedVersion {
            found: version,
            supported: SAVE_VERSION,
        });
    }
    if version < SAVE_VERSION {
        platform::log(&format!(
            "Pixel City: migrating save data (saved={}, current={})",
            version, SAVE_VERSION
        ));
    }
    let last_saved = amount(save.last_saved);
    Ok(Restored {
        state: apply_save(save),
        last_saved,
        loaded: true,
        read_only: false,
    })
}

/// Load the stored snapshot, or start fresh.
///
/// Unreadable data is removed. Data from a newer version is kept and the
/// result is marked read-only.
pub fn load_or_default(store: &mut dyn SnapshotStore) -> Restored {
    let fresh = |read_only| Restored {
        state: GameState::new(),
        last_saved: None,
        loaded: false,
        read_only,
    };

    let json = match store.read() {
        Some(j) => j,
        None => return fresh(false),
    };

    match decode(&json) {
        Ok(restored) => restored,
        Err(e @ LoadError::UnsupportedVersion { .. }) => {
            platform::warn(&format!("Pixel City: {e}; saving is disabled for this session"));
            fresh(true)
        }
        Err(e) => {
            platform::warn(&format!("Pixel City: {e}; discarding save data"));
            store.remove();
            fresh(false)
        }
    }
}

/// Write a snapshot and return the stamp it was written with.
pub fn save(store: &mut dyn SnapshotStore, state: &GameState) -> Result<f64, SaveError> {
    let now = platform::now_ms();
    let json = encode(state, now)?;
    store.write(&json)?;
    Ok(now)
}
