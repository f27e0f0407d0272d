//! Minimal Pixel City: an incremental pixel clicker with rebirths and a skill tree.

pub mod actions;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};
use crate::platform;
use crate::time::TickDriver;

use actions::{Action, Command, Tab};
use config::EngineConfig;
use effects::{compute_effects, EffectBundle};
use save::SnapshotStore;
use state::GameState;

/// Most entries kept in the message log.
const LOG_CAPACITY: usize = 50;

/// A message log entry.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// The game store: owns the current snapshot, the tick driver and the
/// persistence handle. Every change goes through [`PixelCity::dispatch`].
pub struct PixelCity {
    state: Rc<GameState>,
    config: EngineConfig,
    driver: TickDriver,
    store: Box<dyn SnapshotStore>,
    /// A successful transition has not been saved yet.
    dirty: bool,
    /// Storage holds a newer save that must not be overwritten.
    read_only: bool,
    last_saved: Option<f64>,
    tab: Tab,
    log: Vec<LogEntry>,
    /// The first reset request only arms; the second one wipes.
    reset_armed: bool,
    shut_down: bool,
}

impl PixelCity {
    /// Load the stored game (or start fresh) from `store`.
    /// `seed` feeds the click RNG when no snapshot was found.
    pub fn new(mut store: Box<dyn SnapshotStore>, config: EngineConfig, seed: u32) -> Self {
        let restored = save::load_or_default(store.as_mut());
        let mut state = restored.state;
        if !restored.loaded {
            state.rng_state = seed;
        }

        let mut city = Self {
            state: Rc::new(state),
            config,
            driver: TickDriver::new(config.tick_period_ms, config.max_catch_up_ticks),
            store,
            dirty: false,
            read_only: restored.read_only,
            last_saved: restored.last_saved,
            tab: Tab::default(),
            log: Vec::new(),
            reset_armed: false,
            shut_down: false,
        };
        if restored.loaded {
            city.push_log("Welcome back to your city.", false);
        } else {
            city.push_log("Click the pixel to start building your city.", false);
        }
        if restored.read_only {
            city.push_log("This save is from a newer version; progress will not be saved.", true);
        }
        city
    }

    // ── Reads ──────────────────────────────────────────────────

    pub fn state(&self) -> Rc<GameState> {
        Rc::clone(&self.state)
    }

    pub fn pixels_per_second(&self) -> f64 {
        logic::pixels_per_second(&self.state)
    }

    pub fn rebirth_effects(&self) -> EffectBundle {
        compute_effects(&self.state.rebirth_skills)
    }

    pub fn pending_rebirth_points(&self) -> u64 {
        logic::pending_rebirth_points(&self.state)
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Wall-clock stamp (ms since the epoch) of the last successful save.
    pub fn last_saved(&self) -> Option<f64> {
        self.last_saved
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn reset_armed(&self) -> bool {
        self.reset_armed
    }

    pub fn is_running(&self) -> bool {
        self.driver.is_running()
    }

    // ── Commands ───────────────────────────────────────────────

    /// Apply one command. Returns the resulting snapshot, which is the
    /// previous `Rc` itself when the command was rejected.
    pub fn dispatch(&mut self, command: Command) -> Rc<GameState> {
        let next = logic::apply(&self.state, &command, &self.config);
        if !Rc::ptr_eq(&next, &self.state) {
            let prev = std::mem::replace(&mut self.state, Rc::clone(&next));
            self.dirty = true;
            self.record(&command, &prev, &next);
        }
        next
    }

    pub fn click(&mut self) -> Rc<GameState> {
        self.dispatch(Command::Click)
    }

    pub fn buy_upgrade(&mut self, id: &str) -> Rc<GameState> {
        self.dispatch(Command::BuyUpgrade(id.to_string()))
    }

    pub fn buy_generator(&mut self, id: &str) -> Rc<GameState> {
        self.dispatch(Command::BuyGenerator(id.to_string()))
    }

    pub fn rebirth(&mut self) -> Rc<GameState> {
        self.dispatch(Command::Rebirth)
    }

    pub fn buy_skill(&mut self, id: &str) -> Rc<GameState> {
        self.dispatch(Command::BuySkill(id.to_string()))
    }

    pub fn reset(&mut self) -> Rc<GameState> {
        self.dispatch(Command::Reset)
    }

    /// Write a log line for a transition that went through.
    fn record(&mut self, command: &Command, prev: &GameState, next: &GameState) {
        match command {
            Command::BuyUpgrade(id) => {
                if let Some(u) = next.upgrade(id) {
                    self.push_log(&format!("Bought {}.", u.name), false);
                }
            }
            Command::BuyGenerator(id) => {
                if let Some(g) = next.generator(id) {
                    self.push_log(&format!("Built {} (x{}).", g.name, g.count), false);
                }
            }
            Command::Rebirth => {
                let gained = next.rebirth_points - prev.rebirth_points;
                self.push_log(
                    &format!(
                        "Rebirth #{}: +{} rebirth points.",
                        next.rebirth_count, gained
                    ),
                    true,
                );
            }
            Command::BuySkill(id) => match (prev.skill(id), next.skill(id)) {
                (Some(before), Some(after)) if after.level > before.level => {
                    self.push_log(
                        &format!("Learned {} (level {}/{}).", after.name, after.level, after.max_level),
                        true,
                    );
                }
                _ => self.push_log("Skill tree restored.", false),
            },
            Command::Reset => self.push_log("The city was wiped. Starting over.", true),
            Command::Click | Command::Tick => {}
        }
        if next.society_level > prev.society_level && !matches!(command, Command::Reset) {
            self.push_log(
                &format!("Your society reached level {}!", next.society_level),
                true,
            );
        }
    }

    fn push_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Start passive production. Idempotent.
    pub fn start(&mut self) {
        if !self.shut_down {
            self.driver.start();
        }
    }

    /// Feed the frame clock and apply one `Tick` per elapsed period.
    /// Returns the number of periods applied.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let periods = self.driver.update(now_ms);
        for _ in 0..periods {
            self.dispatch(Command::Tick);
        }
        periods
    }

    /// Save if anything changed since the last save. Returns true if a
    /// snapshot was written.
    pub fn flush(&mut self) -> bool {
        if !self.dirty || self.read_only {
            return false;
        }
        // A failed write is retried on the next change, not every frame
        self.dirty = false;
        match save::save(self.store.as_mut(), &self.state) {
            Ok(stamp) => {
                self.last_saved = Some(stamp);
                true
            }
            Err(e) => {
                platform::warn(&format!("Pixel City: save failed: {e}"));
                false
            }
        }
    }

    /// Stop the tick driver and write the final save. Only the first call
    /// does anything.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.driver.stop();
        self.flush();
        self.shut_down = true;
    }

    // ── Host glue ──────────────────────────────────────────────

    /// Handle a key press or click target. Returns true if the input was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let action = match event {
            InputEvent::Key(c) => match actions::resolve_key(*c, self.tab, &self.state) {
                Some(a) => a,
                None => return false,
            },
            InputEvent::Click(id) => match actions::resolve_action(*id, &self.state) {
                Ok(a) => a,
                Err(e) => {
                    platform::warn(&format!("Pixel City: {e}"));
                    return false;
                }
            },
        };

        match action {
            Action::SwitchTab(tab) => {
                self.tab = tab;
                self.reset_armed = false;
            }
            Action::Dispatch(Command::Reset) if !self.reset_armed => {
                self.reset_armed = true;
                self.push_log("Press reset again to wipe everything, skills included.", true);
            }
            Action::Dispatch(command) => {
                self.reset_armed = false;
                self.dispatch(command);
            }
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

impl Drop for PixelCity {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use save::MemoryStore;

    fn city_with(store: &MemoryStore) -> PixelCity {
        PixelCity::new(Box::new(store.clone()), EngineConfig::default(), 7)
    }

    #[test]
    fn fresh_city_uses_seed() {
        let store = MemoryStore::new();
        let city = city_with(&store);
        assert_eq!(city.state().rng_state, 7);
        assert_eq!(city.state().pixels, 0.0);
        assert!(!city.is_running());
    }

    #[test]
    fn loaded_city_keeps_its_rng() {
        let mut state = GameState::new();
        state.rng_state = 99;
        state.pixels = 10.0;
        let store = MemoryStore::with_data(save::encode(&state, 1.0).unwrap());
        let city = city_with(&store);
        assert_eq!(city.state().rng_state, 99);
        assert_eq!(city.state().pixels, 10.0);
        assert_eq!(city.last_saved(), Some(1.0));
    }

    #[test]
    fn rejected_command_returns_same_snapshot() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        let before = city.state();
        let after = city.buy_upgrade("basic-upgrade");
        assert!(Rc::ptr_eq(&before, &after));
        assert!(!city.flush());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn successful_command_saves_once() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        let after = city.click();
        assert_eq!(after.pixels, 1.0);
        assert!(city.flush());
        assert!(!city.flush());
        assert_eq!(store.writes(), 1);
        assert!(city.last_saved().is_some());
    }

    #[test]
    fn convenience_methods_dispatch() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        for _ in 0..300 {
            city.click();
        }
        city.buy_generator("auto-clicker-1");
        assert_eq!(city.state().pixels, 200.0);
        city.buy_upgrade("basic-upgrade");
        let state = city.state();
        assert_eq!(state.generator("auto-clicker-1").unwrap().count, 1);
        assert!(state.upgrade("basic-upgrade").unwrap().purchased);
        assert_eq!(state.pixels, 0.0);
        assert_eq!(city.pixels_per_second(), 1.0);
        let after = city.click();
        assert!((after.pixels - 1.4).abs() < 0.001);
    }

    #[test]
    fn advance_applies_ticks_only_while_running() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        let mut state = GameState::new();
        state.generators[0].count = 2;
        city.state = Rc::new(state);

        assert_eq!(city.advance(0.0), 0);
        assert_eq!(city.advance(5_000.0), 0);
        city.start();
        city.start();
        assert_eq!(city.advance(10_000.0), 0);
        assert_eq!(city.advance(13_000.0), 3);
        assert!((city.state().pixels - 6.0).abs() < 0.001);
    }

    #[test]
    fn shutdown_stops_driver_and_flushes_once() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        city.start();
        city.click();
        city.shutdown();
        assert!(!city.is_running());
        assert_eq!(store.writes(), 1);
        city.shutdown();
        assert_eq!(store.writes(), 1);
        city.start();
        assert!(!city.is_running());
        assert_eq!(city.advance(1e9), 0);
    }

    #[test]
    fn drop_flushes_pending_changes() {
        let store = MemoryStore::new();
        {
            let mut city = city_with(&store);
            city.click();
            city.click();
        }
        assert_eq!(store.writes(), 1);
        let restored = save::decode(&store.data().unwrap()).unwrap();
        assert_eq!(restored.state.pixels, 2.0);
    }

    #[test]
    fn read_only_city_never_writes() {
        let json = format!(r#"{{"version": {}}}"#, save::SAVE_VERSION + 1);
        let store = MemoryStore::with_data(json.clone());
        {
            let mut city = city_with(&store);
            city.click();
            assert!(!city.flush());
        }
        assert_eq!(store.data(), Some(json));
    }

    #[test]
    fn failed_save_is_not_fatal() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut city = city_with(&store);
        city.click();
        assert!(!city.flush());
        assert_eq!(city.last_saved(), None);
        store.set_fail_writes(false);
        city.click();
        assert!(city.flush());
    }

    #[test]
    fn purchases_and_rebirths_are_logged() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        let mut state = GameState::new();
        state.pixels = 1_000.0;
        state.lifetime_pixels = 27_000.0;
        city.state = Rc::new(state);

        city.buy_generator("auto-clicker-1");
        assert_eq!(city.log().last().unwrap().text, "Built Auto Clicker I (x1).");
        city.rebirth();
        let last = city.log().last().unwrap();
        assert_eq!(last.text, "Rebirth #1: +3 rebirth points.");
        assert!(last.is_important);
        city.buy_skill("click-power");
        assert!(city.log().last().unwrap().text.starts_with("Learned Enhanced Clicking"));
    }

    #[test]
    fn log_is_bounded() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        for _ in 0..(LOG_CAPACITY + 10) {
            city.push_log("x", false);
        }
        assert_eq!(city.log().len(), LOG_CAPACITY);
    }

    #[test]
    fn keys_and_clicks_route_through_actions() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        assert!(city.handle_input(&InputEvent::Key(' ')));
        assert!(city.handle_input(&InputEvent::Click(actions::CLICK_PIXEL)));
        assert_eq!(city.state().total_clicks, 2);

        assert!(city.handle_input(&InputEvent::Key('2')));
        assert_eq!(city.tab(), Tab::Upgrades);
        assert!(city.handle_input(&InputEvent::Click(actions::TAB_STATS)));
        assert_eq!(city.tab(), Tab::Stats);

        assert!(!city.handle_input(&InputEvent::Key('?')));
        assert!(!city.handle_input(&InputEvent::Click(9_999)));
    }

    #[test]
    fn reset_needs_confirmation() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        city.click();
        city.handle_input(&InputEvent::Key('X'));
        assert!(city.reset_armed());
        assert_eq!(city.state().pixels, 1.0);
        city.handle_input(&InputEvent::Key('X'));
        assert!(!city.reset_armed());
        assert_eq!(city.state().pixels, 0.0);
        assert_eq!(city.state().total_clicks, 0);
    }

    #[test]
    fn other_input_disarms_reset() {
        let store = MemoryStore::new();
        let mut city = city_with(&store);
        city.click();
        city.handle_input(&InputEvent::Click(actions::RESET));
        city.handle_input(&InputEvent::Key(' '));
        assert!(!city.reset_armed());
        city.handle_input(&InputEvent::Click(actions::RESET));
        assert_eq!(city.state().total_clicks, 2);
    }
}
