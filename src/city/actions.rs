//! Commands and semantic action IDs for Minimal Pixel City.
//!
//! Click targets are registered during render with one of the IDs below and
//! come back through `InputEvent::Click`; keys come back as `InputEvent::Key`.
//! Both are resolved to an [`Action`] here so the store has a single dispatch path.

use thiserror::Error;

use super::state::GameState;

/// A state transition requested by the player or the tick driver.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Click,
    BuyUpgrade(String),
    BuyGenerator(String),
    Rebirth,
    BuySkill(String),
    Reset,
    Tick,
}

/// Content tab shown under the click button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generators,
    Upgrades,
    Skills,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Generators, Tab::Upgrades, Tab::Skills, Tab::Stats];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Generators => "Generators",
            Tab::Upgrades => "Upgrades",
            Tab::Skills => "Skills",
            Tab::Stats => "Stats",
        }
    }

    pub fn action_id(&self) -> u16 {
        match self {
            Tab::Generators => TAB_GENERATORS,
            Tab::Upgrades => TAB_UPGRADES,
            Tab::Skills => TAB_SKILLS,
            Tab::Stats => TAB_STATS,
        }
    }
}

/// What an input resolves to.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Dispatch(Command),
    SwitchTab(Tab),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action id {0}")]
    Unknown(u16),
    #[error("action id {id} points past the end of a {len}-entry list")]
    OutOfRange { id: u16, len: usize },
}

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_PIXEL: u16 = 0;
pub const REBIRTH: u16 = 1;
pub const RESET: u16 = 2;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_GENERATORS: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;
pub const TAB_SKILLS: u16 = 12;
pub const TAB_STATS: u16 = 13;

// ── Purchases (base + catalog index) ────────────────────────────
pub const BUY_GENERATOR_BASE: u16 = 100;
pub const BUY_UPGRADE_BASE: u16 = 200;
pub const BUY_SKILL_BASE: u16 = 300;

/// Width of each purchase ID block.
const BLOCK: u16 = 100;

fn indexed(id: u16, base: u16, len: usize) -> Result<usize, ActionError> {
    let idx = (id - base) as usize;
    if idx < len {
        Ok(idx)
    } else {
        Err(ActionError::OutOfRange { id, len })
    }
}

/// Resolve a click target ID against the current catalogs.
pub fn resolve_action(id: u16, state: &GameState) -> Result<Action, ActionError> {
    let action = match id {
        CLICK_PIXEL => Action::Dispatch(Command::Click),
        REBIRTH => Action::Dispatch(Command::Rebirth),
        RESET => Action::Dispatch(Command::Reset),
        TAB_GENERATORS => Action::SwitchTab(Tab::Generators),
        TAB_UPGRADES => Action::SwitchTab(Tab::Upgrades),
        TAB_SKILLS => Action::SwitchTab(Tab::Skills),
        TAB_STATS => Action::SwitchTab(Tab::Stats),
        _ if (BUY_GENERATOR_BASE..BUY_GENERATOR_BASE + BLOCK).contains(&id) => {
            let idx = indexed(id, BUY_GENERATOR_BASE, state.generators.len())?;
            Action::Dispatch(Command::BuyGenerator(state.generators[idx].id.to_string()))
        }
        _ if (BUY_UPGRADE_BASE..BUY_UPGRADE_BASE + BLOCK).contains(&id) => {
            let idx = indexed(id, BUY_UPGRADE_BASE, state.upgrades.len())?;
            Action::Dispatch(Command::BuyUpgrade(state.upgrades[idx].id.to_string()))
        }
        _ if (BUY_SKILL_BASE..BUY_SKILL_BASE + BLOCK).contains(&id) => {
            let idx = indexed(id, BUY_SKILL_BASE, state.rebirth_skills.len())?;
            Action::Dispatch(Command::BuySkill(state.rebirth_skills[idx].id.to_string()))
        }
        _ => return Err(ActionError::Unknown(id)),
    };
    Ok(action)
}

/// Indices of the upgrades listed on the upgrades tab (everything not yet bought).
pub fn listed_upgrades(state: &GameState) -> Vec<usize> {
    state
        .upgrades
        .iter()
        .enumerate()
        .filter(|(_, u)| !u.purchased)
        .map(|(i, _)| i)
        .collect()
}

/// Resolve a key press. Letters buy the n-th listed entry of the current tab.
///
/// * `Space` / `Enter`: click
/// * `1`..`4`: switch tab
/// * `a`..`z`: buy the n-th entry on the generators, upgrades or skills tab
/// * `R`: rebirth
/// * `X`: reset (the store asks for confirmation)
pub fn resolve_key(key: char, tab: Tab, state: &GameState) -> Option<Action> {
    let action = match key {
        ' ' | '\n' => Action::Dispatch(Command::Click),
        '1'..='4' => Action::SwitchTab(Tab::ALL[(key as u8 - b'1') as usize]),
        'R' => Action::Dispatch(Command::Rebirth),
        'X' => Action::Dispatch(Command::Reset),
        'a'..='z' => {
            let n = (key as u8 - b'a') as usize;
            let command = match tab {
                Tab::Generators => Command::BuyGenerator(state.generators.get(n)?.id.to_string()),
                Tab::Upgrades => {
                    let idx = *listed_upgrades(state).get(n)?;
                    Command::BuyUpgrade(state.upgrades[idx].id.to_string())
                }
                Tab::Skills => Command::BuySkill(state.rebirth_skills.get(n)?.id.to_string()),
                Tab::Stats => return None,
            };
            Action::Dispatch(command)
        }
        _ => return None,
    };
    Some(action)
}
