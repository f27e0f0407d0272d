/// Engine tuning knobs fixed at build time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Wall-clock period of one passive production tick.
    pub tick_period_ms: f64,
    /// Most ticks applied for one frame after the tab was backgrounded.
    pub max_catch_up_ticks: u32,
    /// Grant the skill tree's starting pixels immediately after a rebirth.
    pub seed_starting_pixels: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000.0,
            max_catch_up_ticks: 5,
            seed_starting_pixels: true,
        }
    }
}
