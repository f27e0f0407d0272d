//! Browser shims: console logging and wall-clock time.
//!
//! Off-WASM (unit tests, native `cargo check`) logging is a no-op and time
//! comes from `SystemTime`, so engine code can call these unconditionally.

/// Log an informational message to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(_msg: &str) {}

/// Log a warning to the browser console.
#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(_msg: &str) {}

/// Milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// High-resolution frame clock (`performance.now()`), in milliseconds.
/// Falls back to the wall clock when the Performance API is unavailable.
#[cfg(target_arch = "wasm32")]
pub fn frame_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(now_ms)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn frame_ms() -> f64 {
    now_ms()
}

/// Seed for the click RNG derived from the wall clock. Never zero.
pub fn rng_seed() -> u32 {
    let ms = now_ms() as u64;
    ((ms ^ (ms >> 32)) as u32) | 1
}
