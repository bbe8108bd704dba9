//! Session configuration.

use super::save::STORAGE_KEY;

pub struct GameConfig {
    /// localStorage key holding the save record.
    pub storage_key: String,
    /// Typewriter pace.
    pub reveal_ms_per_char: u32,
    /// Fixed seed for reproducible sessions. `None` seeds from the clock.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            reveal_ms_per_char: 18,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    pub fn seed(&self) -> u64 {
        self.rng_seed.unwrap_or_else(entropy_seed)
    }
}

#[cfg(target_arch = "wasm32")]
fn entropy_seed() -> u64 {
    let now = js_sys::Date::now() as u64;
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    now ^ (noise << 32)
}

#[cfg(not(target_arch = "wasm32"))]
fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
