//! Dirty Water save/load.
//!
//! ## Format
//!
//! `{ "version": 1, "player": { hp, maxHp, level, inventory, permanent,
//! location, flags: { firstFightDone, bossesDefeated } } }`, with items and
//! bosses stored by display name. Older saves were a bare player object
//! without the envelope; those still load.
//!
//! - `SAVE_VERSION`: bump when fields are added.
//! - A record whose version is newer than `SAVE_VERSION` is rejected.
//! - Unknown names are dropped on load instead of failing the whole record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data::{BossKind, ItemKind, MAX_HP_CAP, MAX_LEVEL};
use super::state::{Flags, Location, Player};
use crate::console;

pub const SAVE_VERSION: u32 = 1;

/// localStorage key.
pub const STORAGE_KEY: &str = "dirtyWaterSave";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not serialize save: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not parse save record: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("browser storage failed: {0}")]
    Storage(String),
    #[error("local storage is unavailable")]
    Unavailable,
    #[error("save version {found} is newer than supported version {max}")]
    IncompatibleVersion { found: u32, max: u32 },
}

/// Where the player record lives between sessions.
pub trait SaveStore {
    fn save(&mut self, player: &Player) -> Result<(), SaveError>;
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Player>, SaveError>;
    fn clear(&mut self) -> Result<(), SaveError>;
}

// ── Record format ─────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    player: PlayerSave,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerSave {
    hp: i32,
    max_hp: i32,
    level: u32,
    #[serde(default)]
    inventory: Vec<String>,
    #[serde(default)]
    permanent: Vec<String>,
    #[serde(default)]
    location: String,
    #[serde(default)]
    flags: FlagsSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct FlagsSave {
    first_fight_done: bool,
    bosses_defeated: BTreeMap<String, bool>,
}

/// Versioned envelope first; a bare player object is the legacy layout.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveFile {
    Versioned(SaveData),
    Legacy(PlayerSave),
}

fn extract_save(player: &Player) -> PlayerSave {
    PlayerSave {
        hp: player.hp,
        max_hp: player.max_hp,
        level: player.level,
        inventory: player.inventory.iter().map(|i| i.name().to_string()).collect(),
        permanent: player.permanent.iter().map(|i| i.name().to_string()).collect(),
        location: player.location.key().to_string(),
        flags: FlagsSave {
            first_fight_done: player.flags.first_fight_done,
            bosses_defeated: player
                .flags
                .bosses_defeated
                .iter()
                .map(|(b, &done)| (b.name().to_string(), done))
                .collect(),
        },
    }
}

fn items_from_names(names: &[String]) -> Vec<ItemKind> {
    names
        .iter()
        .filter_map(|name| {
            let item = ItemKind::from_name(name);
            if item.is_none() {
                console::warn(&format!("Dirty Water: dropping unknown item {name:?} from save"));
            }
            item
        })
        .collect()
}

fn apply_save(save: &PlayerSave) -> Player {
    let max_hp = save.max_hp.clamp(1, MAX_HP_CAP);
    let hp = save.hp.min(max_hp);

    let location = match Location::from_key(&save.location) {
        // A dead player cannot pick up where they left off.
        Some(_) if hp <= 0 => Location::GameOver,
        Some(loc) => loc,
        None => {
            console::warn(&format!(
                "Dirty Water: unknown location {:?} in save, starting on the walk",
                save.location
            ));
            Location::Walk
        }
    };

    let mut bosses_defeated = BTreeMap::new();
    for (name, &done) in &save.flags.bosses_defeated {
        match BossKind::from_name(name) {
            Some(boss) => {
                bosses_defeated.insert(boss, done);
            }
            None => {
                console::warn(&format!("Dirty Water: dropping unknown boss {name:?} from save"))
            }
        }
    }

    let mut permanent = items_from_names(&save.permanent);
    let mut seen = Vec::with_capacity(permanent.len());
    permanent.retain(|item| {
        let first = !seen.contains(item);
        seen.push(*item);
        first
    });

    Player {
        hp,
        max_hp,
        level: save.level.clamp(1, MAX_LEVEL),
        inventory: items_from_names(&save.inventory),
        permanent,
        location,
        flags: Flags {
            first_fight_done: save.flags.first_fight_done,
            bosses_defeated,
        },
    }
}

pub fn encode(player: &Player) -> Result<String, SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        player: extract_save(player),
    };
    serde_json::to_string(&data).map_err(SaveError::Serialize)
}

pub fn decode(json: &str) -> Result<Player, SaveError> {
    let (version, save) = match serde_json::from_str(json).map_err(SaveError::Parse)? {
        SaveFile::Versioned(data) => (data.version, data.player),
        SaveFile::Legacy(player) => {
            console::log("Dirty Water: migrating unversioned save");
            (0, player)
        }
    };
    if version > SAVE_VERSION {
        return Err(SaveError::IncompatibleVersion {
            found: version,
            max: SAVE_VERSION,
        });
    }
    Ok(apply_save(&save))
}

// ── Stores ────────────────────────────────────────────────────

/// In-process store for native builds and tests.
#[derive(Default)]
pub struct MemoryStore {
    record: Option<String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_record(json: impl Into<String>) -> Self {
        Self {
            record: Some(json.into()),
        }
    }

    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        self.record = Some(encode(player)?);
        Ok(())
    }

    fn load(&self) -> Result<Option<Player>, SaveError> {
        self.record.as_deref().map(decode).transpose()
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        self.record = None;
        Ok(())
    }
}

/// Browser localStorage under a fixed key.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Result<web_sys::Storage, SaveError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(SaveError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SaveStore for LocalStorage {
    fn save(&mut self, player: &Player) -> Result<(), SaveError> {
        let json = encode(player)?;
        Self::storage()?
            .set_item(&self.key, &json)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn load(&self) -> Result<Option<Player>, SaveError> {
        let json = Self::storage()?
            .get_item(&self.key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))?;
        json.as_deref().map(decode).transpose()
    }

    fn clear(&mut self) -> Result<(), SaveError> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }
}

/// localStorage in the browser, memory elsewhere.
#[cfg(target_arch = "wasm32")]
pub fn default_store(key: &str) -> Box<dyn SaveStore> {
    Box::new(LocalStorage::new(key))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_store(_key: &str) -> Box<dyn SaveStore> {
    Box::new(MemoryStore::default())
}
