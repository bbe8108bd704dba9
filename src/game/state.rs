//! Dirty Water game state: data structures only, no transitions.
//!
//! `GameState` is the explicit session context handed to every handler in
//! `logic`. Nothing here is global, so tests can run any number of sessions
//! side by side.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::data::{
    boss_info, enemy_info, BossKind, EnemyKind, ItemKind, STARTING_HP, STARTING_ITEM,
};

// ── Locations ─────────────────────────────────────────────────

/// Scene tag persisted with the player so a reload resumes in the right place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Walk,
    Park,
    FriendsHouse,
    Store,
    Backrooms,
    Fight,
    GameOver,
}

impl Location {
    /// Key used in the save record.
    pub fn key(self) -> &'static str {
        match self {
            Location::Walk => "walk",
            Location::Park => "park",
            Location::FriendsHouse => "friendsHouse",
            Location::Store => "store",
            Location::Backrooms => "backrooms",
            Location::Fight => "fight",
            Location::GameOver => "gameOver",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        [
            Location::Walk,
            Location::Park,
            Location::FriendsHouse,
            Location::Store,
            Location::Backrooms,
            Location::Fight,
            Location::GameOver,
        ]
        .into_iter()
        .find(|l| l.key() == key)
    }
}

// ── Player ────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flags {
    /// Set once the forced store encounter has started.
    pub first_fight_done: bool,
    pub bosses_defeated: BTreeMap<BossKind, bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    /// Ordered, duplicates allowed. Items are consumed by position.
    pub inventory: Vec<ItemKind>,
    /// Boss rewards already claimed. Treated as a set.
    pub permanent: Vec<ItemKind>,
    pub location: Location,
    pub flags: Flags,
}

impl Player {
    pub fn new() -> Self {
        Self {
            hp: STARTING_HP,
            max_hp: STARTING_HP,
            level: 1,
            inventory: vec![STARTING_ITEM],
            permanent: Vec::new(),
            location: Location::Walk,
            flags: Flags::default(),
        }
    }

    /// Restore hp, never above `max_hp`.
    pub fn heal(&mut self, amount: i32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    pub fn has_permanent(&self, item: ItemKind) -> bool {
        self.permanent.contains(&item)
    }

    pub fn is_boss_defeated(&self, boss: BossKind) -> bool {
        self.flags.bosses_defeated.get(&boss).copied().unwrap_or(false)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

// ── Enemy ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Foe {
    Enemy(EnemyKind),
    Boss(BossKind),
}

impl Foe {
    pub fn name(self) -> &'static str {
        match self {
            Foe::Enemy(kind) => enemy_info(kind).name,
            Foe::Boss(kind) => boss_info(kind).name,
        }
    }
}

/// The opponent of the current fight. Lives only while the fight does.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub foe: Foe,
    /// May dip below zero on the killing blow.
    pub hp: i32,
    pub dmg: i32,
}

impl Enemy {
    /// Fresh enemy at full hp, stats looked up from the matching roster.
    pub fn spawn(foe: Foe) -> Self {
        let (hp, dmg) = match foe {
            Foe::Enemy(kind) => {
                let info = enemy_info(kind);
                (info.hp, info.dmg)
            }
            Foe::Boss(kind) => {
                let info = boss_info(kind);
                (info.hp, info.dmg)
            }
        };
        Self { foe, hp, dmg }
    }

    pub fn name(&self) -> &'static str {
        self.foe.name()
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.foe, Foe::Boss(_))
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

// ── Phases / Actions ──────────────────────────────────────────

/// Every state the scene/combat machine can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Walk,
    Wait,
    Park,
    FriendsHouse,
    Store,
    Backrooms,
    Found(ItemKind),
    NoBosses,
    FightMenu,
    AttackMenu,
    ItemMenu,
    Escaped,
    LevelUp,
    GameOver,
}

/// Events the player (or a finished reveal) feeds into the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Go(Phase),
    /// The store's forced encounter; marks `first_fight_done`.
    ForcedFight,
    SearchDrawers,
    GoDeeper,
    BossDoor,
    OpenAttacks,
    /// Index into `data::ATTACKS`.
    Attack(usize),
    OpenItems,
    /// Index into the player's inventory.
    UseItem(usize),
    BackToFight,
    Flee,
    GrowMaxHp,
    RandomItem,
    Restart,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub label: String,
    pub action: Action,
}

/// What the current phase shows: narrative text plus either a choice list
/// or a `follow` action fired once the text has been revealed.
#[derive(Clone, Debug, PartialEq)]
pub struct Screen {
    pub text: String,
    pub choices: Vec<Choice>,
    pub follow: Option<Action>,
}

impl Screen {
    pub fn with_choices(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self { text: text.into(), choices, follow: None }
    }

    pub fn then(text: impl Into<String>, follow: Action) -> Self {
        Self { text: text.into(), choices: Vec::new(), follow: Some(follow) }
    }
}

pub fn choice(label: impl Into<String>, action: Action) -> Choice {
    Choice { label: label.into(), action }
}

// ── Persistence requests ──────────────────────────────────────

/// Storage work queued by a transition, flushed by the session afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Persist {
    Save,
    Erase,
}

/// Snapshot handed to the status bar.
pub struct Status<'a> {
    pub hp: i32,
    pub max_hp: i32,
    pub level: u32,
    pub inventory: &'a [ItemKind],
}

// ── Root Game State ───────────────────────────────────────────

pub const MAX_LOG: usize = 30;

pub struct GameState {
    pub player: Player,
    pub enemy: Option<Enemy>,
    pub phase: Phase,

    // Outcome messages (shown below the choices, not persisted)
    pub log: Vec<String>,

    pub rng: StdRng,
    persist: Vec<Persist>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_player(Player::new(), seed)
    }

    /// Build a session around an existing (e.g. loaded) player. The phase is
    /// left at `Walk`; callers enter the real starting phase through `logic`.
    pub fn with_player(player: Player, seed: u64) -> Self {
        Self {
            player,
            enemy: None,
            phase: Phase::Walk,
            log: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            persist: Vec::new(),
        }
    }

    pub fn add_log(&mut self, text: impl Into<String>) {
        self.log.push(text.into());
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    pub fn request(&mut self, op: Persist) {
        if self.persist.last() != Some(&op) {
            self.persist.push(op);
        }
    }

    /// Drain queued storage work in the order it was requested.
    pub fn take_persist(&mut self) -> Vec<Persist> {
        std::mem::take(&mut self.persist)
    }

    pub fn status(&self) -> Status<'_> {
        Status {
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            level: self.player.level,
            inventory: &self.player.inventory,
        }
    }
}
