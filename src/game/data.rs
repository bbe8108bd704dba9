//! Dirty Water static tables: rosters, items and balance constants.
//!
//! Everything here is read-only for the whole session. Names are enum
//! variants so a transition can never reference a row that does not exist.

// ── Enemies ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Creature,
    Worker,
    Freefood,
    Mite,
}

pub struct EnemyInfo {
    pub name: &'static str,
    pub hp: i32,
    pub dmg: i32,
}

pub fn enemy_info(kind: EnemyKind) -> EnemyInfo {
    match kind {
        EnemyKind::Creature => EnemyInfo { name: "Creature", hp: 100, dmg: 10 },
        EnemyKind::Worker => EnemyInfo { name: "Worker", hp: 125, dmg: 15 },
        EnemyKind::Freefood => EnemyInfo { name: "Freefood", hp: 150, dmg: 20 },
        EnemyKind::Mite => EnemyInfo { name: "Mite", hp: 10, dmg: 15 },
    }
}

/// Random encounter pool for "Go deeper".
pub const ALL_ENEMIES: &[EnemyKind] = &[
    EnemyKind::Creature,
    EnemyKind::Worker,
    EnemyKind::Freefood,
    EnemyKind::Mite,
];

/// The forced encounter at the store entrance.
pub const FIRST_FIGHT: EnemyKind = EnemyKind::Creature;

// ── Bosses ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BossKind {
    Cat,
    TheSky,
    Skineater,
    ABox,
    TheManager,
}

pub struct BossInfo {
    pub name: &'static str,
    pub hp: i32,
    pub dmg: i32,
    /// Unique across the roster, so `permanent` membership identifies the boss.
    pub reward: ItemKind,
}

pub fn boss_info(kind: BossKind) -> BossInfo {
    match kind {
        BossKind::Cat => BossInfo {
            name: "Cat", hp: 250, dmg: 20, reward: ItemKind::Shovel,
        },
        BossKind::TheSky => BossInfo {
            name: "The SKY", hp: 400, dmg: 25, reward: ItemKind::MetalBall,
        },
        BossKind::Skineater => BossInfo {
            name: "Skineater", hp: 320, dmg: 30, reward: ItemKind::Stick,
        },
        BossKind::ABox => BossInfo {
            name: "a BOX", hp: 500, dmg: 30, reward: ItemKind::BeachBall,
        },
        BossKind::TheManager => BossInfo {
            name: "THE MANAGER", hp: 750, dmg: 40, reward: ItemKind::Shotgun,
        },
    }
}

/// Declaration order. The Boss Door always picks the first undefeated entry.
pub const ALL_BOSSES: &[BossKind] = &[
    BossKind::Cat,
    BossKind::TheSky,
    BossKind::Skineater,
    BossKind::ABox,
    BossKind::TheManager,
];

impl BossKind {
    pub fn name(self) -> &'static str {
        boss_info(self).name
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_BOSSES.iter().copied().find(|b| b.name() == name)
    }
}

// ── Items ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Beer,
    Meat,
    RubberBall,
    Slingshot,
    MetalBall,
    BeachBall,
    Shovel,
    Stick,
    Shotgun,
}

pub const ALL_ITEMS: &[ItemKind] = &[
    ItemKind::Beer,
    ItemKind::Meat,
    ItemKind::RubberBall,
    ItemKind::Slingshot,
    ItemKind::MetalBall,
    ItemKind::BeachBall,
    ItemKind::Shovel,
    ItemKind::Stick,
    ItemKind::Shotgun,
];

impl ItemKind {
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Beer => "Beer",
            ItemKind::Meat => "Meat",
            ItemKind::RubberBall => "Rubber Ball",
            ItemKind::Slingshot => "Slingshot",
            ItemKind::MetalBall => "Metal Ball",
            ItemKind::BeachBall => "Beach Ball",
            ItemKind::Shovel => "Shovel",
            ItemKind::Stick => "Stick",
            ItemKind::Shotgun => "Shotgun",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ITEMS.iter().copied().find(|i| i.name() == name)
    }
}

/// What using an item does. Interpreted by [`super::logic::apply_effect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemEffect {
    /// Restore hp, clamped to max hp.
    Heal(i32),
    /// Raise max hp by `max_delta`, then heal `heal` against the new max.
    HealAndGrow { heal: i32, max_delta: i32 },
    /// Subtract from the current enemy's hp. No effect outside a fight.
    DamageEnemy(i32),
}

pub fn item_effect(kind: ItemKind) -> ItemEffect {
    match kind {
        ItemKind::Beer => ItemEffect::Heal(5),
        ItemKind::Meat => ItemEffect::HealAndGrow { heal: 10, max_delta: 5 },
        ItemKind::RubberBall => ItemEffect::DamageEnemy(10),
        ItemKind::Slingshot => ItemEffect::DamageEnemy(5),
        ItemKind::MetalBall => ItemEffect::DamageEnemy(20),
        ItemKind::BeachBall => ItemEffect::DamageEnemy(15),
        ItemKind::Shovel => ItemEffect::DamageEnemy(25),
        ItemKind::Stick => ItemEffect::DamageEnemy(12),
        ItemKind::Shotgun => ItemEffect::DamageEnemy(50),
    }
}

/// Drawer finds and the level-up random item come from this pool.
pub const DRAWER_POOL: &[ItemKind] = &[ItemKind::Beer, ItemKind::Meat, ItemKind::Slingshot];

/// Granted instead of a boss reward that is already in `permanent`.
pub const FALLBACK_REWARD: ItemKind = ItemKind::MetalBall;

// ── Attacks ───────────────────────────────────────────────────

pub struct Attack {
    pub label: &'static str,
    pub damage: i32,
}

pub const ATTACKS: &[Attack] = &[
    Attack { label: "Fists (10)", damage: 10 },
    Attack { label: "Throw Rock (15)", damage: 15 },
];

// ── Balance ───────────────────────────────────────────────────

pub const STARTING_HP: i32 = 100;
pub const STARTING_ITEM: ItemKind = ItemKind::RubberBall;

/// Chance that fleeing a regular enemy works. Bosses can never be fled.
pub const FLEE_CHANCE: f64 = 0.25;

/// Minimum level at which the Boss Door shows up in the back rooms.
pub const BOSS_DOOR_LEVEL: u32 = 5;

/// Max hp gained from the "Increase Max HP" level-up reward.
pub const LEVEL_UP_MAX_HP: i32 = 10;

/// Ceilings applied to loaded saves.
pub const MAX_HP_CAP: i32 = 99_999;
pub const MAX_LEVEL: u32 = 9_999;
