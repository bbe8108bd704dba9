//! Narrative text for every scene.

pub const WALK: &str = "You are on a walk. No rules. Just movement.";
pub const WAIT: &str = "You wait. The world continues.";
pub const PARK: &str = "The park exists. Progress is real.";
pub const FRIENDS_HOUSE: &str =
    "Your friend is gone. A note asks you to get eggs from the store.";
pub const STORE: &str = "The store is wrong. Creatures move.";
pub const BACKROOMS: &str = "Back rooms of the store. Endless.";
pub const NO_BOSSES: &str = "No bosses remain.";
pub const ESCAPED: &str = "You escape.";
pub const FLEE_FAILED: &str = "You fail to escape.";
pub const CHOOSE_ATTACK: &str = "Choose attack:";
pub const INVENTORY: &str = "Inventory:";
pub const EMPTY_POCKETS: &str = "Your pockets are empty.";
pub const GAME_OVER: &str = "You collapse. Dirty water fills the screen.";

pub fn found(item: &str) -> String {
    format!("You found {}.", item)
}

pub fn fight_menu(enemy: &str, hp: i32) -> String {
    format!("{} appears.\nEnemy HP: {}", enemy, hp)
}

pub fn level_up(level: u32) -> String {
    format!("Level up! You are now level {}.", level)
}
