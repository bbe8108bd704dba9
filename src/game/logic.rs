//! Dirty Water game logic (pure, no rendering or IO).
//!
//! The machine is `Phase` × `Action`: [`screen`] lists what the current phase
//! offers, [`perform`] applies one action and moves to the next phase.
//! Storage work is queued on the state and flushed by the session.

use rand::Rng;

use super::data::{
    boss_info, item_effect, BossKind, ItemEffect, ItemKind, ALL_BOSSES, ALL_ENEMIES, ATTACKS,
    BOSS_DOOR_LEVEL, DRAWER_POOL, FALLBACK_REWARD, FIRST_FIGHT, FLEE_CHANCE, LEVEL_UP_MAX_HP,
};
use super::lore;
use super::state::{
    choice, Action, Enemy, Foe, GameState, Location, Persist, Phase, Player, Screen,
};

// ── Session start ─────────────────────────────────────────────

pub fn new_game(seed: u64) -> GameState {
    let mut state = GameState::new(seed);
    enter(&mut state, Phase::Walk);
    state
}

/// Where a stored location picks the story back up. `None` means the save
/// is not resumable and a new game starts instead.
pub fn resume_phase(location: Location) -> Option<Phase> {
    match location {
        Location::Walk => Some(Phase::Walk),
        Location::Park => Some(Phase::Park),
        Location::FriendsHouse => Some(Phase::FriendsHouse),
        Location::Store => Some(Phase::Store),
        // The enemy is never stored; drop back to the hub.
        Location::Backrooms | Location::Fight => Some(Phase::Backrooms),
        Location::GameOver => None,
    }
}

pub fn resume(player: Player, seed: u64) -> GameState {
    match resume_phase(player.location) {
        Some(phase) => {
            let mut state = GameState::with_player(player, seed);
            enter(&mut state, phase);
            state
        }
        None => new_game(seed),
    }
}

// ── Screens ───────────────────────────────────────────────────

pub fn screen(state: &GameState) -> Screen {
    match state.phase {
        Phase::Walk => Screen::with_choices(
            lore::WALK,
            vec![
                choice("Go to friend's house", Action::Go(Phase::FriendsHouse)),
                choice("Walk to the park", Action::Go(Phase::Park)),
                choice("WAIT", Action::Go(Phase::Wait)),
            ],
        ),
        Phase::Wait => Screen::then(lore::WAIT, Action::Go(Phase::Walk)),
        Phase::Park => Screen::then(lore::PARK, Action::Go(Phase::Walk)),
        Phase::FriendsHouse => Screen::with_choices(
            lore::FRIENDS_HOUSE,
            vec![choice("Go to the store", Action::Go(Phase::Store))],
        ),
        Phase::Store => {
            let next = if state.player.flags.first_fight_done {
                Action::Go(Phase::Backrooms)
            } else {
                Action::ForcedFight
            };
            Screen::then(lore::STORE, next)
        }
        Phase::Backrooms => {
            let mut choices = vec![
                choice("Search drawers", Action::SearchDrawers),
                choice("Go deeper", Action::GoDeeper),
            ];
            if state.player.level >= BOSS_DOOR_LEVEL {
                choices.push(choice("Boss Door", Action::BossDoor));
            }
            Screen::with_choices(lore::BACKROOMS, choices)
        }
        Phase::Found(item) => Screen::then(lore::found(item.name()), Action::Go(Phase::Backrooms)),
        Phase::NoBosses => Screen::then(lore::NO_BOSSES, Action::Go(Phase::Backrooms)),
        Phase::Escaped => Screen::then(lore::ESCAPED, Action::Go(Phase::Backrooms)),
        Phase::FightMenu => match &state.enemy {
            Some(enemy) => Screen::with_choices(
                lore::fight_menu(enemy.name(), enemy.hp),
                vec![
                    choice("ATTACK", Action::OpenAttacks),
                    choice("USE ITEM", Action::OpenItems),
                    choice("FLEE", Action::Flee),
                ],
            ),
            None => Screen::then(lore::BACKROOMS, Action::Go(Phase::Backrooms)),
        },
        Phase::AttackMenu => Screen::with_choices(
            lore::CHOOSE_ATTACK,
            ATTACKS
                .iter()
                .enumerate()
                .map(|(i, a)| choice(a.label, Action::Attack(i)))
                .collect(),
        ),
        Phase::ItemMenu => {
            let inventory = &state.player.inventory;
            let text = if inventory.is_empty() { lore::EMPTY_POCKETS } else { lore::INVENTORY };
            let mut choices: Vec<_> = inventory
                .iter()
                .enumerate()
                .map(|(i, item)| choice(item.name(), Action::UseItem(i)))
                .collect();
            choices.push(choice("Back", Action::BackToFight));
            Screen::with_choices(text, choices)
        }
        Phase::LevelUp => Screen::with_choices(
            lore::level_up(state.player.level),
            vec![
                choice(format!("Increase Max HP (+{})", LEVEL_UP_MAX_HP), Action::GrowMaxHp),
                choice("Get random item", Action::RandomItem),
            ],
        ),
        Phase::GameOver => {
            Screen::with_choices(lore::GAME_OVER, vec![choice("Restart", Action::Restart)])
        }
    }
}

// ── Transitions ───────────────────────────────────────────────

/// Apply the choice at `index` of the current screen.
pub fn select_choice(state: &mut GameState, index: usize) -> bool {
    let action = match screen(state).choices.get(index) {
        Some(c) => c.action,
        None => return false,
    };
    perform(state, action)
}

/// Fire the current screen's follow-up, if it has one.
pub fn follow(state: &mut GameState) -> bool {
    match screen(state).follow {
        Some(action) => perform(state, action),
        None => false,
    }
}

/// Returns false when the action does not apply to the current state.
pub fn perform(state: &mut GameState, action: Action) -> bool {
    match action {
        Action::Go(phase) => {
            enter(state, phase);
            true
        }
        Action::ForcedFight => {
            state.player.flags.first_fight_done = true;
            start_fight(state, Foe::Enemy(FIRST_FIGHT));
            true
        }
        Action::SearchDrawers => search_drawers(state),
        Action::GoDeeper => go_deeper(state),
        Action::BossDoor => boss_door(state),
        Action::OpenAttacks => open_combat_menu(state, Phase::AttackMenu),
        Action::Attack(index) => attack(state, index),
        Action::OpenItems => open_combat_menu(state, Phase::ItemMenu),
        Action::UseItem(index) => use_item(state, index),
        Action::BackToFight => open_combat_menu(state, Phase::FightMenu),
        Action::Flee => flee(state),
        Action::GrowMaxHp => grow_max_hp(state),
        Action::RandomItem => random_item(state),
        Action::Restart => {
            restart(state);
            true
        }
    }
}

/// Move to a narrative phase. Named scenes update the location and save.
pub fn enter(state: &mut GameState, phase: Phase) {
    state.phase = phase;
    let location = match phase {
        Phase::Walk => Location::Walk,
        Phase::Park => Location::Park,
        Phase::FriendsHouse => Location::FriendsHouse,
        Phase::Store => Location::Store,
        Phase::Backrooms => Location::Backrooms,
        _ => return,
    };
    state.player.location = location;
    state.request(Persist::Save);
}

pub fn restart(state: &mut GameState) {
    state.player = Player::new();
    state.enemy = None;
    state.log.clear();
    enter(state, Phase::Walk);
}

fn draw(state: &mut GameState, pool: &[ItemKind]) -> ItemKind {
    pool[state.rng.gen_range(0..pool.len())]
}

// ── Back rooms ────────────────────────────────────────────────

fn search_drawers(state: &mut GameState) -> bool {
    if state.phase != Phase::Backrooms {
        return false;
    }
    let item = draw(state, DRAWER_POOL);
    state.player.inventory.push(item);
    state.add_log(format!("Found {}.", item.name()));
    state.request(Persist::Save);
    state.phase = Phase::Found(item);
    true
}

fn go_deeper(state: &mut GameState) -> bool {
    if state.phase != Phase::Backrooms {
        return false;
    }
    let kind = ALL_ENEMIES[state.rng.gen_range(0..ALL_ENEMIES.len())];
    start_fight(state, Foe::Enemy(kind));
    true
}

/// Undefeated bosses in declaration order.
pub fn remaining_bosses(player: &Player) -> Vec<BossKind> {
    ALL_BOSSES
        .iter()
        .copied()
        .filter(|&b| !player.is_boss_defeated(b))
        .collect()
}

fn boss_door(state: &mut GameState) -> bool {
    if state.phase != Phase::Backrooms || state.player.level < BOSS_DOOR_LEVEL {
        return false;
    }
    match remaining_bosses(&state.player).first().copied() {
        Some(boss) => start_fight(state, Foe::Boss(boss)),
        None => state.phase = Phase::NoBosses,
    }
    true
}

// ── Combat ────────────────────────────────────────────────────

pub fn start_fight(state: &mut GameState, foe: Foe) {
    state.enemy = Some(Enemy::spawn(foe));
    state.player.location = Location::Fight;
    state.phase = Phase::FightMenu;
}

fn open_combat_menu(state: &mut GameState, phase: Phase) -> bool {
    if state.enemy.is_none() {
        return false;
    }
    state.phase = phase;
    true
}

fn attack(state: &mut GameState, index: usize) -> bool {
    let Some(attack) = ATTACKS.get(index) else {
        return false;
    };
    let Some(enemy) = state.enemy.as_mut() else {
        return false;
    };
    enemy.hp -= attack.damage;
    let name = enemy.name();
    state.add_log(format!("You hit {} for {}.", name, attack.damage));
    resolve_player_move(state);
    true
}

fn use_item(state: &mut GameState, index: usize) -> bool {
    if state.enemy.is_none() {
        return false;
    }
    let Some(&item) = state.player.inventory.get(index) else {
        return false;
    };
    apply_effect(item_effect(item), &mut state.player, state.enemy.as_mut());
    // Consumed even when the effect ends the fight.
    state.player.inventory.remove(index);
    state.add_log(format!("You used {}.", item.name()));
    resolve_player_move(state);
    true
}

fn flee(state: &mut GameState) -> bool {
    let is_boss = match &state.enemy {
        Some(enemy) => enemy.is_boss(),
        None => return false,
    };
    let escaped = !is_boss && state.rng.gen_bool(FLEE_CHANCE);
    if escaped {
        state.enemy = None;
        state.player.location = Location::Backrooms;
        state.request(Persist::Save);
        state.phase = Phase::Escaped;
    } else {
        state.add_log(lore::FLEE_FAILED);
        enemy_turn(state);
    }
    true
}

fn resolve_player_move(state: &mut GameState) {
    if state.enemy.as_ref().is_some_and(Enemy::is_defeated) {
        win_fight(state);
    } else {
        enemy_turn(state);
    }
}

fn enemy_turn(state: &mut GameState) {
    let (name, dmg) = match &state.enemy {
        Some(enemy) => (enemy.name(), enemy.dmg),
        None => return,
    };
    state.player.hp = state.player.hp.saturating_sub(dmg);
    state.add_log(format!("{} hits you for {}.", name, dmg));
    if state.player.is_dead() {
        game_over(state);
    } else {
        state.request(Persist::Save);
        state.phase = Phase::FightMenu;
    }
}

fn win_fight(state: &mut GameState) {
    let Some(enemy) = state.enemy.take() else {
        return;
    };
    state.add_log(format!("{} is defeated.", enemy.name()));

    if let Foe::Boss(boss) = enemy.foe {
        let reward = boss_info(boss).reward;
        if state.player.has_permanent(reward) {
            state.player.inventory.push(FALLBACK_REWARD);
            state.add_log(format!("{} drops {}.", boss.name(), FALLBACK_REWARD.name()));
        } else {
            state.player.permanent.push(reward);
            state.player.inventory.push(reward);
            state.add_log(format!("{} drops {}!", boss.name(), reward.name()));
        }
        state.player.flags.bosses_defeated.insert(boss, true);
    }

    state.player.level = state.player.level.saturating_add(1);
    state.request(Persist::Save);
    state.phase = Phase::LevelUp;
}

fn game_over(state: &mut GameState) {
    state.enemy = None;
    state.player.location = Location::GameOver;
    state.request(Persist::Erase);
    state.phase = Phase::GameOver;
}

/// Interpret an item effect against explicit player/enemy state.
pub fn apply_effect(effect: ItemEffect, player: &mut Player, enemy: Option<&mut Enemy>) {
    match effect {
        ItemEffect::Heal(amount) => player.heal(amount),
        ItemEffect::HealAndGrow { heal, max_delta } => {
            player.max_hp = player.max_hp.saturating_add(max_delta);
            player.heal(heal);
        }
        ItemEffect::DamageEnemy(amount) => {
            if let Some(enemy) = enemy {
                enemy.hp -= amount;
            }
        }
    }
}

// ── Level Up ─────────────────────────────────────────────────

fn grow_max_hp(state: &mut GameState) -> bool {
    if state.phase != Phase::LevelUp {
        return false;
    }
    state.player.max_hp = state.player.max_hp.saturating_add(LEVEL_UP_MAX_HP);
    state.player.hp = state.player.max_hp;
    state.add_log(format!("Max HP is now {}.", state.player.max_hp));
    enter(state, Phase::Backrooms);
    true
}

fn random_item(state: &mut GameState) -> bool {
    if state.phase != Phase::LevelUp {
        return false;
    }
    let item = draw(state, DRAWER_POOL);
    state.player.inventory.push(item);
    state.add_log(format!("You got {}.", item.name()));
    enter(state, Phase::Backrooms);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::data::EnemyKind;

    fn labels(state: &GameState) -> Vec<String> {
        screen(state).choices.into_iter().map(|c| c.label).collect()
    }

    fn in_backrooms(level: u32) -> GameState {
        let mut s = new_game(3);
        s.player.level = level;
        enter(&mut s, Phase::Backrooms);
        s.take_persist();
        s
    }

    fn sturdy(s: &mut GameState) {
        s.player.max_hp = 10_000;
        s.player.hp = 10_000;
    }

    #[test]
    fn new_game_starts_walking_and_saves() {
        let mut s = new_game(1);
        assert_eq!(s.phase, Phase::Walk);
        assert_eq!(s.player.location, Location::Walk);
        assert_eq!(s.take_persist(), vec![Persist::Save]);
        assert_eq!(labels(&s), ["Go to friend's house", "Walk to the park", "WAIT"]);
    }

    #[test]
    fn story_path_to_first_fight() {
        let mut s = new_game(1);
        assert!(select_choice(&mut s, 0));
        assert_eq!(s.phase, Phase::FriendsHouse);
        assert_eq!(s.player.location, Location::FriendsHouse);
        assert!(select_choice(&mut s, 0));
        assert_eq!(s.phase, Phase::Store);
        assert!(screen(&s).choices.is_empty());
        assert!(follow(&mut s));
        assert_eq!(s.phase, Phase::FightMenu);
        assert!(s.player.flags.first_fight_done);
        assert_eq!(s.enemy.as_ref().map(|e| e.foe), Some(Foe::Enemy(EnemyKind::Creature)));
        assert_eq!(s.player.location, Location::Fight);
        assert_eq!(screen(&s).text, "Creature appears.\nEnemy HP: 100");
    }

    #[test]
    fn wait_and_park_return_to_walk() {
        let mut s = new_game(1);
        select_choice(&mut s, 2);
        assert_eq!(s.phase, Phase::Wait);
        assert!(follow(&mut s));
        assert_eq!(s.phase, Phase::Walk);
        select_choice(&mut s, 1);
        assert_eq!(s.phase, Phase::Park);
        assert_eq!(s.player.location, Location::Park);
        follow(&mut s);
        assert_eq!(s.phase, Phase::Walk);
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let mut s = new_game(1);
        assert!(!select_choice(&mut s, 9));
        assert_eq!(s.phase, Phase::Walk);
    }

    #[test]
    fn follow_without_follow_up_does_nothing() {
        let mut s = new_game(1);
        assert!(!follow(&mut s));
        assert_eq!(s.phase, Phase::Walk);
    }

    #[test]
    fn boss_door_only_from_level_five() {
        let s = in_backrooms(4);
        assert_eq!(labels(&s), ["Search drawers", "Go deeper"]);
        let s = in_backrooms(5);
        assert_eq!(labels(&s), ["Search drawers", "Go deeper", "Boss Door"]);

        let mut low = in_backrooms(4);
        assert!(!perform(&mut low, Action::BossDoor));
        assert!(low.enemy.is_none());
    }

    #[test]
    fn search_drawers_adds_pool_item_and_saves() {
        let mut s = in_backrooms(1);
        assert!(perform(&mut s, Action::SearchDrawers));
        let found = *s.player.inventory.last().unwrap();
        assert!(DRAWER_POOL.contains(&found));
        assert_eq!(s.player.inventory.len(), 2);
        assert_eq!(s.phase, Phase::Found(found));
        assert_eq!(s.take_persist(), vec![Persist::Save]);
        assert_eq!(screen(&s).text, format!("You found {}.", found.name()));
        follow(&mut s);
        assert_eq!(s.phase, Phase::Backrooms);
    }

    #[test]
    fn search_drawers_draws_every_pool_item_eventually() {
        let mut s = in_backrooms(1);
        for _ in 0..200 {
            perform(&mut s, Action::SearchDrawers);
            follow(&mut s);
        }
        for item in DRAWER_POOL {
            assert!(s.player.inventory.contains(item), "{:?} never found", item);
        }
    }

    #[test]
    fn go_deeper_starts_regular_fight() {
        let mut s = in_backrooms(1);
        assert!(perform(&mut s, Action::GoDeeper));
        let enemy = s.enemy.as_ref().unwrap();
        assert!(!enemy.is_boss());
        assert_eq!(s.phase, Phase::FightMenu);
    }

    #[test]
    fn creature_scenario() {
        let mut s = new_game(1);
        start_fight(&mut s, Foe::Enemy(EnemyKind::Creature));
        perform(&mut s, Action::OpenAttacks);
        assert_eq!(labels(&s), ["Fists (10)", "Throw Rock (15)"]);
        assert!(perform(&mut s, Action::Attack(1)));
        assert_eq!(s.enemy.as_ref().unwrap().hp, 85);
        assert_eq!(s.player.hp, 90);
        assert_eq!(s.phase, Phase::FightMenu);

        while s.enemy.is_some() {
            perform(&mut s, Action::OpenAttacks);
            perform(&mut s, Action::Attack(1));
        }
        // Seven rocks: six enemy turns in between.
        assert_eq!(s.player.hp, 40);
        assert_eq!(s.player.level, 2);
        assert_eq!(s.phase, Phase::LevelUp);
        assert_eq!(s.player.inventory, vec![ItemKind::RubberBall]);
        assert!(s.player.permanent.is_empty());
        assert_eq!(screen(&s).text, "Level up! You are now level 2.");
    }

    #[test]
    fn cat_scenario() {
        let mut s = in_backrooms(5);
        sturdy(&mut s);
        assert!(perform(&mut s, Action::BossDoor));
        let enemy = s.enemy.as_ref().unwrap();
        assert_eq!(enemy.foe, Foe::Boss(BossKind::Cat));
        assert_eq!((enemy.hp, enemy.dmg), (250, 20));

        while s.enemy.is_some() {
            perform(&mut s, Action::OpenAttacks);
            perform(&mut s, Action::Attack(1));
        }
        assert_eq!(s.player.permanent, vec![ItemKind::Shovel]);
        assert_eq!(s.player.inventory, vec![ItemKind::RubberBall, ItemKind::Shovel]);
        assert!(s.player.is_boss_defeated(BossKind::Cat));
        assert_eq!(s.player.level, 6);
    }

    #[test]
    fn second_win_against_boss_gives_fallback() {
        let mut s = new_game(1);
        for _ in 0..2 {
            start_fight(&mut s, Foe::Boss(BossKind::Skineater));
            s.enemy.as_mut().unwrap().hp = 1;
            perform(&mut s, Action::Attack(0));
        }
        assert_eq!(s.player.permanent, vec![ItemKind::Stick]);
        assert_eq!(
            s.player.inventory,
            vec![ItemKind::RubberBall, ItemKind::Stick, ItemKind::MetalBall]
        );
        assert_eq!(s.player.level, 3);
    }

    #[test]
    fn boss_door_picks_first_undefeated_in_order() {
        let mut s = in_backrooms(5);
        s.player.flags.bosses_defeated.insert(BossKind::Cat, true);
        s.player.flags.bosses_defeated.insert(BossKind::Skineater, true);
        perform(&mut s, Action::BossDoor);
        assert_eq!(s.enemy.unwrap().foe, Foe::Boss(BossKind::TheSky));
    }

    #[test]
    fn boss_door_with_no_bosses_left() {
        let mut s = in_backrooms(9);
        for &boss in ALL_BOSSES {
            s.player.flags.bosses_defeated.insert(boss, true);
        }
        assert!(remaining_bosses(&s.player).is_empty());
        assert!(perform(&mut s, Action::BossDoor));
        assert!(s.enemy.is_none());
        assert_eq!(s.phase, Phase::NoBosses);
        assert_eq!(screen(&s).text, "No bosses remain.");
        follow(&mut s);
        assert_eq!(s.phase, Phase::Backrooms);
        assert!(s.enemy.is_none());
    }

    #[test]
    fn false_flag_does_not_count_as_defeated() {
        let mut p = Player::new();
        p.flags.bosses_defeated.insert(BossKind::Cat, false);
        assert_eq!(remaining_bosses(&p)[0], BossKind::Cat);
    }

    #[test]
    fn item_menu_lists_inventory_and_back() {
        let mut s = new_game(1);
        s.player.inventory = vec![ItemKind::Beer, ItemKind::Beer];
        start_fight(&mut s, Foe::Enemy(EnemyKind::Worker));
        perform(&mut s, Action::OpenItems);
        assert_eq!(screen(&s).text, "Inventory:");
        assert_eq!(labels(&s), ["Beer", "Beer", "Back"]);
    }

    #[test]
    fn item_menu_back_costs_no_turn() {
        let mut s = new_game(1);
        start_fight(&mut s, Foe::Enemy(EnemyKind::Worker));
        perform(&mut s, Action::OpenItems);
        assert!(perform(&mut s, Action::BackToFight));
        assert_eq!(s.phase, Phase::FightMenu);
        assert_eq!(s.player.hp, 100);
        assert_eq!(s.player.inventory.len(), 1);
    }

    #[test]
    fn empty_inventory_shows_message_and_back_only() {
        let mut s = new_game(1);
        s.player.inventory.clear();
        start_fight(&mut s, Foe::Enemy(EnemyKind::Worker));
        perform(&mut s, Action::OpenItems);
        assert_eq!(screen(&s).text, "Your pockets are empty.");
        assert_eq!(labels(&s), ["Back"]);
        assert!(!perform(&mut s, Action::UseItem(0)));
        assert_eq!(s.player.hp, 100);
    }

    #[test]
    fn healing_item_costs_a_turn() {
        let mut s = new_game(1);
        s.player.hp = 50;
        s.player.inventory = vec![ItemKind::Beer];
        start_fight(&mut s, Foe::Enemy(EnemyKind::Creature));
        perform(&mut s, Action::OpenItems);
        assert!(perform(&mut s, Action::UseItem(0)));
        // +5 from beer, -10 from the enemy turn
        assert_eq!(s.player.hp, 45);
        assert!(s.player.inventory.is_empty());
        assert_eq!(s.phase, Phase::FightMenu);
    }

    #[test]
    fn finishing_item_is_still_consumed() {
        let mut s = new_game(1);
        s.player.inventory = vec![ItemKind::RubberBall, ItemKind::RubberBall];
        start_fight(&mut s, Foe::Enemy(EnemyKind::Mite));
        perform(&mut s, Action::OpenItems);
        perform(&mut s, Action::UseItem(1));
        assert!(s.enemy.is_none());
        assert_eq!(s.phase, Phase::LevelUp);
        assert_eq!(s.player.inventory, vec![ItemKind::RubberBall]);
        assert_eq!(s.player.hp, 100);
    }

    #[test]
    fn item_removed_by_position() {
        let mut s = new_game(1);
        sturdy(&mut s);
        s.player.inventory = vec![ItemKind::Beer, ItemKind::Stick, ItemKind::Meat];
        start_fight(&mut s, Foe::Enemy(EnemyKind::Freefood));
        perform(&mut s, Action::UseItem(1));
        assert_eq!(s.player.inventory, vec![ItemKind::Beer, ItemKind::Meat]);
        assert_eq!(s.enemy.as_ref().unwrap().hp, 150 - 12);
    }

    #[test]
    fn meat_grows_then_heals() {
        let mut p = Player::new();
        p.hp = 100;
        apply_effect(item_effect(ItemKind::Meat), &mut p, None);
        assert_eq!((p.hp, p.max_hp), (105, 105));
        p.hp = 20;
        apply_effect(item_effect(ItemKind::Meat), &mut p, None);
        assert_eq!((p.hp, p.max_hp), (30, 110));
    }

    #[test]
    fn damage_effect_without_enemy_is_harmless() {
        let mut p = Player::new();
        apply_effect(ItemEffect::DamageEnemy(50), &mut p, None);
        assert_eq!(p, Player::new());
    }

    #[test]
    fn flee_from_boss_always_fails_and_costs_hp() {
        let mut s = new_game(1);
        sturdy(&mut s);
        start_fight(&mut s, Foe::Boss(BossKind::Cat));
        for i in 1..=200 {
            assert!(perform(&mut s, Action::Flee));
            assert_eq!(s.phase, Phase::FightMenu);
            assert!(s.enemy.is_some());
            assert_eq!(s.player.hp, 10_000 - 20 * i);
        }
        assert_eq!(s.player.level, 1);
    }

    #[test]
    fn flee_regular_enemy_succeeds_about_a_quarter_of_the_time() {
        let mut s = new_game(7);
        let trials = 4000;
        let mut escapes = 0;
        for _ in 0..trials {
            sturdy(&mut s);
            start_fight(&mut s, Foe::Enemy(EnemyKind::Creature));
            perform(&mut s, Action::Flee);
            match s.phase {
                Phase::Escaped => {
                    escapes += 1;
                    assert!(s.enemy.is_none());
                    assert_eq!(s.player.hp, 10_000);
                }
                Phase::FightMenu => assert_eq!(s.player.hp, 10_000 - 10),
                other => panic!("unexpected phase {:?}", other),
            }
        }
        let rate = escapes as f64 / trials as f64;
        assert!((0.22..0.28).contains(&rate), "escape rate {}", rate);
        assert_eq!(s.player.level, 1);
    }

    #[test]
    fn escape_returns_to_backrooms() {
        let mut s = new_game(7);
        sturdy(&mut s);
        loop {
            start_fight(&mut s, Foe::Enemy(EnemyKind::Worker));
            perform(&mut s, Action::Flee);
            if s.phase == Phase::Escaped {
                break;
            }
        }
        assert_eq!(screen(&s).text, "You escape.");
        follow(&mut s);
        assert_eq!(s.phase, Phase::Backrooms);
    }

    #[test]
    fn defeat_scenario() {
        let mut s = new_game(1);
        s.take_persist();
        s.player.hp = 5;
        start_fight(&mut s, Foe::Boss(BossKind::Cat));
        perform(&mut s, Action::Attack(0));
        assert!(s.player.hp <= 0);
        assert_eq!(s.phase, Phase::GameOver);
        assert!(s.enemy.is_none());
        assert_eq!(s.take_persist(), vec![Persist::Erase]);
        assert_eq!(labels(&s), ["Restart"]);
    }

    #[test]
    fn restart_gives_fresh_player() {
        let mut s = new_game(1);
        s.player.hp = 5;
        s.player.level = 7;
        start_fight(&mut s, Foe::Boss(BossKind::Cat));
        perform(&mut s, Action::Flee);
        assert_eq!(s.phase, Phase::GameOver);
        s.take_persist();

        assert!(select_choice(&mut s, 0));
        assert_eq!(s.player, Player::new());
        assert_eq!(s.phase, Phase::Walk);
        assert!(s.log.is_empty());
        assert_eq!(s.take_persist(), vec![Persist::Save]);
    }

    #[test]
    fn level_up_grow_max_hp() {
        let mut s = new_game(1);
        start_fight(&mut s, Foe::Enemy(EnemyKind::Mite));
        perform(&mut s, Action::Attack(0));
        assert_eq!(s.phase, Phase::LevelUp);
        assert!(perform(&mut s, Action::GrowMaxHp));
        assert_eq!((s.player.hp, s.player.max_hp), (110, 110));
        assert_eq!(s.phase, Phase::Backrooms);
        assert!(!perform(&mut s, Action::GrowMaxHp));
        assert_eq!(s.player.max_hp, 110);
    }

    #[test]
    fn level_up_random_item() {
        let mut s = new_game(1);
        start_fight(&mut s, Foe::Enemy(EnemyKind::Mite));
        perform(&mut s, Action::UseItem(0));
        assert_eq!(s.phase, Phase::LevelUp);
        assert!(s.player.inventory.is_empty());
        assert!(perform(&mut s, Action::RandomItem));
        assert_eq!(s.player.inventory.len(), 1);
        assert!(DRAWER_POOL.contains(&s.player.inventory[0]));
        assert_eq!(s.phase, Phase::Backrooms);
        assert_eq!(s.player.level, 2);
    }

    #[test]
    fn non_fight_actions_never_level() {
        let mut s = in_backrooms(1);
        for _ in 0..20 {
            perform(&mut s, Action::SearchDrawers);
            follow(&mut s);
        }
        perform(&mut s, Action::Go(Phase::Walk));
        select_choice(&mut s, 2);
        follow(&mut s);
        assert_eq!(s.player.level, 1);
    }

    #[test]
    fn combat_actions_need_an_enemy() {
        let mut s = new_game(1);
        assert!(!perform(&mut s, Action::Attack(0)));
        assert!(!perform(&mut s, Action::Flee));
        assert!(!perform(&mut s, Action::OpenItems));
        assert!(!perform(&mut s, Action::UseItem(0)));
        assert_eq!(s.phase, Phase::Walk);
    }

    #[test]
    fn resume_from_each_location() {
        let cases = [
            (Location::Walk, Phase::Walk),
            (Location::Park, Phase::Park),
            (Location::FriendsHouse, Phase::FriendsHouse),
            (Location::Store, Phase::Store),
            (Location::Backrooms, Phase::Backrooms),
            (Location::Fight, Phase::Backrooms),
        ];
        for (loc, phase) in cases {
            let mut p = Player::new();
            p.level = 4;
            p.location = loc;
            let s = resume(p, 1);
            assert_eq!(s.phase, phase, "{:?}", loc);
            assert_eq!(s.player.level, 4);
        }
    }

    #[test]
    fn resume_after_game_over_starts_fresh() {
        let mut p = Player::new();
        p.level = 9;
        p.location = Location::GameOver;
        let s = resume(p, 1);
        assert_eq!(s.player, Player::new());
        assert_eq!(s.phase, Phase::Walk);
    }

    #[test]
    fn store_after_first_fight_goes_to_backrooms() {
        let mut p = Player::new();
        p.location = Location::Store;
        p.flags.first_fight_done = true;
        let mut s = resume(p, 1);
        assert_eq!(screen(&s).follow, Some(Action::Go(Phase::Backrooms)));
        follow(&mut s);
        assert_eq!(s.phase, Phase::Backrooms);
        assert!(s.enemy.is_none());
    }
}
