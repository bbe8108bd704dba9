//! Dirty Water: a branching text adventure about a walk, a wrong store and
//! the endless back rooms behind it.

pub mod actions;
pub mod config;
pub mod data;
pub mod logic;
pub mod lore;
pub mod render;
pub mod reveal;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::console;
use crate::input::{ClickState, InputEvent};

use actions::choice_index;
use config::GameConfig;
use reveal::{Reveal, RevealHandle};
use save::{SaveError, SaveStore};
use state::{Action, GameState, Persist, Screen};

pub struct DirtyWaterGame {
    pub state: GameState,
    reveal: Reveal,
    /// Handle of the reveal whose completion fires the screen's follow-up.
    pending: Option<RevealHandle>,
    store: Box<dyn SaveStore>,
}

impl DirtyWaterGame {
    pub fn new(config: &GameConfig, mut store: Box<dyn SaveStore>) -> Self {
        let seed = config.seed();
        let loaded = match store.load() {
            Ok(player) => player,
            Err(e) => {
                console::warn(&format!("Dirty Water: discarding save record: {e}"));
                if let Err(e) = store.clear() {
                    console::warn(&format!("Dirty Water: could not remove save record: {e}"));
                }
                None
            }
        };

        let state = match loaded {
            Some(player) => {
                console::log(&format!(
                    "Dirty Water: save loaded (level {}, {})",
                    player.level,
                    player.location.key()
                ));
                logic::resume(player, seed)
            }
            None => logic::new_game(seed),
        };

        let mut game = Self {
            state,
            reveal: Reveal::new(),
            pending: None,
            store,
        };
        game.after_transition();
        game
    }

    pub fn screen(&self) -> Screen {
        logic::screen(&self.state)
    }

    /// The part of the scene text revealed so far.
    pub fn visible_text(&self) -> String {
        self.reveal.visible()
    }

    /// Pick a choice of the current screen. Ignored while text is still
    /// being revealed or when `index` is out of range.
    pub fn select_choice(&mut self, index: usize) -> bool {
        if self.reveal.is_active() {
            return false;
        }
        let restarts = self
            .screen()
            .choices
            .get(index)
            .is_some_and(|c| c.action == Action::Restart);
        if restarts {
            self.restart();
            return true;
        }
        if !logic::select_choice(&mut self.state, index) {
            return false;
        }
        self.after_transition();
        true
    }

    /// Throw the run away and start again at the walk.
    pub fn restart(&mut self) {
        self.reveal.cancel();
        self.pending = None;
        logic::restart(&mut self.state);
        console::log("Dirty Water: restart");
        self.after_transition();
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => match c.to_digit(10) {
                Some(d) if d >= 1 => self.select_choice(d as usize - 1),
                _ => false,
            },
            InputEvent::Click(id) => match choice_index(*id) {
                Some(index) => self.select_choice(index),
                None => false,
            },
        }
    }

    /// Advance the typewriter by `delta_ticks` characters. When the text is
    /// complete, a screen without choices moves on by itself.
    pub fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks > 0 {
            self.reveal.advance(delta_ticks);
        }
        let Some(handle) = self.pending else {
            return;
        };
        if !self.reveal.poll_complete(handle) {
            return;
        }
        self.pending = None;
        if logic::follow(&mut self.state) {
            self.after_transition();
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        let typing = self.reveal.is_active();
        render::render(&self.state, &self.visible_text(), typing, f, area, click_state);
    }

    fn after_transition(&mut self) {
        self.flush_persist();
        let text = self.screen().text;
        self.pending = Some(self.reveal.begin(&text));
    }

    fn flush_persist(&mut self) {
        for op in self.state.take_persist() {
            let result: Result<(), SaveError> = match op {
                Persist::Save => self.store.save(&self.state.player),
                Persist::Erase => self.store.clear(),
            };
            if let Err(e) = result {
                console::warn(&format!("Dirty Water: {op:?} failed: {e}"));
            }
        }
    }
}
