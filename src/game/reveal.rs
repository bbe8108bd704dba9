//! Typewriter reveal of scene text.
//!
//! Two phases: [`Reveal::begin`] starts showing a text and returns a
//! [`RevealHandle`]; once the clock has advanced past the last character,
//! [`Reveal::poll_complete`] reports completion for that handle exactly once.
//! Every `begin` and `cancel` bumps the generation, so handles from an
//! earlier reveal never complete.

/// Identifies one reveal. Only the most recent handle can complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealHandle {
    generation: u64,
}

pub struct Reveal {
    chars: Vec<char>,
    shown: usize,
    generation: u64,
    /// Completion already reported for the current generation.
    fired: bool,
}

impl Reveal {
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            shown: 0,
            generation: 0,
            fired: true,
        }
    }

    pub fn begin(&mut self, text: &str) -> RevealHandle {
        self.generation += 1;
        self.chars = text.chars().collect();
        self.shown = 0;
        self.fired = false;
        RevealHandle {
            generation: self.generation,
        }
    }

    /// Show `steps` more characters.
    pub fn advance(&mut self, steps: u32) {
        self.shown = self
            .shown
            .saturating_add(steps as usize)
            .min(self.chars.len());
    }

    /// Jump to the end of the current text.
    #[cfg(test)]
    pub fn finish(&mut self) {
        self.shown = self.chars.len();
    }

    /// True while characters remain hidden.
    pub fn is_active(&self) -> bool {
        self.shown < self.chars.len()
    }

    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    /// Drop the current text and invalidate every outstanding handle.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.chars.clear();
        self.shown = 0;
        self.fired = true;
    }

    /// True once, when `handle` is current and its text is fully shown.
    pub fn poll_complete(&mut self, handle: RevealHandle) -> bool {
        if handle.generation != self.generation || self.fired || self.is_active() {
            return false;
        }
        self.fired = true;
        true
    }
}
