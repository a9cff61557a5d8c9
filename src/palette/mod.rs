//! Palette state core: the working colour array plus lock, edit and history semantics.

use crate::color::{self, Color, ColorError};
use history::History;
use rand::Rng;
use tracing::debug;

pub mod history;
pub mod share;

/// Number of swatches in a freshly generated palette.
pub const DEFAULT_SIZE: usize = 5;
/// Saved palettes carry between 1 and this many colours.
pub const MAX_COLORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Mutating,
}

#[derive(Debug, Clone)]
pub struct PaletteCore {
    colors: Vec<Color>,
    history: History<Vec<Color>>,
    phase: Phase,
}

impl PaletteCore {
    pub fn new(colors: Vec<Color>, history_limit: usize) -> Self {
        Self {
            colors,
            history: History::with_limit(history_limit),
            phase: Phase::Idle,
        }
    }

    /// A palette of `size` random, unlocked swatches.
    pub fn random(size: usize, history_limit: usize) -> Self {
        Self::random_with(size, history_limit, &mut rand::rng())
    }

    pub fn random_with<R: Rng + ?Sized>(size: usize, history_limit: usize, rng: &mut R) -> Self {
        let colors = (0..size).map(|_| Color::random(rng)).collect();
        Self::new(colors, history_limit)
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn hexes(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.hex.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_len()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_len()
    }

    pub fn is_mutating(&self) -> bool {
        self.phase == Phase::Mutating
    }

    /// Regenerate every unlocked swatch from the thread RNG.
    pub fn generate_new_palette(&mut self) -> bool {
        self.generate_new_palette_with(&mut rand::rng())
    }

    pub fn generate_new_palette_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let changed = self.commit(|colors| {
            let mut any = false;
            for c in colors.iter_mut().filter(|c| !c.locked) {
                c.hex = color::random_hex(rng);
                any = true;
            }
            any
        });
        debug!(changed, "generate palette");
        changed
    }

    pub fn toggle_lock(&mut self, index: usize) -> bool {
        self.commit(|colors| match colors.get_mut(index) {
            Some(c) => {
                c.locked = !c.locked;
                true
            }
            None => false,
        })
    }

    /// Assign a new value to one swatch. Locks do not protect against direct edits.
    ///
    /// Returns `Ok(false)` when the index is out of range or the value is unchanged.
    pub fn update_color(&mut self, index: usize, input: &str) -> Result<bool, ColorError> {
        let hex =
            color::normalize_hex(input).ok_or_else(|| ColorError::InvalidHex(input.to_string()))?;
        Ok(self.commit(|colors| match colors.get_mut(index) {
            Some(c) if c.hex != hex => {
                c.hex = hex;
                true
            }
            _ => false,
        }))
    }

    /// Replace the whole array (loading a saved or shared palette).
    ///
    /// No history entry is recorded. If the length changes, existing snapshots
    /// no longer line up with the slots and history is cleared.
    pub fn set_colors(&mut self, colors: Vec<Color>) {
        if colors.len() != self.colors.len() && self.phase == Phase::Idle {
            self.history.clear();
        }
        self.colors = colors;
    }

    /// Load plain hex strings as unlocked swatches; entries that fail to parse are skipped.
    pub fn load_hexes<S: AsRef<str>>(&mut self, hexes: &[S]) {
        let colors = hexes
            .iter()
            .filter_map(|h| Color::parse(h.as_ref()).ok())
            .collect();
        self.set_colors(colors);
    }

    pub fn undo(&mut self) -> bool {
        if self.phase == Phase::Mutating {
            return false;
        }
        let Some(snapshot) = self.history.undo(self.colors.clone()) else {
            return false;
        };
        self.replay(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.phase == Phase::Mutating {
            return false;
        }
        let Some(snapshot) = self.history.redo(self.colors.clone()) else {
            return false;
        };
        self.replay(snapshot);
        true
    }

    /// Run several mutations as one logical action: exactly one history
    /// entry is recorded, and only if the array changed.
    ///
    /// Mutations issued from inside `f` do not push their own entries; undo
    /// and redo are ignored while the transaction is open.
    pub fn transaction<F: FnOnce(&mut Self)>(&mut self, f: F) -> bool {
        if self.phase == Phase::Mutating {
            let before = self.colors.clone();
            f(self);
            return self.colors != before;
        }

        self.phase = Phase::Mutating;
        let before = self.colors.clone();
        f(self);
        let changed = self.colors != before;
        if changed {
            self.history.push(before);
        }
        self.phase = Phase::Idle;
        changed
    }

    fn commit<F: FnOnce(&mut Vec<Color>) -> bool>(&mut self, f: F) -> bool {
        if self.phase == Phase::Mutating {
            return f(&mut self.colors);
        }

        self.phase = Phase::Mutating;
        let before = self.colors.clone();
        let changed = f(&mut self.colors);
        if changed {
            self.history.push(before);
        }
        self.phase = Phase::Idle;
        changed
    }

    // Locked slots keep their current value; everything else comes from the snapshot.
    fn replay(&mut self, snapshot: Vec<Color>) {
        for (current, past) in self.colors.iter_mut().zip(snapshot) {
            if !current.locked {
                *current = past;
            }
        }
    }
}
