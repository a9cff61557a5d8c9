use super::state::DialogKind;
use crate::backend::models::{SavedPalette, User};

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Backend(BackendEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum BackendEvent {
    UserLoaded(Option<User>),
    SignedIn(User),
    SignedOut,
    PalettesLoaded(Vec<SavedPalette>),
    Created(SavedPalette),
    Updated(SavedPalette),
    Deleted(i64),
    /// Palette parked until sign-in.
    Staged,
    Adopted(Option<SavedPalette>),
    Error {
        message: String,
        origin: Option<DialogKind>,
    },
}
