use crate::app::actions::Action;
use crate::app::events::{Event, InputEvent};
use crate::app::state::{AppState, DialogKind, Screen};
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use shortcuts::{FocusTarget, KeyInput, ShortcutDispatcher, ShortcutKind};
use tokio::sync::mpsc;

pub mod shortcuts;

pub fn spawn_input_task(tx: mpsc::Sender<Event>, mouse_enabled: bool) {
    tokio::task::spawn_blocking(move || {
        loop {
            if event::poll(std::time::Duration::from_millis(250)).unwrap_or(false) {
                let ev = match event::read() {
                    // Repeats are forwarded so held undo/redo keeps stepping.
                    Ok(CtEvent::Key(k)) if k.kind != KeyEventKind::Release => {
                        Some(InputEvent::Key(k))
                    }
                    Ok(CtEvent::Mouse(m)) if mouse_enabled => Some(InputEvent::Mouse(m)),
                    Ok(CtEvent::Resize(_, _)) => Some(InputEvent::Resize),
                    Ok(_) | Err(_) => None,
                };
                if let Some(ev) = ev
                    && tx.blocking_send(Event::Input(ev)).is_err()
                {
                    break;
                }
            }
        }
    });
}

/// What the key event is aimed at, derived from what currently has focus.
pub fn focus_of(state: &AppState) -> FocusTarget {
    if state.editor.is_some() {
        return FocusTarget::TextInput;
    }
    if let Some(kind) = state.dialog_kind() {
        return if kind.has_text_field() {
            FocusTarget::TextInput
        } else {
            FocusTarget::Button
        };
    }
    match state.screen {
        Screen::Saved if state.saved.searching => FocusTarget::TextInput,
        Screen::Saved => FocusTarget::Select,
        Screen::Palette | Screen::Help => FocusTarget::Canvas,
    }
}

pub fn map_input_to_action(
    state: &AppState,
    shortcuts: &ShortcutDispatcher,
    ev: InputEvent,
) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Mouse(m) => match m.kind {
            MouseEventKind::ScrollUp if state.screen == Screen::Saved => Some(Action::ListUp),
            MouseEventKind::ScrollDown if state.screen == Screen::Saved => Some(Action::ListDown),
            MouseEventKind::ScrollUp => Some(Action::SelectPrev),
            MouseEventKind::ScrollDown => Some(Action::SelectNext),
            _ => None,
        },
        InputEvent::Key(k) => {
            let mut input = KeyInput::from_terminal(k, focus_of(state));
            input.inside_dialog = state.dialog.is_some();
            let dispatch = shortcuts.dispatch(&input);
            if let Some(kind) = dispatch.intent {
                return Some(match kind {
                    ShortcutKind::Generate => Action::Generate,
                    ShortcutKind::Undo => Action::Undo,
                    ShortcutKind::Redo => Action::Redo,
                });
            }
            // Everything below reacts to presses only.
            if k.kind != KeyEventKind::Press {
                return None;
            }
            if let Some(kind) = state.dialog_kind() {
                return handle_dialog(kind, k);
            }
            if state.editor.is_some() {
                return handle_editor(k);
            }
            match state.screen {
                Screen::Palette => handle_palette_screen(k),
                Screen::Saved if state.saved.searching => handle_search(k),
                Screen::Saved => handle_saved_screen(k, !state.saved.query.is_empty()),
                Screen::Help => handle_help_screen(k),
            }
        }
    }
}

fn handle_global(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextScreen),
        KeyCode::BackTab => Some(Action::PrevScreen),
        KeyCode::Char('1') => Some(Action::SetScreen(Screen::Palette)),
        KeyCode::Char('2') => Some(Action::SetScreen(Screen::Saved)),
        KeyCode::Char('3') | KeyCode::Char('?') => Some(Action::SetScreen(Screen::Help)),
        KeyCode::Char('t') => Some(Action::ToggleTheme),
        KeyCode::Char('a') => Some(Action::OpenDialog(DialogKind::Login)),
        KeyCode::Char('O') => Some(Action::Logout),
        _ => None,
    }
}

fn handle_palette_screen(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Left | KeyCode::Char('h') => Some(Action::SelectPrev),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::SelectNext),
        KeyCode::Enter | KeyCode::Char('e') => Some(Action::EditStart),
        KeyCode::Char('L') | KeyCode::Char('x') => Some(Action::ToggleLock),
        KeyCode::Char('s') => Some(Action::OpenDialog(DialogKind::Save)),
        KeyCode::Char('r') => Some(Action::OpenDialog(DialogKind::Rename)),
        KeyCode::Char('y') => Some(Action::OpenDialog(DialogKind::Share)),
        KeyCode::Esc => Some(Action::Quit),
        _ => handle_global(k),
    }
}

fn handle_saved_screen(k: KeyEvent, filtered: bool) -> Option<Action> {
    match k.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Enter => Some(Action::LoadSelected),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::OpenDialog(DialogKind::Delete)),
        KeyCode::Char('R') => Some(Action::RefreshSaved),
        KeyCode::Char('/') => Some(Action::SearchStart),
        KeyCode::Esc if filtered => Some(Action::SearchClear),
        KeyCode::Esc => Some(Action::SetScreen(Screen::Palette)),
        _ => handle_global(k),
    }
}

fn handle_search(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::SearchClear),
        KeyCode::Enter | KeyCode::Down | KeyCode::Up => Some(Action::SearchDone),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::SearchInput(c))
        }
        _ => None,
    }
}

fn handle_help_screen(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => Some(Action::SetScreen(Screen::Palette)),
        _ => handle_global(k),
    }
}

fn handle_editor(k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Enter => Some(Action::EditCommit),
        KeyCode::Esc | KeyCode::Tab => Some(Action::EditCancel),
        KeyCode::Backspace => Some(Action::EditBackspace),
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Action::EditInput(c))
        }
        _ => None,
    }
}

fn handle_dialog(kind: DialogKind, k: KeyEvent) -> Option<Action> {
    match k.code {
        KeyCode::Esc => return Some(Action::CloseDialog),
        KeyCode::Enter => return Some(Action::DialogSubmit),
        _ => {}
    }
    match kind {
        DialogKind::Delete => match k.code {
            KeyCode::Char('y') => Some(Action::DialogSubmit),
            KeyCode::Char('n') => Some(Action::CloseDialog),
            _ => None,
        },
        DialogKind::Share => match k.code {
            KeyCode::Char('q') => Some(Action::CloseDialog),
            _ => None,
        },
        DialogKind::Save | DialogKind::Rename | DialogKind::Login => match k.code {
            KeyCode::Tab | KeyCode::BackTab if kind == DialogKind::Login => {
                Some(Action::DialogNextField)
            }
            KeyCode::Char('r') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::DialogToggleMode)
            }
            KeyCode::Backspace => Some(Action::DialogBackspace),
            KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::DialogInput(c))
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::shortcuts::Platform;
    use super::*;
    use crate::color::Color;
    use crate::dialogs::DialogRegistry;
    use crate::palette::PaletteCore;

    fn setup() -> (AppState, ShortcutDispatcher) {
        let dialogs = DialogRegistry::new();
        let colors = ["#111111", "#222222"]
            .iter()
            .filter_map(|h| Color::parse(h).ok())
            .collect();
        let state = AppState::new(PaletteCore::new(colors, 0), dialogs.clone());
        let mut d = ShortcutDispatcher::new(Platform::Other, dialogs);
        d.register(ShortcutKind::Generate);
        d.register(ShortcutKind::Undo);
        d.register(ShortcutKind::Redo);
        (state, d)
    }

    fn key(code: KeyCode, mods: KeyModifiers) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, mods))
    }

    #[test]
    fn test_space_generates_on_palette() {
        let (state, d) = setup();
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::Generate)
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            Some(Action::Undo)
        );
    }

    #[test]
    fn test_space_is_typed_in_dialog() {
        let (mut state, d) = setup();
        state.open_dialog(DialogKind::Save);
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::DialogInput(' '))
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_editor_swallows_shortcuts() {
        let (mut state, d) = setup();
        state.editor = Some(crate::app::state::HexEditor::new(0, "#111111"));
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::EditInput(' '))
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::EditCancel)
        );
    }

    #[test]
    fn test_saved_screen_suppresses_generate_but_not_undo() {
        let (mut state, d) = setup();
        state.screen = Screen::Saved;
        assert_eq!(focus_of(&state), FocusTarget::Select);
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char(' '), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('y'), KeyModifiers::CONTROL)),
            Some(Action::Redo)
        );
    }

    #[test]
    fn test_repeat_only_reaches_shortcuts() {
        let (state, d) = setup();
        let mut ev = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL);
        ev.kind = KeyEventKind::Repeat;
        assert_eq!(
            map_input_to_action(&state, &d, InputEvent::Key(ev)),
            Some(Action::Undo)
        );
        let mut ev = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        ev.kind = KeyEventKind::Repeat;
        assert_eq!(map_input_to_action(&state, &d, InputEvent::Key(ev)), None);
    }

    #[test]
    fn test_saved_search_keys() {
        let (mut state, d) = setup();
        state.screen = Screen::Saved;
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('/'), KeyModifiers::NONE)),
            Some(Action::SearchStart)
        );

        state.saved.searching = true;
        assert_eq!(focus_of(&state), FocusTarget::TextInput);
        // Typed into the filter, not treated as list or global keys.
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Char('z'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::SearchDone)
        );

        state.saved.searching = false;
        state.saved.query = "mint".into();
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::SearchClear)
        );
        state.saved.query.clear();
        assert_eq!(
            map_input_to_action(&state, &d, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::SetScreen(Screen::Palette))
        );
    }
}
