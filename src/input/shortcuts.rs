//! Global shortcut dispatch: spacebar regeneration and undo/redo.
//!
//! Bindings are plain data resolved from the platform once at startup. Every
//! registration re-checks the suppression rules against the focus context
//! and the dialog registry on each key event.

use crate::dialogs::DialogRegistry;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "ios" => Platform::Mac,
            _ => Platform::Other,
        }
    }

    /// Parse a config value: `auto`, `mac` or `other`.
    pub fn from_setting(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Some(Self::detect()),
            "mac" | "macos" => Some(Platform::Mac),
            "other" | "linux" | "windows" => Some(Platform::Other),
            _ => None,
        }
    }

    pub fn primary_modifier(self) -> Modifier {
        match self {
            Platform::Mac => Modifier::Command,
            Platform::Other => Modifier::Control,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Command,
    Control,
}

impl Modifier {
    fn flag(self) -> KeyModifiers {
        match self {
            Modifier::Command => KeyModifiers::SUPER,
            Modifier::Control => KeyModifiers::CONTROL,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Modifier::Command => "Cmd",
            Modifier::Control => "Ctrl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub modifier: Option<Modifier>,
    pub key: KeyCode,
    pub requires_shift: bool,
}

impl KeyBinding {
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            modifier: None,
            key,
            requires_shift: false,
        }
    }

    pub const fn with(modifier: Modifier, key: KeyCode, requires_shift: bool) -> Self {
        Self {
            modifier: Some(modifier),
            key,
            requires_shift,
        }
    }

    pub fn matches(&self, ev: &KeyEvent) -> bool {
        let mods = ev.modifiers;
        let chord = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER;
        match self.modifier {
            Some(m) if !mods.contains(m.flag()) => return false,
            None if mods.intersects(chord) => return false,
            _ => {}
        }

        // Terminals report Shift+letter as an uppercase char, often without the SHIFT flag.
        let shifted = mods.contains(KeyModifiers::SHIFT)
            || matches!(ev.code, KeyCode::Char(c) if c.is_ascii_uppercase());
        if shifted != self.requires_shift {
            return false;
        }

        match (self.key, ev.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(m) = self.modifier {
            write!(f, "{}+", m.label())?;
        }
        if self.requires_shift {
            write!(f, "Shift+")?;
        }
        match self.key {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKind {
    Generate,
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub generate: KeyBinding,
    pub undo: KeyBinding,
    pub redo: KeyBinding,
}

impl Bindings {
    pub fn for_platform(platform: Platform) -> Self {
        let primary = platform.primary_modifier();
        let redo = match platform {
            Platform::Mac => KeyBinding::with(primary, KeyCode::Char('z'), true),
            Platform::Other => KeyBinding::with(primary, KeyCode::Char('y'), false),
        };
        Self {
            generate: KeyBinding::plain(KeyCode::Char(' ')),
            undo: KeyBinding::with(primary, KeyCode::Char('z'), false),
            redo,
        }
    }

    pub fn get(&self, kind: ShortcutKind) -> KeyBinding {
        match kind {
            ShortcutKind::Generate => self.generate,
            ShortcutKind::Undo => self.undo,
            ShortcutKind::Redo => self.redo,
        }
    }
}

/// What kind of element a key event is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// The palette itself, nothing interactive focused.
    #[default]
    Canvas,
    TextInput,
    TextArea,
    Button,
    Select,
    Editable,
}

impl FocusTarget {
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            FocusTarget::TextInput | FocusTarget::TextArea | FocusTarget::Editable
        )
    }

    pub fn is_interactive(self) -> bool {
        self != FocusTarget::Canvas
    }
}

#[derive(Debug, Clone)]
pub struct KeyInput {
    pub event: KeyEvent,
    /// Produced by the terminal rather than injected by the program.
    pub trusted: bool,
    pub target: FocusTarget,
    pub focused: FocusTarget,
    pub inside_dialog: bool,
}

impl KeyInput {
    pub fn from_terminal(event: KeyEvent, focus: FocusTarget) -> Self {
        Self {
            event,
            trusted: true,
            target: focus,
            focused: focus,
            inside_dialog: false,
        }
    }

    pub fn synthetic(event: KeyEvent) -> Self {
        Self {
            trusted: false,
            ..Self::from_terminal(event, FocusTarget::Canvas)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub intent: Option<ShortcutKind>,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

impl Dispatch {
    fn fired(kind: ShortcutKind) -> Self {
        Self {
            intent: Some(kind),
            prevent_default: true,
            stop_propagation: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortcutId(u64);

#[derive(Debug, Clone)]
struct Registration {
    id: ShortcutId,
    kind: ShortcutKind,
    binding: KeyBinding,
}

#[derive(Debug, Clone)]
pub struct ShortcutDispatcher {
    platform: Platform,
    bindings: Bindings,
    dialogs: DialogRegistry,
    registrations: Vec<Registration>,
    next_id: u64,
}

impl ShortcutDispatcher {
    pub fn new(platform: Platform, dialogs: DialogRegistry) -> Self {
        Self {
            platform,
            bindings: Bindings::for_platform(platform),
            dialogs,
            registrations: Vec::new(),
            next_id: 0,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Register the platform binding for `kind`.
    pub fn register(&mut self, kind: ShortcutKind) -> ShortcutId {
        let binding = self.bindings.get(kind);
        self.register_binding(kind, binding)
    }

    pub fn register_binding(&mut self, kind: ShortcutKind, binding: KeyBinding) -> ShortcutId {
        let id = ShortcutId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, kind, binding });
        debug!(?kind, %binding, "shortcut registered");
        id
    }

    pub fn unregister(&mut self, id: ShortcutId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn is_registered(&self, id: ShortcutId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    /// Offer a key event to every registration in order. The first one that
    /// fires consumes the event; a suppressed event is left completely alone.
    pub fn dispatch(&self, input: &KeyInput) -> Dispatch {
        for reg in &self.registrations {
            if !reg.binding.matches(&input.event) {
                continue;
            }
            if self.suppressed(reg.kind, input) {
                continue;
            }
            return Dispatch::fired(reg.kind);
        }
        Dispatch::default()
    }

    fn suppressed(&self, kind: ShortcutKind, input: &KeyInput) -> bool {
        if !input.trusted || input.inside_dialog || self.dialogs.is_any_open() {
            return true;
        }
        match input.event.kind {
            KeyEventKind::Press => {}
            KeyEventKind::Repeat if kind != ShortcutKind::Generate => {}
            _ => return true,
        }
        match kind {
            ShortcutKind::Generate => {
                input.target.is_interactive() || input.focused.is_interactive()
            }
            ShortcutKind::Undo | ShortcutKind::Redo => {
                input.target.is_text_entry() || input.focused.is_text_entry()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    fn space() -> KeyEvent {
        key(KeyCode::Char(' '), KeyModifiers::NONE)
    }

    fn dispatcher(platform: Platform) -> (ShortcutDispatcher, DialogRegistry) {
        let dialogs = DialogRegistry::new();
        let mut d = ShortcutDispatcher::new(platform, dialogs.clone());
        d.register(ShortcutKind::Generate);
        d.register(ShortcutKind::Undo);
        d.register(ShortcutKind::Redo);
        (d, dialogs)
    }

    #[test]
    fn test_space_on_canvas_generates() {
        let (d, _) = dispatcher(Platform::Other);
        let out = d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::Canvas));
        assert_eq!(out.intent, Some(ShortcutKind::Generate));
        assert!(out.prevent_default);
        assert!(out.stop_propagation);
    }

    #[test]
    fn test_space_in_text_input_is_left_alone() {
        let (d, _) = dispatcher(Platform::Other);
        let out = d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::TextInput));
        assert_eq!(out, Dispatch::default());
        assert!(!out.prevent_default);
        assert!(!out.stop_propagation);
    }

    #[test]
    fn test_space_on_other_interactive_targets_suppressed() {
        let (d, _) = dispatcher(Platform::Other);
        for focus in [
            FocusTarget::TextArea,
            FocusTarget::Button,
            FocusTarget::Select,
            FocusTarget::Editable,
        ] {
            let out = d.dispatch(&KeyInput::from_terminal(space(), focus));
            assert_eq!(out.intent, None, "{focus:?}");
        }

        let mut input = KeyInput::from_terminal(space(), FocusTarget::Canvas);
        input.focused = FocusTarget::Button;
        assert_eq!(d.dispatch(&input).intent, None);
    }

    #[test]
    fn test_space_repeat_and_synthetic_suppressed() {
        let (d, _) = dispatcher(Platform::Other);
        let repeat = KeyEvent::new_with_kind(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        );
        assert_eq!(
            d.dispatch(&KeyInput::from_terminal(repeat, FocusTarget::Canvas)).intent,
            None
        );
        assert_eq!(d.dispatch(&KeyInput::synthetic(space())).intent, None);
    }

    #[test]
    fn test_open_dialog_suppresses_everything() {
        let (d, dialogs) = dispatcher(Platform::Other);
        dialogs.open("save");

        let ctrl_z = key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::Canvas)).intent, None);
        assert_eq!(d.dispatch(&KeyInput::from_terminal(ctrl_z, FocusTarget::Canvas)).intent, None);

        dialogs.close("save");
        assert_eq!(
            d.dispatch(&KeyInput::from_terminal(ctrl_z, FocusTarget::Canvas)).intent,
            Some(ShortcutKind::Undo)
        );
    }

    #[test]
    fn test_inside_dialog_flag_suppresses() {
        let (d, _) = dispatcher(Platform::Other);
        let mut input = KeyInput::from_terminal(space(), FocusTarget::Canvas);
        input.inside_dialog = true;
        assert_eq!(d.dispatch(&input).intent, None);
    }

    #[test]
    fn test_other_platform_undo_redo() {
        let (d, _) = dispatcher(Platform::Other);
        let at = |ev| d.dispatch(&KeyInput::from_terminal(ev, FocusTarget::Canvas)).intent;

        assert_eq!(at(key(KeyCode::Char('z'), KeyModifiers::CONTROL)), Some(ShortcutKind::Undo));
        assert_eq!(at(key(KeyCode::Char('y'), KeyModifiers::CONTROL)), Some(ShortcutKind::Redo));
        assert_eq!(
            at(key(KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT)),
            None
        );
        assert_eq!(at(key(KeyCode::Char('z'), KeyModifiers::SUPER)), None);
    }

    #[test]
    fn test_mac_undo_redo() {
        let (d, _) = dispatcher(Platform::Mac);
        let at = |ev| d.dispatch(&KeyInput::from_terminal(ev, FocusTarget::Canvas)).intent;

        assert_eq!(at(key(KeyCode::Char('z'), KeyModifiers::SUPER)), Some(ShortcutKind::Undo));
        assert_eq!(
            at(key(KeyCode::Char('Z'), KeyModifiers::SUPER | KeyModifiers::SHIFT)),
            Some(ShortcutKind::Redo)
        );
        assert_eq!(at(key(KeyCode::Char('Z'), KeyModifiers::SUPER)), Some(ShortcutKind::Redo));
        assert_eq!(at(key(KeyCode::Char('y'), KeyModifiers::SUPER)), None);
        assert_eq!(at(key(KeyCode::Char('z'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_undo_blocked_in_text_but_not_on_button() {
        let (d, _) = dispatcher(Platform::Other);
        let ctrl_z = key(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(d.dispatch(&KeyInput::from_terminal(ctrl_z, FocusTarget::TextInput)).intent, None);
        assert_eq!(
            d.dispatch(&KeyInput::from_terminal(ctrl_z, FocusTarget::Button)).intent,
            Some(ShortcutKind::Undo)
        );
    }

    #[test]
    fn test_unregister_detaches() {
        let dialogs = DialogRegistry::new();
        let mut d = ShortcutDispatcher::new(Platform::Other, dialogs);
        let id = d.register(ShortcutKind::Generate);
        assert!(d.is_registered(id));
        assert!(d.unregister(id));
        assert!(!d.unregister(id));
        assert_eq!(d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::Canvas)).intent, None);
    }

    #[test]
    fn test_first_registration_consumes_event() {
        let dialogs = DialogRegistry::new();
        let mut d = ShortcutDispatcher::new(Platform::Other, dialogs);
        d.register_binding(ShortcutKind::Redo, KeyBinding::plain(KeyCode::Char(' ')));
        d.register(ShortcutKind::Generate);

        // The redo registration is not subject to the interactive-focus rule.
        let out = d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::Button));
        assert_eq!(out.intent, Some(ShortcutKind::Redo));
        let out = d.dispatch(&KeyInput::from_terminal(space(), FocusTarget::Canvas));
        assert_eq!(out.intent, Some(ShortcutKind::Redo));
    }

    #[test]
    fn test_platform_parsing_and_labels() {
        assert_eq!(Platform::from_os("macos"), Platform::Mac);
        assert_eq!(Platform::from_os("linux"), Platform::Other);
        assert_eq!(Platform::from_setting("mac"), Some(Platform::Mac));
        assert_eq!(Platform::from_setting("bogus"), None);

        let b = Bindings::for_platform(Platform::Mac);
        assert_eq!(b.redo.to_string(), "Cmd+Shift+Z");
        assert_eq!(Bindings::for_platform(Platform::Other).undo.to_string(), "Ctrl+Z");
        assert_eq!(b.generate.to_string(), "Space");
    }
}
