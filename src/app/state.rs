use crate::backend::models::{SavedPalette, User};
use crate::color;
use crate::dialogs::{DialogHandle, DialogRegistry};
use crate::palette::PaletteCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Palette,
    Saved,
    Help,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Palette => Screen::Saved,
            Screen::Saved => Screen::Help,
            Screen::Help => Screen::Palette,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Screen::Palette => Screen::Help,
            Screen::Saved => Screen::Palette,
            Screen::Help => Screen::Saved,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Screen::Palette => "palette",
            Screen::Saved => "saved",
            Screen::Help => "help",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "palette" => Some(Screen::Palette),
            "saved" => Some(Screen::Saved),
            "help" => Some(Screen::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Save,
    Rename,
    Delete,
    Login,
    Share,
}

impl DialogKind {
    pub fn id(self) -> &'static str {
        match self {
            DialogKind::Save => "save-palette",
            DialogKind::Rename => "rename-palette",
            DialogKind::Delete => "delete-palette",
            DialogKind::Login => "login",
            DialogKind::Share => "share",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DialogKind::Save => "Save palette",
            DialogKind::Rename => "Update palette",
            DialogKind::Delete => "Delete palette",
            DialogKind::Login => "Sign in",
            DialogKind::Share => "Share palette",
        }
    }

    /// Dialogs with a text field; everything else is a confirm/close button.
    pub fn has_text_field(self) -> bool {
        matches!(self, DialogKind::Save | DialogKind::Rename | DialogKind::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// An open modal. Dropping it unregisters the dialog.
#[derive(Debug)]
pub struct Dialog {
    pub kind: DialogKind,
    handle: DialogHandle,
    pub name: String,
    pub email: String,
    pub password: String,
    pub field: LoginField,
    pub register: bool,
    /// Saved palette this dialog acts on (rename / delete).
    pub target: Option<SavedPalette>,
    pub text: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Dialog {
    pub fn open(registry: &DialogRegistry, kind: DialogKind) -> Self {
        let handle = registry.mount(kind.id());
        handle.set_open(true);
        Self {
            kind,
            handle,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            field: LoginField::default(),
            register: false,
            target: None,
            text: String::new(),
            submitting: false,
            error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_open()
    }

    /// The buffer that typed characters go to.
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self.kind {
            DialogKind::Save | DialogKind::Rename => Some(&mut self.name),
            DialogKind::Login => match self.field {
                LoginField::Email => Some(&mut self.email),
                LoginField::Password => Some(&mut self.password),
            },
            DialogKind::Delete | DialogKind::Share => None,
        }
    }
}

/// Inline hex edit on one swatch. Nothing reaches the palette until `commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexEditor {
    pub index: usize,
    pub buffer: String,
    original: String,
}

impl HexEditor {
    pub fn new(index: usize, current: &str) -> Self {
        Self {
            index,
            buffer: current.to_string(),
            original: current.to_string(),
        }
    }

    pub fn push(&mut self, c: char) {
        if self.buffer.chars().count() < 7 && (c == '#' || c.is_ascii_hexdigit()) {
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// Canonical value when the buffer holds a valid hex color.
    pub fn committed_value(&self) -> Option<String> {
        color::normalize_hex(&self.buffer)
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SavedListState {
    pub items: Vec<SavedPalette>,
    /// Index into `visible()`, not `items`.
    pub selected: usize,
    pub scroll_offset: usize,
    pub loading: bool,
    pub loaded: bool,
    /// Name filter; blank shows everything.
    pub query: String,
    /// Keys go to the filter instead of the list.
    pub searching: bool,
}

impl SavedListState {
    /// Items matching the filter, case-insensitive substring on the name.
    pub fn visible(&self) -> Vec<&SavedPalette> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn selected_item(&self) -> Option<&SavedPalette> {
        self.visible().get(self.selected).copied()
    }

    pub fn set_items(&mut self, items: Vec<SavedPalette>) {
        self.items = items;
        self.clamp_selection();
        self.loaded = true;
        self.loading = false;
    }

    /// Insert or replace by id, keeping most-recent-first order for new entries.
    pub fn upsert(&mut self, palette: SavedPalette) {
        match self.items.iter_mut().find(|p| p.id == palette.id) {
            Some(existing) => *existing = palette,
            None => self.items.insert(0, palette),
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.items.retain(|p| p.id != id);
        self.clamp_selection();
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.reset_selection();
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.reset_selection();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.searching = false;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.selected);
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub screen: Screen,

    pub palette: PaletteCore,
    pub selected: usize,
    pub editor: Option<HexEditor>,
    /// Saved palette currently loaded into the working set.
    pub loaded_id: Option<i64>,

    pub dialogs: DialogRegistry,
    pub dialog: Option<Dialog>,

    pub saved: SavedListState,
    pub user: Option<User>,
    /// A persistence call is in flight; submissions are ignored until it lands.
    pub busy: bool,

    pub dark_mode: bool,
    pub contrast_threshold: f64,

    pub toast: Option<Toast>,
    pub status: String,
}

impl AppState {
    pub fn new(palette: PaletteCore, dialogs: DialogRegistry) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Palette,
            palette,
            selected: 0,
            editor: None,
            loaded_id: None,
            dialogs,
            dialog: None,
            saved: SavedListState::default(),
            user: None,
            busy: false,
            dark_mode: true,
            contrast_threshold: color::DEFAULT_CONTRAST_THRESHOLD,
            toast: None,
            status: String::new(),
        }
    }

    pub fn open_dialog(&mut self, kind: DialogKind) -> &mut Dialog {
        // Replacing drops the previous dialog, which closes it in the registry.
        self.dialog.insert(Dialog::open(&self.dialogs, kind))
    }

    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn dialog_kind(&self) -> Option<DialogKind> {
        self.dialog.as_ref().map(|d| d.kind)
    }

    pub fn select_swatch(&mut self, delta: isize) {
        let len = self.palette.len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).clamp(0, len as isize - 1) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let palette = PaletteCore::new(
            ["#111111", "#222222", "#333333"]
                .iter()
                .filter_map(|h| crate::color::Color::parse(h).ok())
                .collect(),
            0,
        );
        AppState::new(palette, DialogRegistry::new())
    }

    #[test]
    fn test_dialog_lifecycle_tracks_registry() {
        let mut s = state();
        s.open_dialog(DialogKind::Save);
        assert!(s.dialogs.is_open("save-palette"));

        s.open_dialog(DialogKind::Login);
        assert!(!s.dialogs.is_open("save-palette"));
        assert!(s.dialogs.is_open("login"));

        s.close_dialog();
        assert!(!s.dialogs.is_any_open());
    }

    #[test]
    fn test_hex_editor_buffer() {
        let mut e = HexEditor::new(1, "#222222");
        for _ in 0..7 {
            e.backspace();
        }
        for c in "#abcxyz".chars() {
            e.push(c);
        }
        assert_eq!(e.buffer, "#abc");
        assert_eq!(e.committed_value(), Some("#AABBCC".to_string()));
        assert_eq!(e.original(), "#222222");

        e.push('1');
        assert_eq!(e.committed_value(), None);
    }

    #[test]
    fn test_select_swatch_clamps() {
        let mut s = state();
        s.select_swatch(-1);
        assert_eq!(s.selected, 0);
        s.select_swatch(5);
        assert_eq!(s.selected, 2);
    }

    fn mk(id: i64, name: &str) -> SavedPalette {
        SavedPalette {
            id,
            name: name.into(),
            colors: vec!["#000000".into()],
            owner_id: "local".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn test_saved_list_upsert_and_remove() {
        let mut list = SavedListState::default();
        list.set_items(vec![mk(2, "b"), mk(1, "a")]);
        list.upsert(mk(3, "c"));
        list.upsert(mk(1, "a2"));
        let names: Vec<&str> = list.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a2"]);

        list.selected = 2;
        list.remove(1);
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn test_saved_list_filter_by_name() {
        let mut list = SavedListState::default();
        list.set_items(vec![
            mk(3, "Mint Chip"),
            mk(2, "Berry Sorbet"),
            mk(1, "Chocolate Mint"),
        ]);
        list.selected = 2;

        for c in "MINT".chars() {
            list.push_query(c);
        }
        let names: Vec<&str> = list.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mint Chip", "Chocolate Mint"]);
        assert_eq!(list.selected, 0);

        list.select_next();
        list.select_next();
        assert_eq!(list.selected, 1);
        assert_eq!(list.selected_item().map(|p| p.id), Some(1));

        list.remove(1);
        assert_eq!(list.selected, 0);
        assert_eq!(list.selected_item().map(|p| p.id), Some(3));

        list.push_query('z');
        assert!(list.visible().is_empty());
        assert!(list.selected_item().is_none());

        list.searching = true;
        list.clear_query();
        assert!(!list.searching);
        assert_eq!(list.visible().len(), 2);
    }

    #[test]
    fn test_blank_query_shows_everything() {
        let mut list = SavedListState::default();
        list.set_items(vec![mk(1, "a"), mk(2, "b")]);
        list.push_query(' ');
        assert_eq!(list.visible().len(), 2);
        list.pop_query();
        assert!(list.query.is_empty());
    }
}
