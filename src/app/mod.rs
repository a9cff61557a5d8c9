pub mod actions;
pub mod events;
pub mod state;

use crate::backend::models::PaletteDraft;
use crate::backend::{Backend, BackendError};
use crate::color::{self, naming};
use crate::config::{self, Config};
use crate::dialogs::DialogRegistry;
use crate::input::{self, shortcuts::{Platform, ShortcutDispatcher, ShortcutId, ShortcutKind}};
use crate::palette::{share, PaletteCore, MAX_COLORS};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{BackendEvent, Event};
use state::{AppState, DialogKind, HexEditor, LoginField, Screen, Toast};
use std::future::Future;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct App {
    cfg: Config,
    config_path: PathBuf,
    state: AppState,
    backend: Backend,
    shortcuts: ShortcutDispatcher,
    shortcut_ids: Vec<ShortcutId>,
}

impl App {
    pub fn new(cfg: Config, config_path: PathBuf) -> anyhow::Result<Self> {
        let backend = Backend::from_config(&cfg)?;
        let platform = Platform::from_setting(&cfg.keys.platform).unwrap_or_else(|| {
            warn!(value = %cfg.keys.platform, "unknown keys.platform, detecting");
            Platform::detect()
        });

        let dialogs = DialogRegistry::new();
        let shortcuts = ShortcutDispatcher::new(platform, dialogs.clone());

        let palette = restore_palette(&cfg);
        let mut state = AppState::new(palette, dialogs);
        state.dark_mode = cfg.theme.dark_mode;
        state.contrast_threshold = cfg.palette.contrast_threshold;

        // Restore last screen if available
        if let Some(screen) = cfg.ui.last_screen.as_deref().and_then(Screen::from_name) {
            state.screen = screen;
        }

        Ok(Self {
            cfg,
            config_path,
            state,
            backend,
            shortcuts,
            shortcut_ids: Vec::new(),
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);
        self.mount_shortcuts();

        // Toasts expire on their own, so redraw periodically while one is shown.
        let mut toast_tick = tokio::time::interval(std::time::Duration::from_millis(500));

        tui::draw(terminal, &mut self.state, self.shortcuts.bindings())?;

        self.spawn_load_user(&tx);
        self.spawn_load_saved(&tx);

        loop {
            tokio::select! {
                ev = rx.recv() => {
                    let Some(ev) = ev else { break };
                    match ev {
                        Event::Input(input_ev) => {
                            if let Some(action) =
                                input::map_input_to_action(&self.state, &self.shortcuts, input_ev)
                            {
                                self.handle_action(action, &tx);
                            }
                        }
                        Event::Backend(be) => self.handle_backend(be, &tx),
                    }
                }
                _ = toast_tick.tick() => {
                    if self.state.toast.is_none() {
                        continue;
                    }
                }
            }

            if self.state.should_quit {
                break;
            }

            tui::draw(terminal, &mut self.state, self.shortcuts.bindings())?;
        }

        self.unmount_shortcuts();
        self.save_state_on_quit();

        Ok(())
    }

    fn mount_shortcuts(&mut self) {
        for kind in [ShortcutKind::Generate, ShortcutKind::Undo, ShortcutKind::Redo] {
            self.shortcut_ids.push(self.shortcuts.register(kind));
        }
    }

    fn unmount_shortcuts(&mut self) {
        for id in self.shortcut_ids.drain(..) {
            self.shortcuts.unregister(id);
        }
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.ui.last_palette = self.state.palette.hexes();
        self.cfg.ui.last_screen = Some(self.state.screen.name().to_string());
        self.cfg.theme.dark_mode = self.state.dark_mode;

        if let Err(e) = config::save(&self.cfg, Some(&self.config_path)) {
            warn!("save config on quit: {e:#}");
        }
    }

    fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::NextScreen => {
                self.state.screen = self.state.screen.next();
                self.on_screen_enter(tx);
            }
            Action::PrevScreen => {
                self.state.screen = self.state.screen.prev();
                self.on_screen_enter(tx);
            }
            Action::SetScreen(screen) => {
                self.state.screen = screen;
                self.on_screen_enter(tx);
            }

            Action::Generate => {
                if self.state.palette.generate_new_palette() {
                    self.state.status = "New palette".into();
                } else {
                    self.state.status = "Every swatch is locked".into();
                }
            }
            Action::Undo => {
                if !self.state.palette.undo() {
                    self.state.status = "Nothing to undo".into();
                }
            }
            Action::Redo => {
                if !self.state.palette.redo() {
                    self.state.status = "Nothing to redo".into();
                }
            }
            Action::SelectPrev => self.state.select_swatch(-1),
            Action::SelectNext => self.state.select_swatch(1),
            Action::ToggleLock => {
                let idx = self.state.selected;
                self.state.palette.toggle_lock(idx);
            }
            Action::ToggleTheme => {
                self.state.dark_mode = !self.state.dark_mode;
                self.cfg.theme.dark_mode = self.state.dark_mode;
                if let Err(e) = config::save(&self.cfg, Some(&self.config_path)) {
                    self.state.toast = Some(Toast::error(format!("Failed to save theme: {e:#}")));
                }
            }

            Action::EditStart => {
                let idx = self.state.selected;
                if let Some(c) = self.state.palette.colors().get(idx) {
                    self.state.editor = Some(HexEditor::new(idx, &c.hex));
                }
            }
            Action::EditInput(c) => {
                if let Some(editor) = &mut self.state.editor {
                    editor.push(c);
                }
            }
            Action::EditBackspace => {
                if let Some(editor) = &mut self.state.editor {
                    editor.backspace();
                }
            }
            Action::EditCommit => self.commit_edit(),
            Action::EditCancel => self.state.editor = None,

            Action::OpenDialog(kind) => self.open_dialog(kind),
            Action::CloseDialog => self.state.close_dialog(),
            Action::DialogInput(c) => {
                if let Some(buf) = self.state.dialog.as_mut().and_then(|d| d.input_mut()) {
                    buf.push(c);
                }
            }
            Action::DialogBackspace => {
                if let Some(buf) = self.state.dialog.as_mut().and_then(|d| d.input_mut()) {
                    buf.pop();
                }
            }
            Action::DialogNextField => {
                if let Some(d) = &mut self.state.dialog {
                    d.field = match d.field {
                        LoginField::Email => LoginField::Password,
                        LoginField::Password => LoginField::Email,
                    };
                }
            }
            Action::DialogToggleMode => {
                if let Some(d) = &mut self.state.dialog
                    && d.kind == DialogKind::Login
                {
                    d.register = !d.register;
                }
            }
            Action::DialogSubmit => self.submit_dialog(tx),

            Action::ListUp => {
                self.state.saved.select_prev();
                self.state.saved.update_scroll(20);
            }
            Action::ListDown => {
                self.state.saved.select_next();
                self.state.saved.update_scroll(20);
            }
            Action::LoadSelected => {
                if let Some(p) = self.state.saved.selected_item().cloned() {
                    self.state.palette.load_hexes(&p.colors);
                    self.state.selected = 0;
                    self.state.loaded_id = Some(p.id);
                    self.state.screen = Screen::Palette;
                    self.state.toast = Some(Toast::success(format!("Loaded {}", p.name)));
                }
            }
            Action::RefreshSaved => self.spawn_load_saved(tx),
            Action::SearchStart => self.state.saved.searching = true,
            Action::SearchInput(c) => self.state.saved.push_query(c),
            Action::SearchBackspace => self.state.saved.pop_query(),
            Action::SearchDone => self.state.saved.searching = false,
            Action::SearchClear => self.state.saved.clear_query(),

            Action::Logout => {
                if matches!(self.backend, Backend::Local { .. }) {
                    self.state.toast = Some(Toast::error("Local profile has no sign-in"));
                    return;
                }
                self.spawn(tx, None, |b| async move {
                    b.logout().await?;
                    Ok(BackendEvent::SignedOut)
                });
            }
            Action::Resize => {}
        }
    }

    /// Replace the working set with colours from a share link. Nothing is
    /// locked afterwards and no undo entry is recorded.
    pub fn apply_shared(&mut self, hexes: &[String]) {
        self.state.palette.load_hexes(hexes);
        self.state.selected = 0;
        self.state.editor = None;
        self.state.loaded_id = None;
        self.state.screen = Screen::Palette;
        info!(colors = hexes.len(), "opened shared palette");
        self.state.toast = Some(Toast::success("Opened shared palette"));
    }

    fn on_screen_enter(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.screen == Screen::Saved && !self.state.saved.loaded {
            self.spawn_load_saved(tx);
        }
    }

    /// Apply the hex buffer to its swatch. Anything invalid is rejected and
    /// the swatch keeps its last committed value.
    fn commit_edit(&mut self) {
        let Some(editor) = self.state.editor.take() else {
            return;
        };
        let Some(value) = editor.committed_value() else {
            self.state.toast = Some(Toast::error(format!(
                "Invalid hex color: {}",
                editor.buffer
            )));
            return;
        };
        match self.state.palette.update_color(editor.index, &value) {
            Ok(true) => debug!(index = editor.index, %value, "color edited"),
            Ok(false) => {}
            Err(e) => self.state.toast = Some(Toast::error(e.to_string())),
        }
    }

    fn open_dialog(&mut self, kind: DialogKind) {
        match kind {
            DialogKind::Save => {
                let name = naming::generate_palette_name(&self.state.palette.hexes());
                self.state.open_dialog(kind).name = name;
            }
            DialogKind::Rename => {
                let target = self
                    .state
                    .loaded_id
                    .and_then(|id| self.state.saved.items.iter().find(|p| p.id == id))
                    .cloned();
                let Some(target) = target else {
                    self.state.toast = Some(Toast::error("Load a saved palette first"));
                    return;
                };
                let d = self.state.open_dialog(kind);
                d.name = target.name.clone();
                d.target = Some(target);
            }
            DialogKind::Delete => {
                let Some(target) = self.state.saved.selected_item().cloned() else {
                    return;
                };
                self.state.open_dialog(kind).target = Some(target);
            }
            DialogKind::Login => {
                if matches!(self.backend, Backend::Local { .. }) {
                    self.state.toast = Some(Toast::error("Local profile has no sign-in"));
                    return;
                }
                self.state.open_dialog(kind);
            }
            DialogKind::Share => {
                let url = share::share_url(config::defaults::SHARE_BASE, self.state.palette.colors());
                self.state.open_dialog(kind).text = url;
            }
        }
    }

    fn submit_dialog(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.busy {
            return;
        }
        let colors = self.state.palette.colors().to_vec();
        let Some(dialog) = &mut self.state.dialog else {
            return;
        };
        let kind = dialog.kind;
        dialog.error = None;

        match kind {
            DialogKind::Save | DialogKind::Rename => {
                let draft = PaletteDraft::new(dialog.name.trim(), &colors);
                if let Err(errors) = draft.validate() {
                    dialog.error = errors.first().map(|e| e.message.clone());
                    return;
                }
                let target = dialog.target.as_ref().map(|t| t.id);
                dialog.submitting = true;
                self.state.busy = true;
                match target {
                    Some(id) if kind == DialogKind::Rename => {
                        self.spawn(tx, Some(kind), move |b| async move {
                            b.update_palette(id, &draft).await.map(BackendEvent::Updated)
                        });
                    }
                    _ => {
                        let signed_in = self.state.user.is_some();
                        self.spawn(tx, Some(kind), move |b| async move {
                            if !signed_in {
                                b.stage_palette(&draft).await?;
                                return Ok(BackendEvent::Staged);
                            }
                            match b.create_palette(&draft).await {
                                Err(BackendError::Unauthorized) => {
                                    b.stage_palette(&draft).await?;
                                    Ok(BackendEvent::Staged)
                                }
                                other => other.map(BackendEvent::Created),
                            }
                        });
                    }
                }
            }
            DialogKind::Delete => {
                let Some(id) = dialog.target.as_ref().map(|t| t.id) else {
                    return;
                };
                dialog.submitting = true;
                self.state.busy = true;
                self.spawn(tx, Some(kind), move |b| async move {
                    b.delete_palette(id).await?;
                    Ok(BackendEvent::Deleted(id))
                });
            }
            DialogKind::Login => {
                let email = dialog.email.trim().to_string();
                let password = dialog.password.clone();
                if email.is_empty() || password.is_empty() {
                    dialog.error = Some("Email and password are required".into());
                    return;
                }
                let register = dialog.register;
                dialog.submitting = true;
                self.state.busy = true;
                self.spawn(tx, Some(kind), move |b| async move {
                    let user = if register {
                        b.register(&email, &password).await?
                    } else {
                        b.login(&email, &password).await?
                    };
                    Ok(BackendEvent::SignedIn(user))
                });
            }
            DialogKind::Share => self.state.close_dialog(),
        }
    }

    fn handle_backend(&mut self, ev: BackendEvent, tx: &mpsc::Sender<Event>) {
        match ev {
            BackendEvent::UserLoaded(user) => {
                self.state.user = user;
            }
            BackendEvent::SignedIn(user) => {
                self.state.busy = false;
                info!(user = %user.id, "session started");
                self.state.toast = Some(Toast::success(format!("Signed in as {}", user.email)));
                self.state.user = Some(user);
                self.finish_dialog(DialogKind::Login);
                self.spawn(tx, None, |b| async move {
                    b.adopt_staged_palette().await.map(BackendEvent::Adopted)
                });
                self.spawn_load_saved(tx);
            }
            BackendEvent::SignedOut => {
                self.state.user = None;
                self.state.saved = Default::default();
                self.state.loaded_id = None;
                self.state.toast = Some(Toast::success("Signed out"));
            }
            BackendEvent::PalettesLoaded(items) => {
                self.state.saved.set_items(items);
            }
            BackendEvent::Created(p) => {
                self.state.busy = false;
                self.state.toast = Some(Toast::success(format!("Saved {}", p.name)));
                self.state.loaded_id = Some(p.id);
                self.state.saved.upsert(p);
                self.finish_dialog(DialogKind::Save);
            }
            BackendEvent::Updated(p) => {
                self.state.busy = false;
                self.state.toast = Some(Toast::success(format!("Updated {}", p.name)));
                self.state.saved.upsert(p);
                self.finish_dialog(DialogKind::Rename);
            }
            BackendEvent::Deleted(id) => {
                self.state.busy = false;
                self.state.saved.remove(id);
                if self.state.loaded_id == Some(id) {
                    self.state.loaded_id = None;
                }
                self.state.toast = Some(Toast::success("Palette deleted"));
                self.finish_dialog(DialogKind::Delete);
            }
            BackendEvent::Staged => {
                self.state.busy = false;
                self.finish_dialog(DialogKind::Save);
                self.state.toast = Some(Toast::success("Sign in to keep this palette"));
                if self.state.dialog.is_none() {
                    self.state.open_dialog(DialogKind::Login);
                }
            }
            BackendEvent::Adopted(Some(p)) => {
                self.state.toast = Some(Toast::success(format!("Saved {}", p.name)));
                self.state.loaded_id = Some(p.id);
                self.state.saved.upsert(p);
            }
            BackendEvent::Adopted(None) => {}
            BackendEvent::Error { message, origin } => {
                warn!(?origin, "backend error: {message}");
                self.state.saved.loading = false;
                if origin.is_some() {
                    self.state.busy = false;
                }
                if let Some(d) = &mut self.state.dialog
                    && Some(d.kind) == origin
                    && d.submitting
                {
                    d.submitting = false;
                    d.error = Some(message.clone());
                }
                self.state.toast = Some(Toast::error(message));
            }
        }
    }

    /// Close the dialog only if it is still the one that made the request.
    fn finish_dialog(&mut self, kind: DialogKind) {
        if self
            .state
            .dialog
            .as_ref()
            .is_some_and(|d| d.kind == kind && d.submitting)
        {
            self.state.close_dialog();
        }
    }

    fn spawn_load_user(&mut self, tx: &mpsc::Sender<Event>) {
        self.spawn(tx, None, |b| async move {
            b.current_user().await.map(BackendEvent::UserLoaded)
        });
    }

    fn spawn_load_saved(&mut self, tx: &mpsc::Sender<Event>) {
        if self.state.saved.loading {
            return;
        }
        self.state.saved.loading = true;
        self.spawn(tx, None, |b| async move {
            match b.list_palettes().await {
                Ok(items) => Ok(BackendEvent::PalettesLoaded(items)),
                Err(BackendError::Unauthorized) => Ok(BackendEvent::PalettesLoaded(Vec::new())),
                Err(e) => Err(e),
            }
        });
    }

    /// Run a backend call off the UI loop and report back as a `BackendEvent`.
    fn spawn<F, Fut>(&self, tx: &mpsc::Sender<Event>, origin: Option<DialogKind>, f: F)
    where
        F: FnOnce(Backend) -> Fut,
        Fut: Future<Output = Result<BackendEvent, BackendError>> + Send + 'static,
    {
        let fut = f(self.backend.clone());
        let tx = tx.clone();
        tokio::spawn(async move {
            let ev = fut.await.unwrap_or_else(|e| BackendEvent::Error {
                message: e.to_string(),
                origin,
            });
            let _ = tx.send(Event::Backend(ev)).await;
        });
    }
}

/// Working palette from the last session, or a fresh random one.
fn restore_palette(cfg: &Config) -> PaletteCore {
    let limit = cfg.palette.history_limit;
    let restored: Vec<_> = cfg
        .ui
        .last_palette
        .iter()
        .filter_map(|h| color::Color::parse(h).ok())
        .collect();
    if !restored.is_empty()
        && restored.len() == cfg.ui.last_palette.len()
        && restored.len() <= MAX_COLORS
    {
        PaletteCore::new(restored, limit)
    } else {
        PaletteCore::random(cfg.palette_size(), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::models::SavedPalette;

    fn test_app(tag: &str) -> App {
        let dir = std::env::temp_dir().join(format!(
            "huewave-app-{tag}-{}-{}",
            std::process::id(),
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        ));
        let mut cfg = Config::default();
        cfg.paths.data_dir = dir.clone();
        cfg.ui.last_palette = vec![
            "#111111".into(),
            "#222222".into(),
            "#333333".into(),
            "#444444".into(),
            "#555555".into(),
        ];
        App::new(cfg, dir.join("config.toml")).unwrap()
    }

    fn tx() -> mpsc::Sender<Event> {
        mpsc::channel(8).0
    }

    #[test]
    fn test_restore_palette_from_config() {
        let app = test_app("restore");
        assert_eq!(app.state.palette.hexes()[4], "#555555");
        assert!(!app.state.palette.can_undo());
    }

    #[test]
    fn test_restore_palette_rejects_bad_entries() {
        let mut cfg = Config::default();
        cfg.ui.last_palette = vec!["#111111".into(), "oops".into()];
        let palette = restore_palette(&cfg);
        assert_eq!(palette.len(), cfg.palette_size());
        assert_ne!(palette.hexes()[1], "oops");
    }

    #[tokio::test]
    async fn test_edit_commit_valid_and_invalid() {
        let mut app = test_app("edit");
        let tx = tx();
        app.handle_action(Action::SelectNext, &tx);
        app.handle_action(Action::EditStart, &tx);
        for _ in 0..7 {
            app.handle_action(Action::EditBackspace, &tx);
        }
        for c in "#abc".chars() {
            app.handle_action(Action::EditInput(c), &tx);
        }
        app.handle_action(Action::EditCommit, &tx);
        assert_eq!(app.state.palette.hexes()[1], "#AABBCC");
        assert!(app.state.editor.is_none());

        app.handle_action(Action::EditStart, &tx);
        app.handle_action(Action::EditBackspace, &tx);
        app.handle_action(Action::EditCommit, &tx);
        assert_eq!(app.state.palette.hexes()[1], "#AABBCC");
        assert!(app.state.toast.is_some());
    }

    #[tokio::test]
    async fn test_generate_respects_lock_then_undo() {
        let mut app = test_app("lock");
        let tx = tx();
        app.handle_action(Action::ToggleLock, &tx);
        app.handle_action(Action::Generate, &tx);
        assert_eq!(app.state.palette.hexes()[0], "#111111");
        assert!(app.state.palette.colors()[0].locked);

        app.handle_action(Action::Undo, &tx);
        app.handle_action(Action::Undo, &tx);
        assert_eq!(app.state.palette.hexes()[1], "#222222");
    }

    #[tokio::test]
    async fn test_save_dialog_prefills_flavor_name_and_validates() {
        let mut app = test_app("save");
        let tx = tx();
        app.handle_action(Action::OpenDialog(DialogKind::Save), &tx);
        assert!(app.state.dialogs.is_open("save-palette"));
        let name = app.state.dialog.as_ref().map(|d| d.name.clone()).unwrap();
        assert!(!name.is_empty());

        for _ in 0..name.len() {
            app.handle_action(Action::DialogBackspace, &tx);
        }
        app.handle_action(Action::DialogSubmit, &tx);
        let d = app.state.dialog.as_ref().unwrap();
        assert_eq!(d.error.as_deref(), Some("Name is required"));
        assert!(!app.state.busy);
    }

    #[tokio::test]
    async fn test_late_response_does_not_touch_new_dialog() {
        let mut app = test_app("late");
        let tx = tx();
        app.handle_action(Action::OpenDialog(DialogKind::Save), &tx);
        app.handle_action(Action::CloseDialog, &tx);
        app.handle_action(Action::OpenDialog(DialogKind::Save), &tx);

        let saved = SavedPalette {
            id: 1,
            name: "Vanilla Swirl".into(),
            colors: app.state.palette.hexes(),
            owner_id: "local".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        app.handle_backend(BackendEvent::Created(saved), &tx);
        assert!(app.state.dialogs.is_open("save-palette"));
        assert_eq!(app.state.saved.items.len(), 1);
    }

    #[tokio::test]
    async fn test_quit_unregisters_shortcuts() {
        let mut app = test_app("mount");
        app.mount_shortcuts();
        let ids = app.shortcut_ids.clone();
        assert!(ids.iter().all(|id| app.shortcuts.is_registered(*id)));
        app.unmount_shortcuts();
        assert!(ids.iter().all(|id| !app.shortcuts.is_registered(*id)));
    }

    #[tokio::test]
    async fn test_shared_link_replaces_working_set() {
        let mut app = test_app("shared");
        let tx = tx();
        app.handle_action(Action::ToggleLock, &tx);
        app.state.loaded_id = Some(7);
        let depth = app.state.palette.undo_depth();

        let hexes =
            share::decode("https://huewave.app/palette/ff0000-00ff00-0000ff-ffffff-000000")
                .unwrap();
        app.apply_shared(&hexes);

        assert_eq!(
            app.state.palette.hexes(),
            vec!["#FF0000", "#00FF00", "#0000FF", "#FFFFFF", "#000000"]
        );
        assert!(app.state.palette.colors().iter().all(|c| !c.locked));
        assert_eq!(app.state.palette.undo_depth(), depth);
        assert_eq!(app.state.loaded_id, None);

        // A link of another length drops history that no longer lines up.
        app.apply_shared(&share::decode("ff0000-00ff00").unwrap());
        assert_eq!(app.state.palette.len(), 2);
        assert!(!app.state.palette.can_undo());
    }

    #[test]
    fn test_restore_keeps_palette_longer_than_size() {
        let mut cfg = Config::default();
        cfg.palette.size = 5;
        cfg.ui.last_palette = (1..=MAX_COLORS).map(|i| format!("#0000{i:02X}")).collect();
        let palette = restore_palette(&cfg);
        assert_eq!(palette.len(), MAX_COLORS);
        assert_eq!(palette.hexes()[9], "#00000A");

        cfg.ui.last_palette = vec!["#123456".into(), "#654321".into()];
        assert_eq!(restore_palette(&cfg).hexes(), vec!["#123456", "#654321"]);
    }

    #[tokio::test]
    async fn test_search_then_load_filtered_item() {
        let mut app = test_app("search");
        let tx = tx();
        let mk = |id: i64, name: &str| SavedPalette {
            id,
            name: name.into(),
            colors: vec!["#ABCDEF".into()],
            owner_id: "local".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        app.state
            .saved
            .set_items(vec![mk(1, "Mint Chip"), mk(2, "Berry Sorbet")]);
        app.state.screen = Screen::Saved;

        app.handle_action(Action::SearchStart, &tx);
        for c in "berry".chars() {
            app.handle_action(Action::SearchInput(c), &tx);
        }
        app.handle_action(Action::SearchDone, &tx);
        assert!(!app.state.saved.searching);
        app.handle_action(Action::LoadSelected, &tx);
        assert_eq!(app.state.loaded_id, Some(2));
        assert_eq!(app.state.palette.hexes(), vec!["#ABCDEF"]);
    }
}
