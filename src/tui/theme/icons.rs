//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

#[derive(Debug, Clone)]
pub struct Icons {
    // Screens
    pub palette: &'static str,
    pub saved: &'static str,
    pub help: &'static str,

    // Swatch
    pub lock: &'static str,
    pub unlock: &'static str,
    pub edit: &'static str,

    // History
    pub undo: &'static str,
    pub redo: &'static str,

    // Status
    pub success: &'static str,
    pub error: &'static str,
    pub loading: &'static str,
    pub user: &'static str,
    pub share: &'static str,

    pub selected: &'static str,
    pub unselected: &'static str,
    pub swatch: &'static str,
}

impl Icons {
    pub const fn nerd() -> Self {
        Self {
            palette: "\u{f1fc}",        // nf-fa-paint_brush
            saved: "\u{f02d}",          // nf-fa-book
            help: "\u{f059}",           // nf-fa-question_circle

            lock: "\u{f023}",           // nf-fa-lock
            unlock: "\u{f09c}",         // nf-fa-unlock
            edit: "\u{f040}",           // nf-fa-pencil

            undo: "\u{f0e2}",           // nf-fa-undo
            redo: "\u{f01e}",           // nf-fa-repeat

            success: "\u{f00c}",        // nf-fa-check
            error: "\u{f00d}",          // nf-fa-times
            loading: "\u{f110}",        // nf-fa-spinner
            user: "\u{f007}",           // nf-fa-user
            share: "\u{f1e0}",          // nf-fa-share_alt

            selected: "\u{f054}",       // nf-fa-chevron_right
            unselected: " ",
            swatch: "██",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}
