use super::state::{DialogKind, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextScreen,
    PrevScreen,
    SetScreen(Screen),

    // Palette
    Generate,
    Undo,
    Redo,
    SelectPrev,
    SelectNext,
    ToggleLock,
    ToggleTheme,

    // Inline hex editing
    EditStart,
    EditInput(char),
    EditBackspace,
    EditCommit,
    EditCancel,

    // Dialogs
    OpenDialog(DialogKind),
    CloseDialog,
    DialogInput(char),
    DialogBackspace,
    DialogNextField,
    DialogToggleMode,
    DialogSubmit,

    // Saved list
    ListUp,
    ListDown,
    LoadSelected,
    RefreshSaved,
    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchDone,
    SearchClear,

    Logout,
    Resize,
}
