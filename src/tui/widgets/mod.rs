pub mod dialog;
pub mod help;
pub mod root;
pub mod saved;
pub mod swatches;
