// Adapters layer: concrete encodings for external formats.

pub mod preview;
pub mod workbook;
