// src/embed/mod.rs
// =============================================================================
// The text a note ends up holding for an embedded file:
// - a fenced code block with the file contents
// - a refresh/pin control remembering where the file came from
// =============================================================================

mod code_block;
mod control;

pub use code_block::render_code_block;
pub use control::{Control, ControlError};
