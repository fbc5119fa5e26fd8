//! CLI command handlers, one per file.

mod completions;
mod modify;
mod parse;
mod render;

pub use completions::run_completions;
pub use modify::run_modify;
pub use parse::run_parse;
pub use render::run_render;
