//! Output formatting for CLI.

mod json;
mod text;

pub use json::{CheckOutput, InstanceOutput, JsonFormatter, WorkflowListOutput};
pub use text::TextFormatter;
