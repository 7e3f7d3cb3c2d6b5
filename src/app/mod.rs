//! Application runtime composition modules.

pub(crate) mod output;
pub(crate) mod progress;
pub(crate) mod prompt;
pub(crate) mod runtime;
pub(crate) mod terminal;
