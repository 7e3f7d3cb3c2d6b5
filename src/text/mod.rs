//! Plain-text cleanup applied to books downloaded as `.txt`.

mod normalizer;

pub use normalizer::{Normalizer, is_allowed_char};
