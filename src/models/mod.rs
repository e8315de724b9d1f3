pub mod meta;
pub mod user;

pub use meta::ListMeta;
pub use user::{User, UserInput};

use thiserror::Error;

/// Structural failure while decoding a backend payload. Any occurrence aborts
/// the whole call; a partially decoded record never reaches the UI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Missing key \"{key}\" at {path}.")]
    MissingKey {
        path: &'static str,
        key: &'static str,
    },
    #[error("Invalid payload at {path}, expected {expected}.")]
    InvalidType {
        path: &'static str,
        expected: &'static str,
    },
}
