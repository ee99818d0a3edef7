pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{UnsealError, UnsealResult, UnwrapError};
pub use types::{KeyFormat, KeyFormatResult};
