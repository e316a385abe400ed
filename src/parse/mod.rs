//! Clue text parsing

pub mod error;
pub mod parser;

pub use error::ParseError;
pub use parser::{is_reserved, Parser};
