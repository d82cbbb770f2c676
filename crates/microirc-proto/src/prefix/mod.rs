//! IRC message prefix parsing and serialization.

mod serialize;
mod types;

pub use self::types::Prefix;
