//! IRC message types and parsing.

mod parse;
mod serialize;
mod types;
/// WHOREPLY (`352`) grammar and typed view.
pub mod whoreply;

pub use self::types::Message;
pub use self::whoreply::WhoReply;
