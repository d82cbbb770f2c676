//! IRC message prefix types.
//!
//! A prefix identifies the origin of a relayed message. Servers send their
//! own name as a bare `nick`; users appear as `nick!name@host`.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::str::FromStr;

use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::{all_consuming, opt, rest, verify},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::MessageParseError;

/// IRC message prefix: `nick[!name][@host]`.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Prefix {
    /// Nickname, or the server name for server-originated messages.
    pub nick: String,
    /// Username (ident), the part after `!`.
    pub name: Option<String>,
    /// Hostname, the part after `@`.
    pub host: Option<String>,
}

/// `nick = [^!@]+`, `name = [^@]+`, `host = .+`
fn components(input: &str) -> IResult<&str, (&str, Option<&str>, Option<&str>)> {
    tuple((
        take_till1(|c: char| c == '!' || c == '@'),
        opt(preceded(char('!'), take_till1(|c: char| c == '@'))),
        opt(preceded(char('@'), verify(rest, |s: &str| !s.is_empty()))),
    ))(input)
}

impl Prefix {
    /// Create a full user prefix from nick, name and host components.
    ///
    /// # Example
    ///
    /// ```
    /// use microirc_proto::Prefix;
    ///
    /// let prefix = Prefix::new("nick", "user", "host.example.com");
    /// assert_eq!(prefix.to_string(), "nick!user@host.example.com");
    /// ```
    pub fn new(nick: impl Into<String>, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            name: Some(name.into()),
            host: Some(host.into()),
        }
    }

    /// Create a bare prefix, as used for server-originated messages.
    pub fn server(name: impl Into<String>) -> Self {
        Self {
            nick: name.into(),
            name: None,
            host: None,
        }
    }

    /// Parse a prefix with the leading `:` already stripped.
    ///
    /// The whole input must match `nick[!name][@host]` and `nick` must be
    /// non-empty.
    pub fn parse(s: &str) -> Result<Self, MessageParseError> {
        if s.is_empty() {
            return Err(MessageParseError::EmptyPrefix);
        }

        let (_, (nick, name, host)) = all_consuming(components)(s)
            .map_err(|_| MessageParseError::InvalidPrefix(s.to_owned()))?;

        Ok(Self {
            nick: nick.to_owned(),
            name: name.map(str::to_owned),
            host: host.map(str::to_owned),
        })
    }
}

impl FromStr for Prefix {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prefix::parse(s)
    }
}
