//! Message parsing implementation.
//!
//! A line is split into `[:prefix] <command> [args]` with nom; the argument
//! string is then handed to the command's dedicated grammar if it has one,
//! or to the general middle/trailing grammar otherwise.

use std::str::FromStr;

use nom::{
    bytes::complete::{take_till, take_till1, take_while},
    character::complete::char,
    combinator::opt,
    sequence::{preceded, terminated},
    IResult,
};
use smallvec::SmallVec;

use crate::error::MessageParseError;
use crate::prefix::Prefix;

use super::types::Message;
use super::whoreply;

/// Parsed argument list, borrowed from the input line.
pub(crate) type Params<'a> = SmallVec<[&'a str; 15]>;

/// Signature of a command-specific argument grammar.
type ArgsParser = for<'a> fn(&'a str) -> Result<Params<'a>, MessageParseError>;

#[inline]
pub(crate) fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

pub(crate) fn space0(input: &str) -> IResult<&str, &str> {
    take_while(is_space)(input)
}

/// Parse the origin (the part after `:` and before the first space).
///
/// Succeeds with an empty slice for a bare `:` so the caller can report it.
fn parse_origin(input: &str) -> IResult<&str, &str> {
    terminated(preceded(char(':'), take_till(is_space)), space0)(input)
}

/// Parse the command token.
fn parse_command(input: &str) -> IResult<&str, &str> {
    terminated(take_till1(is_space), space0)(input)
}

/// Commands whose arguments do not follow the general grammar.
fn special_grammar(command: &str) -> Option<ArgsParser> {
    match command {
        whoreply::RPL_WHOREPLY => Some(whoreply::parse_args),
        _ => None,
    }
}

/// Parse arguments with the general grammar.
///
/// An argument string starting with `:` is one trailing argument. Otherwise
/// everything before the first `" :"` is split on whitespace and everything
/// after it becomes the trailing argument.
fn parse_params(args: &str) -> (Params<'_>, bool) {
    if args.is_empty() {
        return (SmallVec::new(), false);
    }

    if let Some(text) = args.strip_prefix(':') {
        let mut params = SmallVec::new();
        params.push(text);
        return (params, true);
    }

    match args.split_once(" :") {
        Some((middle, text)) => {
            let mut params: Params<'_> = middle.split_ascii_whitespace().collect();
            params.push(text);
            (params, true)
        }
        None => (args.split_ascii_whitespace().collect(), false),
    }
}

/// A parsed IRC message with borrowed string slices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedMessage<'a> {
    /// Raw prefix string (without the leading `:`), if present.
    pub prefix: Option<&'a str>,
    /// The command name.
    pub command: &'a str,
    /// Command parameters, including trailing.
    pub params: Params<'a>,
    /// Whether the last parameter was colon-introduced.
    pub trailing: bool,
}

impl<'a> ParsedMessage<'a> {
    /// Parse one protocol line. A trailing CR/LF is ignored.
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (input, prefix) = opt(parse_origin)(line).unwrap_or((line, None));
        if prefix == Some("") {
            return Err(MessageParseError::EmptyPrefix);
        }

        let (args, command) =
            parse_command(input).map_err(|_| MessageParseError::MissingCommand)?;

        let (params, trailing) = match special_grammar(command) {
            Some(grammar) => (grammar(args)?, true),
            None => parse_params(args),
        };

        Ok(Self {
            prefix,
            command,
            params,
            trailing,
        })
    }

    /// Convert into an owned [`Message`], validating the prefix.
    pub fn to_owned(&self) -> Result<Message, MessageParseError> {
        let prefix = self.prefix.map(Prefix::parse).transpose()?;
        Ok(Message {
            prefix,
            command: self.command.to_owned(),
            args: self.params.iter().map(|p| (*p).to_owned()).collect(),
            trailing: self.trailing,
        })
    }
}

impl Message {
    /// Parse one protocol line into an owned message.
    pub fn parse(line: &str) -> Result<Message, MessageParseError> {
        ParsedMessage::parse(line)?.to_owned()
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Message::parse(s)
    }
}
