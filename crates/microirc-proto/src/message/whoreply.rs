//! WHOREPLY (`352`) argument grammar.
//!
//! `352` does not follow the general middle/trailing split: the hop count
//! sits behind the colon together with the real name, and the flag field
//! packs up to three markers into one token.
//!
//! ```text
//! <client> <#channel> <name> <host> <server> <nick> <H|G>[*][@|+] :<hops> <realname>
//! ```
//!
//! The client nick and the channel may be swapped; the channel is whichever
//! field carries the `#`.

use std::fmt::{self, Formatter};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1, take_while1},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, eof, map, opt, recognize, rest, verify},
    sequence::{preceded, separated_pair, terminated, tuple},
    IResult,
};

use crate::error::MessageParseError;

use super::parse::{is_space, Params};
use super::types::Message;

/// Verb of the WHOREPLY numeric.
pub(crate) const RPL_WHOREPLY: &str = "352";

/// Number of arguments a parsed WHOREPLY carries.
pub const WHOREPLY_ARGS: usize = 11;

fn sep(input: &str) -> IResult<&str, &str> {
    take_while1(is_space)(input)
}

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(is_space)(input)
}

fn field(input: &str) -> IResult<&str, &str> {
    terminated(word, sep)(input)
}

fn channel(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), word)(input)
}

fn nickname(input: &str) -> IResult<&str, &str> {
    verify(word, |w: &str| !w.starts_with('#'))(input)
}

/// `(client, channel)` in either order.
fn client_and_channel(input: &str) -> IResult<&str, (&str, &str)> {
    alt((
        separated_pair(nickname, sep, channel),
        map(separated_pair(channel, sep, nickname), |(chan, nick)| {
            (nick, chan)
        }),
    ))(input)
}

/// `H|G`, optional `*`, optional `@|+`.
fn flags(input: &str) -> IResult<&str, (&str, Option<&str>, Option<&str>)> {
    tuple((
        recognize(one_of("HG")),
        opt(tag("*")),
        opt(recognize(one_of("@+"))),
    ))(input)
}

/// `:<hops>` followed by end of input or whitespace and the real name.
fn hops_and_realname(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        char(':'),
        tuple((digit1, alt((map(eof, |_| ""), preceded(sep, rest))))),
    )(input)
}

fn whoreply(input: &str) -> IResult<&str, Params<'_>> {
    let (input, (client, chan)) = terminated(client_and_channel, sep)(input)?;
    let (input, (name, host, server, nick)) = tuple((field, field, field, field))(input)?;
    let (input, (flag, star, status)) = terminated(flags, sep)(input)?;
    let (input, (hops, realname)) = hops_and_realname(input)?;

    let params = Params::from_slice(&[
        client,
        chan,
        name,
        host,
        server,
        nick,
        flag,
        star.unwrap_or(""),
        status.unwrap_or(""),
        hops,
        realname,
    ]);
    Ok((input, params))
}

/// Parse the argument string of a `352` line.
pub(crate) fn parse_args(args: &str) -> Result<Params<'_>, MessageParseError> {
    match all_consuming(whoreply)(args) {
        Ok((_, params)) => Ok(params),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(MessageParseError::InvalidArguments {
                command: RPL_WHOREPLY.to_owned(),
                position: args.len() - e.input.len(),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(MessageParseError::InvalidArguments {
            command: RPL_WHOREPLY.to_owned(),
            position: args.len(),
        }),
    }
}

/// Write the canonical argument form of a parsed WHOREPLY.
pub(crate) fn write_args(f: &mut Formatter<'_>, args: &[String]) -> fmt::Result {
    write!(
        f,
        " {} #{} {} {} {} {} {}{}{} :{}",
        args[0], args[1], args[2], args[3], args[4], args[5], args[6], args[7], args[8], args[9]
    )?;
    if !args[10].is_empty() {
        write!(f, " {}", args[10])?;
    }
    Ok(())
}

/// Borrowed, named view over a parsed WHOREPLY.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WhoReply<'a> {
    /// Nickname the reply was addressed to.
    pub client: &'a str,
    /// Channel name without the `#`.
    pub channel: &'a str,
    /// Username of the listed user.
    pub name: &'a str,
    /// Hostname of the listed user.
    pub host: &'a str,
    /// Server the listed user is connected to.
    pub server: &'a str,
    /// Nickname of the listed user.
    pub nick: &'a str,
    /// `H` (here) or `G` (gone).
    pub flag: &'a str,
    /// `*` for IRC operators, otherwise empty.
    pub oper: &'a str,
    /// `@` or `+` channel status, otherwise empty.
    pub status: &'a str,
    /// Hop count, digits only.
    pub hopcount: &'a str,
    /// Real name; may be empty.
    pub realname: &'a str,
}

impl<'a> WhoReply<'a> {
    /// View `msg` as a WHOREPLY, if it is one.
    pub fn from_message(msg: &'a Message) -> Option<Self> {
        if msg.command != RPL_WHOREPLY || msg.args.len() != WHOREPLY_ARGS {
            return None;
        }
        let a = &msg.args;
        Some(Self {
            client: &a[0],
            channel: &a[1],
            name: &a[2],
            host: &a[3],
            server: &a[4],
            nick: &a[5],
            flag: &a[6],
            oper: &a[7],
            status: &a[8],
            hopcount: &a[9],
            realname: &a[10],
        })
    }

    /// Whether the listed user is marked away.
    pub fn is_away(&self) -> bool {
        self.flag == "G"
    }
}
