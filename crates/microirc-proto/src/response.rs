//! IRC numeric reply codes.
//!
//! Only the numerics this server and bot actually exchange are listed.
//!
//! # Reference
//! - RFC 2812 Section 5: Replies

#![allow(non_camel_case_types)]

use std::fmt;
use std::str::FromStr;

/// IRC server response code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
#[non_exhaustive]
pub enum Response {
    /// 001 - Welcome to the IRC network
    RPL_WELCOME = 1,
    /// 002 - Your host is running version
    RPL_YOURHOST = 2,
    /// 003 - Server creation date
    RPL_CREATED = 3,
    /// 004 - Server info (name, version, user modes, channel modes)
    RPL_MYINFO = 4,
    /// 352 - WHO reply
    RPL_WHOREPLY = 352,

    /// 403 - No such channel
    ERR_NOSUCHCHANNEL = 403,
    /// 409 - No origin specified
    ERR_NOORIGIN = 409,
    /// 411 - No recipient given
    ERR_NORECIPIENT = 411,
    /// 412 - No text to send
    ERR_NOTEXTTOSEND = 412,
    /// 431 - No nickname given
    ERR_NONICKNAMEGIVEN = 431,
    /// 432 - Erroneous nickname
    ERR_ERRONEOUSNICKNAME = 432,
    /// 433 - Nickname is already in use
    ERR_NICKNAMEINUSE = 433,
    /// 442 - You're not on that channel
    ERR_NOTONCHANNEL = 442,
    /// 461 - Not enough parameters
    ERR_NEEDMOREPARAMS = 461,
    /// 462 - You may not reregister
    ERR_ALREADYREGISTRED = 462,
}

impl Response {
    /// Returns the numeric code as u16
    #[inline]
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Creates a Response from a numeric code
    pub fn from_code(code: u16) -> Option<Response> {
        Some(match code {
            1 => Response::RPL_WELCOME,
            2 => Response::RPL_YOURHOST,
            3 => Response::RPL_CREATED,
            4 => Response::RPL_MYINFO,
            352 => Response::RPL_WHOREPLY,
            403 => Response::ERR_NOSUCHCHANNEL,
            409 => Response::ERR_NOORIGIN,
            411 => Response::ERR_NORECIPIENT,
            412 => Response::ERR_NOTEXTTOSEND,
            431 => Response::ERR_NONICKNAMEGIVEN,
            432 => Response::ERR_ERRONEOUSNICKNAME,
            433 => Response::ERR_NICKNAMEINUSE,
            442 => Response::ERR_NOTONCHANNEL,
            461 => Response::ERR_NEEDMOREPARAMS,
            462 => Response::ERR_ALREADYREGISTRED,
            _ => return None,
        })
    }
}

impl FromStr for Response {
    type Err = ParseResponseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 3 {
            return Err(ParseResponseError::InvalidFormat);
        }
        let code: u16 = s.parse().map_err(|_| ParseResponseError::InvalidFormat)?;
        Response::from_code(code).ok_or(ParseResponseError::UnknownCode(code))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.code())
    }
}

/// Error when parsing a response code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseResponseError {
    /// The string was not a three-digit number
    #[error("invalid response code format")]
    InvalidFormat,
    /// The numeric code is not a known response
    #[error("unknown response code: {0}")]
    UnknownCode(u16),
}
