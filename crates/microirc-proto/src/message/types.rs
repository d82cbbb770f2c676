use crate::prefix::Prefix;
use crate::response::Response;
use crate::util::truncate_utf8_safe;

/// An owned IRC message.
///
/// Holds the optional prefix, the command verb (an alphabetic command or a
/// three-digit numeric) and the ordered argument list. `trailing` records
/// whether the final argument was written with a leading colon, which is
/// what lets a parsed message serialize back to the same bytes.
///
/// # Example
///
/// ```
/// use microirc_proto::Message;
///
/// let msg: Message = ":nick!user@host PRIVMSG #channel :Hello!".parse().unwrap();
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.arg(1), Some("Hello!"));
///
/// let msg = Message::privmsg("#channel", "Hello!");
/// assert_eq!(msg.to_string(), "PRIVMSG #channel :Hello!");
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message prefix/source (e.g., `nick!user@host`).
    pub prefix: Option<Prefix>,
    /// The command verb, case-sensitive.
    pub command: String,
    /// Command arguments in wire order.
    pub args: Vec<String>,
    /// Whether the last argument is a colon-introduced trailing argument.
    pub trailing: bool,
}

impl Message {
    /// Create a message with no prefix and no arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            args: Vec::new(),
            trailing: false,
        }
    }

    /// Create a numeric reply message.
    pub fn numeric(response: Response) -> Self {
        Self::new(response.to_string())
    }

    /// Attach a prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Append a middle argument.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.args.push(param.into());
        self
    }

    /// Append the trailing argument. It must be the last one added.
    #[must_use]
    pub fn with_trailing(mut self, text: impl Into<String>) -> Self {
        self.args.push(text.into());
        self.trailing = true;
        self
    }

    /// Get the argument at `index`.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Get the nickname from the message prefix, if present.
    pub fn source_nickname(&self) -> Option<&str> {
        self.prefix.as_ref().map(|p| p.nick.as_str())
    }

    /// The numeric reply code, if the verb is a known numeric.
    pub fn response(&self) -> Option<Response> {
        self.command.parse().ok()
    }

    /// Shorten the trailing argument so the line plus CRLF fits in
    /// `max_len` bytes.
    ///
    /// Messages without a trailing argument are left alone, as is a line
    /// that would still be too long with an empty trailing argument.
    pub fn truncate_to(&mut self, max_len: usize) {
        let line_len = self.to_string().len() + 2;
        if line_len <= max_len || !self.trailing {
            return;
        }
        if let Some(last) = self.args.last_mut() {
            let keep = last.len().saturating_sub(line_len - max_len);
            let end = truncate_utf8_safe(last, keep).len();
            last.truncate(end);
        }
    }

    /// Create a PRIVMSG message to a target with text
    #[must_use]
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new("PRIVMSG").with_param(target).with_trailing(text)
    }

    /// Create a JOIN message for a channel
    #[must_use]
    pub fn join(channel: impl Into<String>) -> Self {
        Self::new("JOIN").with_param(channel)
    }

    /// Create a PART message, optionally carrying a reason
    #[must_use]
    pub fn part(channel: impl Into<String>, reason: Option<String>) -> Self {
        let msg = Self::new("PART").with_param(channel);
        match reason {
            Some(reason) => msg.with_trailing(reason),
            None => msg,
        }
    }

    /// Create a NICK message to change nickname
    #[must_use]
    pub fn nick(nickname: impl Into<String>) -> Self {
        Self::new("NICK").with_param(nickname)
    }

    /// Create a USER message for registration: `USER <name> 0 * :<realname>`
    #[must_use]
    pub fn user(username: impl Into<String>, realname: impl Into<String>) -> Self {
        Self::new("USER")
            .with_param(username)
            .with_param("0")
            .with_param("*")
            .with_trailing(realname)
    }

    /// Create a WHO query
    #[must_use]
    pub fn who(mask: impl Into<String>) -> Self {
        Self::new("WHO").with_param(mask)
    }

    /// Create a PING message
    #[must_use]
    pub fn ping(token: impl Into<String>) -> Self {
        Self::new("PING").with_trailing(token)
    }

    /// Create a PONG message: `PONG <server> :<token>`
    #[must_use]
    pub fn pong(server: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new("PONG").with_param(server).with_trailing(token)
    }

    /// Create a QUIT message, optionally carrying a reason
    #[must_use]
    pub fn quit(reason: Option<String>) -> Self {
        let msg = Self::new("QUIT");
        match reason {
            Some(reason) => msg.with_trailing(reason),
            None => msg,
        }
    }
}
