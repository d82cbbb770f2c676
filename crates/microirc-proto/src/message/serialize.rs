use std::fmt::{self, Display, Formatter};

use super::types::Message;
use super::whoreply::{self, RPL_WHOREPLY, WHOREPLY_ARGS};

/// Whether the final argument must be written with a leading colon.
fn needs_colon(arg: &str) -> bool {
    arg.is_empty() || arg.contains(' ') || arg.starts_with(':')
}

impl Display for Message {
    /// Writes the line without its CRLF terminator; the codec appends it.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref prefix) = self.prefix {
            write!(f, ":{} ", prefix)?;
        }

        write!(f, "{}", self.command)?;

        if self.command == RPL_WHOREPLY && self.args.len() == WHOREPLY_ARGS {
            return whoreply::write_args(f, &self.args);
        }

        if let Some((last, middle)) = self.args.split_last() {
            for arg in middle {
                write!(f, " {}", arg)?;
            }
            if self.trailing || needs_colon(last) {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }

        Ok(())
    }
}
