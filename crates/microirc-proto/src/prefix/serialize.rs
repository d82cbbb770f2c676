use std::fmt;

use super::types::Prefix;

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.nick)?;
        if let Some(name) = &self.name {
            write!(f, "!{}", name)?;
        }
        if let Some(host) = &self.host {
            write!(f, "@{}", host)?;
        }
        Ok(())
    }
}
