//! Fuzz target for IRC prefix parsing

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if let Ok(prefix) = microirc_proto::Prefix::parse(input) {
            assert_eq!(prefix.to_string(), input);
        }
    }
});
