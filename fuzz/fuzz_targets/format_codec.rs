//! Fuzz target for the mIRC formatting codec

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::format;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        let stripped = format::strip(input);
        assert_eq!(format::strip(&stripped), stripped);

        let joined: String = format::encode(input).into_iter().map(|run| run.text).collect();
        assert_eq!(joined, stripped);
    }
});
