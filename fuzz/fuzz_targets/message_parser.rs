//! Fuzz target for line parsing and dispatch
//!
//! Feeds arbitrary lines through the parser and a registered client and
//! checks that nothing panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::{Client, ClientConfig, Command, Message};
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 8191 {
            return;
        }

        let msg = Message::parse(input);
        let _ = Command::from_message(&msg);

        let Ok(mut client) = Client::new(ClientConfig::new("fuzz")) else {
            return;
        };
        let _ = client.start();
        let _ = client.feed_line(":srv 001 fuzz :Welcome");
        for line in input.split('\n') {
            let _ = client.feed_line(line);
        }
    }
});
