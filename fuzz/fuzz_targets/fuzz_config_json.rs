//! Fuzz target: configuration JSON
//!
//! Feeds arbitrary bytes through the same parse-then-validate path as
//! `JsonConfigFile::load` and verifies:
//! - No panics on any input
//! - A config that validates survives a serialise/parse round trip
//! - A validated config is accepted by a running controller
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use linewatch::config::SystemConfig;
use linewatch::fsm::context::FsmContext;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = serde_json::from_slice::<SystemConfig>(data) else {
        return;
    };
    if config.validate().is_err() {
        return;
    }

    let json = serde_json::to_string(&config).expect("valid config serialises");
    let back: SystemConfig = serde_json::from_str(&json).expect("own output parses");
    assert_eq!(back, config);

    let mut ctx = FsmContext::new(SystemConfig::default(), 0);
    ctx.apply_config(config.clone());
    assert_eq!(ctx.config, config);
});
