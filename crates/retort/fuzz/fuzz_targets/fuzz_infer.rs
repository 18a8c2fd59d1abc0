//! Fuzz target for cell parsing and type inference.
//!
//! Whatever type inference declares for a column, every cell of that
//! column must parse under the declared type.

#![no_main]

use libfuzzer_sys::fuzz_target;
use retort::infer::{infer_column_type, parse_cell};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let cells: Vec<&str> = text.lines().collect();
    let dtype = infer_column_type(&cells);

    for cell in &cells {
        assert!(
            parse_cell(cell, dtype).is_some(),
            "inferred type must parse every cell"
        );
    }
});
