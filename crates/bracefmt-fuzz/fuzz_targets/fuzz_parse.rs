#![no_main]
use libfuzzer_sys::fuzz_target;

use bracefmt_core::{format, ArgValue, SliceCursor, MAX_ARGS};

// Same templates, every output capacity from 0 upward: truncation must be
// clean at every boundary and the write count must match the terminator.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }
    let (first, template) = data.split_first().unwrap_or((&0, &[]));
    let capacity = usize::from(*first) % 64;

    let args = [
        ArgValue::Int32(7),
        ArgValue::Double(0.5),
        ArgValue::Str(b"x"),
        ArgValue::Uint32(255),
    ];
    let mut cursor = SliceCursor::new(&args);

    let mut out = vec![0xFFu8; capacity];
    let written = format(template, &mut out, MAX_ARGS, &mut cursor);

    assert!(written <= capacity.saturating_sub(1));
    if capacity > 0 {
        assert_eq!(out[written], 0);
    }
});
