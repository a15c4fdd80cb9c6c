#![no_main]
use libfuzzer_sys::fuzz_target;

use bracefmt_core::{format, ArgValue, SliceCursor, MAX_ARGS};

// Arbitrary templates against a fixed argument pool: the engine must never
// panic, never write past the usable window, and always NUL-terminate.
fuzz_target!(|data: &[u8]| {
    let args = [
        ArgValue::Int32(-42),
        ArgValue::Uint64(u64::MAX),
        ArgValue::Double(3.141592653589793),
        ArgValue::Str(b"fuzz"),
        ArgValue::Size(usize::MAX),
        ArgValue::Ptr(0xdead_beef),
        ArgValue::Double(f64::NAN),
        ArgValue::Int32(0),
    ];
    let mut cursor = SliceCursor::new(&args);

    let mut out = [0xAAu8; 512];
    let written = format(data, &mut out, MAX_ARGS, &mut cursor);

    assert!(written <= out.len() - 1);
    assert_eq!(out[written], 0);
    assert!(out[written..].iter().all(|&b| b == 0));
});
