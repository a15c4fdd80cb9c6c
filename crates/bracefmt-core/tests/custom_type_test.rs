//! Integration test: custom formatter registration.
//!
//! Registers user-defined type tags in the global registry and drives them
//! through the full format pipeline, including width/alignment handling
//! and delegation to the built-in formatters.
//!
//! Run: cargo test -p bracefmt-core --test custom_type_test

use std::sync::Once;

use bracefmt_core::num::format_signed;
use bracefmt_core::{
    format_slice, register_type, ArgKind, ArgValue, Flags, OutBuffer, ResolvedSpec,
};

#[derive(Debug)]
struct Pair {
    a: i32,
    b: i32,
}

/// Renders a [`Pair`] as `{a, b}`, delegating the digits to the signed
/// decimal formatter.
fn format_pair(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    let Some(pair) = spec.value.as_opaque().and_then(|v| v.downcast_ref::<Pair>()) else {
        return 0;
    };
    let mut field = *spec;
    field.width = 0;
    field.precision = None;
    field.flags = Flags::default();

    let mut n = buf.write_byte(b'{');
    field.value = ArgValue::Int32(pair.a);
    n += format_signed(buf, &field);
    n += buf.write(b", ");
    field.value = ArgValue::Int32(pair.b);
    n += format_signed(buf, &field);
    n += buf.write_byte(b'}');
    n
}

fn format_upper_tag(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    let Some(text) = spec.value.as_str() else {
        return 0;
    };
    let mut n = 0;
    for &b in text {
        n += buf.write_byte(b.to_ascii_uppercase());
    }
    n
}

static REGISTER: Once = Once::new();

fn register_test_types() {
    REGISTER.call_once(|| {
        assert!(register_type(b"test", format_pair, ArgKind::VoidPtr));
        assert!(register_type(b"shout", format_upper_tag, ArgKind::VoidPtr));
    });
}

fn check(expected: &str, template: &[u8], args: &[ArgValue<'_>]) {
    let mut out = [0u8; 256];
    let n = format_slice(template, &mut out, args);
    assert_eq!(String::from_utf8_lossy(&out[..n]), expected);
    assert_eq!(out[n], 0);
}

#[test]
fn custom_struct_formatter() {
    register_test_types();
    let pair = Pair { a: 42, b: 3 };
    check("{42, 3}", b"{:test}", &[ArgValue::Opaque(&pair)]);
}

#[test]
fn custom_formatter_respects_width_and_alignment() {
    register_test_types();
    let pair = Pair { a: 4, b: 2 };
    check("  {4, 2}  ", b"{:^10test}", &[ArgValue::Opaque(&pair)]);
    check("{4, 2}....", b"{:$.<10test}", &[ArgValue::Opaque(&pair)]);
}

#[test]
fn custom_string_formatter() {
    register_test_types();
    check("LOUD", b"{:shout}", &[ArgValue::Str(b"loud")]);
}

#[test]
fn custom_tag_mixed_with_builtins() {
    register_test_types();
    let pair = Pair { a: 1, b: 2 };
    check(
        "pair={1, 2} n=7",
        b"pair={0:test} n={1:d}",
        &[ArgValue::Opaque(&pair), ArgValue::Int32(7)],
    );
}

#[test]
fn unregistered_tag_reports_bad_type() {
    register_test_types();
    check(
        "{bad type: nosuch}",
        b"{:nosuch}",
        &[ArgValue::Int32(1)],
    );
}
