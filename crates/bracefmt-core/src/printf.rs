//! printf-style directive translation.
//!
//! Templates may also carry `%[flags][width][.precision]type` directives,
//! which share the specifier record, formatters, and implicit-index
//! machinery with brace specifiers. Only the built-in tags are reachable:
//! `d u b o x X f F s c p`, with `ll`/`z` prefixes on the integral ones.
//!
//! A `*` width is consumed before the value argument, and padded fields
//! right-justify, both matching printf conventions. A malformed or unknown
//! directive emits nothing: the directive bytes (including one
//! unrecognized type byte) are consumed and no argument is read.

use crate::spec::{Count, Flags, ParsedSpec, TypeTag};

/// Match the printf type at `s[p..]`: one of the built-in conversion
/// letters, optionally prefixed by `ll` or `z` when integral. Returns the
/// tag length.
fn printf_type_len(s: &[u8], p: usize) -> Option<usize> {
    const INTEGRAL: &[u8] = b"dubox";
    let first = *s.get(p)?;
    match first {
        b'd' | b'u' | b'b' | b'o' | b'x' | b'X' | b'f' | b'F' | b's' | b'c' | b'p' => Some(1),
        b'l' => {
            if s.get(p + 1) == Some(&b'l')
                && s.get(p + 2)
                    .is_some_and(|c| INTEGRAL.contains(c) || *c == b'X')
            {
                Some(3)
            } else {
                None
            }
        }
        b'z' => {
            if s.get(p + 1)
                .is_some_and(|c| INTEGRAL.contains(c) || *c == b'X')
            {
                Some(2)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Parse one `%` directive from `s`, where `s[0]` is the `%` (and `s[1]`
/// is not another `%`; the caller handles the escape).
///
/// Mirrors [`crate::parse::parse_spec`]: counters commit only on success,
/// and the returned byte count always advances the scanner past the
/// directive.
pub(crate) fn parse_printf_spec(
    s: &[u8],
    max_args: usize,
    arg_index: &mut usize,
    arg_count: &mut usize,
) -> (ParsedSpec, usize) {
    match parse_printf_inner(s, max_args, *arg_index) {
        Some((spec, consumed, new_arg_index, high_water)) => {
            *arg_index = new_arg_index;
            *arg_count = (*arg_count).max(high_water);
            (spec, consumed)
        }
        None => {
            // Skip flags/width/precision plus one type byte, reading nothing.
            let mut p = 1;
            while p < s.len() && matches!(s[p], b'#' | b'!' | b'0' | b'+' | b' ') {
                p += 1;
            }
            while p < s.len() && (s[p].is_ascii_digit() || s[p] == b'*' || s[p] == b'.') {
                p += 1;
            }
            if p < s.len() {
                p += 1;
            }
            (ParsedSpec::default(), p)
        }
    }
}

fn parse_printf_inner(
    s: &[u8],
    max_args: usize,
    arg_index: usize,
) -> Option<(ParsedSpec, usize, usize, usize)> {
    let n = s.len();
    let mut p = 1; // past '%'

    let mut flags = Flags::default();
    let mut fill = b' ';
    let mut width = Count::Unset;
    let mut precision = Count::Unset;
    let mut new_arg_index = arg_index;

    while p < n {
        match s[p] {
            b'#' => flags.alt = true,
            b'!' => flags.upper = true,
            b'0' => {
                flags.zero = true;
                fill = b'0';
            }
            b'+' => flags.sign = true,
            b' ' => flags.space = true,
            _ => break,
        }
        p += 1;
    }

    // Width precedes the value in the argument list, so a '*' width takes
    // the next implicit index before the value does.
    if p < n && s[p].is_ascii_digit() {
        width = Count::Literal(crate::parse::read_int(s, &mut p));
    } else if p < n && s[p] == b'*' {
        p += 1;
        if new_arg_index >= max_args {
            return None;
        }
        width = Count::FromArg(new_arg_index);
        new_arg_index += 1;
    }

    if p < n && s[p] == b'.' {
        p += 1;
        if p < n && s[p].is_ascii_digit() {
            precision = Count::Literal(crate::parse::read_int(s, &mut p));
        } else if p < n && s[p] == b'*' {
            p += 1;
            if new_arg_index >= max_args {
                return None;
            }
            precision = Count::FromArg(new_arg_index);
            new_arg_index += 1;
        } else {
            return None;
        }
    }

    let tag_len = printf_type_len(s, p)?;
    let tag = TypeTag::from_bytes(&s[p..p + tag_len]);
    p += tag_len;

    if new_arg_index >= max_args {
        return None;
    }
    let index = new_arg_index;
    new_arg_index += 1;

    let mut high_index = index;
    if let Count::FromArg(i) = width {
        high_index = high_index.max(i);
    }
    if let Count::FromArg(i) = precision {
        high_index = high_index.max(i);
    }

    let spec = ParsedSpec {
        value_index: index,
        width,
        precision,
        flags,
        // printf fields right-justify; brace specifiers default to left.
        align: crate::spec::Align::Right,
        fill,
        tag,
        end_offset: 0, // caller rebases to the template offset
        valid: true,
    };
    Some((spec, p, new_arg_index, high_index + 1))
}
