//! Format driver.
//!
//! Scans the template byte-by-byte, parses specifiers, loads arguments from
//! the forward-only cursor in index order, and dispatches formatting into
//! the output buffer.
//!
//! The driver starts in single-pass mode, emitting as it scans. The first
//! specifier that references an argument index beyond what the implicit
//! counter has covered switches it to two-pass mode: the rest of the
//! template is parsed without emitting, each specifier is recorded, and the
//! per-index argument kinds are tracked. The cursor is then drained in
//! index order up to the high-water mark, and the template is replayed from
//! the switch point with the complete value array.

use crate::args::{ArgCursor, ArgKind, ArgValue, SliceCursor};
use crate::buffer::OutBuffer;
use crate::num::{MAX_WIDTH, SCRATCH_LEN};
use crate::parse;
use crate::printf;
use crate::registry::{self, ResolvedType};
use crate::spec::{Count, ParsedSpec, ResolvedSpec};
use crate::text;

/// Maximum arguments one format call can reference.
pub const MAX_ARGS: usize = 16;

/// Maximum specifiers tracked in two-pass mode. Excess specifiers are
/// skipped silently.
pub const MAX_SPECS: usize = 32;

/// One specifier as tracked by the driver: the parsed record, its template
/// extent, and the resolved formatter.
#[derive(Clone, Copy, Default)]
struct SpecRecord {
    start: usize,
    parsed: ParsedSpec,
    resolved: Option<ResolvedType>,
}

/// Format `template` into `out`, reading arguments from `cursor`.
///
/// The template is scanned up to its first NUL byte, if any. `max_args`
/// bounds the argument indices specifiers may reference; anything at or
/// beyond it renders the specifier invalid. Returns the number of bytes
/// written, excluding the NUL terminator that always follows them.
///
/// The kind of each argument is fixed by the first specifier referencing
/// its index; a template that reads one index under two different kinds is
/// undefined (the first kind wins).
pub fn format<'a>(
    template: &[u8],
    out: &mut [u8],
    max_args: usize,
    cursor: &mut dyn ArgCursor<'a>,
) -> usize {
    let template = match template.iter().position(|&b| b == 0) {
        Some(nul) => &template[..nul],
        None => template,
    };
    let max_args = max_args.min(MAX_ARGS);
    let len = template.len();
    let mut buf = OutBuffer::new(out);

    let mut single_pass = true;
    let mut arg_index = 0usize; // implicit counter
    let mut arg_count = 0usize; // argument high-water mark
    let mut loaded = 0usize;
    let mut kinds = [ArgKind::None; MAX_ARGS];
    let mut values = [ArgValue::None; MAX_ARGS];

    let mut records = [SpecRecord::default(); MAX_SPECS];
    let mut record_count = 0usize;
    let mut pass_two_start = 0usize;

    let mut pos = 0usize;
    while pos < len {
        let byte = template[pos];
        let next = template.get(pos + 1).copied();

        if byte == b'{' && next == Some(b'{') {
            if single_pass {
                buf.write_byte(b'{');
            }
            pos += 2;
            continue;
        }
        if byte == b'}' && next == Some(b'}') {
            if single_pass {
                buf.write_byte(b'}');
            }
            pos += 2;
            continue;
        }
        if byte == b'%' && next == Some(b'%') {
            if single_pass {
                buf.write_byte(b'%');
            }
            pos += 2;
            continue;
        }
        if byte != b'{' && byte != b'%' {
            if single_pass {
                buf.write_byte(byte);
            }
            pos += 1;
            continue;
        }

        // A specifier past the two-pass tracking cap is skipped silently:
        // advance past it without touching the argument counters.
        if !single_pass && record_count >= MAX_SPECS {
            pos += skip_spec_extent(template, pos, max_args);
            continue;
        }

        let spec_start = pos;
        let (parsed, consumed) = if byte == b'{' {
            parse::parse_spec(&template[pos..], max_args, &mut arg_index, &mut arg_count)
        } else {
            printf::parse_printf_spec(&template[pos..], max_args, &mut arg_index, &mut arg_count)
        };
        pos += consumed;

        let mut record = SpecRecord {
            start: spec_start,
            parsed,
            resolved: None,
        };
        record.parsed.end_offset = pos;

        if record.parsed.valid {
            if !record.parsed.tag.is_empty() {
                record.resolved = registry::resolve(&record.parsed.tag);
            }
            if let Some(rt) = &record.resolved {
                record_kind(&mut kinds, record.parsed.value_index, rt.kind);
            }
            if let Count::FromArg(i) = record.parsed.width {
                record_kind(&mut kinds, i, ArgKind::Int32);
            }
            if let Count::FromArg(i) = record.parsed.precision {
                record_kind(&mut kinds, i, ArgKind::Int32);
            }
        }

        if !single_pass {
            records[record_count] = record;
            record_count += 1;
            continue;
        }

        if record.parsed.valid && arg_count > arg_index + 1 {
            // Out-of-order reference. Stop emitting and record from this
            // specifier onward; it is replayed in the second pass.
            single_pass = false;
            pass_two_start = spec_start;
            records[0] = record;
            record_count = 1;
            continue;
        }

        if !record.parsed.valid {
            continue;
        }
        if record.parsed.tag.is_empty() {
            emit_spec(&mut buf, &record, &values);
            continue;
        }
        if record.resolved.is_none() {
            emit_bad_type(&mut buf, &record.parsed);
            continue;
        }

        // Load arguments up to the high-water mark, strictly in order.
        while loaded < arg_count.min(MAX_ARGS) {
            values[loaded] = load_arg(cursor, kinds[loaded]);
            loaded += 1;
        }
        emit_spec(&mut buf, &record, &values);
    }

    if single_pass {
        return buf.written();
    }

    // Drain the cursor in index order up to the high-water mark. An index
    // whose kind was never determined does not consume a cursor slot.
    while loaded < arg_count.min(MAX_ARGS) {
        values[loaded] = load_arg(cursor, kinds[loaded]);
        loaded += 1;
    }

    // Second pass: replay from the switch point with the complete value
    // array, emitting literals and dispatching recorded specifiers.
    let mut pos = pass_two_start;
    let mut next_record = 0usize;
    while pos < len {
        let byte = template[pos];
        let next = template.get(pos + 1).copied();

        if byte == b'{' && next == Some(b'{') {
            buf.write_byte(b'{');
            pos += 2;
            continue;
        }
        if byte == b'}' && next == Some(b'}') {
            buf.write_byte(b'}');
            pos += 2;
            continue;
        }
        if byte == b'%' && next == Some(b'%') {
            buf.write_byte(b'%');
            pos += 2;
            continue;
        }
        if byte != b'{' && byte != b'%' {
            buf.write_byte(byte);
            pos += 1;
            continue;
        }

        if next_record < record_count && records[next_record].start == pos {
            let record = &records[next_record];
            next_record += 1;
            if record.parsed.valid {
                if record.parsed.tag.is_empty() || record.resolved.is_some() {
                    emit_spec(&mut buf, record, &values);
                } else {
                    emit_bad_type(&mut buf, &record.parsed);
                }
            }
            pos = record.parsed.end_offset;
            continue;
        }

        // A specifier beyond the tracking cap: skip it silently again.
        pos += skip_spec_extent(template, pos, max_args);
    }

    buf.written()
}

/// Format with arguments taken from a pre-typed slice, allowing up to
/// [`MAX_ARGS`] argument references.
pub fn format_slice(template: &[u8], out: &mut [u8], args: &[ArgValue<'_>]) -> usize {
    let mut cursor = SliceCursor::new(args);
    format(template, out, MAX_ARGS, &mut cursor)
}

/// Parse the specifier at `pos` with throwaway counters, purely to learn
/// its extent. Parsing is deterministic, so the recording pass and the
/// replay pass agree on the bytes to skip.
fn skip_spec_extent(template: &[u8], pos: usize, max_args: usize) -> usize {
    let mut scratch_index = 0;
    let mut scratch_count = 0;
    let (_, consumed) = if template[pos] == b'{' {
        parse::parse_spec(
            &template[pos..],
            max_args,
            &mut scratch_index,
            &mut scratch_count,
        )
    } else {
        printf::parse_printf_spec(
            &template[pos..],
            max_args,
            &mut scratch_index,
            &mut scratch_count,
        )
    };
    consumed
}

fn load_arg<'a>(cursor: &mut dyn ArgCursor<'a>, kind: ArgKind) -> ArgValue<'a> {
    match kind {
        ArgKind::None => ArgValue::None,
        kind => cursor.read(kind),
    }
}

/// Record the kind the first referencing specifier assigns to an index.
fn record_kind(kinds: &mut [ArgKind; MAX_ARGS], index: usize, kind: ArgKind) {
    if kind == ArgKind::None {
        return;
    }
    if let Some(slot) = kinds.get_mut(index) {
        if *slot == ArgKind::None {
            *slot = kind;
        }
    }
}

fn value_at<'a>(values: &[ArgValue<'a>], index: usize) -> ArgValue<'a> {
    values.get(index).copied().unwrap_or(ArgValue::None)
}

/// Resolve the record against the value array and dispatch its formatter.
///
/// Fields with a width are composed in a scratch buffer first so the
/// alignment pass sees the finished text; such fields are therefore capped
/// at [`MAX_WIDTH`] bytes. Fields without a width format directly into the
/// output buffer.
fn emit_spec(buf: &mut OutBuffer<'_>, record: &SpecRecord, values: &[ArgValue<'_>]) -> usize {
    let parsed = &record.parsed;

    let mut flags = parsed.flags;
    if let Some(rt) = &record.resolved {
        flags.upper |= rt.upper;
        flags.alt |= rt.alt;
    }

    let width = match parsed.width {
        Count::Unset => 0,
        Count::Literal(w) => w.min(MAX_WIDTH as usize) as i32,
        Count::FromArg(i) => value_at(values, i).as_i32().clamp(0, MAX_WIDTH),
    };
    let precision = match parsed.precision {
        Count::Unset => None,
        Count::Literal(p) => Some(p.min(MAX_WIDTH as usize) as i32),
        Count::FromArg(i) => Some(value_at(values, i).as_i32().clamp(0, MAX_WIDTH)),
    };

    let value = match &record.resolved {
        Some(rt) if rt.kind != ArgKind::None => value_at(values, parsed.value_index),
        _ => ArgValue::None,
    };

    let spec = ResolvedSpec {
        flags,
        align: parsed.align,
        fill: parsed.fill,
        width,
        precision,
        tag: parsed.tag,
        value,
    };

    if parsed.tag.is_empty() {
        // Pass-through specifier: pure fill.
        return text::apply_alignment(buf, &spec, b"");
    }
    let Some(rt) = &record.resolved else {
        return 0;
    };

    if spec.width > 0 {
        let mut scratch = [0u8; SCRATCH_LEN];
        let mut field = OutBuffer::new(&mut scratch);
        (rt.formatter)(&mut field, &spec);
        text::apply_alignment(buf, &spec, field.contents())
    } else {
        (rt.formatter)(buf, &spec)
    }
}

fn emit_bad_type(buf: &mut OutBuffer<'_>, parsed: &ParsedSpec) -> usize {
    let mut n = buf.write(b"{bad type: ");
    n += buf.write(parsed.tag.as_bytes());
    n += buf.write_byte(b'}');
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(template: &[u8], args: &[ArgValue<'_>]) -> String {
        let mut out = [0u8; 128];
        let n = format_slice(template, &mut out, args);
        assert!(n <= out.len() - 1);
        assert_eq!(out[n], 0, "output is NUL-terminated");
        String::from_utf8_lossy(&out[..n]).into_owned()
    }

    #[test]
    fn test_literal_passthrough() {
        assert_eq!(run(b"Hello, world!", &[]), "Hello, world!");
    }

    #[test]
    fn test_brace_escapes() {
        assert_eq!(run(b"{{}}", &[]), "{}");
        assert_eq!(run(b"a{{b}}c", &[]), "a{b}c");
        assert_eq!(run(b"100%%", &[]), "100%");
    }

    #[test]
    fn test_single_pass_basic() {
        assert_eq!(run(b"{:d}", &[ArgValue::Int32(42)]), "42");
        assert_eq!(
            run(
                b"{:.2f}, {:d}",
                &[ArgValue::Double(3.14), ArgValue::Int32(42)]
            ),
            "3.14, 42"
        );
    }

    #[test]
    fn test_two_pass_reorders() {
        let args = [ArgValue::Double(3.14), ArgValue::Int32(42)];
        assert_eq!(run(b"{1:d}, {0:.2f}", &args), "42, 3.14");
    }

    #[test]
    fn test_template_stops_at_nul() {
        assert_eq!(run(b"ab\0cd", &[]), "ab");
    }

    #[test]
    fn test_unknown_type_in_two_pass_mode() {
        // The unknown tag never fixes a kind for index 0, so that index
        // consumes no cursor slot and index 1 drains the first argument.
        let args = [ArgValue::Int32(1), ArgValue::Int32(2)];
        assert_eq!(run(b"{1:d}{:q}", &args), "1{bad type: q}");
    }

    #[test]
    fn test_spec_cap_skips_silently() {
        // Force two-pass mode, then overflow the tracking cap.
        let mut template = b"{1:d}{0:d}".to_vec();
        for _ in 0..MAX_SPECS + 4 {
            template.extend_from_slice(b"{0:d}");
        }
        let args = [ArgValue::Int32(7), ArgValue::Int32(8)];
        let rendered = run(&template, &args);
        // Two specs start the template, then MAX_SPECS - 2 more are
        // tracked; the excess emit nothing.
        assert_eq!(rendered.len(), 2 + (MAX_SPECS - 2));
        assert!(rendered.starts_with("87"));
        assert!(rendered[2..].bytes().all(|b| b == b'7'));
    }

    #[test]
    fn test_buffer_full_keeps_count_clamped() {
        let mut out = [0u8; 8];
        let n = format_slice(b"{:d}{:d}{:d}", &mut out, &[
            ArgValue::Int32(123),
            ArgValue::Int32(456),
            ArgValue::Int32(789),
        ]);
        assert_eq!(n, 7);
        assert_eq!(&out[..n], b"1234567");
        assert_eq!(out[7], 0);
    }
}
