//! String and character formatters, and the external alignment pass.

use crate::buffer::OutBuffer;
use crate::spec::{Align, ResolvedSpec};

/// Pad `text` to the resolved width with the fill byte.
///
/// Text at or beyond the width is emitted unchanged. Center alignment puts
/// the smaller half of the padding on the left.
pub fn apply_alignment(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>, text: &[u8]) -> usize {
    let width = spec.width.max(0) as usize;
    if text.len() >= width {
        return buf.write(text);
    }

    let padding = width - text.len();
    let mut n = 0;
    match spec.align {
        Align::Left => {
            n += buf.write(text);
            n += buf.write_repeat(spec.fill, padding);
        }
        Align::Right => {
            n += buf.write_repeat(spec.fill, padding);
            n += buf.write(text);
        }
        Align::Center => {
            n += buf.write_repeat(spec.fill, padding / 2);
            n += buf.write(text);
            n += buf.write_repeat(spec.fill, padding - padding / 2);
        }
    }
    n
}

/// String formatter (`s`). Precision truncates; an absent value renders
/// as `(null)`.
pub fn format_string(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    let Some(text) = spec.value.as_str() else {
        return buf.write(b"(null)");
    };
    let len = match spec.precision {
        Some(p) => text.len().min(p.max(0) as usize),
        None => text.len(),
    };
    buf.write(&text[..len])
}

/// Character formatter (`c`). NUL renders as the two bytes `\0`.
pub fn format_char(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    let c = spec.value.as_u64() as u8;
    if c == 0 {
        buf.write(b"\\0")
    } else {
        buf.write_byte(c)
    }
}
