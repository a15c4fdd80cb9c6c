//! Number-to-text rendering.
//!
//! Base-N digit emission with configurable digit alphabets and prefixes,
//! plus IEEE-754 double decomposition with fixed-point rounding. Digits are
//! produced least-significant first into a scratch array and reversed in
//! place; no allocation occurs on any path.

use crate::buffer::OutBuffer;
use crate::spec::ResolvedSpec;

/// Maximum width or precision a specifier may request; larger values are
/// silently clamped.
pub const MAX_WIDTH: i32 = 256;

/// Fractional digits emitted for floats when no precision is given.
pub const FLOAT_PRECISION_DEFAULT: i32 = 6;

/// Hard cap on float precision. Scaling by 10^p must stay exact in a u64
/// digit pass, so precision beyond 9 is clamped.
pub const FLOAT_PRECISION_MAX: i32 = 9;

/// Scratch size for composing one numeric field before width padding.
pub(crate) const SCRATCH_LEN: usize = MAX_WIDTH as usize + 1;

const POW10: [u64; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// A digit alphabet and base prefix for one radix.
pub(crate) struct NumFormat {
    base: u64,
    digits: &'static [u8],
    prefix: &'static [u8],
}

pub(crate) const BINARY: NumFormat = NumFormat {
    base: 2,
    digits: b"01",
    prefix: b"0b",
};
pub(crate) const OCTAL: NumFormat = NumFormat {
    base: 8,
    digits: b"01234567",
    prefix: b"0o",
};
pub(crate) const DECIMAL: NumFormat = NumFormat {
    base: 10,
    digits: b"0123456789",
    prefix: b"",
};
pub(crate) const HEX_LOWER: NumFormat = NumFormat {
    base: 16,
    digits: b"0123456789abcdef",
    prefix: b"0x",
};
pub(crate) const HEX_UPPER: NumFormat = NumFormat {
    base: 16,
    digits: b"0123456789ABCDEF",
    prefix: b"0X",
};

/// Emit the digits of `value` into the front of `out`.
///
/// Digits are written least-significant first, then reversed in place.
/// Zero produces `"0"`. Returns the digit count.
pub(crate) fn digits_of(mut value: u64, format: &NumFormat, out: &mut [u8]) -> usize {
    let mut n = 0;
    if value == 0 {
        out[0] = b'0';
        return 1;
    }
    while value > 0 && n < out.len() {
        out[n] = format.digits[(value % format.base) as usize];
        value /= format.base;
        n += 1;
    }
    out[..n].reverse();
    n
}

fn clamped_width(spec: &ResolvedSpec<'_>) -> usize {
    spec.width.clamp(0, MAX_WIDTH) as usize
}

/// Render an integer field: sign, optional base prefix, precision zeros,
/// zero-flag padding, digits.
///
/// Precision pads the digit run with leading zeros; the zero flag instead
/// pads the whole field to `width`, keeping the sign and prefix in front.
/// External width alignment is the dispatcher's job.
fn format_integer(
    buf: &mut OutBuffer<'_>,
    spec: &ResolvedSpec<'_>,
    signed: bool,
    format: &NumFormat,
) -> usize {
    let width = clamped_width(spec);
    let mut n = 0;

    let (magnitude, negative) = if signed {
        let v = spec.value.as_u64() as i64;
        if v < 0 {
            (v.unsigned_abs(), true)
        } else {
            (v as u64, false)
        }
    } else {
        (spec.value.as_u64(), false)
    };

    if negative {
        n += buf.write_byte(b'-');
    } else if spec.flags.sign {
        n += buf.write_byte(b'+');
    } else if spec.flags.space {
        n += buf.write_byte(b' ');
    }

    if spec.flags.alt {
        n += buf.write(format.prefix);
    }

    let mut scratch = [0u8; SCRATCH_LEN];
    let len = digits_of(magnitude, format, &mut scratch);

    if let Some(precision) = spec.precision {
        let precision = precision.clamp(0, MAX_WIDTH) as usize;
        if precision > len {
            n += buf.write_repeat(b'0', precision - len);
        }
    }

    if spec.flags.zero && width > len + n {
        n += buf.write_repeat(b'0', width - len - n);
    }

    n += buf.write(&scratch[..len]);
    n
}

/// Signed decimal formatter (`d`, `lld`, `zd`).
pub fn format_signed(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    format_integer(buf, spec, true, &DECIMAL)
}

/// Unsigned decimal formatter (`u`, `llu`, `zu`).
pub fn format_unsigned(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    format_integer(buf, spec, false, &DECIMAL)
}

/// Binary formatter (`b`, `llb`, `zb`).
pub fn format_binary(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    format_integer(buf, spec, false, &BINARY)
}

/// Octal formatter (`o`, `llo`, `zo`).
pub fn format_octal(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    format_integer(buf, spec, false, &OCTAL)
}

/// Hexadecimal formatter (`x`, `X`, `p`). The upper flag picks the alphabet.
pub fn format_hex(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    if spec.flags.upper {
        format_integer(buf, spec, false, &HEX_UPPER)
    } else {
        format_integer(buf, spec, false, &HEX_LOWER)
    }
}

/// Fixed-point double formatter (`f`, `F`).
///
/// Decomposes the IEEE-754 bit pattern to classify the value, then splits
/// finite values into whole and fractional integers. The fraction is scaled
/// by 10^precision and rounded half-to-even at the boundary (with the
/// documented quirk that a zero fraction at the halfway point rounds up).
/// The alternate form suppresses the decimal point when the rounded
/// fraction is zero.
pub fn format_double(buf: &mut OutBuffer<'_>, spec: &ResolvedSpec<'_>) -> usize {
    let bits = spec.value.as_f64().to_bits();
    let sign_bit = bits >> 63 != 0;
    let exponent = (bits >> 52) & 0x7FF;
    let fraction_bits = bits & ((1u64 << 52) - 1);

    let width = clamped_width(spec);
    let precision = match spec.precision {
        Some(p) => p.clamp(0, FLOAT_PRECISION_MAX) as usize,
        None => FLOAT_PRECISION_DEFAULT as usize,
    };
    let mut n = 0;

    if sign_bit {
        n += buf.write_byte(b'-');
    } else if spec.flags.sign {
        n += buf.write_byte(b'+');
    } else if spec.flags.space {
        n += buf.write_byte(b' ');
    }

    if exponent == 0x7FF {
        let text: &[u8] = if fraction_bits == 0 {
            if spec.flags.upper {
                b"INF"
            } else {
                b"inf"
            }
        } else if spec.flags.upper {
            b"NAN"
        } else {
            b"nan"
        };
        n += buf.write(text);
        return n;
    }

    if exponent == 0 && fraction_bits == 0 {
        n += buf.write_byte(b'0');
        if !spec.flags.alt && precision > 0 {
            n += buf.write_byte(b'.');
            n += buf.write_repeat(b'0', precision);
        }
        return n;
    }

    let value = spec.value.as_f64().abs();
    let mut whole = value as u64;

    // Shift the decimal point right by the precision, then round the
    // remainder of the scaled fraction.
    let scaled = (value - whole as f64) * POW10[precision] as f64;
    let mut frac = scaled as u64;
    let delta = scaled - frac as f64;
    if delta > 0.5 {
        frac += 1;
    } else if delta < 0.5 {
        // exact enough, keep the truncation
    } else if frac == 0 || frac & 1 == 1 {
        frac += 1;
    }
    // Rollover, e.g. 0.99 at precision 1 becomes 1.0.
    if frac >= POW10[precision] {
        frac = 0;
        whole += 1;
    }

    let write_decimal = precision > 0 && !(frac == 0 && spec.flags.alt);

    let mut scratch = [0u8; SCRATCH_LEN];
    let mut len = digits_of(whole, &DECIMAL, &mut scratch);
    let mut frac_len = 0;
    if write_decimal {
        scratch[len] = b'.';
        len += 1;
        frac_len = digits_of(frac, &DECIMAL, &mut scratch[len..]);
        len += frac_len;
    }

    if spec.flags.zero && width > len + n {
        n += buf.write_repeat(b'0', width - len - n);
    }

    n += buf.write(&scratch[..len]);

    if write_decimal && precision > frac_len {
        n += buf.write_repeat(b'0', precision - frac_len);
    }
    n
}
