//! Argument kinds, value slots, and the forward-only argument cursor.
//!
//! The driver reads arguments through an [`ArgCursor`], which mirrors the
//! semantics of a C variadic argument list: strictly forward, one typed
//! read per argument. Values land in [`ArgValue`] slots, a tagged container
//! wide enough for any supported kind.

use core::any::Any;
use core::fmt;

/// How one argument is consumed from the cursor and stored in a value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgKind {
    /// No argument is consumed (pass-through specifiers).
    #[default]
    None,
    Int32,
    Uint32,
    Int64,
    Uint64,
    /// Platform word (`usize`).
    Size,
    Double,
    /// A borrowed pointer-like payload: a byte string, a raw address, or an
    /// opaque reference for custom formatters.
    VoidPtr,
}

/// A value slot: one argument as loaded from the cursor.
///
/// Borrowed variants (`Str`, `Opaque`) live for the duration of one format
/// call; formatters must not retain them.
#[derive(Clone, Copy, Default)]
pub enum ArgValue<'a> {
    #[default]
    None,
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Size(usize),
    Double(f64),
    Str(&'a [u8]),
    Ptr(usize),
    Opaque(&'a dyn Any),
}

impl<'a> ArgValue<'a> {
    /// The kind this slot was populated with.
    #[must_use]
    pub fn kind(&self) -> ArgKind {
        match self {
            ArgValue::None => ArgKind::None,
            ArgValue::Int32(_) => ArgKind::Int32,
            ArgValue::Uint32(_) => ArgKind::Uint32,
            ArgValue::Int64(_) => ArgKind::Int64,
            ArgValue::Uint64(_) => ArgKind::Uint64,
            ArgValue::Size(_) => ArgKind::Size,
            ArgValue::Double(_) => ArgKind::Double,
            ArgValue::Str(_) | ArgValue::Ptr(_) | ArgValue::Opaque(_) => ArgKind::VoidPtr,
        }
    }

    /// The slot as a 64-bit register. Signed 32-bit values are
    /// sign-extended, matching variadic integer promotion.
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        match *self {
            ArgValue::None => 0,
            ArgValue::Int32(v) => v as i64 as u64,
            ArgValue::Uint32(v) => u64::from(v),
            ArgValue::Int64(v) => v as u64,
            ArgValue::Uint64(v) => v,
            ArgValue::Size(v) => v as u64,
            ArgValue::Double(v) => v.to_bits(),
            ArgValue::Str(_) | ArgValue::Opaque(_) => 0,
            ArgValue::Ptr(p) => p as u64,
        }
    }

    /// The slot as a double. Non-double slots are reinterpreted from the
    /// raw register, as a C union would.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            ArgValue::Double(v) => v,
            _ => f64::from_bits(self.as_u64()),
        }
    }

    /// The slot as a run-time width or precision operand.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.as_u64() as i32
    }

    /// The slot as a byte string, if it holds one.
    #[must_use]
    pub fn as_str(&self) -> Option<&'a [u8]> {
        match *self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The slot as an opaque reference, if it holds one. Custom formatters
    /// downcast this to their registered concrete type.
    #[must_use]
    pub fn as_opaque(&self) -> Option<&'a dyn Any> {
        match *self {
            ArgValue::Opaque(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for ArgValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::None => f.write_str("None"),
            ArgValue::Int32(v) => write!(f, "Int32({v})"),
            ArgValue::Uint32(v) => write!(f, "Uint32({v})"),
            ArgValue::Int64(v) => write!(f, "Int64({v})"),
            ArgValue::Uint64(v) => write!(f, "Uint64({v})"),
            ArgValue::Size(v) => write!(f, "Size({v})"),
            ArgValue::Double(v) => write!(f, "Double({v})"),
            ArgValue::Str(s) => write!(f, "Str({:?})", String::from_utf8_lossy(s)),
            ArgValue::Ptr(p) => write!(f, "Ptr({p:#x})"),
            ArgValue::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl From<i32> for ArgValue<'_> {
    fn from(v: i32) -> Self {
        ArgValue::Int32(v)
    }
}

impl From<u32> for ArgValue<'_> {
    fn from(v: u32) -> Self {
        ArgValue::Uint32(v)
    }
}

impl From<i64> for ArgValue<'_> {
    fn from(v: i64) -> Self {
        ArgValue::Int64(v)
    }
}

impl From<u64> for ArgValue<'_> {
    fn from(v: u64) -> Self {
        ArgValue::Uint64(v)
    }
}

impl From<usize> for ArgValue<'_> {
    fn from(v: usize) -> Self {
        ArgValue::Size(v)
    }
}

impl From<f64> for ArgValue<'_> {
    fn from(v: f64) -> Self {
        ArgValue::Double(v)
    }
}

impl<'a> From<&'a str> for ArgValue<'a> {
    fn from(v: &'a str) -> Self {
        ArgValue::Str(v.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for ArgValue<'a> {
    fn from(v: &'a [u8]) -> Self {
        ArgValue::Str(v)
    }
}

/// Build an `[ArgValue; N]` array from plain Rust values.
#[macro_export]
macro_rules! fmt_args {
    ($($v:expr),* $(,)?) => {
        [$($crate::args::ArgValue::from($v)),*]
    };
}

/// A forward-only source of typed arguments.
///
/// Mirrors a variadic argument list: each call consumes the next argument,
/// interpreted as `kind`. There is no rewind.
pub trait ArgCursor<'a> {
    /// Read the next argument as `kind`. Past the end of the list this
    /// returns [`ArgValue::None`].
    fn read(&mut self, kind: ArgKind) -> ArgValue<'a>;
}

/// An [`ArgCursor`] over a pre-typed slice of values.
///
/// The slots are already tagged, so `read` returns them as stored; a
/// mismatch between the requested kind and the stored slot follows the
/// documented first-reference rule (the stored payload wins).
#[derive(Debug)]
pub struct SliceCursor<'a> {
    values: &'a [ArgValue<'a>],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    #[must_use]
    pub fn new(values: &'a [ArgValue<'a>]) -> Self {
        Self { values, pos: 0 }
    }

    /// Arguments not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.pos)
    }
}

impl<'a> ArgCursor<'a> for SliceCursor<'a> {
    fn read(&mut self, _kind: ArgKind) -> ArgValue<'a> {
        let value = self.values.get(self.pos).copied().unwrap_or(ArgValue::None);
        self.pos += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_is_forward_only() {
        let values = [ArgValue::Int32(1), ArgValue::Int32(2)];
        let mut cursor = SliceCursor::new(&values);
        assert_eq!(cursor.read(ArgKind::Int32).as_u64(), 1);
        assert_eq!(cursor.read(ArgKind::Int32).as_u64(), 2);
        assert_eq!(cursor.remaining(), 0);
        assert!(matches!(cursor.read(ArgKind::Int32), ArgValue::None));
    }

    #[test]
    fn test_int32_sign_extends() {
        assert_eq!(ArgValue::Int32(-7).as_u64(), (-7i64) as u64);
        assert_eq!(ArgValue::Uint32(u32::MAX).as_u64(), u64::from(u32::MAX));
    }

    #[test]
    fn test_double_round_trips_through_register() {
        let v = ArgValue::Double(3.25);
        assert_eq!(v.as_f64(), 3.25);
        assert_eq!(f64::from_bits(v.as_u64()), 3.25);
    }

    #[test]
    fn test_from_conversions() {
        assert!(matches!(ArgValue::from(1i32), ArgValue::Int32(1)));
        assert!(matches!(ArgValue::from(1u64), ArgValue::Uint64(1)));
        assert!(matches!(ArgValue::from(3.5f64), ArgValue::Double(_)));
        assert!(matches!(ArgValue::from("hi"), ArgValue::Str(b"hi")));
        assert_eq!(ArgValue::from("hi").kind(), ArgKind::VoidPtr);
    }

    #[test]
    fn test_opaque_downcast() {
        let point = (4u32, 2u32);
        let v = ArgValue::Opaque(&point);
        let back = v.as_opaque().and_then(|a| a.downcast_ref::<(u32, u32)>());
        assert_eq!(back, Some(&(4, 2)));
    }

    #[test]
    fn test_fmt_args_macro() {
        let args = fmt_args!(42, 3.14, "x",);
        assert_eq!(args.len(), 3);
        assert_eq!(args[0].kind(), ArgKind::Int32);
        assert_eq!(args[1].kind(), ArgKind::Double);
        assert_eq!(args[2].kind(), ArgKind::VoidPtr);
    }
}
