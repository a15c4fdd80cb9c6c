//! # bracefmt-core
//!
//! A bounded, allocation-free string formatting engine. Templates embed
//! brace-delimited specifiers (`{index:flags…type}`) and printf-style
//! directives (`%…`); arguments arrive through a forward-only typed cursor
//! and output lands in a caller-owned byte buffer, always NUL-terminated.
//!
//! The formatting path performs no allocation: every intermediate buffer is
//! a fixed-size stack array and all resource bounds are compile-time
//! constants. The only process-wide state is the custom type registry,
//! which is expected to be populated during initialization.
//!
//! ```
//! use bracefmt_core::format_slice;
//! use bracefmt_core::fmt_args;
//!
//! let mut out = [0u8; 64];
//! let args = fmt_args!(42, 3.14);
//! let n = format_slice(b"{:d} {:.2f}", &mut out, &args);
//! assert_eq!(&out[..n], b"42 3.14");
//! ```

#![deny(unsafe_code)]

pub mod args;
pub mod buffer;
pub mod driver;
pub mod num;
pub mod parse;
pub mod printf;
pub mod registry;
pub mod spec;
pub mod text;

pub use args::{ArgCursor, ArgKind, ArgValue, SliceCursor};
pub use buffer::OutBuffer;
pub use driver::{format, format_slice, MAX_ARGS, MAX_SPECS};
pub use num::{FLOAT_PRECISION_DEFAULT, FLOAT_PRECISION_MAX, MAX_WIDTH};
pub use registry::{register_type, FormatFn, ResolvedType, TypeRegistry, MAX_CUSTOM_TYPES};
pub use spec::{Align, Count, Flags, ParsedSpec, ResolvedSpec, TypeTag, MAX_TYPE_LEN};
