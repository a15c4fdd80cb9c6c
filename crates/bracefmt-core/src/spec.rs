//! Specifier records shared by the parser, driver, and formatters.

use crate::args::ArgValue;

/// Maximum length of a specifier type tag, in bytes.
pub const MAX_TYPE_LEN: usize = 16;

/// Formatting flags parsed from a specifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `#`: alternate form (base prefix for integers, suppressed trailing
    /// fraction for floats).
    pub alt: bool,
    /// `!`: uppercase form.
    pub upper: bool,
    /// `+`: always print the sign for numeric values.
    pub sign: bool,
    /// space: leave a space in front of positive numeric values.
    pub space: bool,
    /// `0`: pad to width with leading zeros, keeping sign/prefix in front.
    pub zero: bool,
}

/// Field alignment. Defaults to left with space fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A width or precision operand as written in the template: absent, a
/// decimal literal, or a reference to an argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Count {
    #[default]
    Unset,
    Literal(usize),
    FromArg(usize),
}

/// A specifier type tag, stored inline and clamped to [`MAX_TYPE_LEN`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeTag {
    bytes: [u8; MAX_TYPE_LEN],
    len: u8,
    truncated: bool,
}

impl TypeTag {
    /// Store a tag, keeping at most [`MAX_TYPE_LEN`] bytes. Overlong tags
    /// are marked truncated and never resolve.
    #[must_use]
    pub fn from_bytes(src: &[u8]) -> Self {
        let mut bytes = [0u8; MAX_TYPE_LEN];
        let len = src.len().min(MAX_TYPE_LEN);
        bytes[..len].copy_from_slice(&src[..len]);
        Self {
            bytes,
            len: len as u8,
            truncated: src.len() > MAX_TYPE_LEN,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the tag in the template exceeded [`MAX_TYPE_LEN`].
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// One parsed specifier, before type resolution and argument loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSpec {
    /// Index of the value argument.
    pub value_index: usize,
    pub width: Count,
    pub precision: Count,
    pub flags: Flags,
    pub align: Align,
    /// Padding byte used by the external alignment pass.
    pub fill: u8,
    pub tag: TypeTag,
    /// Byte offset just past the closing delimiter in the template.
    pub end_offset: usize,
    /// Whether parsing succeeded. Invalid specifiers emit nothing.
    pub valid: bool,
}

impl Default for ParsedSpec {
    fn default() -> Self {
        Self {
            value_index: 0,
            width: Count::Unset,
            precision: Count::Unset,
            flags: Flags::default(),
            align: Align::default(),
            fill: b' ',
            tag: TypeTag::default(),
            end_offset: 0,
            valid: false,
        }
    }
}

/// A specifier joined with its concrete width, precision, and value slot.
/// This is what formatter functions receive.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSpec<'a> {
    pub flags: Flags,
    pub align: Align,
    pub fill: u8,
    /// Resolved width, clamped to `0..=MAX_WIDTH`.
    pub width: i32,
    /// Resolved precision, clamped; `None` means unset.
    pub precision: Option<i32>,
    pub tag: TypeTag,
    pub value: ArgValue<'a>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_spec_defaults() {
        let spec = ParsedSpec::default();
        assert_eq!(spec.fill, b' ');
        assert_eq!(spec.align, Align::Left);
        assert_eq!(spec.width, Count::Unset);
        assert_eq!(spec.precision, Count::Unset);
        assert!(!spec.valid);
    }

    #[test]
    fn test_type_tag_clamps_and_marks_truncation() {
        let tag = TypeTag::from_bytes(b"d");
        assert_eq!(tag.as_bytes(), b"d");
        assert!(!tag.is_truncated());

        let long = TypeTag::from_bytes(b"averylongtypetagname");
        assert_eq!(long.as_bytes(), b"averylongtypetag");
        assert!(long.is_truncated());
    }

    #[test]
    fn test_empty_tag() {
        let tag = TypeTag::from_bytes(b"");
        assert!(tag.is_empty());
        assert!(!tag.is_truncated());
    }
}
