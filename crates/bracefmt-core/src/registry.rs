//! Type tag resolution and the process-wide custom formatter registry.
//!
//! Built-in tags resolve through direct matching with no table search; user
//! tags are linearly searched afterwards. The global registry is append-only
//! and expected to be populated during initialization, before formatting
//! begins; each format call reads whatever snapshot is visible at entry.

use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::args::ArgKind;
use crate::buffer::OutBuffer;
use crate::num;
use crate::spec::{ResolvedSpec, TypeTag};
use crate::text;

/// A formatter renders the resolved specifier's value slot into the buffer
/// and returns the number of bytes written.
pub type FormatFn = fn(&mut OutBuffer<'_>, &ResolvedSpec<'_>) -> usize;

/// Fixed capacity of the custom type table. Registration past this is
/// silently dropped.
pub const MAX_CUSTOM_TYPES: usize = 128;

/// The outcome of a tag lookup: the formatter, the argument kind it
/// consumes, and flags the tag itself forces.
#[derive(Clone, Copy)]
pub struct ResolvedType {
    pub formatter: FormatFn,
    pub kind: ArgKind,
    /// Tag forces the uppercase flag (`X`, `F`).
    pub upper: bool,
    /// Tag forces the alternate form (`p`).
    pub alt: bool,
}

impl ResolvedType {
    fn new(formatter: FormatFn, kind: ArgKind) -> Self {
        Self {
            formatter,
            kind,
            upper: false,
            alt: false,
        }
    }
}

impl core::fmt::Debug for ResolvedType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResolvedType")
            .field("kind", &self.kind)
            .field("upper", &self.upper)
            .field("alt", &self.alt)
            .finish()
    }
}

/// Resolve the integral tags: `d u b o x X` with optional `ll`/`z` prefix.
fn resolve_integral(tag: &[u8]) -> Option<ResolvedType> {
    let (signed_kind, unsigned_kind, rest) = if let Some(rest) = tag.strip_prefix(b"ll") {
        (ArgKind::Int64, ArgKind::Uint64, rest)
    } else if let Some(rest) = tag.strip_prefix(b"z") {
        (ArgKind::Size, ArgKind::Size, rest)
    } else {
        (ArgKind::Int32, ArgKind::Uint32, tag)
    };

    if rest.len() != 1 {
        return None;
    }
    match rest[0] {
        b'd' => Some(ResolvedType::new(num::format_signed, signed_kind)),
        b'u' => Some(ResolvedType::new(num::format_unsigned, unsigned_kind)),
        b'b' => Some(ResolvedType::new(num::format_binary, unsigned_kind)),
        b'o' => Some(ResolvedType::new(num::format_octal, unsigned_kind)),
        b'x' => Some(ResolvedType::new(num::format_hex, unsigned_kind)),
        b'X' => Some(ResolvedType {
            upper: true,
            ..ResolvedType::new(num::format_hex, unsigned_kind)
        }),
        _ => None,
    }
}

/// Resolve a tag to its formatter and argument kind.
///
/// Built-ins first (no table search), then the custom registry. Returns
/// `None` for unknown tags; the caller decides how to surface that. The
/// empty tag is the caller's pass-through case and never reaches here.
pub fn resolve(tag: &TypeTag) -> Option<ResolvedType> {
    if tag.is_truncated() {
        return None;
    }
    let bytes = tag.as_bytes();

    if let Some(resolved) = resolve_integral(bytes) {
        return Some(resolved);
    }

    if bytes.len() == 1 {
        match bytes[0] {
            b'f' => return Some(ResolvedType::new(num::format_double, ArgKind::Double)),
            b'F' => {
                return Some(ResolvedType {
                    upper: true,
                    ..ResolvedType::new(num::format_double, ArgKind::Double)
                })
            }
            b's' => return Some(ResolvedType::new(text::format_string, ArgKind::VoidPtr)),
            b'c' => return Some(ResolvedType::new(text::format_char, ArgKind::Int32)),
            b'p' => {
                return Some(ResolvedType {
                    alt: true,
                    ..ResolvedType::new(num::format_hex, ArgKind::VoidPtr)
                })
            }
            _ => {}
        }
    }

    global_registry().resolve(bytes)
}

struct TypeEntry {
    tag: TypeTag,
    formatter: FormatFn,
    kind: ArgKind,
}

/// The custom formatter table. Fixed capacity, linear lookup, first
/// registration of a tag wins.
pub struct TypeRegistry {
    entries: RwLock<Vec<TypeEntry>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::with_capacity(MAX_CUSTOM_TYPES)),
        }
    }

    /// Install a formatter for `tag`. Returns `false` when the registration
    /// is dropped: empty or overlong tag, or table full.
    pub fn register(&self, tag: &[u8], formatter: FormatFn, kind: ArgKind) -> bool {
        if tag.is_empty() || tag.len() > crate::spec::MAX_TYPE_LEN {
            return false;
        }
        let mut entries = self.entries.write();
        if entries.len() >= MAX_CUSTOM_TYPES {
            return false;
        }
        entries.push(TypeEntry {
            tag: TypeTag::from_bytes(tag),
            formatter,
            kind,
        });
        true
    }

    /// Linear search for `tag`.
    #[must_use]
    pub fn resolve(&self, tag: &[u8]) -> Option<ResolvedType> {
        let entries = self.entries.read();
        entries
            .iter()
            .find(|entry| entry.tag.as_bytes() == tag)
            .map(|entry| ResolvedType::new(entry.formatter, entry.kind))
    }

    /// Number of registered custom tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// The process-wide custom type registry.
#[must_use]
pub fn global_registry() -> &'static TypeRegistry {
    REGISTRY.get_or_init(TypeRegistry::new)
}

/// Install a custom formatter in the global registry.
///
/// Intended to be called during initialization, before formatting starts.
/// Returns `false` when the registration is silently dropped.
pub fn register_type(tag: &[u8], formatter: FormatFn, kind: ArgKind) -> bool {
    global_registry().register(tag, formatter, kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_buf: &mut OutBuffer<'_>, _spec: &ResolvedSpec<'_>) -> usize {
        0
    }

    #[test]
    fn test_builtin_integral_tags() {
        let d = resolve(&TypeTag::from_bytes(b"d")).expect("d");
        assert_eq!(d.kind, ArgKind::Int32);
        let lld = resolve(&TypeTag::from_bytes(b"lld")).expect("lld");
        assert_eq!(lld.kind, ArgKind::Int64);
        let zu = resolve(&TypeTag::from_bytes(b"zu")).expect("zu");
        assert_eq!(zu.kind, ArgKind::Size);
        let llx = resolve(&TypeTag::from_bytes(b"llX")).expect("llX");
        assert_eq!(llx.kind, ArgKind::Uint64);
        assert!(llx.upper);
    }

    #[test]
    fn test_builtin_scalar_tags() {
        let f = resolve(&TypeTag::from_bytes(b"f")).expect("f");
        assert_eq!(f.kind, ArgKind::Double);
        assert!(!f.upper);
        let upper_f = resolve(&TypeTag::from_bytes(b"F")).expect("F");
        assert!(upper_f.upper);
        let s = resolve(&TypeTag::from_bytes(b"s")).expect("s");
        assert_eq!(s.kind, ArgKind::VoidPtr);
        let c = resolve(&TypeTag::from_bytes(b"c")).expect("c");
        assert_eq!(c.kind, ArgKind::Int32);
        let p = resolve(&TypeTag::from_bytes(b"p")).expect("p");
        assert_eq!(p.kind, ArgKind::VoidPtr);
        assert!(p.alt);
    }

    #[test]
    fn test_unknown_tags() {
        assert!(resolve(&TypeTag::from_bytes(b"q")).is_none());
        assert!(resolve(&TypeTag::from_bytes(b"dx")).is_none());
        assert!(resolve(&TypeTag::from_bytes(b"llq")).is_none());
        assert!(resolve(&TypeTag::from_bytes(b"this-tag-is-way-too-long")).is_none());
    }

    #[test]
    fn test_local_registry_register_and_resolve() {
        let registry = TypeRegistry::new();
        assert!(registry.register(b"duration", noop, ArgKind::Uint64));
        let resolved = registry.resolve(b"duration").expect("registered");
        assert_eq!(resolved.kind, ArgKind::Uint64);
        assert!(registry.resolve(b"missing").is_none());
    }

    #[test]
    fn test_registration_limits() {
        let registry = TypeRegistry::new();
        assert!(!registry.register(b"", noop, ArgKind::None));
        assert!(!registry.register(b"seventeen-bytes-x", noop, ArgKind::None));

        for i in 0..MAX_CUSTOM_TYPES {
            let tag = format!("t{i}");
            assert!(registry.register(tag.as_bytes(), noop, ArgKind::Int32));
        }
        assert_eq!(registry.len(), MAX_CUSTOM_TYPES);
        // Table full: silently dropped.
        assert!(!registry.register(b"overflow", noop, ArgKind::Int32));
        assert_eq!(registry.len(), MAX_CUSTOM_TYPES);
    }
}
