//! Routing keys.
//!
//! A command is registered under a [`RawKey`] (the untyped value written on a
//! descriptor or derived from the command name) and converted once, at
//! registry construction, into the registry's typed key. [`KeyComparer`]
//! decides which typed keys are considered the same route.

use std::{borrow::Cow, fmt, fmt::Debug, hash::Hash};

/// An untyped key value attached to a command before conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawKey {
    /// A textual key, usually a command name.
    Text(String),
    /// A numeric key, usually an opcode.
    Integer(i64),
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawKey::Text(text) => write!(f, "{text:?}"),
            RawKey::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for RawKey {
    fn from(value: &str) -> Self {
        RawKey::Text(value.to_string())
    }
}

impl From<String> for RawKey {
    fn from(value: String) -> Self {
        RawKey::Text(value)
    }
}

macro_rules! impl_raw_key_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for RawKey {
                fn from(value: $t) -> Self {
                    RawKey::Integer(i64::from(value))
                }
            }
        )+
    };
}

impl_raw_key_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// A typed routing key usable in a registry.
///
/// Textual key types may be derived from a command's name when no explicit
/// key is given; other key types require an explicit key on every command.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Opcode { Login = 1, Echo = 2 }
///
/// impl CommandKey for Opcode {
///     fn from_raw(raw: &RawKey) -> Option<Self> {
///         match raw {
///             RawKey::Integer(1) => Some(Opcode::Login),
///             RawKey::Integer(2) => Some(Opcode::Echo),
///             _ => None,
///         }
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a command key",
    label = "missing `CommandKey` implementation",
    note = "Implement `CommandKey` to convert raw command keys into `{Self}`."
)]
pub trait CommandKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// Whether a command name may serve as the key.
    const TEXTUAL: bool = false;

    /// Convert a raw key into this type, or `None` if it does not fit.
    fn from_raw(raw: &RawKey) -> Option<Self>;
}

impl CommandKey for String {
    const TEXTUAL: bool = true;

    fn from_raw(raw: &RawKey) -> Option<Self> {
        match raw {
            RawKey::Text(text) => Some(text.clone()),
            RawKey::Integer(_) => None,
        }
    }
}

macro_rules! impl_integer_key {
    ($($t:ty),+) => {
        $(
            impl CommandKey for $t {
                fn from_raw(raw: &RawKey) -> Option<Self> {
                    match raw {
                        RawKey::Integer(n) => <$t>::try_from(*n).ok(),
                        RawKey::Text(_) => None,
                    }
                }
            }
        )+
    };
}

impl_integer_key!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Equality policy for routing keys.
///
/// Two keys route to the same command iff their canonical forms are equal.
/// Canonicalization must be deterministic.
pub trait KeyComparer<K: CommandKey>: Send + Sync + 'static {
    /// Return the canonical form of `key`.
    fn canonicalize<'a>(&self, key: &'a K) -> Cow<'a, K>;
}

/// The key type's own `Eq`/`Hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalEq;

impl<K: CommandKey> KeyComparer<K> for NaturalEq {
    fn canonicalize<'a>(&self, key: &'a K) -> Cow<'a, K> {
        Cow::Borrowed(key)
    }
}

/// ASCII case-insensitive comparison for textual keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreAsciiCase;

impl KeyComparer<String> for IgnoreAsciiCase {
    fn canonicalize<'a>(&self, key: &'a String) -> Cow<'a, String> {
        if key.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(key.to_ascii_lowercase())
        } else {
            Cow::Borrowed(key)
        }
    }
}
