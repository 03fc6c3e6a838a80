//! Hierarchical cache keys.

use std::fmt;

/// One segment of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Text(String),
    /// An optional parameter that was not supplied.
    Unset,
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Text(value.to_string())
    }
}

impl From<Option<&str>> for KeyPart {
    fn from(value: Option<&str>) -> Self {
        value.map_or(KeyPart::Unset, KeyPart::from)
    }
}

/// An ordered list of segments, e.g. `["greetings", "detail", "42"]`.
///
/// Keys form a tree: a key is a prefix of every key built from it with
/// [`QueryKey::child`]. Invalidating a prefix invalidates the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<KeyPart>,
}

impl QueryKey {
    pub fn root(name: &str) -> Self {
        Self {
            parts: vec![KeyPart::from(name)],
        }
    }

    /// A new key one level below `self`.
    pub fn child(&self, part: impl Into<KeyPart>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(part.into());
        Self { parts }
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// `true` when `prefix` matches the leading segments of `self` (or all of them).
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.parts.starts_with(&prefix.parts)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match part {
                KeyPart::Text(text) => write!(f, "{text:?}")?,
                KeyPart::Unset => f.write_str("undefined")?,
            }
        }
        f.write_str("]")
    }
}
