//! Hierarchical cache keys.

use std::fmt;

/// One segment of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Str(String),
    Int(i64),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{:?}", s),
            Self::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<usize> for KeyPart {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

/// Ordered list of key parts, e.g. `["farmers", 0, 10]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    /// Append a part, builder style.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `prefix` matches the leading parts of this key.
    ///
    /// The empty key prefixes everything.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", part)?;
        }
        f.write_str("]")
    }
}

impl<P: Into<KeyPart>> FromIterator<P> for QueryKey {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Build a [`QueryKey`] from heterogeneous parts.
///
/// ```
/// use farm_monitor::query_key;
/// let key = query_key!["farmers", 0u32, 10u32];
/// assert_eq!(key.to_string(), r#"["farmers",0,10]"#);
/// ```
#[macro_export]
macro_rules! query_key {
    ($($part:expr),* $(,)?) => {
        $crate::query::QueryKey::new(vec![$($crate::query::KeyPart::from($part)),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let page = query_key!["farmers", 0u32, 10u32];
        let single = query_key!["farmers", "abc"];
        let farms = query_key!["farms", "abc", 0u32, 10u32];

        let prefix = query_key!["farmers"];
        assert!(page.starts_with(&prefix));
        assert!(single.starts_with(&prefix));
        assert!(!farms.starts_with(&prefix));
        assert!(farms.starts_with(&query_key!["farms", "abc"]));
        assert!(!farms.starts_with(&query_key!["farms", "xyz"]));
        assert!(farms.starts_with(&QueryKey::default()));
    }

    #[test]
    fn test_string_and_int_parts_differ() {
        assert_ne!(query_key!["events", 1u32], query_key!["events", "1"]);
    }

    #[test]
    fn test_longer_prefix_does_not_match() {
        let key = query_key!["pumps"];
        assert!(!key.starts_with(&query_key!["pumps", "p-1"]));
    }
}
