//! Collection allow-list
//!
//! A [`CollectionName`] can only be obtained from [`AllowList::validate`],
//! so anything holding one has already passed the boundary check.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::FilterError;

/// Collections accepted when no list is configured
pub const DEFAULT_COLLECTIONS: [&str; 3] = ["clipped", "main", "urls"];

/// A validated, allow-listed collection name
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed set of collection names a registry serves
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            names: DEFAULT_COLLECTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AllowList {
    /// Build an allow-list
    ///
    /// Names are also used as snapshot file stems, so they are limited to
    /// ASCII alphanumerics, `-` and `_`.
    pub fn new<I, S>(names: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(FilterError::InvalidParameters(
                    "collection name cannot be empty".to_string(),
                ));
            }
            if !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(FilterError::InvalidParameters(format!(
                    "collection name {:?} contains unsupported characters",
                    name
                )));
            }
            set.insert(name);
        }

        if set.is_empty() {
            return Err(FilterError::InvalidParameters(
                "allow-list cannot be empty".to_string(),
            ));
        }

        Ok(Self { names: set })
    }

    /// Check a requested name against the list
    pub fn validate(&self, name: &str) -> Result<CollectionName, FilterError> {
        if self.names.contains(name) {
            Ok(CollectionName(name.to_string()))
        } else {
            Err(FilterError::InvalidCollection(name.to_string()))
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Allowed names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list() {
        let list = AllowList::default();
        let names: Vec<&str> = list.names().collect();
        assert_eq!(names, vec!["clipped", "main", "urls"]);
    }

    #[test]
    fn test_validate_accepts_listed_name() {
        let name = AllowList::default().validate("main").unwrap();
        assert_eq!(name.as_str(), "main");
        assert_eq!(name.to_string(), "main");
    }

    #[test]
    fn test_validate_rejects_unknown_name() {
        let result = AllowList::default().validate("bogus");
        assert!(matches!(result, Err(FilterError::InvalidCollection(ref n)) if n == "bogus"));
    }

    #[test]
    fn test_validate_is_exact_match() {
        let list = AllowList::default();
        assert!(list.validate("Main").is_err());
        assert!(list.validate(" main").is_err());
        assert!(list.validate("").is_err());
    }

    #[test]
    fn test_new_trims_and_dedups() {
        let list = AllowList::new(vec![" a ", "b", "a"]).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("a"));
    }

    #[test]
    fn test_new_rejects_path_characters() {
        assert!(AllowList::new(vec!["../etc"]).is_err());
        assert!(AllowList::new(vec!["a/b"]).is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(AllowList::new(Vec::<String>::new()).is_err());
        assert!(AllowList::new(vec!["  "]).is_err());
    }
}
