//! Dash-flag argument store with typed accessors.
//!
//! Arguments are parsed once into an [`ArgStore`], which is then queried through
//! the string, integer and boolean accessors. Parsing is permissive:
//! - tokens that do not start with `-` are ignored
//! - `--name` is treated the same as `-name`
//! - `-noname` negates `-name` for the boolean accessor only
//!
//! ```
//! use getarg::ArgStore;
//!
//! let args = ArgStore::build(["-verbose", "--port=8080", "-nocolor"]);
//! assert!(args.get_bool("-verbose", false));
//! assert!(!args.get_bool("-color", true));
//! assert_eq!(args.get_int("-port", 80), 8080);
//! assert_eq!(args.get_string("-host", "localhost"), "localhost");
//! ```

pub mod token {
    use serde::Serialize;

    /// One parsed flag token.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct Entry {
        /// Canonical name, always with a single leading dash.
        pub name: String,
        /// Whether the token carried `=`.
        pub explicit: bool,
        /// Everything after the first `=`, or empty when `explicit` is false.
        pub value: String,
    }

    impl Entry {
        /// Whether the value reads as "on" (anything but the literal `0`).
        pub fn is_truthy(&self) -> bool {
            self.value != "0"
        }
    }

    /// Parse a single raw argument.
    ///
    /// Returns `None` for tokens that are not flags.
    pub fn tokenize(arg: &str) -> Option<Entry> {
        let canonical = match arg.strip_prefix('-') {
            Some(rest) if rest.starts_with('-') => rest,
            _ => arg,
        };
        if !canonical.starts_with('-') {
            tracing::trace!(token = arg, "ignoring non-flag argument");
            return None;
        }

        let entry = match canonical.split_once('=') {
            Some((name, value)) => Entry {
                name: name.to_string(),
                explicit: true,
                value: value.to_string(),
            },
            None => Entry {
                name: canonical.to_string(),
                explicit: false,
                value: String::new(),
            },
        };
        Some(entry)
    }

    /// Parse every raw argument, dropping non-flags and keeping input order.
    pub fn tokenize_all<I, S>(tokens: I) -> Vec<Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .filter_map(|arg| tokenize(arg.as_ref()))
            .collect()
    }
}

pub mod store {
    use super::token::{self, Entry};
    use indexmap::IndexMap;
    use serde::Serialize;

    /// Parsed arguments keyed by canonical name.
    ///
    /// Built once from argv and read-only afterwards. Repeated flags keep every
    /// occurrence, but lookups only ever see the first one.
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    #[serde(transparent)]
    pub struct ArgStore {
        entries: IndexMap<String, Vec<Entry>>,
    }

    impl ArgStore {
        /// Build a store from argv without the program name.
        pub fn build<I, S>(tokens: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            let mut entries: IndexMap<String, Vec<Entry>> = IndexMap::new();
            let mut count = 0usize;
            for entry in token::tokenize_all(tokens) {
                count += 1;
                entries.entry(entry.name.clone()).or_default().push(entry);
            }
            tracing::debug!(entries = count, names = entries.len(), "built argument store");
            Self { entries }
        }

        /// Build a store from the current process arguments.
        pub fn from_env() -> Self {
            Self::build(std::env::args().skip(1))
        }

        /// Replace the whole store with a fresh parse of `tokens`.
        pub fn rebuild<I, S>(&mut self, tokens: I)
        where
            I: IntoIterator<Item = S>,
            S: AsRef<str>,
        {
            *self = Self::build(tokens);
        }

        /// First occurrence of `name`.
        pub fn lookup(&self, name: &str) -> Option<&Entry> {
            self.entries.get(name).and_then(|v| v.first())
        }

        pub fn contains(&self, name: &str) -> bool {
            self.entries.contains_key(name)
        }

        /// Number of distinct names.
        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        /// Canonical names in order of first appearance.
        pub fn names(&self) -> impl Iterator<Item = &str> {
            self.entries.keys().map(|s| s.as_str())
        }

        /// Every occurrence grouped by name, in order of first appearance.
        pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
            self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
        }
    }
}

pub mod access {
    use super::store::ArgStore;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum AccessError {
        InvalidInt { name: String, value: String },
    }

    impl AccessError {
        pub fn name(&self) -> &str {
            match self {
                Self::InvalidInt { name, .. } => name.as_str(),
            }
        }
    }

    impl fmt::Display for AccessError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::InvalidInt { name, value } => {
                    write!(f, "invalid integer for {name}: '{value}'")
                }
            }
        }
    }

    impl std::error::Error for AccessError {}

    /// Name consulted by [`ArgStore::get_bool`] when `name` itself is absent.
    ///
    /// `-via` becomes `-novia`.
    pub fn negated_name(name: &str) -> String {
        let bare = name.strip_prefix('-').unwrap_or(name);
        format!("-no{bare}")
    }

    impl ArgStore {
        /// String value of `name`, or `default` when absent.
        ///
        /// A flag given without `=` yields the empty string, not `default`.
        pub fn get_string(&self, name: &str, default: &str) -> String {
            match self.lookup(name) {
                Some(entry) => entry.value.clone(),
                None => default.to_string(),
            }
        }

        /// Integer value of `name`, or `default` when absent.
        ///
        /// A present flag whose value is not a base-10 integer yields `0`.
        pub fn get_int(&self, name: &str, default: i64) -> i64 {
            match self.lookup(name) {
                Some(entry) => entry.value.parse().unwrap_or(0),
                None => default,
            }
        }

        /// Boolean value of `name`.
        ///
        /// `name` wins over its `-no` form regardless of argument order. Either
        /// form counts as set unless its value is exactly `0`.
        pub fn get_bool(&self, name: &str, default: bool) -> bool {
            if let Some(entry) = self.lookup(name) {
                return entry.is_truthy();
            }
            match self.lookup(&negated_name(name)) {
                Some(entry) => !entry.is_truthy(),
                None => default,
            }
        }

        /// Strict integer lookup for callers that reject malformed input.
        ///
        /// `Ok(None)` when absent.
        pub fn try_int(&self, name: &str) -> Result<Option<i64>, AccessError> {
            let Some(entry) = self.lookup(name) else {
                return Ok(None);
            };
            entry
                .value
                .parse()
                .map(Some)
                .map_err(|_| AccessError::InvalidInt {
                    name: name.to_string(),
                    value: entry.value.clone(),
                })
        }
    }

    pub fn get_string(store: &ArgStore, name: &str, default: &str) -> String {
        store.get_string(name, default)
    }

    pub fn get_int(store: &ArgStore, name: &str, default: i64) -> i64 {
        store.get_int(name, default)
    }

    pub fn get_bool(store: &ArgStore, name: &str, default: bool) -> bool {
        store.get_bool(name, default)
    }
}

pub use access::{AccessError, get_bool, get_int, get_string, negated_name};
pub use store::ArgStore;
pub use token::{Entry, tokenize};
