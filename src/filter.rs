//! Filter evaluation for configmap listings.
//!
//! A filter set maps a key (`name` or `id`) to a list of regular expressions.
//! A record passes a key when its field matches any of the key's patterns, and
//! passes the set when it passes every key. Keys are case-insensitive.
//!
//! ```ignore
//! let filter = Filter::parse(&filters)?;
//! let kept: Vec<_> = records.iter().filter(|r| filter.passes(&r.name, &r.id)).collect();
//! ```

use std::collections::HashMap;
use std::fmt;

use regex::Regex;

/// Error type for filter parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The key is neither `name` nor `id`.
    UnknownKey(String),
    /// A pattern is not a valid regular expression.
    InvalidPattern { key: String, pattern: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::UnknownKey(key) => write!(f, "invalid filter {:?}", key),
            FilterError::InvalidPattern { key, pattern } => {
                write!(f, "invalid filter {:?}: bad pattern {:?}", key, pattern)
            }
        }
    }
}

impl std::error::Error for FilterError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Id,
}

impl Field {
    fn parse(key: &str) -> Result<Self, FilterError> {
        match key.to_ascii_lowercase().as_str() {
            "name" => Ok(Field::Name),
            "id" => Ok(Field::Id),
            _ => Err(FilterError::UnknownKey(key.to_string())),
        }
    }
}

/// A validated, compiled filter set.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(Field, Vec<Regex>)>,
}

impl Filter {
    /// Validate every key and compile every pattern.
    ///
    /// All keys are checked before any record is evaluated, so an unknown key
    /// is reported even when another key would already reject the record.
    pub fn parse(filters: &HashMap<String, Vec<String>>) -> Result<Self, FilterError> {
        let mut clauses = Vec::with_capacity(filters.len());
        for (key, patterns) in filters {
            let field = Field::parse(key)?;
            let compiled = patterns
                .iter()
                .map(|pattern| {
                    Regex::new(pattern).map_err(|_| FilterError::InvalidPattern {
                        key: key.clone(),
                        pattern: pattern.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            clauses.push((field, compiled));
        }
        Ok(Filter { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Conjunction across keys, disjunction within a key.
    pub fn passes(&self, name: &str, id: &str) -> bool {
        self.clauses.iter().all(|(field, patterns)| {
            let value = match field {
                Field::Name => name,
                Field::Id => id,
            };
            patterns.iter().any(|pattern| pattern.is_match(value))
        })
    }
}

/// Check a single configmap against a raw filter set.
pub fn passes(
    name: &str,
    id: &str,
    filters: &HashMap<String, Vec<String>>,
) -> Result<bool, FilterError> {
    Ok(Filter::parse(filters)?.passes(name, id))
}
