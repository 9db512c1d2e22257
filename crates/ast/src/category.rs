use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Syntactic role of an AST node.
///
/// The set is closed: every table keyed by category (colors, rows) is an
/// exhaustive `match`, so adding a variant is a compile error until each
/// table covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Module import (`require` and friends)
    Require,
    /// Variable declaration or assignment
    Variable,
    /// Function definition
    Function,
    /// Exported interface / public API surface
    Interface,
    /// Any other statement
    Other,
    /// Source comment
    Comment,
}

impl Category {
    /// All categories in canonical order
    pub const ALL: [Self; 6] = [
        Self::Require,
        Self::Variable,
        Self::Function,
        Self::Interface,
        Self::Other,
        Self::Comment,
    ];

    /// Categories that describe code (everything but comments)
    pub const CODE: [Self; 5] = [
        Self::Require,
        Self::Variable,
        Self::Function,
        Self::Interface,
        Self::Other,
    ];

    /// Label used in JSON and as the scatterplot row name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Require => "require",
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Interface => "interface",
            Self::Other => "other",
            Self::Comment => "comment",
        }
    }

    /// Position in [`Category::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Require => 0,
            Self::Variable => 1,
            Self::Function => 2,
            Self::Interface => 3,
            Self::Other => 4,
            Self::Comment => 5,
        }
    }

    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::Comment)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label is not one of the fixed categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "require" => Ok(Self::Require),
            "variable" => Ok(Self::Variable),
            "function" => Ok(Self::Function),
            "interface" => Ok(Self::Interface),
            "other" => Ok(Self::Other),
            "comment" => Ok(Self::Comment),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}
