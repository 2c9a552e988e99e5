use std::{fmt, str::FromStr};

use crate::error::UnknownElementType;

/// Element type tag used to look up an [`ElementHandler`](crate::ElementHandler).
///
/// The set is closed: a schema can only name these four types, so a custom
/// handler always stands in for one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Numeric input (`number`)
    Number,
    /// Single-line text input (`textfield`)
    Textfield,
    /// Boolean input (`checkbox`)
    Checkbox,
    /// Derived sum of other fields (`summation`)
    Summation,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Textfield => "textfield",
            Self::Checkbox => "checkbox",
            Self::Summation => "summation",
        }
    }
}

impl FromStr for ElementType {
    type Err = UnknownElementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "textfield" => Ok(Self::Textfield),
            "checkbox" => Ok(Self::Checkbox),
            "summation" => Ok(Self::Summation),
            other => Err(UnknownElementType(other.to_string())),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
