//! Value types shared by result and configuration documents.

use std::fmt;

/// Severity level of an issue.
///
/// Ordered by ordinal, so `Error < Warning < Information`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Defect that must be fixed.
    Error = 1,
    /// Finding that should be addressed.
    Warning = 2,
    /// Informational finding.
    Information = 3,
}

impl Severity {
    /// All severities in ordinal order.
    pub const ALL: [Self; 3] = [Self::Error, Self::Warning, Self::Information];

    /// Returns the integer ordinal used in the exchange format.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Looks up a severity by its integer ordinal.
    #[must_use]
    pub fn from_ordinal(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| i64::from(s.ordinal()) == value)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Information => write!(f, "information"),
        }
    }
}

/// Execution status of a checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckerStatus {
    /// The checker has not reported completion yet.
    #[default]
    NotCompleted,
    /// The checker ran to completion.
    Completed,
    /// The checker was skipped.
    Skipped,
    /// The checker aborted with an error.
    Error,
}

impl CheckerStatus {
    /// Returns the literal used in the exchange format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotCompleted => "not-completed",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    /// Parses the exchange-format literal.
    #[must_use]
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "not-completed" => Some(Self::NotCompleted),
            "completed" => Some(Self::Completed),
            "skipped" => Some(Self::Skipped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for CheckerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of a [`Param`].
///
/// The variant is kept through a write/read cycle, so a float `2.0` is
/// written as `2.0` and read back as a float.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Free-form text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
}

impl ParamValue {
    /// Infers the value type from an attribute literal.
    ///
    /// `true`/`false` become booleans, integer literals become integers,
    /// decimal literals and `inf`/`-inf`/`NaN` become floats, everything
    /// else stays a string.
    #[must_use]
    pub fn parse_literal(literal: &str) -> Self {
        match literal {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            "inf" => return Self::Float(f64::INFINITY),
            "-inf" => return Self::Float(f64::NEG_INFINITY),
            "NaN" => return Self::Float(f64::NAN),
            _ => {}
        }
        if let Ok(value) = literal.parse::<i64>() {
            return Self::Int(value);
        }
        if looks_numeric(literal) {
            if let Ok(value) = literal.parse::<f64>() {
                return Self::Float(value);
            }
        }
        Self::Str(literal.to_string())
    }

    /// Formats the value as an attribute literal.
    #[must_use]
    pub fn to_literal(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format_float(*f),
            Self::Bool(b) => b.to_string(),
        }
    }

    /// Returns the string content, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer content, if this is an integer value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Formats a float in fixed notation with at least one fractional digit.
///
/// Non-finite values are written as `inf`, `-inf` and `NaN`.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn looks_numeric(literal: &str) -> bool {
    literal.bytes().any(|b| b.is_ascii_digit())
        && literal
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name, unique within its scope.
    pub name: String,
    /// Parameter value.
    pub value: ParamValue,
}

impl Param {
    /// Creates a new parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered parameter scope with unique names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, overwriting the value in place if the name exists.
    ///
    /// Returns `true` when an existing value was replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> bool {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.params.iter_mut().find(|p| p.name == name) {
            existing.value = value;
            return true;
        }
        self.params.push(Param { name, value });
        false
    }

    /// Looks up a parameter value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Returns true if a parameter with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates parameters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.params.iter()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true if the scope holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

/// Free-form key/value metadata recorded on a checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Metadata key.
    pub key: String,
    /// Metadata value.
    pub value: String,
    /// Human-readable description.
    pub description: String,
}

impl Metadata {
    /// Creates a new metadata entry.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: description.into(),
        }
    }
}
