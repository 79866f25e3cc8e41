//! Errors raised by the document mutation and lookup API.

use miette::Diagnostic;
use std::fmt;

/// Kind of entity a [`DocumentError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A checker bundle (result or configuration side).
    CheckerBundle,
    /// A checker.
    Checker,
    /// An issue.
    Issue,
    /// A report module configuration.
    ReportModule,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckerBundle => write!(f, "checker bundle"),
            Self::Checker => write!(f, "checker"),
            Self::Issue => write!(f, "issue"),
            Self::ReportModule => write!(f, "report module"),
        }
    }
}

/// Errors from registering, mutating or strictly looking up document entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum DocumentError {
    /// A top-level name is already registered.
    #[error("{kind} `{name}` is already registered")]
    #[diagnostic(
        code(qc::duplicate_name),
        help("names must be unique within a document")
    )]
    DuplicateName {
        /// Kind of the entity.
        kind: EntityKind,
        /// The clashing name.
        name: String,
    },

    /// An identifier is already registered within its parent scope.
    #[error("{kind} `{id}` is already registered in {scope}")]
    #[diagnostic(code(qc::duplicate_id))]
    DuplicateId {
        /// Kind of the entity.
        kind: EntityKind,
        /// The clashing identifier.
        id: String,
        /// Parent scope (e.g., "checker bundle `Bundle`").
        scope: String,
    },

    /// The checker has no issue id left after its highest one.
    #[error("no issue id left in {scope}")]
    #[diagnostic(
        code(qc::issue_id_exhausted),
        help("register the issue with an explicit free id")
    )]
    IssueIdExhausted {
        /// Checker scope whose ids ran out.
        scope: String,
    },

    /// A required scope does not exist.
    #[error("{kind} `{name}` not found{}", in_scope(.scope.as_deref()))]
    #[diagnostic(code(qc::not_found), help("register the missing scope first"))]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Name or identifier that was looked up.
        name: String,
        /// Parent scope, if any.
        scope: Option<String>,
    },

    /// A parameter is absent in the requested scope.
    #[error("param `{name}` not found in {scope}")]
    #[diagnostic(code(qc::param_not_found))]
    ParamNotFound {
        /// Parameter name.
        name: String,
        /// Scope that was searched.
        scope: String,
    },

    /// A rule identifier is structurally invalid.
    #[error("invalid rule UID `{value}`: {reason}")]
    #[diagnostic(
        code(qc::invalid_rule_uid),
        help("expected `emanating_entity:standard:definition_setting:rule_full_name`")
    )]
    InvalidRuleUid {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

fn in_scope(scope: Option<&str>) -> String {
    scope.map(|s| format!(" in {s}")).unwrap_or_default()
}

impl DocumentError {
    pub(crate) fn bundle_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::CheckerBundle,
            name: name.to_string(),
            scope: None,
        }
    }

    pub(crate) fn checker_not_found(bundle: &str, checker: &str) -> Self {
        Self::NotFound {
            kind: EntityKind::Checker,
            name: checker.to_string(),
            scope: Some(bundle_scope(bundle)),
        }
    }
}

/// Describes a checker bundle scope for error messages.
pub(crate) fn bundle_scope(bundle: &str) -> String {
    format!("checker bundle `{bundle}`")
}

/// Describes a checker scope for error messages.
pub(crate) fn checker_scope(bundle: &str, checker: &str) -> String {
    format!("checker `{checker}` of checker bundle `{bundle}`")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_includes_scope() {
        let err = DocumentError::checker_not_found("Bundle", "Check");
        assert_eq!(
            err.to_string(),
            "checker `Check` not found in checker bundle `Bundle`"
        );
    }

    #[test]
    fn not_found_message_without_scope() {
        let err = DocumentError::bundle_not_found("Bundle");
        assert_eq!(err.to_string(), "checker bundle `Bundle` not found");
    }

    #[test]
    fn diagnostic_codes_are_stable() {
        let err = DocumentError::DuplicateName {
            kind: EntityKind::CheckerBundle,
            name: "B".to_string(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("qc::duplicate_name"));
    }
}
