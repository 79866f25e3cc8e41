//! Rule identity and the rule registry.

use crate::error::DocumentError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Composite rule identifier.
///
/// Rendered as `emanating_entity:standard:definition_setting:rule_full_name`,
/// e.g. `asam.net:xodr:1.7.0:road.geometry.parampoly3.valid_parameters`.
/// Two identifiers with the same four parts name the same rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleUid {
    emanating_entity: String,
    standard: String,
    definition_setting: String,
    rule_full_name: String,
}

impl RuleUid {
    /// Creates a rule identifier from its four parts.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidRuleUid`] if a part is empty or
    /// contains the `:` separator.
    pub fn new(
        emanating_entity: impl Into<String>,
        standard: impl Into<String>,
        definition_setting: impl Into<String>,
        rule_full_name: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let uid = Self {
            emanating_entity: emanating_entity.into(),
            standard: standard.into(),
            definition_setting: definition_setting.into(),
            rule_full_name: rule_full_name.into(),
        };
        for (field, value) in uid.parts() {
            if value.is_empty() {
                return Err(uid.invalid(format!("{field} must not be empty")));
            }
            if value.contains(':') {
                return Err(uid.invalid(format!("{field} must not contain `:`")));
            }
        }
        Ok(uid)
    }

    /// Parses a composite identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::InvalidRuleUid`] unless the string has exactly
    /// four non-empty `:`-separated parts.
    pub fn parse(value: &str) -> Result<Self, DocumentError> {
        let parts: Vec<&str> = value.split(':').collect();
        let &[emanating_entity, standard, definition_setting, rule_full_name] = parts.as_slice()
        else {
            return Err(DocumentError::InvalidRuleUid {
                value: value.to_string(),
                reason: format!("expected 4 parts, found {}", parts.len()),
            });
        };
        Self::new(emanating_entity, standard, definition_setting, rule_full_name)
    }

    /// Organisation that issued the rule (e.g., `asam.net`).
    #[must_use]
    pub fn emanating_entity(&self) -> &str {
        &self.emanating_entity
    }

    /// Standard the rule belongs to (e.g., `xodr`).
    #[must_use]
    pub fn standard(&self) -> &str {
        &self.standard
    }

    /// Version of the standard the rule was defined for (e.g., `1.7.0`).
    #[must_use]
    pub fn definition_setting(&self) -> &str {
        &self.definition_setting
    }

    /// Dotted rule name (e.g., `road.geometry.parampoly3.valid_parameters`).
    #[must_use]
    pub fn rule_full_name(&self) -> &str {
        &self.rule_full_name
    }

    fn parts(&self) -> [(&'static str, &str); 4] {
        [
            ("emanating_entity", &self.emanating_entity),
            ("standard", &self.standard),
            ("definition_setting", &self.definition_setting),
            ("rule_full_name", &self.rule_full_name),
        ]
    }

    fn invalid(&self, reason: String) -> DocumentError {
        DocumentError::InvalidRuleUid {
            value: self.to_string(),
            reason,
        }
    }
}

impl fmt::Display for RuleUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.emanating_entity, self.standard, self.definition_setting, self.rule_full_name
        )
    }
}

impl FromStr for RuleUid {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Descriptive metadata for a registered rule.
///
/// Carries only the identity today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDescription {
    uid: RuleUid,
}

impl RuleDescription {
    /// Returns the rule identifier.
    #[must_use]
    pub fn uid(&self) -> &RuleUid {
        &self.uid
    }
}

/// Registry of rules known to a result document, keyed by composite string.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<String, RuleDescription>,
}

impl RuleRegistry {
    /// Records a rule. Registering the same identifier again is a no-op.
    pub fn insert(&mut self, uid: &RuleUid) {
        self.rules
            .entry(uid.to_string())
            .or_insert_with(|| RuleDescription { uid: uid.clone() });
    }

    /// Looks up a rule by its exact composite string.
    #[must_use]
    pub fn get(&self, rule_uid: &str) -> Option<&RuleDescription> {
        self.rules.get(rule_uid)
    }

    /// Iterates registered rules ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDescription> {
        self.rules.values()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
