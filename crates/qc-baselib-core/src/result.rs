//! Result document model and its registration/query API.
//!
//! All operations take fully qualified scope identifiers (bundle name,
//! checker id, issue id). Registration calls are strict and fail with
//! [`DocumentError`] when a scope is missing or an identifier clashes.
//! Query calls are lenient: a missing scope reads as empty.

use crate::element::DomainSpecificInfo;
use crate::error::{bundle_scope, checker_scope, DocumentError, EntityKind};
use crate::location::{
    FileLocation, InertialLocation, Location, LocationGroup, RoadLocation, XmlLocation,
};
use crate::rule::{RuleDescription, RuleRegistry, RuleUid};
use crate::types::{CheckerStatus, Metadata, ParamList, ParamValue, Severity};
use tracing::debug;

/// Result format version used by [`CheckerResults::new`].
pub const DEFAULT_RESULT_VERSION: &str = "0.0.1";

/// One finding reported by a checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    issue_id: u64,
    description: String,
    level: Severity,
    rule_uid: Option<RuleUid>,
    locations: Vec<LocationGroup>,
    domain_specific_info: Vec<DomainSpecificInfo>,
}

impl Issue {
    fn new(issue_id: u64, description: &str, level: Severity, rule_uid: Option<RuleUid>) -> Self {
        Self {
            issue_id,
            description: description.to_string(),
            level,
            rule_uid,
            locations: Vec::new(),
            domain_specific_info: Vec::new(),
        }
    }

    /// Identifier, unique within the owning checker.
    #[must_use]
    pub fn issue_id(&self) -> u64 {
        self.issue_id
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Severity of the finding.
    #[must_use]
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Rule this issue refers to, if any.
    #[must_use]
    pub fn rule_uid(&self) -> Option<&RuleUid> {
        self.rule_uid.as_ref()
    }

    /// Location groups in insertion order.
    #[must_use]
    pub fn locations(&self) -> &[LocationGroup] {
        &self.locations
    }

    /// Domain-specific blocks in insertion order.
    #[must_use]
    pub fn domain_specific_info(&self) -> &[DomainSpecificInfo] {
        &self.domain_specific_info
    }

    /// Appends into the most recent group with the same description,
    /// or opens a new group when none matches.
    fn add_location(&mut self, location: Location, description: Option<&str>) {
        match self
            .locations
            .iter_mut()
            .rev()
            .find(|g| g.description() == description)
        {
            Some(group) => group.push(location),
            None => self
                .locations
                .push(LocationGroup::new(description.map(str::to_string)).with(location)),
        }
    }
}

/// Execution record of one checker.
#[derive(Debug, Clone, PartialEq)]
pub struct Checker {
    checker_id: String,
    description: String,
    summary: String,
    status: CheckerStatus,
    params: ParamList,
    addressed_rules: Vec<RuleUid>,
    issues: Vec<Issue>,
    metadata: Vec<Metadata>,
}

impl Checker {
    fn new(checker_id: &str, description: &str, summary: &str) -> Self {
        Self {
            checker_id: checker_id.to_string(),
            description: description.to_string(),
            summary: summary.to_string(),
            status: CheckerStatus::default(),
            params: ParamList::new(),
            addressed_rules: Vec::new(),
            issues: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Identifier, unique within the owning bundle.
    #[must_use]
    pub fn checker_id(&self) -> &str {
        &self.checker_id
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Execution summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Execution status.
    #[must_use]
    pub fn status(&self) -> CheckerStatus {
        self.status
    }

    /// Checker-level parameters.
    #[must_use]
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Rules this checker evaluates, in registration order.
    #[must_use]
    pub fn addressed_rules(&self) -> &[RuleUid] {
        &self.addressed_rules
    }

    /// Issues in registration order.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Metadata entries in insertion order.
    #[must_use]
    pub fn metadata(&self) -> &[Metadata] {
        &self.metadata
    }

    /// Looks up an issue by id.
    #[must_use]
    pub fn issue(&self, issue_id: u64) -> Option<&Issue> {
        self.issues.iter().find(|i| i.issue_id == issue_id)
    }

    /// `None` once the highest id in use is `u64::MAX`.
    fn next_issue_id(&self) -> Option<u64> {
        match self.issues.iter().map(|i| i.issue_id).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        }
    }
}

/// A named group of checkers with build metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerBundle {
    name: String,
    build_date: String,
    description: String,
    version: String,
    summary: String,
    params: ParamList,
    checkers: Vec<Checker>,
}

impl CheckerBundle {
    /// Bundle name, unique within the document.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build date as recorded by the bundle.
    #[must_use]
    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Bundle version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Execution summary.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Bundle-level parameters.
    #[must_use]
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Checkers in registration order.
    #[must_use]
    pub fn checkers(&self) -> &[Checker] {
        &self.checkers
    }

    /// Looks up a checker by id.
    #[must_use]
    pub fn checker(&self, checker_id: &str) -> Option<&Checker> {
        self.checkers.iter().find(|c| c.checker_id == checker_id)
    }
}

/// Result document (`CheckerResults`).
#[derive(Debug, Clone)]
pub struct CheckerResults {
    version: String,
    bundles: Vec<CheckerBundle>,
    rules: RuleRegistry,
}

impl Default for CheckerResults {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckerResults {
    /// Creates an empty document with [`DEFAULT_RESULT_VERSION`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_version(DEFAULT_RESULT_VERSION)
    }

    /// Creates an empty document with the given format version.
    #[must_use]
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            bundles: Vec::new(),
            rules: RuleRegistry::default(),
        }
    }

    /// Format version of the document.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replaces the format version.
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    // --- registration ---

    /// Registers a new, empty checker bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateName`] if the name is taken.
    pub fn register_checker_bundle(
        &mut self,
        name: &str,
        build_date: &str,
        description: &str,
        version: &str,
        summary: &str,
    ) -> Result<(), DocumentError> {
        if self.bundle(name).is_some() {
            return Err(DocumentError::DuplicateName {
                kind: EntityKind::CheckerBundle,
                name: name.to_string(),
            });
        }
        self.bundles.push(CheckerBundle {
            name: name.to_string(),
            build_date: build_date.to_string(),
            description: description.to_string(),
            version: version.to_string(),
            summary: summary.to_string(),
            params: ParamList::new(),
            checkers: Vec::new(),
        });
        debug!(bundle = name, "registered checker bundle");
        Ok(())
    }

    /// Registers a checker (status not-completed) in a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing and
    /// [`DocumentError::DuplicateId`] if the checker id is taken.
    pub fn register_checker(
        &mut self,
        bundle: &str,
        checker_id: &str,
        description: &str,
        summary: &str,
    ) -> Result<(), DocumentError> {
        let target = self.bundle_mut(bundle)?;
        if target.checker(checker_id).is_some() {
            return Err(DocumentError::DuplicateId {
                kind: EntityKind::Checker,
                id: checker_id.to_string(),
                scope: bundle_scope(bundle),
            });
        }
        target
            .checkers
            .push(Checker::new(checker_id, description, summary));
        debug!(bundle, checker = checker_id, "registered checker");
        Ok(())
    }

    /// Records a rule as addressed by a checker and returns its identifier.
    ///
    /// Registering the same rule twice on a checker keeps a single entry.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is
    /// missing and [`DocumentError::InvalidRuleUid`] for malformed parts.
    pub fn register_rule(
        &mut self,
        bundle: &str,
        checker_id: &str,
        emanating_entity: &str,
        standard: &str,
        definition_setting: &str,
        rule_full_name: &str,
    ) -> Result<RuleUid, DocumentError> {
        self.checker_mut(bundle, checker_id)?;
        let uid = RuleUid::new(emanating_entity, standard, definition_setting, rule_full_name)?;
        self.register_rule_uid(bundle, checker_id, &uid)?;
        Ok(uid)
    }

    /// Records an already composed rule identifier as addressed by a checker.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn register_rule_uid(
        &mut self,
        bundle: &str,
        checker_id: &str,
        uid: &RuleUid,
    ) -> Result<(), DocumentError> {
        let checker = self.checker_mut(bundle, checker_id)?;
        if !checker.addressed_rules.contains(uid) {
            checker.addressed_rules.push(uid.clone());
        }
        self.rules.insert(uid);
        debug!(bundle, checker = checker_id, rule = %uid, "registered rule");
        Ok(())
    }

    /// Registers an issue with the next free id of the checker and returns it.
    ///
    /// The referenced rule does not have to be addressed by the checker.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing
    /// and [`DocumentError::IssueIdExhausted`] if the checker already uses
    /// `u64::MAX`.
    pub fn register_issue(
        &mut self,
        bundle: &str,
        checker_id: &str,
        description: &str,
        level: Severity,
        rule_uid: Option<RuleUid>,
    ) -> Result<u64, DocumentError> {
        let checker = self.checker_mut(bundle, checker_id)?;
        let issue_id = checker
            .next_issue_id()
            .ok_or_else(|| DocumentError::IssueIdExhausted {
                scope: checker_scope(bundle, checker_id),
            })?;
        checker
            .issues
            .push(Issue::new(issue_id, description, level, rule_uid.clone()));
        if let Some(uid) = &rule_uid {
            self.rules.insert(uid);
        }
        debug!(bundle, checker = checker_id, issue_id, %level, "registered issue");
        Ok(issue_id)
    }

    /// Registers an issue with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing
    /// and [`DocumentError::DuplicateId`] if the id is taken.
    pub fn register_issue_with_id(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        description: &str,
        level: Severity,
        rule_uid: Option<RuleUid>,
    ) -> Result<(), DocumentError> {
        let checker = self.checker_mut(bundle, checker_id)?;
        if checker.issue(issue_id).is_some() {
            return Err(DocumentError::DuplicateId {
                kind: EntityKind::Issue,
                id: issue_id.to_string(),
                scope: checker_scope(bundle, checker_id),
            });
        }
        checker
            .issues
            .push(Issue::new(issue_id, description, level, rule_uid.clone()));
        if let Some(uid) = &rule_uid {
            self.rules.insert(uid);
        }
        Ok(())
    }

    /// Adds a location entry to an issue.
    ///
    /// The entry joins the most recent group with the same description;
    /// a new group is opened when no group matches.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle, checker or issue
    /// is missing.
    pub fn add_location(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        location: impl Into<Location>,
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        let issue = self.issue_mut(bundle, checker_id, issue_id)?;
        issue.add_location(location.into(), description);
        Ok(())
    }

    /// Adds a [`FileLocation`] to an issue. See [`Self::add_location`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    #[allow(clippy::too_many_arguments)]
    pub fn add_file_location(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        row: u64,
        column: u64,
        file_type: &str,
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        self.add_location(
            bundle,
            checker_id,
            issue_id,
            FileLocation::new(row, column, file_type),
            description,
        )
    }

    /// Adds an [`InertialLocation`] to an issue. See [`Self::add_location`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    #[allow(clippy::too_many_arguments)]
    pub fn add_inertial_location(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        x: f64,
        y: f64,
        z: f64,
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        self.add_location(
            bundle,
            checker_id,
            issue_id,
            InertialLocation::new(x, y, z),
            description,
        )
    }

    /// Adds a [`RoadLocation`] to an issue. See [`Self::add_location`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    #[allow(clippy::too_many_arguments)]
    pub fn add_road_location(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        road_id: &str,
        s: f64,
        t: f64,
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        self.add_location(
            bundle,
            checker_id,
            issue_id,
            RoadLocation::new(road_id, s, t),
            description,
        )
    }

    /// Adds an [`XmlLocation`] to an issue. See [`Self::add_location`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    pub fn add_xml_location(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        xpath: &str,
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        self.add_location(
            bundle,
            checker_id,
            issue_id,
            XmlLocation::new(xpath),
            description,
        )
    }

    /// Adds several [`XmlLocation`]s to the same group of an issue.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    pub fn add_xml_locations(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        xpaths: &[&str],
        description: Option<&str>,
    ) -> Result<(), DocumentError> {
        let issue = self.issue_mut(bundle, checker_id, issue_id)?;
        for xpath in xpaths {
            issue.add_location(XmlLocation::new(*xpath).into(), description);
        }
        Ok(())
    }

    /// Appends a complete location group to an issue without merging.
    ///
    /// Empty groups are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    pub fn add_location_group(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        group: LocationGroup,
    ) -> Result<(), DocumentError> {
        let issue = self.issue_mut(bundle, checker_id, issue_id)?;
        if !group.is_empty() {
            issue.locations.push(group);
        }
        Ok(())
    }

    /// Opens a new, empty domain-specific block on an issue.
    ///
    /// Elements are appended through the returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if any scope is missing.
    pub fn add_domain_specific_info(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
        name: &str,
    ) -> Result<&mut DomainSpecificInfo, DocumentError> {
        let issue = self.issue_mut(bundle, checker_id, issue_id)?;
        issue.domain_specific_info.push(DomainSpecificInfo::new(name));
        let last = issue.domain_specific_info.len() - 1;
        Ok(&mut issue.domain_specific_info[last])
    }

    /// Sets the execution status of a checker.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn set_checker_status(
        &mut self,
        bundle: &str,
        checker_id: &str,
        status: CheckerStatus,
    ) -> Result<(), DocumentError> {
        self.checker_mut(bundle, checker_id)?.status = status;
        Ok(())
    }

    /// Appends a metadata entry to a checker.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn add_metadata(
        &mut self,
        bundle: &str,
        checker_id: &str,
        key: &str,
        value: &str,
        description: &str,
    ) -> Result<(), DocumentError> {
        self.checker_mut(bundle, checker_id)?
            .metadata
            .push(Metadata::new(key, value, description));
        Ok(())
    }

    /// Sets (or overwrites) a bundle-level parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing.
    pub fn set_checker_bundle_param(
        &mut self,
        bundle: &str,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), DocumentError> {
        self.bundle_mut(bundle)?.params.set(name, value);
        Ok(())
    }

    /// Sets (or overwrites) a checker-level parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn set_checker_param(
        &mut self,
        bundle: &str,
        checker_id: &str,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), DocumentError> {
        self.checker_mut(bundle, checker_id)?.params.set(name, value);
        Ok(())
    }

    /// Appends text to a bundle summary.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing.
    pub fn add_checker_bundle_summary(
        &mut self,
        bundle: &str,
        content: &str,
    ) -> Result<(), DocumentError> {
        append_summary(&mut self.bundle_mut(bundle)?.summary, content);
        Ok(())
    }

    /// Appends text to a checker summary.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn add_checker_summary(
        &mut self,
        bundle: &str,
        checker_id: &str,
        content: &str,
    ) -> Result<(), DocumentError> {
        append_summary(&mut self.checker_mut(bundle, checker_id)?.summary, content);
        Ok(())
    }

    // --- queries ---

    /// Bundle names in document order.
    #[must_use]
    pub fn get_checker_bundle_names(&self) -> Vec<&str> {
        self.bundles.iter().map(|b| b.name.as_str()).collect()
    }

    /// All bundles in document order.
    #[must_use]
    pub fn get_checker_bundle_results(&self) -> &[CheckerBundle] {
        &self.bundles
    }

    /// Looks up a bundle by name.
    #[must_use]
    pub fn get_checker_bundle_result(&self, bundle: &str) -> Option<&CheckerBundle> {
        self.bundle(bundle)
    }

    /// Checker ids of a bundle; empty if the bundle is missing.
    #[must_use]
    pub fn get_checker_ids(&self, bundle: &str) -> Vec<&str> {
        self.get_checker_results(bundle)
            .iter()
            .map(|c| c.checker_id.as_str())
            .collect()
    }

    /// Checkers of a bundle; empty if the bundle is missing.
    #[must_use]
    pub fn get_checker_results(&self, bundle: &str) -> &[Checker] {
        self.bundle(bundle)
            .map(|b| b.checkers.as_slice())
            .unwrap_or_default()
    }

    /// Looks up a checker.
    #[must_use]
    pub fn get_checker_result(&self, bundle: &str, checker_id: &str) -> Option<&Checker> {
        self.bundle(bundle).and_then(|b| b.checker(checker_id))
    }

    /// Issue ids of a checker; empty if the bundle or checker is missing.
    #[must_use]
    pub fn get_issue_ids(&self, bundle: &str, checker_id: &str) -> Vec<u64> {
        self.get_issues(bundle, checker_id)
            .iter()
            .map(Issue::issue_id)
            .collect()
    }

    /// Issues of a checker; empty if the bundle or checker is missing.
    #[must_use]
    pub fn get_issues(&self, bundle: &str, checker_id: &str) -> &[Issue] {
        self.get_checker_result(bundle, checker_id)
            .map(|c| c.issues.as_slice())
            .unwrap_or_default()
    }

    /// Looks up an issue.
    #[must_use]
    pub fn get_issue(&self, bundle: &str, checker_id: &str, issue_id: u64) -> Option<&Issue> {
        self.get_checker_result(bundle, checker_id)
            .and_then(|c| c.issue(issue_id))
    }

    /// Domain-specific blocks of an issue; empty if any scope is missing.
    #[must_use]
    pub fn get_domain_specific_info(
        &self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
    ) -> &[DomainSpecificInfo] {
        self.get_issue(bundle, checker_id, issue_id)
            .map(|i| i.domain_specific_info.as_slice())
            .unwrap_or_default()
    }

    /// Number of issues of a checker.
    #[must_use]
    pub fn get_checker_issue_count(&self, bundle: &str, checker_id: &str) -> usize {
        self.get_issues(bundle, checker_id).len()
    }

    /// Number of issues across all checkers of a bundle.
    #[must_use]
    pub fn get_checker_bundle_issue_count(&self, bundle: &str) -> usize {
        self.get_checker_results(bundle)
            .iter()
            .map(|c| c.issues.len())
            .sum()
    }

    /// Number of issues in the whole document.
    #[must_use]
    pub fn get_issue_count(&self) -> usize {
        self.bundles
            .iter()
            .map(|b| self.get_checker_bundle_issue_count(&b.name))
            .sum()
    }

    /// All issues citing the given rule, in document order.
    #[must_use]
    pub fn get_issues_by_rule_uid(&self, rule_uid: &str) -> Vec<&Issue> {
        self.bundles
            .iter()
            .flat_map(|b| &b.checkers)
            .flat_map(|c| &c.issues)
            .filter(|i| i.rule_uid.as_ref().is_some_and(|u| u.to_string() == rule_uid))
            .collect()
    }

    /// Descriptive metadata of a rule, or `None` if the rule is unknown.
    #[must_use]
    pub fn get_rule_uid_descriptions(&self, rule_uid: &str) -> Option<&RuleDescription> {
        self.rules.get(rule_uid)
    }

    /// The rule registry.
    #[must_use]
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    // --- scope resolution ---

    fn bundle(&self, name: &str) -> Option<&CheckerBundle> {
        self.bundles.iter().find(|b| b.name == name)
    }

    fn bundle_mut(&mut self, name: &str) -> Result<&mut CheckerBundle, DocumentError> {
        self.bundles
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| DocumentError::bundle_not_found(name))
    }

    fn checker_mut(&mut self, bundle: &str, checker_id: &str) -> Result<&mut Checker, DocumentError> {
        self.bundle_mut(bundle)?
            .checkers
            .iter_mut()
            .find(|c| c.checker_id == checker_id)
            .ok_or_else(|| DocumentError::checker_not_found(bundle, checker_id))
    }

    fn issue_mut(
        &mut self,
        bundle: &str,
        checker_id: &str,
        issue_id: u64,
    ) -> Result<&mut Issue, DocumentError> {
        self.checker_mut(bundle, checker_id)?
            .issues
            .iter_mut()
            .find(|i| i.issue_id == issue_id)
            .ok_or_else(|| DocumentError::NotFound {
                kind: EntityKind::Issue,
                name: issue_id.to_string(),
                scope: Some(checker_scope(bundle, checker_id)),
            })
    }
}

fn append_summary(summary: &mut String, content: &str) {
    if !summary.is_empty() && !content.is_empty() {
        summary.push(' ');
    }
    summary.push_str(content);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::XmlElement;

    const BUNDLE: &str = "TestBundle";
    const CHECKER: &str = "TestChecker";

    fn doc_with_checker() -> CheckerResults {
        let mut doc = CheckerResults::new();
        doc.register_checker_bundle(
            BUNDLE,
            "2024-05-31",
            "Example checker bundle",
            "0.0.1",
            "Tested example checkers",
        )
        .unwrap();
        doc.register_checker(BUNDLE, CHECKER, "Test checker", "Executed evaluation")
            .unwrap();
        doc
    }

    fn doc_with_issue() -> (CheckerResults, u64) {
        let mut doc = doc_with_checker();
        let id = doc
            .register_issue(BUNDLE, CHECKER, "Issue found at odr", Severity::Information, None)
            .unwrap();
        (doc, id)
    }

    // --- Uniqueness ---

    #[test]
    fn duplicate_bundle_name_rejected_without_change() {
        let mut doc = doc_with_checker();
        let err = doc
            .register_checker_bundle(BUNDLE, "other", "other", "9.9.9", "other")
            .unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateName { .. }));
        assert_eq!(doc.get_checker_bundle_names(), vec![BUNDLE]);
        let bundle = doc.get_checker_bundle_result(BUNDLE).unwrap();
        assert_eq!(bundle.version(), "0.0.1");
        assert_eq!(bundle.checkers().len(), 1);
    }

    #[test]
    fn duplicate_checker_id_rejected_without_change() {
        let mut doc = doc_with_checker();
        let err = doc
            .register_checker(BUNDLE, CHECKER, "again", "again")
            .unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { kind: EntityKind::Checker, .. }));
        let checkers = doc.get_checker_results(BUNDLE);
        assert_eq!(checkers.len(), 1);
        assert_eq!(checkers[0].description(), "Test checker");
    }

    #[test]
    fn same_checker_id_allowed_in_other_bundle() {
        let mut doc = doc_with_checker();
        doc.register_checker_bundle("Other", "", "", "", "").unwrap();
        doc.register_checker("Other", CHECKER, "", "").unwrap();
        assert_eq!(doc.get_checker_ids("Other"), vec![CHECKER]);
    }

    #[test]
    fn register_checker_defaults_to_not_completed() {
        let doc = doc_with_checker();
        let checker = doc.get_checker_result(BUNDLE, CHECKER).unwrap();
        assert_eq!(checker.status(), CheckerStatus::NotCompleted);
    }

    // --- Strict mutation ---

    #[test]
    fn register_checker_on_missing_bundle_fails() {
        let mut doc = CheckerResults::new();
        let err = doc.register_checker("Nope", CHECKER, "", "").unwrap_err();
        assert_eq!(err, DocumentError::bundle_not_found("Nope"));
    }

    #[test]
    fn register_issue_on_missing_checker_fails() {
        let mut doc = doc_with_checker();
        let err = doc
            .register_issue(BUNDLE, "Nope", "d", Severity::Error, None)
            .unwrap_err();
        assert_eq!(err, DocumentError::checker_not_found(BUNDLE, "Nope"));
    }

    #[test]
    fn add_location_on_missing_issue_fails() {
        let (mut doc, id) = doc_with_issue();
        let err = doc
            .add_file_location(BUNDLE, CHECKER, id + 1, 1, 0, "odr", None)
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { kind: EntityKind::Issue, .. }));
    }

    #[test]
    fn set_status_on_missing_checker_fails() {
        let mut doc = doc_with_checker();
        assert!(doc
            .set_checker_status(BUNDLE, "Nope", CheckerStatus::Completed)
            .is_err());
        doc.set_checker_status(BUNDLE, CHECKER, CheckerStatus::Skipped)
            .unwrap();
        assert_eq!(
            doc.get_checker_result(BUNDLE, CHECKER).unwrap().status(),
            CheckerStatus::Skipped
        );
    }

    // --- Rules ---

    #[test]
    fn register_rule_is_idempotent() {
        let mut doc = doc_with_checker();
        let first = doc
            .register_rule(BUNDLE, CHECKER, "test.com", "qc", "1.0.0", "qwerty.qwerty")
            .unwrap();
        let second = doc
            .register_rule(BUNDLE, CHECKER, "test.com", "qc", "1.0.0", "qwerty.qwerty")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "test.com:qc:1.0.0:qwerty.qwerty");
        let checker = doc.get_checker_result(BUNDLE, CHECKER).unwrap();
        assert_eq!(checker.addressed_rules().len(), 1);
        assert_eq!(doc.rules().len(), 1);
    }

    #[test]
    fn register_rule_on_missing_checker_fails_before_validation() {
        let mut doc = doc_with_checker();
        let err = doc
            .register_rule(BUNDLE, "Nope", "", "qc", "1.0.0", "a.b")
            .unwrap_err();
        assert!(matches!(err, DocumentError::NotFound { .. }));
        assert!(doc.rules().is_empty());
    }

    #[test]
    fn register_rule_rejects_empty_part() {
        let mut doc = doc_with_checker();
        let err = doc
            .register_rule(BUNDLE, CHECKER, "test.com", "", "1.0.0", "a.b")
            .unwrap_err();
        assert!(matches!(err, DocumentError::InvalidRuleUid { .. }));
    }

    #[test]
    fn issue_with_unaddressed_rule_succeeds() {
        let mut doc = doc_with_checker();
        let uid = RuleUid::parse("test.com:qc:1.0.0:qwerty.qwerty").unwrap();
        let id = doc
            .register_issue(BUNDLE, CHECKER, "d", Severity::Warning, Some(uid.clone()))
            .unwrap();
        let issue = doc.get_issue(BUNDLE, CHECKER, id).unwrap();
        assert_eq!(issue.rule_uid(), Some(&uid));
        assert!(doc
            .get_checker_result(BUNDLE, CHECKER)
            .unwrap()
            .addressed_rules()
            .is_empty());
        assert!(doc
            .get_rule_uid_descriptions("test.com:qc:1.0.0:qwerty.qwerty")
            .is_some());
    }

    #[test]
    fn unknown_rule_description_is_none() {
        let doc = doc_with_checker();
        assert!(doc.get_rule_uid_descriptions("a.b:c:1.0:d").is_none());
    }

    #[test]
    fn issues_by_rule_uid_spans_checkers() {
        let mut doc = doc_with_checker();
        doc.register_checker(BUNDLE, "Second", "", "").unwrap();
        let uid = doc
            .register_rule(BUNDLE, CHECKER, "test.com", "qc", "1.0.0", "a.b")
            .unwrap();
        doc.register_issue(BUNDLE, CHECKER, "one", Severity::Error, Some(uid.clone()))
            .unwrap();
        doc.register_issue(BUNDLE, "Second", "two", Severity::Error, Some(uid))
            .unwrap();
        doc.register_issue(BUNDLE, "Second", "three", Severity::Error, None)
            .unwrap();

        let found = doc.get_issues_by_rule_uid("test.com:qc:1.0.0:a.b");
        let descriptions: Vec<&str> = found.iter().map(|i| i.description()).collect();
        assert_eq!(descriptions, vec!["one", "two"]);
    }

    // --- Issues ---

    #[test]
    fn issue_ids_are_sequential_per_checker() {
        let mut doc = doc_with_checker();
        doc.register_checker(BUNDLE, "Second", "", "").unwrap();
        let a = doc
            .register_issue(BUNDLE, CHECKER, "a", Severity::Error, None)
            .unwrap();
        let b = doc
            .register_issue(BUNDLE, CHECKER, "b", Severity::Error, None)
            .unwrap();
        let c = doc
            .register_issue(BUNDLE, "Second", "c", Severity::Error, None)
            .unwrap();
        assert_eq!((a, b, c), (0, 1, 0));
        assert_eq!(doc.get_issue_ids(BUNDLE, CHECKER), vec![0, 1]);
    }

    #[test]
    fn explicit_issue_id_continues_sequence() {
        let mut doc = doc_with_checker();
        doc.register_issue_with_id(BUNDLE, CHECKER, 7, "x", Severity::Warning, None)
            .unwrap();
        let next = doc
            .register_issue(BUNDLE, CHECKER, "y", Severity::Warning, None)
            .unwrap();
        assert_eq!(next, 8);
        let err = doc
            .register_issue_with_id(BUNDLE, CHECKER, 7, "z", Severity::Warning, None)
            .unwrap_err();
        assert!(matches!(err, DocumentError::DuplicateId { kind: EntityKind::Issue, .. }));
    }

    #[test]
    fn exhausted_issue_ids_are_rejected() {
        let mut doc = doc_with_checker();
        doc.register_issue_with_id(BUNDLE, CHECKER, u64::MAX, "x", Severity::Error, None)
            .unwrap();
        let err = doc
            .register_issue(BUNDLE, CHECKER, "y", Severity::Error, None)
            .unwrap_err();
        assert!(matches!(err, DocumentError::IssueIdExhausted { .. }));
        assert_eq!(doc.get_issue_ids(BUNDLE, CHECKER), vec![u64::MAX]);
    }

    #[test]
    fn issue_counts() {
        let mut doc = doc_with_checker();
        doc.register_checker(BUNDLE, "Second", "", "").unwrap();
        doc.register_issue(BUNDLE, CHECKER, "a", Severity::Error, None)
            .unwrap();
        doc.register_issue(BUNDLE, "Second", "b", Severity::Error, None)
            .unwrap();
        assert_eq!(doc.get_checker_issue_count(BUNDLE, CHECKER), 1);
        assert_eq!(doc.get_checker_bundle_issue_count(BUNDLE), 2);
        assert_eq!(doc.get_issue_count(), 2);
        assert_eq!(doc.get_checker_bundle_issue_count("Nope"), 0);
    }

    // --- Lenient queries ---

    #[test]
    fn queries_on_missing_scope_are_empty() {
        let doc = doc_with_checker();
        assert!(doc.get_issues("NoSuchBundle", "NoSuchChecker").is_empty());
        assert!(doc.get_issues(BUNDLE, "NoSuchChecker").is_empty());
        assert!(doc.get_checker_results("NoSuchBundle").is_empty());
        assert!(doc.get_checker_ids("NoSuchBundle").is_empty());
        assert!(doc.get_issue_ids("NoSuchBundle", CHECKER).is_empty());
        assert!(doc.get_domain_specific_info(BUNDLE, CHECKER, 0).is_empty());
        assert!(doc.get_checker_result("NoSuchBundle", CHECKER).is_none());
    }

    // --- Locations ---

    #[test]
    fn locations_join_most_recent_matching_group() {
        let (mut doc, id) = doc_with_issue();
        doc.add_file_location(BUNDLE, CHECKER, id, 1, 0, "odr", Some("first"))
            .unwrap();
        doc.add_xml_location(BUNDLE, CHECKER, id, "/a", Some("second"))
            .unwrap();
        doc.add_inertial_location(BUNDLE, CHECKER, id, 1.0, 2.0, 3.0, Some("first"))
            .unwrap();

        let issue = doc.get_issue(BUNDLE, CHECKER, id).unwrap();
        assert_eq!(issue.locations().len(), 2);
        assert_eq!(issue.locations()[0].description(), Some("first"));
        assert_eq!(issue.locations()[0].locations().len(), 2);
        assert!(matches!(
            issue.locations()[0].locations()[1],
            Location::Inertial(_)
        ));
        assert_eq!(issue.locations()[1].locations().len(), 1);
    }

    #[test]
    fn undescribed_locations_share_a_group() {
        let (mut doc, id) = doc_with_issue();
        doc.add_road_location(BUNDLE, CHECKER, id, "1", 10.0, 0.5, None)
            .unwrap();
        doc.add_road_location(BUNDLE, CHECKER, id, "2", 20.0, -0.5, None)
            .unwrap();
        let issue = doc.get_issue(BUNDLE, CHECKER, id).unwrap();
        assert_eq!(issue.locations().len(), 1);
        assert_eq!(issue.locations()[0].description(), None);
        assert_eq!(issue.locations()[0].locations().len(), 2);
    }

    #[test]
    fn xml_locations_land_in_one_group() {
        let (mut doc, id) = doc_with_issue();
        doc.add_xml_locations(
            BUNDLE,
            CHECKER,
            id,
            &["/foo/test/path", "/bar/test/path"],
            Some("Location for issue with list"),
        )
        .unwrap();
        let issue = doc.get_issue(BUNDLE, CHECKER, id).unwrap();
        assert_eq!(issue.locations().len(), 1);
        assert_eq!(issue.locations()[0].locations().len(), 2);
    }

    #[test]
    fn location_group_is_appended_verbatim() {
        let (mut doc, id) = doc_with_issue();
        doc.add_xml_location(BUNDLE, CHECKER, id, "/a", Some("same"))
            .unwrap();
        doc.add_location_group(
            BUNDLE,
            CHECKER,
            id,
            LocationGroup::new(Some("same".to_string())).with(XmlLocation::new("/b")),
        )
        .unwrap();
        doc.add_location_group(BUNDLE, CHECKER, id, LocationGroup::new(None))
            .unwrap();
        let issue = doc.get_issue(BUNDLE, CHECKER, id).unwrap();
        assert_eq!(issue.locations().len(), 2);
    }

    // --- Domain specific info ---

    #[test]
    fn domain_specific_info_handle_appends_elements() {
        let (mut doc, id) = doc_with_issue();
        let info = doc
            .add_domain_specific_info(BUNDLE, CHECKER, id, "RoadGeometry")
            .unwrap();
        info.push(XmlElement::new("RoadGeometry").with_attribute("id", "1"));

        let blocks = doc.get_domain_specific_info(BUNDLE, CHECKER, id);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name(), "RoadGeometry");
        assert_eq!(blocks[0].elements()[0].attribute("id"), Some("1"));
    }

    // --- Checker details ---

    #[test]
    fn metadata_params_and_summaries() {
        let mut doc = doc_with_checker();
        doc.add_metadata(BUNDLE, CHECKER, "k", "v", "d").unwrap();
        doc.set_checker_param(BUNDLE, CHECKER, "p", 1).unwrap();
        doc.set_checker_param(BUNDLE, CHECKER, "p", 2).unwrap();
        doc.set_checker_bundle_param(BUNDLE, "q", "x").unwrap();
        doc.add_checker_bundle_summary(BUNDLE, "Extra summary for checker bundle.")
            .unwrap();
        doc.add_checker_summary(BUNDLE, CHECKER, "Extra summary for checker.")
            .unwrap();

        let bundle = doc.get_checker_bundle_result(BUNDLE).unwrap();
        assert_eq!(
            bundle.summary(),
            "Tested example checkers Extra summary for checker bundle."
        );
        assert_eq!(bundle.params().get("q"), Some(&ParamValue::from("x")));

        let checker = bundle.checker(CHECKER).unwrap();
        assert_eq!(checker.metadata(), &[Metadata::new("k", "v", "d")]);
        assert_eq!(checker.params().len(), 1);
        assert_eq!(checker.params().get("p"), Some(&ParamValue::Int(2)));
        assert_eq!(
            checker.summary(),
            "Executed evaluation Extra summary for checker."
        );
    }

    #[test]
    fn version_defaults_and_updates() {
        let mut doc = CheckerResults::default();
        assert_eq!(doc.version(), DEFAULT_RESULT_VERSION);
        doc.set_version("1.0.0");
        assert_eq!(doc.version(), "1.0.0");
    }
}
