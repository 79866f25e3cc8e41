//! Configuration document: which bundles and checkers run, with what params.

use crate::error::{bundle_scope, checker_scope, DocumentError, EntityKind};
use crate::types::{ParamList, ParamValue, Severity};
use tracing::debug;

/// Configuration of a single checker.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    checker_id: String,
    min_level: Severity,
    max_level: Severity,
    params: ParamList,
}

impl CheckerConfig {
    /// Checker identifier.
    #[must_use]
    pub fn checker_id(&self) -> &str {
        &self.checker_id
    }

    /// Least severe level the checker should report.
    #[must_use]
    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    /// Most severe level the checker should report.
    #[must_use]
    pub fn max_level(&self) -> Severity {
        self.max_level
    }

    /// Checker parameters.
    #[must_use]
    pub fn params(&self) -> &ParamList {
        &self.params
    }
}

/// Configuration of a checker bundle, keyed by application name.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerBundleConfig {
    application: String,
    params: ParamList,
    checkers: Vec<CheckerConfig>,
}

impl CheckerBundleConfig {
    /// Application (bundle) name.
    #[must_use]
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Bundle parameters.
    #[must_use]
    pub fn params(&self) -> &ParamList {
        &self.params
    }

    /// Checker configs in registration order.
    #[must_use]
    pub fn checkers(&self) -> &[CheckerConfig] {
        &self.checkers
    }

    /// Looks up a checker config by id.
    #[must_use]
    pub fn checker(&self, checker_id: &str) -> Option<&CheckerConfig> {
        self.checkers.iter().find(|c| c.checker_id == checker_id)
    }
}

/// Configuration of a report module.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportModuleConfig {
    application: String,
    params: ParamList,
}

impl ReportModuleConfig {
    /// Application (report module) name.
    #[must_use]
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Report module parameters.
    #[must_use]
    pub fn params(&self) -> &ParamList {
        &self.params
    }
}

/// Configuration document (`Config`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    params: ParamList,
    bundles: Vec<CheckerBundleConfig>,
    report_modules: Vec<ReportModuleConfig>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the configuration holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.bundles.is_empty() && self.report_modules.is_empty()
    }

    /// Registers an empty checker bundle config.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateName`] if the application is taken.
    pub fn register_checker_bundle(&mut self, application: &str) -> Result<(), DocumentError> {
        if self.get_checker_bundle(application).is_some() {
            return Err(DocumentError::DuplicateName {
                kind: EntityKind::CheckerBundle,
                name: application.to_string(),
            });
        }
        self.bundles.push(CheckerBundleConfig {
            application: application.to_string(),
            params: ParamList::new(),
            checkers: Vec::new(),
        });
        debug!(bundle = application, "registered checker bundle config");
        Ok(())
    }

    /// Registers a checker config in a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing and
    /// [`DocumentError::DuplicateId`] if the checker id is taken.
    pub fn register_checker(
        &mut self,
        application: &str,
        checker_id: &str,
        min_level: Severity,
        max_level: Severity,
    ) -> Result<(), DocumentError> {
        let bundle = self.bundle_mut(application)?;
        if bundle.checker(checker_id).is_some() {
            return Err(DocumentError::DuplicateId {
                kind: EntityKind::Checker,
                id: checker_id.to_string(),
                scope: bundle_scope(application),
            });
        }
        bundle.checkers.push(CheckerConfig {
            checker_id: checker_id.to_string(),
            min_level,
            max_level,
            params: ParamList::new(),
        });
        debug!(bundle = application, checker = checker_id, "registered checker config");
        Ok(())
    }

    /// Registers an empty report module config.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::DuplicateName`] if the application is taken.
    pub fn register_report_module(&mut self, application: &str) -> Result<(), DocumentError> {
        if self.report_module(application).is_some() {
            return Err(DocumentError::DuplicateName {
                kind: EntityKind::ReportModule,
                name: application.to_string(),
            });
        }
        self.report_modules.push(ReportModuleConfig {
            application: application.to_string(),
            params: ParamList::new(),
        });
        debug!(report_module = application, "registered report module config");
        Ok(())
    }

    // --- params ---

    /// Sets (or overwrites) a top-level parameter.
    pub fn set_config_param(&mut self, name: &str, value: impl Into<ParamValue>) {
        self.params.set(name, value);
    }

    /// Sets (or overwrites) a bundle parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing.
    pub fn set_checker_bundle_param(
        &mut self,
        application: &str,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), DocumentError> {
        self.bundle_mut(application)?.params.set(name, value);
        Ok(())
    }

    /// Sets (or overwrites) a checker parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing.
    pub fn set_checker_param(
        &mut self,
        application: &str,
        checker_id: &str,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), DocumentError> {
        self.checker_mut(application, checker_id)?
            .params
            .set(name, value);
        Ok(())
    }

    /// Sets (or overwrites) a report module parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the report module is missing.
    pub fn set_report_module_param(
        &mut self,
        application: &str,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<(), DocumentError> {
        self.report_modules
            .iter_mut()
            .find(|r| r.application == application)
            .ok_or_else(|| report_module_not_found(application))?
            .params
            .set(name, value);
        Ok(())
    }

    /// Reads a top-level parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ParamNotFound`] if the parameter is absent.
    pub fn get_config_param(&self, name: &str) -> Result<&ParamValue, DocumentError> {
        lookup(&self.params, name, || "the configuration".to_string())
    }

    /// Reads a bundle parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle is missing and
    /// [`DocumentError::ParamNotFound`] if the parameter is absent.
    pub fn get_checker_bundle_param(
        &self,
        application: &str,
        name: &str,
    ) -> Result<&ParamValue, DocumentError> {
        let bundle = self
            .get_checker_bundle(application)
            .ok_or_else(|| DocumentError::bundle_not_found(application))?;
        lookup(&bundle.params, name, || bundle_scope(application))
    }

    /// Reads a checker parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the bundle or checker is missing
    /// and [`DocumentError::ParamNotFound`] if the parameter is absent.
    pub fn get_checker_param(
        &self,
        application: &str,
        checker_id: &str,
        name: &str,
    ) -> Result<&ParamValue, DocumentError> {
        let bundle = self
            .get_checker_bundle(application)
            .ok_or_else(|| DocumentError::bundle_not_found(application))?;
        let checker = bundle
            .checker(checker_id)
            .ok_or_else(|| DocumentError::checker_not_found(application, checker_id))?;
        lookup(&checker.params, name, || checker_scope(application, checker_id))
    }

    /// Reads a report module parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] if the report module is missing
    /// and [`DocumentError::ParamNotFound`] if the parameter is absent.
    pub fn get_report_module_param(
        &self,
        application: &str,
        name: &str,
    ) -> Result<&ParamValue, DocumentError> {
        let module = self
            .report_module(application)
            .ok_or_else(|| report_module_not_found(application))?;
        lookup(&module.params, name, || format!("report module `{application}`"))
    }

    // --- queries ---

    /// Top-level parameters in insertion order.
    #[must_use]
    pub fn get_all_config_params(&self) -> &ParamList {
        &self.params
    }

    /// Bundle configs in registration order.
    #[must_use]
    pub fn get_checker_bundles(&self) -> &[CheckerBundleConfig] {
        &self.bundles
    }

    /// Looks up a bundle config.
    #[must_use]
    pub fn get_checker_bundle(&self, application: &str) -> Option<&CheckerBundleConfig> {
        self.bundles.iter().find(|b| b.application == application)
    }

    /// Looks up a checker config.
    #[must_use]
    pub fn get_checker(&self, application: &str, checker_id: &str) -> Option<&CheckerConfig> {
        self.get_checker_bundle(application)
            .and_then(|b| b.checker(checker_id))
    }

    /// Report module configs in registration order.
    #[must_use]
    pub fn get_report_modules(&self) -> &[ReportModuleConfig] {
        &self.report_modules
    }

    fn report_module(&self, application: &str) -> Option<&ReportModuleConfig> {
        self.report_modules
            .iter()
            .find(|r| r.application == application)
    }

    fn bundle_mut(&mut self, application: &str) -> Result<&mut CheckerBundleConfig, DocumentError> {
        self.bundles
            .iter_mut()
            .find(|b| b.application == application)
            .ok_or_else(|| DocumentError::bundle_not_found(application))
    }

    fn checker_mut(
        &mut self,
        application: &str,
        checker_id: &str,
    ) -> Result<&mut CheckerConfig, DocumentError> {
        self.bundle_mut(application)?
            .checkers
            .iter_mut()
            .find(|c| c.checker_id == checker_id)
            .ok_or_else(|| DocumentError::checker_not_found(application, checker_id))
    }
}

fn lookup<'a>(
    params: &'a ParamList,
    name: &str,
    scope: impl FnOnce() -> String,
) -> Result<&'a ParamValue, DocumentError> {
    params.get(name).ok_or_else(|| DocumentError::ParamNotFound {
        name: name.to_string(),
        scope: scope(),
    })
}

fn report_module_not_found(application: &str) -> DocumentError {
    DocumentError::NotFound {
        kind: EntityKind::ReportModule,
        name: application.to_string(),
        scope: None,
    }
}
