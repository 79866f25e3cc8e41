//! # qc-baselib-core
//!
//! Data model for quality-checker Configuration and Result documents.
//!
//! This crate provides:
//!
//! - [`CheckerResults`] with a strict registration API and lenient queries
//! - [`Configuration`] with scoped, typed parameters
//! - [`XmlElement`], the generic node used for domain-specific payloads
//! - an XML codec (`from_xml` / `to_xml` on both documents)
//! - [`Settings`] for writer and document defaults
//!
//! ## Example
//!
//! ```
//! use qc_baselib_core::{CheckerResults, Severity};
//!
//! let mut doc = CheckerResults::new();
//! doc.register_checker_bundle("Bundle", "2024-05-31", "Example", "0.0.1", "")?;
//! doc.register_checker("Bundle", "Checker", "Example checker", "")?;
//! let id = doc.register_issue("Bundle", "Checker", "Issue found", Severity::Error, None)?;
//! doc.add_xml_location("Bundle", "Checker", id, "/OpenDRIVE/road", None)?;
//!
//! let xml = doc.to_xml()?;
//! let back = CheckerResults::from_xml(&xml)?;
//! assert_eq!(back.get_issue_count(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod configuration;
mod element;
mod error;
mod location;
mod result;
mod rule;
mod settings;
mod types;

/// XML codec.
pub mod xml;

pub use configuration::{CheckerBundleConfig, CheckerConfig, Configuration, ReportModuleConfig};
pub use element::{DomainSpecificInfo, XmlElement};
pub use error::{DocumentError, EntityKind};
pub use location::{
    FileLocation, InertialLocation, Location, LocationGroup, RoadLocation, XmlLocation,
};
pub use result::{Checker, CheckerBundle, CheckerResults, Issue, DEFAULT_RESULT_VERSION};
pub use rule::{RuleDescription, RuleRegistry, RuleUid};
pub use settings::{ResultSettings, Settings, SettingsError, WriterSettings};
pub use types::{format_float, CheckerStatus, Metadata, Param, ParamList, ParamValue, Severity};
pub use xml::{CodecError, SchemaError};
