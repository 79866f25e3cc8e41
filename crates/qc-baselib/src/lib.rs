//! # qc-baselib
//!
//! Read, build and write quality-checker Configuration and Result documents.
//!
//! This is the facade crate: it re-exports the document model from
//! `qc-baselib-core` and adds file loading and atomic file writing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qc_baselib::{CheckerStatus, Severity};
//!
//! let mut result = qc_baselib::Settings::default().result.new_document();
//! result.register_checker_bundle("Bundle", "2024-05-31", "Example bundle", "0.0.1", "")?;
//! result.register_checker("Bundle", "Checker", "Example checker", "")?;
//! result.register_issue("Bundle", "Checker", "Issue found", Severity::Warning, None)?;
//! result.set_checker_status("Bundle", "Checker", CheckerStatus::Completed)?;
//!
//! qc_baselib::write_result("Result.xqar", &result)?;
//! let loaded = qc_baselib::load_result("Result.xqar")?;
//! assert_eq!(loaded.get_issue_count(), 1);
//! # Ok::<(), qc_baselib::Error>(())
//! ```

#![forbid(unsafe_code)]

// Re-export the document model and codec
pub use qc_baselib_core::*;

mod fs;

pub use fs::{
    load_configuration, load_result, write_configuration, write_configuration_with, write_result,
    write_result_with,
};

use std::path::PathBuf;

/// Errors from loading or writing document files.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum Error {
    /// The file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(qc::io))]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file content could not be parsed or serialized.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Codec(#[from] CodecError),

    /// A document operation failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] DocumentError),
}
