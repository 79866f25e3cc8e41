//! XML codec for result and configuration documents.
//!
//! Reading is two-staged: the text is first parsed into an
//! [`XmlElement`](crate::XmlElement) tree, which is then mapped onto the
//! document model through the registration API. Writing goes the other way
//! and emits a tree through `quick-xml`'s writer.

mod reader;
mod tree;
mod writer;

use crate::configuration::Configuration;
use crate::error::DocumentError;
use crate::result::CheckerResults;
use crate::settings::WriterSettings;
use miette::Diagnostic;

/// The document structure does not match the expected schema.
///
/// Every variant names the offending element and its path from the root,
/// e.g. `/CheckerResults/CheckerBundle[B]/Checker[C]/Issue[0]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum SchemaError {
    /// A required attribute is absent.
    #[error("`{element}` is missing required attribute `{attribute}` at {path}")]
    #[diagnostic(code(qc::schema::missing_attribute))]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Path of the element.
        path: String,
    },

    /// A required child element is absent.
    #[error("`{element}` is missing {child} at {path}")]
    #[diagnostic(code(qc::schema::missing_element))]
    MissingElement {
        /// Element name.
        element: String,
        /// Description of the missing child.
        child: String,
        /// Path of the element.
        path: String,
    },

    /// An attribute value is outside its domain.
    #[error("invalid `{attribute}` value `{value}` on `{element}` at {path}: {reason}")]
    #[diagnostic(code(qc::schema::invalid_value))]
    InvalidValue {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
        /// Path of the element.
        path: String,
    },

    /// The root element is not the expected one.
    #[error("unexpected root element `{element}`, expected `{expected}`")]
    #[diagnostic(code(qc::schema::unexpected_root))]
    UnexpectedRoot {
        /// Element name found.
        element: String,
        /// Element name expected.
        expected: String,
        /// Path of the element.
        path: String,
    },
}

impl SchemaError {
    /// Name of the offending element.
    #[must_use]
    pub fn element(&self) -> &str {
        match self {
            Self::MissingAttribute { element, .. }
            | Self::MissingElement { element, .. }
            | Self::InvalidValue { element, .. }
            | Self::UnexpectedRoot { element, .. } => element,
        }
    }

    /// Path of the offending element from the document root.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::MissingAttribute { path, .. }
            | Self::MissingElement { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::UnexpectedRoot { path, .. } => path,
        }
    }
}

/// Errors from reading or writing XML documents.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CodecError {
    /// The text is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    #[diagnostic(code(qc::xml::syntax))]
    Syntax {
        /// Byte offset where the parser stopped.
        position: u64,
        /// Parser message.
        message: String,
    },

    /// The XML is well-formed but does not match the document schema.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Schema(#[from] SchemaError),

    /// The XML violates a document invariant (e.g., a duplicated name).
    #[error(transparent)]
    #[diagnostic(transparent)]
    Document(#[from] DocumentError),

    /// Serializing the document failed.
    #[error("failed to write XML: {message}")]
    #[diagnostic(code(qc::xml::write))]
    Write {
        /// Writer message.
        message: String,
    },
}

impl CheckerResults {
    /// Reads a result document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Syntax`] for malformed XML,
    /// [`CodecError::Schema`] for structural violations and
    /// [`CodecError::Document`] for duplicated names or ids.
    pub fn from_xml(xml: &str) -> Result<Self, CodecError> {
        let root = tree::parse(xml)?;
        reader::read_result(&root)
    }

    /// Writes the document as XML text with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if serialization fails.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        self.to_xml_with(&WriterSettings::default())
    }

    /// Writes the document as XML text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if serialization fails.
    pub fn to_xml_with(&self, settings: &WriterSettings) -> Result<String, CodecError> {
        writer::write_result(self, settings)
    }
}

impl Configuration {
    /// Reads a configuration document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Syntax`] for malformed XML,
    /// [`CodecError::Schema`] for structural violations and
    /// [`CodecError::Document`] for duplicated names or ids.
    pub fn from_xml(xml: &str) -> Result<Self, CodecError> {
        let root = tree::parse(xml)?;
        reader::read_configuration(&root)
    }

    /// Writes the document as XML text with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if serialization fails.
    pub fn to_xml(&self) -> Result<String, CodecError> {
        self.to_xml_with(&WriterSettings::default())
    }

    /// Writes the document as XML text.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Write`] if serialization fails.
    pub fn to_xml_with(&self, settings: &WriterSettings) -> Result<String, CodecError> {
        writer::write_configuration(self, settings)
    }
}
