//! SVG error types

use std::io;
use thiserror::Error;

/// Errors that can occur when parsing, validating or rasterizing SVG markup
#[derive(Error, Debug)]
pub enum SvgError {
    /// IO error when reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Markup is not well-formed XML or not loadable SVG
    #[error("SVG parsing error: {0}")]
    Parse(String),

    /// Unsupported SVG feature
    #[error("Unsupported SVG feature: {0}")]
    Unsupported(String),

    /// An attribute carries a value of the wrong shape
    #[error("Invalid value {value:?} for attribute `{attribute}` on <{element}>")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// The same id is defined more than once in one document
    #[error("Duplicate id `{0}`")]
    DuplicateId(String),

    /// A `url(#..)` or `href="#.."` reference points at no definition
    #[error("Reference to undefined id `{0}`")]
    DanglingReference(String),
}

impl From<roxmltree::Error> for SvgError {
    fn from(e: roxmltree::Error) -> Self {
        SvgError::Parse(e.to_string())
    }
}
