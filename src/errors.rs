// Copyright 2025 Cowboy AI, LLC.

//! Error types for registry, template and transaction building operations

use thiserror::Error;

use crate::chain::Address;
use crate::dna::{Dna, Label};

/// Boxed cause produced by template generation functions and setup hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering templates or building transactions
#[derive(Debug, Error)]
pub enum WorkloadError {
    /// A template with the same label is already registered
    #[error("template {label} already registered")]
    TemplateAlreadyRegistered {
        /// Label that was registered twice
        label: Label,
    },

    /// No template is registered under the label
    #[error("template {label} not found")]
    TemplateNotFound {
        /// Label that was looked up
        label: Label,
    },

    /// A DNA element carries the wrong number of parameters
    #[error("cardinality mismatch for template {label}, expected {expected}, got {actual}")]
    CardinalityMismatch {
        /// Label of the offending DNA element
        label: Label,
        /// Cardinality declared by the template
        expected: usize,
        /// Number of parameters in the DNA element
        actual: usize,
    },

    /// A template's generation function or one of its setup hooks failed
    #[error("template {label} generation failed: {source}")]
    GenerationFailed {
        /// Label of the failing template
        label: Label,
        /// Underlying cause
        #[source]
        source: BoxError,
    },

    /// A template could not be distinguished across its parameter range
    #[error("model {label} has no unique intensities")]
    NoUniqueIntensities {
        /// Label of the template
        label: Label,
    },

    /// A parameter was read past the end of the parameter vector
    #[error("parameter index {index} out of range for {len} parameters")]
    ParameterOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the parameter vector
        len: usize,
    },

    /// A parameter asks for a script literal larger than can be allocated
    #[error("script literal of {length} characters is too large")]
    LiteralTooLarge {
        /// Requested length in characters
        length: u64,
    },

    /// Global setup state was read before the setup completed
    #[error("global setup for template {label} has not completed")]
    SetupNotCompleted {
        /// Label of the template
        label: Label,
    },

    /// A setup hook needed chain access but the environment has none
    #[error("build environment has no chain interaction")]
    MissingChainInteraction,

    /// Two fragments import the same contract name from different addresses
    #[error("import {name} resolves to both {first} and {second}")]
    ImportConflict {
        /// Imported contract name
        name: String,
        /// Address seen first
        first: Address,
        /// Conflicting address
        second: Address,
    },

    /// Building a transaction from a DNA sequence failed
    #[error("error generating transaction from DNA {dna}: {source}")]
    PrepareTransactionFromDna {
        /// DNA that was being built
        dna: Dna,
        /// Underlying cause
        #[source]
        source: Box<WorkloadError>,
    },

    /// Chain interaction failed
    #[error("chain interaction error: {0}")]
    ChainInteraction(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not implemented error
    #[error("feature {0} not implemented")]
    NotImplemented(String),
}

/// Result type for workload operations
pub type WorkloadResult<T> = Result<T, WorkloadError>;

impl From<serde_json::Error> for WorkloadError {
    fn from(err: serde_json::Error) -> Self {
        WorkloadError::Serialization(err.to_string())
    }
}

impl WorkloadError {
    /// Wrap a hook or generation failure for the given template
    pub fn generation_failed(label: &Label, source: impl Into<BoxError>) -> Self {
        WorkloadError::GenerationFailed {
            label: label.clone(),
            source: source.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorkloadError::TemplateNotFound { .. })
    }

    /// Check if this is a caller input validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            WorkloadError::TemplateNotFound { .. }
                | WorkloadError::CardinalityMismatch { .. }
                | WorkloadError::ParameterOutOfRange { .. }
                | WorkloadError::LiteralTooLarge { .. }
        )
    }

    /// Label of the template the error refers to, if any
    pub fn label(&self) -> Option<&Label> {
        match self {
            WorkloadError::TemplateAlreadyRegistered { label }
            | WorkloadError::TemplateNotFound { label }
            | WorkloadError::CardinalityMismatch { label, .. }
            | WorkloadError::GenerationFailed { label, .. }
            | WorkloadError::NoUniqueIntensities { label }
            | WorkloadError::SetupNotCompleted { label } => Some(label),
            WorkloadError::PrepareTransactionFromDna { source, .. } => source.label(),
            _ => None,
        }
    }
}
