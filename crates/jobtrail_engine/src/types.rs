use std::fmt;
use std::time::Duration;

use jobtrail_core::JobKey;
use thiserror::Error;

/// One independently polled part of a job page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    JobId,
    Title,
    Location,
    Company,
    EmploymentDetails,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::JobId => "job id",
            Field::Title => "title",
            Field::Location => "location",
            Field::Company => "company",
            Field::EmploymentDetails => "employment details",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("timed out after {after:?} waiting for the {field} fragment")]
    Timeout { field: Field, after: Duration },
    #[error("extraction of the {field} fragment was cancelled")]
    Cancelled { field: Field },
}

impl ExtractError {
    pub fn field(&self) -> Field {
        match self {
            ExtractError::Timeout { field, .. } | ExtractError::Cancelled { field } => *field,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExtractError::Timeout { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid {name} selector {selector:?}")]
    InvalidSelector { name: &'static str, selector: String },
}

/// Failure reported by a host boundary (persistence, messaging, panel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed: {message}")]
pub struct HostError {
    pub operation: String,
    pub message: String,
}

impl HostError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(JobKey),
    #[error("job {0} is already tracked")]
    DuplicateKey(JobKey),
    #[error("storage host error: {0}")]
    HostIo(#[from] HostError),
}
