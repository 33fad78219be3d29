use thiserror::Error;

use crate::model::{Pass, SecurityId, SourceId, TaxTableId};

/// The kind of object an id refers to, for registry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Frequency,
    Entity,
    Job,
    Account,
    Security,
    TaxTable,
    Source,
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            IdKind::Frequency => "frequency",
            IdKind::Entity => "entity",
            IdKind::Job => "job",
            IdKind::Account => "account",
            IdKind::Security => "security",
            IdKind::TaxTable => "tax table",
            IdKind::Source => "source",
        };
        f.write_str(name)
    }
}

/// Errors raised while resolving a scenario's string ids into linked objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("duplicate {kind} id {id:?}")]
    DuplicateId { kind: IdKind, id: String },

    #[error("{kind} {id:?} not found")]
    NotFound { kind: IdKind, id: String },

    #[error("invalid frequency {id:?}: {reason}")]
    InvalidFrequency { id: String, reason: String },

    #[error("source {source_id:?} cannot use frequency {frequency:?}: {reason}")]
    UnsupportedFrequency {
        source_id: SourceId,
        frequency: String,
        reason: &'static str,
    },

    #[error(
        "source {source_id:?} in pass {source_pass} reads {dependency:?} from pass {dependency_pass}; \
         dependencies must come from an earlier pass"
    )]
    PassOrder {
        source_id: SourceId,
        dependency: SourceId,
        source_pass: Pass,
        dependency_pass: Pass,
    },

    #[error(transparent)]
    Tax(#[from] TaxError),
}

/// Errors from progressive tax tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxError {
    #[error("tax table {table:?} has no brackets for year {year}")]
    TaxYearNotFound { table: TaxTableId, year: i16 },

    #[error("invalid tax brackets: {reason}")]
    InvalidBrackets { reason: &'static str },
}

/// Errors from share price lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("no price history for security {security:?} at {date}")]
    NoPriceHistory {
        security: SecurityId,
        date: jiff::civil::Date,
    },
}

/// Errors raised by an estimator while generating its instances
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("estimator {estimator:?}: {error}")]
    Tax {
        estimator: SourceId,
        #[source]
        error: TaxError,
    },

    #[error("estimator {estimator:?}: {error}")]
    Pricing {
        estimator: SourceId,
        #[source]
        error: PricingError,
    },
}

/// Top-level error for a projection run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Link(#[from] LinkError),

    #[error(transparent)]
    Estimate(#[from] EstimateError),

    /// An opening holding could not be valued
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// `expected` is `None` once the final pass has run.
    #[error("pass {got} requested while the calendar expects {expected:?}")]
    PassOutOfOrder { expected: Option<Pass>, got: Pass },
}

pub type Result<T, E = ProjectionError> = std::result::Result<T, E>;
