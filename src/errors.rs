use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::OptionId;

#[derive(Error, Debug)]
pub enum FinancingError {
    #[error("invalid principal: {amount} must be greater than zero")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("invalid term: {term_months} months, term must be at least one month")]
    InvalidTerm {
        term_months: u32,
    },

    #[error("invalid apr: {apr} is negative")]
    InvalidApr {
        apr: Rate,
    },

    #[error("invalid eligibility bounds: minimum {min} exceeds maximum {max}")]
    InvalidEligibility {
        min: Money,
        max: Money,
    },

    #[error("financing option already in catalog: {id}")]
    DuplicateOption {
        id: OptionId,
    },

    #[error("financing option not found: {id}")]
    OptionNotFound {
        id: OptionId,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FinancingError>;
