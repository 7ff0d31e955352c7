use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// when monthly payments are rounded to whole cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundingPolicy {
    /// carry full precision, round only when presenting
    #[default]
    DisplayOnly,
    /// round every installment to the cent, final installment absorbs the residual
    PerPeriod,
}

/// how non-positive principal, zero term and negative apr are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InvalidInputPolicy {
    /// return an error
    #[default]
    Reject,
    /// clamp to a degenerate but well-defined calculation
    Clamp,
}

/// calculator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalculatorConfig {
    #[serde(default)]
    pub rounding: RoundingPolicy,
    #[serde(default)]
    pub invalid_input: InvalidInputPolicy,
}

impl CalculatorConfig {
    /// full precision figures for on-screen estimates, strict inputs
    pub fn display() -> Self {
        Self {
            rounding: RoundingPolicy::DisplayOnly,
            invalid_input: InvalidInputPolicy::Reject,
        }
    }

    /// cent-exact installments matching what a lender would bill
    pub fn ledger() -> Self {
        Self {
            rounding: RoundingPolicy::PerPeriod,
            invalid_input: InvalidInputPolicy::Reject,
        }
    }

    /// tolerate half-typed input from a live text field
    pub fn lenient() -> Self {
        Self {
            rounding: RoundingPolicy::DisplayOnly,
            invalid_input: InvalidInputPolicy::Clamp,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
