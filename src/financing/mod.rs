pub mod amortization;
pub mod calculator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RoundingPolicy;
use crate::decimal::{Money, Rate};
use crate::types::OptionId;

pub use amortization::{level_payment, AmortizationSchedule, ScheduledPayment};
pub use calculator::FinancingCalculator;

/// cost of financing a purchase with one option, computed on demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingCalculation {
    pub option_id: OptionId,
    pub principal: Money,
    pub apr: Rate,
    pub term_months: u32,
    pub monthly_payment: Money,
    /// equals `monthly_payment` unless installments are rounded per period
    pub final_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub payoff_date: DateTime<Utc>,
    pub calculated_at: DateTime<Utc>,
    pub rounding: RoundingPolicy,
}

impl FinancingCalculation {
    pub fn is_interest_free(&self) -> bool {
        self.total_interest.is_zero()
    }

    /// true for the zero-payment result produced when clamping a non-positive principal
    pub fn is_degenerate(&self) -> bool {
        self.principal.is_zero() && self.total_payment.is_zero()
    }

    /// interest as a share of principal, zero when nothing was borrowed
    pub fn interest_ratio(&self) -> Rate {
        if self.principal.is_zero() {
            return Rate::ZERO;
        }
        Rate::from_decimal(self.total_interest.as_decimal() / self.principal.as_decimal())
    }
}
