use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::config::InvalidInputPolicy;
use crate::decimal::Money;
use crate::errors::{FinancingError, Result};
use crate::events::{Event, EventStore};
use crate::financing::FinancingCalculator;
use crate::types::{FinancingOption, FinancingType, OptionId};

pub const PAY_CASH_LABEL: &str = "Pay Cash";

/// what a comparison row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    PayCash,
    Financed {
        option_id: OptionId,
        financing_type: FinancingType,
    },
}

/// one line of the side-by-side cost comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub kind: RowKind,
    pub label: String,
    pub term_months: Option<u32>,
    pub monthly_payment: Option<Money>,
    pub total_payment: Money,
    pub total_interest: Money,
    pub payoff_date: Option<DateTime<Utc>>,
    /// total paid beyond the purchase price
    pub extra_cost: Money,
}

impl ComparisonRow {
    fn pay_cash(principal: Money) -> Self {
        Self {
            kind: RowKind::PayCash,
            label: PAY_CASH_LABEL.to_string(),
            term_months: None,
            monthly_payment: None,
            total_payment: principal,
            total_interest: Money::ZERO,
            payoff_date: None,
            extra_cost: Money::ZERO,
        }
    }

    pub fn is_cash(&self) -> bool {
        self.kind == RowKind::PayCash
    }

    pub fn option_id(&self) -> Option<OptionId> {
        match self.kind {
            RowKind::PayCash => None,
            RowKind::Financed { option_id, .. } => Some(option_id),
        }
    }
}

/// cash row first, then financed options cheapest total first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub principal: Money,
    pub generated_at: DateTime<Utc>,
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn build(
        principal: Money,
        options: &[FinancingOption],
        calculator: &FinancingCalculator,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<Self> {
        if !principal.is_positive() && calculator.config().invalid_input == InvalidInputPolicy::Reject {
            return Err(FinancingError::InvalidPrincipal { amount: principal });
        }
        let principal = principal.max(Money::ZERO);
        let now = time_provider.now();

        let mut financed = Vec::with_capacity(options.len());
        for option in options {
            let calc = calculator.calculate(principal, option, time_provider, events)?;
            financed.push(ComparisonRow {
                kind: RowKind::Financed {
                    option_id: option.id,
                    financing_type: option.financing_type,
                },
                label: option.name.clone(),
                term_months: Some(calc.term_months),
                monthly_payment: Some(calc.monthly_payment),
                total_payment: calc.total_payment,
                total_interest: calc.total_interest,
                payoff_date: Some(calc.payoff_date),
                extra_cost: (calc.total_payment - principal).max(Money::ZERO),
            });
        }

        financed.sort_by(|a, b| {
            a.total_payment
                .cmp(&b.total_payment)
                .then_with(|| a.monthly_payment.cmp(&b.monthly_payment))
                .then_with(|| a.label.cmp(&b.label))
        });

        let mut rows = Vec::with_capacity(financed.len() + 1);
        rows.push(ComparisonRow::pay_cash(principal));
        rows.extend(financed);

        let table = Self {
            principal,
            generated_at: now,
            rows,
        };

        events.emit(Event::ComparisonBuilt {
            principal,
            financed_rows: table.financed_rows().len(),
            cheapest_option: table.cheapest_financed().and_then(|r| r.option_id()),
            timestamp: now,
        });

        Ok(table)
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn cash_row(&self) -> &ComparisonRow {
        &self.rows[0]
    }

    pub fn financed_rows(&self) -> &[ComparisonRow] {
        &self.rows[1..]
    }

    /// rows including the cash row, never zero
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn has_financing(&self) -> bool {
        self.rows.len() > 1
    }

    pub fn cheapest_financed(&self) -> Option<&ComparisonRow> {
        self.financed_rows().first()
    }

    pub fn lowest_monthly(&self) -> Option<&ComparisonRow> {
        self.financed_rows()
            .iter()
            .min_by(|a, b| a.monthly_payment.cmp(&b.monthly_payment))
    }
}
