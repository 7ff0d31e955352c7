use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::comparison::{ComparisonRow, ComparisonTable};
use crate::decimal::Money;
use crate::financing::FinancingCalculation;
use crate::types::{FinancingOption, OptionId};

/// cent-rounded view of a single calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationView {
    pub option_id: OptionId,
    pub option_name: String,
    pub financing_type: String,
    pub icon: String,
    pub apr: String,
    pub term_months: u32,
    pub principal: Money,
    pub monthly_payment: Money,
    pub final_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub monthly_payment_display: String,
    pub total_payment_display: String,
    pub total_interest_display: String,
    pub payoff_date: NaiveDate,
}

impl CalculationView {
    pub fn new(option: &FinancingOption, calc: &FinancingCalculation) -> Self {
        Self {
            option_id: option.id,
            option_name: option.name.clone(),
            financing_type: option.financing_type.label().to_string(),
            icon: option.financing_type.icon().to_string(),
            apr: calc.apr.to_string(),
            term_months: calc.term_months,
            principal: calc.principal.round_cents(),
            monthly_payment: calc.monthly_payment.round_cents(),
            final_payment: calc.final_payment.round_cents(),
            total_payment: calc.total_payment.round_cents(),
            total_interest: calc.total_interest.round_cents(),
            monthly_payment_display: calc.monthly_payment.display_currency(),
            total_payment_display: calc.total_payment.display_currency(),
            total_interest_display: calc.total_interest.display_currency(),
            payoff_date: calc.payoff_date.date_naive(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRowView {
    pub label: String,
    pub is_cash: bool,
    pub term: String,
    pub monthly_payment: Option<String>,
    pub total_payment: String,
    pub total_interest: String,
    pub extra_cost: String,
    pub payoff_date: Option<NaiveDate>,
}

impl From<&ComparisonRow> for ComparisonRowView {
    fn from(row: &ComparisonRow) -> Self {
        Self {
            label: row.label.clone(),
            is_cash: row.is_cash(),
            term: match row.term_months {
                Some(1) => "1 month".to_string(),
                Some(n) => format!("{} months", n),
                None => "Today".to_string(),
            },
            monthly_payment: row.monthly_payment.map(|m| m.display_currency()),
            total_payment: row.total_payment.display_currency(),
            total_interest: row.total_interest.display_currency(),
            extra_cost: row.extra_cost.display_currency(),
            payoff_date: row.payoff_date.map(|d| d.date_naive()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub purchase_price: String,
    pub has_financing: bool,
    /// shown instead of the financed rows when nothing applies
    pub empty_message: Option<String>,
    pub rows: Vec<ComparisonRowView>,
}

impl ComparisonView {
    pub fn from_table(table: &ComparisonTable) -> Self {
        let has_financing = table.has_financing();
        Self {
            purchase_price: table.principal.display_currency(),
            has_financing,
            empty_message: if has_financing {
                None
            } else {
                Some(format!(
                    "No financing options available for {}",
                    table.principal.display_currency()
                ))
            },
            rows: table.rows().iter().map(ComparisonRowView::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
