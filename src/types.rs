use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{FinancingError, Result};

/// unique identifier for a financing option
pub type OptionId = Uuid;

/// financing product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinancingType {
    PersonalLoan,
    CreditCard,
    StoreFinancing,
    BuyNowPayLater,
    /// promotional card with a zero or reduced introductory rate
    IntroApr,
}

impl FinancingType {
    pub fn label(&self) -> &'static str {
        match self {
            FinancingType::PersonalLoan => "Personal Loan",
            FinancingType::CreditCard => "Credit Card",
            FinancingType::StoreFinancing => "Store Financing",
            FinancingType::BuyNowPayLater => "Buy Now, Pay Later",
            FinancingType::IntroApr => "Intro APR Card",
        }
    }

    /// symbol name the presentation layer renders for this category
    pub fn icon(&self) -> &'static str {
        match self {
            FinancingType::PersonalLoan => "banknote",
            FinancingType::CreditCard => "creditcard",
            FinancingType::StoreFinancing => "bag",
            FinancingType::BuyNowPayLater => "calendar.badge.clock",
            FinancingType::IntroApr => "percent",
        }
    }
}

/// inclusive purchase amount bounds for an option; `None` is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EligibilityRule {
    pub min_amount: Option<Money>,
    pub max_amount: Option<Money>,
}

impl EligibilityRule {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn between(min_amount: Money, max_amount: Money) -> Self {
        Self {
            min_amount: Some(min_amount),
            max_amount: Some(max_amount),
        }
    }

    /// check whether a purchase amount falls inside the bounds
    pub fn applies(&self, amount: Money) -> bool {
        if !amount.is_positive() {
            return false;
        }

        let above_min = self.min_amount.map_or(true, |min| amount >= min);
        let below_max = self.max_amount.map_or(true, |max| amount <= max);
        above_min && below_max
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(FinancingError::InvalidEligibility { min, max });
            }
        }
        Ok(())
    }
}

/// a loan or credit product a purchase can be financed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOption {
    pub id: OptionId,
    pub name: String,
    pub financing_type: FinancingType,
    pub apr: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub eligibility: EligibilityRule,
    #[serde(default)]
    pub description: Option<String>,
}

impl FinancingOption {
    pub fn new(
        name: impl Into<String>,
        financing_type: FinancingType,
        apr: Rate,
        term_months: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            financing_type,
            apr,
            term_months,
            eligibility: EligibilityRule::unrestricted(),
            description: None,
        }
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityRule) -> Self {
        self.eligibility = eligibility;
        self
    }

    pub fn min_amount(mut self, amount: Money) -> Self {
        self.eligibility.min_amount = Some(amount);
        self
    }

    pub fn max_amount(mut self, amount: Money) -> Self {
        self.eligibility.max_amount = Some(amount);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_eligible(&self, amount: Money) -> bool {
        self.eligibility.applies(amount)
    }

    /// check apr, term and eligibility bounds
    pub fn validate(&self) -> Result<()> {
        if self.apr.is_negative() {
            return Err(FinancingError::InvalidApr { apr: self.apr });
        }
        if self.term_months == 0 {
            return Err(FinancingError::InvalidTerm {
                term_months: self.term_months,
            });
        }
        if self.name.trim().is_empty() {
            return Err(FinancingError::InvalidConfiguration {
                message: "financing option name is empty".to_string(),
            });
        }
        self.eligibility.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_eligibility_bounds_are_inclusive() {
        let rule = EligibilityRule::between(Money::from_major(250), Money::from_major(5_000));

        assert!(!rule.applies(Money::from_decimal(dec!(249.99))));
        assert!(rule.applies(Money::from_major(250)));
        assert!(rule.applies(Money::from_major(5_000)));
        assert!(!rule.applies(Money::from_decimal(dec!(5000.01))));
    }

    #[test]
    fn test_unrestricted_rule_rejects_non_positive_amounts() {
        let rule = EligibilityRule::unrestricted();

        assert!(rule.applies(Money::CENT));
        assert!(!rule.applies(Money::ZERO));
        assert!(!rule.applies(Money::from_major(-10)));
    }

    #[test]
    fn test_option_validation() {
        let option = FinancingOption::new(
            "Personal Loan",
            FinancingType::PersonalLoan,
            Rate::from_apr_percent(dec!(11.99)),
            36,
        );
        assert!(option.validate().is_ok());

        let mut zero_term = option.clone();
        zero_term.term_months = 0;
        assert!(matches!(zero_term.validate(), Err(FinancingError::InvalidTerm { .. })));

        let mut negative_apr = option.clone();
        negative_apr.apr = Rate::from_apr_percent(dec!(-1));
        assert!(matches!(negative_apr.validate(), Err(FinancingError::InvalidApr { .. })));

        let inverted = option
            .min_amount(Money::from_major(5_000))
            .max_amount(Money::from_major(1_000));
        assert!(matches!(inverted.validate(), Err(FinancingError::InvalidEligibility { .. })));
    }

    #[test]
    fn test_type_labels_and_icons() {
        assert_eq!(FinancingType::StoreFinancing.label(), "Store Financing");
        assert_eq!(FinancingType::CreditCard.icon(), "creditcard");
    }
}
