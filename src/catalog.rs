use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{FinancingError, Result};
use crate::types::{FinancingOption, FinancingType, OptionId};

/// ordered set of financing products offered for purchases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancingCatalog {
    options: Vec<FinancingOption>,
}

impl FinancingCatalog {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    /// build from options, validating each one
    pub fn from_options(options: Vec<FinancingOption>) -> Result<Self> {
        let mut catalog = Self::new();
        for option in options {
            catalog.add(option)?;
        }
        Ok(catalog)
    }

    /// the products shown on the purchase financing screen
    pub fn standard() -> Self {
        let options = vec![
            FinancingOption::new(
                "0% Intro APR Card",
                FinancingType::IntroApr,
                Rate::ZERO,
                12,
            )
            .min_amount(Money::from_major(100))
            .max_amount(Money::from_major(5_000))
            .description("No interest if paid in full during the promotional period"),
            FinancingOption::new(
                "Buy Now, Pay Later",
                FinancingType::BuyNowPayLater,
                Rate::ZERO,
                4,
            )
            .min_amount(Money::from_major(35))
            .max_amount(Money::from_major(1_500))
            .description("Four interest-free monthly installments"),
            FinancingOption::new(
                "Store Financing",
                FinancingType::StoreFinancing,
                Rate::from_apr_percent(dec!(9.99)),
                18,
            )
            .min_amount(Money::from_major(250))
            .max_amount(Money::from_major(10_000)),
            FinancingOption::new(
                "Personal Loan",
                FinancingType::PersonalLoan,
                Rate::from_apr_percent(dec!(11.99)),
                36,
            )
            .min_amount(Money::from_major(1_000))
            .max_amount(Money::from_major(50_000)),
            FinancingOption::new(
                "Credit Card",
                FinancingType::CreditCard,
                Rate::from_apr_percent(dec!(22.99)),
                12,
            )
            .max_amount(Money::from_major(15_000))
            .description("Standard purchase APR paid down over a year"),
        ];

        Self { options }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let decoded: FinancingCatalog = serde_json::from_str(json)?;
        Self::from_options(decoded.options)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add(&mut self, option: FinancingOption) -> Result<()> {
        option.validate()?;
        if self.get(option.id).is_some() {
            return Err(FinancingError::DuplicateOption { id: option.id });
        }
        self.options.push(option);
        Ok(())
    }

    pub fn remove(&mut self, id: OptionId) -> Result<FinancingOption> {
        let index = self
            .options
            .iter()
            .position(|o| o.id == id)
            .ok_or(FinancingError::OptionNotFound { id })?;
        Ok(self.options.remove(index))
    }

    pub fn get(&self, id: OptionId) -> Option<&FinancingOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinancingOption> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// options whose eligibility bounds contain `amount`, in catalog order
    pub fn applicable_options(&self, amount: Money) -> Vec<FinancingOption> {
        self.options
            .iter()
            .filter(|o| o.is_eligible(amount))
            .cloned()
            .collect()
    }
}
