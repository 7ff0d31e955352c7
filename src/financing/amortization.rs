use chrono::{DateTime, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RoundingPolicy;
use crate::decimal::{Money, Rate};
use crate::errors::{FinancingError, Result};

/// scheduled payment in amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub payment_date: DateTime<Utc>,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// equal-installment amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub apr: Rate,
    pub term_months: u32,
    pub start_date: DateTime<Utc>,
    pub rounding: RoundingPolicy,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl AmortizationSchedule {
    /// generate payment schedule, first payment one month after `start_date`
    pub fn generate(
        principal: Money,
        apr: Rate,
        term_months: u32,
        start_date: DateTime<Utc>,
        rounding: RoundingPolicy,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(FinancingError::InvalidPrincipal { amount: principal });
        }
        if term_months == 0 {
            return Err(FinancingError::InvalidTerm { term_months });
        }
        if apr.is_negative() {
            return Err(FinancingError::InvalidApr { apr });
        }
        // the last payment date must exist before any period is computed
        add_months(start_date, term_months)?;

        let payments = calculate_equal_installments(principal, apr, term_months, start_date, rounding)?;

        let total_interest = payments
            .iter()
            .map(|p| p.interest_portion)
            .fold(Money::ZERO, |acc, x| acc + x);

        let total_payment = payments
            .iter()
            .map(|p| p.payment_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Self {
            principal,
            apr,
            term_months,
            start_date,
            rounding,
            payments,
            total_interest,
            total_payment,
        })
    }

    /// nothing financed, so nothing to pay
    pub fn settled(apr: Rate, term_months: u32, start_date: DateTime<Utc>, rounding: RoundingPolicy) -> Self {
        Self {
            principal: Money::ZERO,
            apr,
            term_months,
            start_date,
            rounding,
            payments: Vec::new(),
            total_interest: Money::ZERO,
            total_payment: Money::ZERO,
        }
    }

    /// get payment for specific period, numbered from 1
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        let index = payment_number.checked_sub(1)?;
        self.payments.get(index as usize)
    }

    /// get remaining balance after payment
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.principal)
    }

    /// the recurring installment (first payment)
    pub fn regular_payment(&self) -> Money {
        self.payments
            .first()
            .map(|p| p.payment_amount)
            .unwrap_or(Money::ZERO)
    }

    /// the last installment, including any rounding residual
    pub fn final_payment(&self) -> Money {
        self.payments
            .last()
            .map(|p| p.payment_amount)
            .unwrap_or(Money::ZERO)
    }

    pub fn payoff_date(&self) -> Option<DateTime<Utc>> {
        self.payments.last().map(|p| p.payment_date)
    }
}

fn calculate_equal_installments(
    principal: Money,
    apr: Rate,
    term_months: u32,
    start_date: DateTime<Utc>,
    rounding: RoundingPolicy,
) -> Result<Vec<ScheduledPayment>> {
    let monthly_rate = apr.monthly_rate().as_decimal();
    let installment = match rounding {
        RoundingPolicy::DisplayOnly => level_payment(principal, apr, term_months)?,
        RoundingPolicy::PerPeriod => level_payment(principal, apr, term_months)?.round_cents(),
    };

    let mut payments = Vec::with_capacity(term_months as usize);
    let mut balance = principal;
    let mut cumulative_interest = Money::ZERO;
    let mut cumulative_principal = Money::ZERO;

    for i in 1..=term_months {
        let payment_date = add_months(start_date, i)?;
        // interest accrues at full precision, only amounts paid are rounded
        let interest = Money::from_decimal(balance.as_decimal() * monthly_rate);
        let due = balance + interest;

        let (payment_amount, principal_portion, interest_portion) =
            if i == term_months || installment >= due {
                // settles the loan, absorbing any rounding residual
                let payment = match rounding {
                    RoundingPolicy::DisplayOnly => due,
                    RoundingPolicy::PerPeriod => due.round_cents_up(),
                };
                (payment, balance, payment - balance)
            } else {
                (installment, installment - interest, interest)
            };
        let ending_balance = balance - principal_portion;

        cumulative_interest += interest_portion;
        cumulative_principal += principal_portion;

        payments.push(ScheduledPayment {
            payment_number: i,
            payment_date,
            beginning_balance: balance,
            payment_amount,
            principal_portion,
            interest_portion,
            ending_balance,
            cumulative_interest,
            cumulative_principal,
        });

        balance = ending_balance;
    }

    Ok(payments)
}

/// level monthly payment at full internal precision
///
/// EMI = P * r * (1 + r)^n / ((1 + r)^n - 1), or P / n when r is zero
pub fn level_payment(principal: Money, apr: Rate, months: u32) -> Result<Money> {
    if months == 0 {
        return Err(FinancingError::InvalidTerm { term_months: months });
    }

    let r = apr.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let compound = compound_factor(r, months)?;
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(FinancingError::CalculationError {
            message: format!("monthly rate {} too small to amortize over {} months", r, months),
        });
    }

    let numerator = principal
        .as_decimal()
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .ok_or_else(|| overflow("payment numerator"))?;

    let payment = numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow("payment division"))?;

    Ok(Money::from_decimal(payment))
}

/// (1 + r)^n with overflow reported instead of panicking
pub(crate) fn compound_factor(rate: Decimal, periods: u32) -> Result<Decimal> {
    let base = Decimal::ONE + rate;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound
            .checked_mul(base)
            .ok_or_else(|| overflow("compound factor"))?;
    }
    Ok(compound)
}

/// advance by calendar months, clamping to the last day of shorter months
pub(crate) fn add_months(date: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| FinancingError::InvalidDate {
            message: format!("{} plus {} months is out of range", date, months),
        })
}

fn overflow(stage: &str) -> FinancingError {
    FinancingError::CalculationError {
        message: format!("decimal overflow in {}", stage),
    }
}
