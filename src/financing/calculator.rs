use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;

use crate::config::{CalculatorConfig, InvalidInputPolicy, RoundingPolicy};
use crate::decimal::{Money, Rate};
use crate::errors::{FinancingError, Result};
use crate::events::{Event, EventStore};
use crate::financing::amortization::{add_months, level_payment, AmortizationSchedule};
use crate::financing::FinancingCalculation;
use crate::types::FinancingOption;

/// prices a purchase against a financing option
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancingCalculator {
    config: CalculatorConfig,
}

impl FinancingCalculator {
    pub fn new(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// calculate monthly payment, totals and payoff date for `principal` under `option`
    pub fn calculate(
        &self,
        principal: Money,
        option: &FinancingOption,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<FinancingCalculation> {
        let now = time_provider.now();

        let principal_valid = self.resolve_principal(principal, option, now, events)?;
        let term_months = self.resolve_term(option, now, events)?;
        let apr = self.resolve_apr(option, now, events)?;

        if !principal_valid {
            return Ok(self.degenerate(option, apr, term_months, now));
        }

        let payoff_date = add_months(now, term_months)?;

        let (monthly_payment, final_payment, total_payment) = match self.config.rounding {
            RoundingPolicy::DisplayOnly => {
                let monthly = level_payment(principal, apr, term_months)?;
                let total = if apr.monthly_rate().is_zero() {
                    principal
                } else {
                    monthly * Decimal::from(term_months)
                };
                (monthly, monthly, total)
            }
            RoundingPolicy::PerPeriod => {
                let schedule = AmortizationSchedule::generate(
                    principal,
                    apr,
                    term_months,
                    now,
                    RoundingPolicy::PerPeriod,
                )?;
                (
                    schedule.regular_payment(),
                    schedule.final_payment(),
                    schedule.total_payment,
                )
            }
        };

        let total_interest = total_payment - principal;
        if total_interest.is_negative() || (!apr.is_zero() && total_interest.is_zero()) {
            return Err(FinancingError::CalculationError {
                message: format!(
                    "total {} does not cover principal {} plus interest at {}",
                    total_payment, principal, apr
                ),
            });
        }

        events.emit(Event::FinancingCalculated {
            option_id: option.id,
            principal,
            apr,
            term_months,
            monthly_payment,
            total_payment,
            total_interest,
            rounding: self.config.rounding,
            timestamp: now,
        });

        Ok(FinancingCalculation {
            option_id: option.id,
            principal,
            apr,
            term_months,
            monthly_payment,
            final_payment,
            total_payment,
            total_interest,
            payoff_date,
            calculated_at: now,
            rounding: self.config.rounding,
        })
    }

    /// full period-by-period breakdown starting now, under the same input policy
    pub fn schedule(
        &self,
        principal: Money,
        option: &FinancingOption,
        time_provider: &SafeTimeProvider,
        events: &mut EventStore,
    ) -> Result<AmortizationSchedule> {
        let now = time_provider.now();

        let principal_valid = self.resolve_principal(principal, option, now, events)?;
        let term_months = self.resolve_term(option, now, events)?;
        let apr = self.resolve_apr(option, now, events)?;

        if !principal_valid {
            return Ok(AmortizationSchedule::settled(apr, term_months, now, self.config.rounding));
        }

        AmortizationSchedule::generate(principal, apr, term_months, now, self.config.rounding)
    }

    /// whether `principal` can be financed, a clamped principal is priced as zero
    fn resolve_principal(
        &self,
        principal: Money,
        option: &FinancingOption,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<bool> {
        if principal.is_positive() {
            return Ok(true);
        }

        match self.config.invalid_input {
            InvalidInputPolicy::Reject => Err(FinancingError::InvalidPrincipal { amount: principal }),
            InvalidInputPolicy::Clamp => {
                events.emit(Event::InputClamped {
                    option_id: option.id,
                    field: "principal".to_string(),
                    provided: principal.to_string(),
                    clamped_to: Money::ZERO.to_string(),
                    timestamp: now,
                });
                Ok(false)
            }
        }
    }

    fn resolve_term(
        &self,
        option: &FinancingOption,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<u32> {
        if option.term_months > 0 {
            return Ok(option.term_months);
        }

        match self.config.invalid_input {
            InvalidInputPolicy::Reject => Err(FinancingError::InvalidTerm {
                term_months: option.term_months,
            }),
            InvalidInputPolicy::Clamp => {
                events.emit(Event::InputClamped {
                    option_id: option.id,
                    field: "term_months".to_string(),
                    provided: option.term_months.to_string(),
                    clamped_to: "1".to_string(),
                    timestamp: now,
                });
                Ok(1)
            }
        }
    }

    fn resolve_apr(
        &self,
        option: &FinancingOption,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<Rate> {
        if !option.apr.is_negative() {
            return Ok(option.apr);
        }

        match self.config.invalid_input {
            InvalidInputPolicy::Reject => Err(FinancingError::InvalidApr { apr: option.apr }),
            InvalidInputPolicy::Clamp => {
                events.emit(Event::InputClamped {
                    option_id: option.id,
                    field: "apr".to_string(),
                    provided: option.apr.to_string(),
                    clamped_to: Rate::ZERO.to_string(),
                    timestamp: now,
                });
                Ok(Rate::ZERO)
            }
        }
    }

    /// zero payment, zero interest, paid off immediately
    fn degenerate(
        &self,
        option: &FinancingOption,
        apr: Rate,
        term_months: u32,
        now: DateTime<Utc>,
    ) -> FinancingCalculation {
        FinancingCalculation {
            option_id: option.id,
            principal: Money::ZERO,
            apr,
            term_months,
            monthly_payment: Money::ZERO,
            final_payment: Money::ZERO,
            total_payment: Money::ZERO,
            total_interest: Money::ZERO,
            payoff_date: now,
            calculated_at: now,
            rounding: self.config.rounding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinancingType;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        ))
    }

    fn option(apr: Decimal, term_months: u32) -> FinancingOption {
        FinancingOption::new(
            "Test Option",
            FinancingType::PersonalLoan,
            Rate::from_apr_percent(apr),
            term_months,
        )
    }

    fn calculate_with(
        config: CalculatorConfig,
        principal: Money,
        option: &FinancingOption,
    ) -> Result<FinancingCalculation> {
        let mut events = EventStore::new();
        FinancingCalculator::new(config).calculate(principal, option, &test_time(), &mut events)
    }

    fn calculate(principal: Money, option: &FinancingOption) -> FinancingCalculation {
        calculate_with(CalculatorConfig::display(), principal, option).unwrap()
    }

    fn both_policies() -> [CalculatorConfig; 2] {
        [CalculatorConfig::display(), CalculatorConfig::ledger()]
    }

    #[test]
    fn test_zero_apr_splits_principal_evenly() {
        let calc = calculate(Money::from_major(1_000), &option(dec!(0), 12));

        assert_eq!(calc.monthly_payment.round_cents(), Money::from_decimal(dec!(83.33)));
        assert_eq!(calc.monthly_payment, Money::from_decimal(dec!(1000) / dec!(12)));
        assert_eq!(calc.total_interest, Money::ZERO);
        assert_eq!(calc.total_payment, Money::from_major(1_000));
        assert!(calc.is_interest_free());
    }

    #[test]
    fn test_fifteen_percent_twelve_months() {
        let calc = calculate(Money::from_major(1_000), &option(dec!(15.0), 12));

        assert_eq!(calc.apr.monthly_rate().as_decimal(), dec!(0.0125));
        assert_eq!(calc.monthly_payment.round_cents(), Money::from_decimal(dec!(90.26)));
        assert_eq!(calc.total_payment.round_cents(), Money::from_decimal(dec!(1083.10)));
        assert_eq!(calc.total_interest.round_cents(), Money::from_decimal(dec!(83.10)));
        assert_eq!(calc.final_payment, calc.monthly_payment);
    }

    #[test]
    fn test_positive_apr_always_charges_interest() {
        let principals = [Money::from_cents(1), Money::from_major(1), Money::from_major(2_500)];
        for config in both_policies() {
            for principal in principals {
                for apr in [dec!(0.5), dec!(3.99), dec!(15), dec!(29.99)] {
                    for term in [1, 6, 12, 48] {
                        let calc = calculate_with(config, principal, &option(apr, term)).unwrap();
                        assert!(
                            calc.total_interest.is_positive(),
                            "{:?} principal {} apr {} term {}",
                            config.rounding, principal, apr, term
                        );
                        assert_eq!(calc.total_interest, calc.total_payment - calc.principal);
                    }
                }
            }
        }
    }

    #[test]
    fn test_ledger_small_principal_keeps_interest() {
        let calc = calculate_with(CalculatorConfig::ledger(), Money::from_major(1), &option(dec!(5), 12)).unwrap();

        assert_eq!(calc.monthly_payment, Money::from_cents(9));
        assert_eq!(calc.final_payment, Money::from_cents(4));
        assert_eq!(calc.total_payment, Money::from_cents(103));
        assert_eq!(calc.total_interest, Money::from_cents(3));
    }

    #[test]
    fn test_interest_strictly_increases_with_apr() {
        let aprs = [dec!(0), dec!(1), dec!(5), dec!(9.99), dec!(15), dec!(22.49), dec!(29.99)];
        for config in both_policies() {
            let interest: Vec<Money> = aprs
                .iter()
                .map(|apr| {
                    calculate_with(config, Money::from_major(1_000), &option(*apr, 12))
                        .unwrap()
                        .total_interest
                })
                .collect();

            for pair in interest.windows(2) {
                assert!(pair[1] > pair[0], "{:?}", config.rounding);
            }
        }
    }

    #[test]
    fn test_longer_terms_lower_monthly_raise_total() {
        let terms = [3, 6, 12, 24, 36, 60];
        for config in both_policies() {
            let calcs: Vec<FinancingCalculation> = terms
                .iter()
                .map(|term| calculate_with(config, Money::from_major(5_000), &option(dec!(15), *term)).unwrap())
                .collect();

            for pair in calcs.windows(2) {
                assert!(pair[1].monthly_payment < pair[0].monthly_payment);
                assert!(pair[1].total_payment > pair[0].total_payment);
            }
        }
    }

    #[test]
    fn test_total_matches_monthly_times_term() {
        for config in [CalculatorConfig::display(), CalculatorConfig::ledger()] {
            for (apr, term) in [(dec!(0), 12), (dec!(15), 12), (dec!(7.25), 36), (dec!(24.99), 18)] {
                let calc = calculate_with(config, Money::from_decimal(dec!(1234.56)), &option(apr, term)).unwrap();
                let expected = calc.monthly_payment * Decimal::from(term);
                let tolerance = Money::CENT * Decimal::from(term);
                assert!((calc.total_payment - expected).abs() <= tolerance);
            }
        }
    }

    #[test]
    fn test_payoff_date_advances_calendar_months() {
        let calc = calculate(Money::from_major(1_000), &option(dec!(15), 12));
        assert_eq!(calc.calculated_at, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
        assert_eq!(calc.payoff_date, Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap());

        let calc = calculate(Money::from_major(1_000), &option(dec!(15), 7));
        assert_eq!(calc.payoff_date, Utc.with_ymd_and_hms(2024, 8, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_payoff_date_tracks_the_clock() {
        let time = test_time();
        let control = time.test_control().unwrap();
        let calculator = FinancingCalculator::default();
        let mut events = EventStore::new();
        let opt = option(dec!(10), 3);

        control.advance(chrono::Duration::days(16));
        let calc = calculator
            .calculate(Money::from_major(300), &opt, &time, &mut events)
            .unwrap();

        // jan 31 + 3 months clamps to apr 30
        assert_eq!(calc.payoff_date, Utc.with_ymd_and_hms(2024, 4, 30, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_per_period_rounding_uses_whole_cents() {
        let calc = calculate_with(CalculatorConfig::ledger(), Money::from_major(1_000), &option(dec!(0), 12)).unwrap();

        assert_eq!(calc.monthly_payment, Money::from_decimal(dec!(83.33)));
        assert_eq!(calc.final_payment, Money::from_decimal(dec!(83.37)));
        assert_eq!(calc.total_payment, Money::from_major(1_000));
        assert_eq!(calc.total_interest, Money::ZERO);

        let calc = calculate_with(CalculatorConfig::ledger(), Money::from_major(1_000), &option(dec!(15), 12)).unwrap();
        assert_eq!(calc.monthly_payment, Money::from_decimal(dec!(90.26)));
        assert_eq!(calc.final_payment, Money::from_decimal(dec!(90.24)));
        assert_eq!(calc.total_payment, Money::from_decimal(dec!(1083.10)));
        assert_eq!(calc.total_interest, Money::from_decimal(dec!(83.10)));
    }

    #[test]
    fn test_reject_policy_errors() {
        let config = CalculatorConfig::display();

        assert!(matches!(
            calculate_with(config, Money::ZERO, &option(dec!(10), 12)),
            Err(FinancingError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            calculate_with(config, Money::from_major(-5), &option(dec!(10), 12)),
            Err(FinancingError::InvalidPrincipal { .. })
        ));
        assert!(matches!(
            calculate_with(config, Money::from_major(100), &option(dec!(10), 0)),
            Err(FinancingError::InvalidTerm { term_months: 0 })
        ));
        assert!(matches!(
            calculate_with(config, Money::from_major(100), &option(dec!(-2), 12)),
            Err(FinancingError::InvalidApr { .. })
        ));
    }

    #[test]
    fn test_clamp_policy_non_positive_principal_is_degenerate() {
        let time = test_time();
        let mut events = EventStore::new();
        let calc = FinancingCalculator::new(CalculatorConfig::lenient())
            .calculate(Money::from_major(-20), &option(dec!(15), 12), &time, &mut events)
            .unwrap();

        assert!(calc.is_degenerate());
        assert_eq!(calc.monthly_payment, Money::ZERO);
        assert_eq!(calc.total_interest, Money::ZERO);
        assert_eq!(calc.payoff_date, time.now());
        assert!(events.events().iter().any(|e| matches!(
            e,
            Event::InputClamped { field, .. } if field == "principal"
        )));
    }

    #[test]
    fn test_clamp_policy_zero_term_and_negative_apr() {
        let mut events = EventStore::new();
        let calculator = FinancingCalculator::new(CalculatorConfig::lenient());

        let calc = calculator
            .calculate(Money::from_major(500), &option(dec!(-3), 0), &test_time(), &mut events)
            .unwrap();

        assert_eq!(calc.term_months, 1);
        assert_eq!(calc.apr, Rate::ZERO);
        assert_eq!(calc.monthly_payment, Money::from_major(500));
        assert_eq!(calc.total_interest, Money::ZERO);

        let clamped: Vec<&str> = events
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::InputClamped { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(clamped, vec!["term_months", "apr"]);
    }

    #[test]
    fn test_calculation_emits_event() {
        let mut events = EventStore::new();
        let opt = option(dec!(12), 24);
        FinancingCalculator::default()
            .calculate(Money::from_major(3_000), &opt, &test_time(), &mut events)
            .unwrap();

        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events.events()[0],
            Event::FinancingCalculated { option_id, term_months: 24, .. } if *option_id == opt.id
        ));
    }

    #[test]
    fn test_schedule_uses_configured_rounding() {
        let mut events = EventStore::new();
        let schedule = FinancingCalculator::new(CalculatorConfig::ledger())
            .schedule(Money::from_major(1_000), &option(dec!(15), 12), &test_time(), &mut events)
            .unwrap();

        assert_eq!(schedule.rounding, RoundingPolicy::PerPeriod);
        assert_eq!(schedule.total_payment, Money::from_decimal(dec!(1083.10)));
        assert!(events.is_empty());
    }

    #[test]
    fn test_schedule_follows_clamp_policy() {
        let mut events = EventStore::new();
        let calculator = FinancingCalculator::new(CalculatorConfig::lenient());
        let opt = option(dec!(-3), 0);

        let schedule = calculator
            .schedule(Money::from_major(500), &opt, &test_time(), &mut events)
            .unwrap();
        let calc = calculator
            .calculate(Money::from_major(500), &opt, &test_time(), &mut events)
            .unwrap();

        assert_eq!(schedule.term_months, 1);
        assert_eq!(schedule.apr, Rate::ZERO);
        assert_eq!(schedule.payments.len(), 1);
        assert_eq!(schedule.total_payment, calc.total_payment);
        assert_eq!(schedule.payoff_date(), Some(calc.payoff_date));

        let settled = calculator
            .schedule(Money::ZERO, &option(dec!(10), 12), &test_time(), &mut events)
            .unwrap();
        assert!(settled.payments.is_empty());
        assert_eq!(settled.total_payment, Money::ZERO);
        assert_eq!(settled.payoff_date(), None);

        // the strict default still rejects
        assert!(matches!(
            FinancingCalculator::default().schedule(Money::from_major(500), &opt, &test_time(), &mut events),
            Err(FinancingError::InvalidTerm { term_months: 0 })
        ));
    }
}
