/// rounding policies - display-only estimates vs cent-exact installments
use chrono::{TimeZone, Utc};
use financing_calculator_rs::{
    CalculatorConfig, FinancingCatalog, FinancingOption, FinancingService, FinancingType, Money,
    Rate, SafeTimeProvider, TimeSource,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
    ));

    let loan = FinancingOption::new(
        "Personal Loan",
        FinancingType::PersonalLoan,
        Rate::from_apr_percent(dec!(15)),
        12,
    );

    for (name, config) in [("display", CalculatorConfig::display()), ("ledger", CalculatorConfig::ledger())] {
        let mut service = FinancingService::new(FinancingCatalog::new(), config);
        let calc = service.calculate_financing(Money::from_major(1_000), &loan, &time)?;

        println!("--- {} rounding ---", name);
        println!("monthly payment: {}", calc.monthly_payment);
        println!("final payment:   {}", calc.final_payment);
        println!("total payment:   {}", calc.total_payment);
        println!("total interest:  {}", calc.total_interest);
        println!("payoff date:     {}\n", calc.payoff_date.format("%Y-%m-%d"));
    }

    // per-period schedule
    let mut service = FinancingService::new(FinancingCatalog::new(), CalculatorConfig::ledger());
    let schedule = service.amortization_schedule(Money::from_major(1_000), &loan, &time)?;
    for payment in &schedule.payments {
        println!(
            "#{:>2} {} pay {:>8} interest {:>6} balance {:>8}",
            payment.payment_number,
            payment.payment_date.format("%Y-%m-%d"),
            payment.payment_amount.display_currency(),
            payment.interest_portion.display_currency(),
            payment.ending_balance.display_currency(),
        );
    }

    Ok(())
}
