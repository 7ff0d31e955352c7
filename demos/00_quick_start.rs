/// quick start - price one purchase against one financing option
use financing_calculator_rs::{
    CalculationView, FinancingOption, FinancingService, FinancingType, Money, Rate,
};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut service = FinancingService::with_standard_catalog();

    let card = FinancingOption::new(
        "Rewards Card",
        FinancingType::CreditCard,
        Rate::from_apr_percent(dec!(15.0)),
        12,
    );

    let calc = service.calculate_financing_now(Money::from_major(1_000), &card)?;
    let view = CalculationView::new(&card, &calc);

    println!("{}", view.to_json_pretty()?);

    Ok(())
}
