/// compare options - rank every eligible product against paying cash
use chrono::{TimeZone, Utc};
use financing_calculator_rs::{
    ComparisonView, FinancingService, Money, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== financing comparison ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 11, 29, 9, 0, 0).unwrap()
    ));

    let mut service = FinancingService::with_standard_catalog();

    for price in [Money::from_major(120), Money::from_major(1_299), Money::from_major(65_000)] {
        let table = service.compare(price, &time)?;
        let view = ComparisonView::from_table(&table);

        println!("purchase price: {}", view.purchase_price);
        if let Some(message) = &view.empty_message {
            println!("  {}", message);
        }
        for row in &view.rows {
            println!(
                "  {:<20} {:>10} {:>12} total {:>12} (+{})",
                row.label,
                row.term,
                row.monthly_payment.as_deref().unwrap_or("-"),
                row.total_payment,
                row.extra_cost,
            );
        }
        println!();
    }

    println!("{} events recorded", service.take_events().len());

    Ok(())
}
