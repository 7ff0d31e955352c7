pub mod catalog;
pub mod comparison;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod financing;
pub mod service;
pub mod types;
pub mod views;

// re-export key types
pub use catalog::FinancingCatalog;
pub use comparison::{ComparisonRow, ComparisonTable, RowKind, PAY_CASH_LABEL};
pub use config::{CalculatorConfig, InvalidInputPolicy, RoundingPolicy};
pub use decimal::{Money, Rate};
pub use errors::{FinancingError, Result};
pub use events::{Event, EventStore};
pub use financing::{
    AmortizationSchedule, FinancingCalculation, FinancingCalculator, ScheduledPayment,
};
pub use service::FinancingService;
pub use types::{EligibilityRule, FinancingOption, FinancingType, OptionId};
pub use views::{CalculationView, ComparisonRowView, ComparisonView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
