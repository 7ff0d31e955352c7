use hourglass_rs::{SafeTimeProvider, TimeSource};

use crate::catalog::FinancingCatalog;
use crate::comparison::ComparisonTable;
use crate::config::CalculatorConfig;
use crate::decimal::Money;
use crate::errors::{FinancingError, Result};
use crate::events::{Event, EventStore};
use crate::financing::{AmortizationSchedule, FinancingCalculation, FinancingCalculator};
use crate::types::{FinancingOption, OptionId};

/// financing entry point for purchase screens, constructed and owned by the caller
pub struct FinancingService {
    catalog: FinancingCatalog,
    calculator: FinancingCalculator,
    pub events: EventStore,
}

impl FinancingService {
    pub fn new(catalog: FinancingCatalog, config: CalculatorConfig) -> Self {
        Self {
            catalog,
            calculator: FinancingCalculator::new(config),
            events: EventStore::new(),
        }
    }

    /// standard catalog with display-only rounding
    pub fn with_standard_catalog() -> Self {
        Self::new(FinancingCatalog::standard(), CalculatorConfig::default())
    }

    pub fn config(&self) -> &CalculatorConfig {
        self.calculator.config()
    }

    pub fn catalog(&self) -> &FinancingCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut FinancingCatalog {
        &mut self.catalog
    }

    /// calculate financing with system time
    pub fn calculate_financing_now(
        &mut self,
        amount: Money,
        option: &FinancingOption,
    ) -> Result<FinancingCalculation> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.calculate_financing(amount, option, &time)
    }

    pub fn calculate_financing(
        &mut self,
        amount: Money,
        option: &FinancingOption,
        time_provider: &SafeTimeProvider,
    ) -> Result<FinancingCalculation> {
        self.calculator
            .calculate(amount, option, time_provider, &mut self.events)
    }

    /// calculate against a catalog option looked up by id
    pub fn calculate_for_option(
        &mut self,
        amount: Money,
        option_id: OptionId,
        time_provider: &SafeTimeProvider,
    ) -> Result<FinancingCalculation> {
        let option = self
            .catalog
            .get(option_id)
            .cloned()
            .ok_or(FinancingError::OptionNotFound { id: option_id })?;
        self.calculate_financing(amount, &option, time_provider)
    }

    pub fn amortization_schedule(
        &mut self,
        amount: Money,
        option: &FinancingOption,
        time_provider: &SafeTimeProvider,
    ) -> Result<AmortizationSchedule> {
        self.calculator
            .schedule(amount, option, time_provider, &mut self.events)
    }

    /// catalog options usable for a purchase of `amount`, possibly none
    pub fn get_applicable_options(&mut self, amount: Money) -> Vec<FinancingOption> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.get_applicable_options_at(amount, &time)
    }

    pub fn get_applicable_options_at(
        &mut self,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Vec<FinancingOption> {
        let applicable = self.catalog.applicable_options(amount);

        self.events.emit(Event::EligibilityEvaluated {
            amount,
            eligible_count: applicable.len(),
            catalog_size: self.catalog.len(),
            timestamp: time_provider.now(),
        });

        applicable
    }

    /// rank every applicable option against paying cash
    pub fn compare(
        &mut self,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<ComparisonTable> {
        let applicable = self.get_applicable_options_at(amount, time_provider);
        ComparisonTable::build(
            amount,
            &applicable,
            &self.calculator,
            time_provider,
            &mut self.events,
        )
    }

    pub fn add_option(
        &mut self,
        option: FinancingOption,
        time_provider: &SafeTimeProvider,
    ) -> Result<OptionId> {
        let id = option.id;
        let name = option.name.clone();
        self.catalog.add(option)?;

        self.events.emit(Event::OptionAdded {
            option_id: id,
            name,
            timestamp: time_provider.now(),
        });

        Ok(id)
    }

    pub fn remove_option(
        &mut self,
        option_id: OptionId,
        time_provider: &SafeTimeProvider,
    ) -> Result<FinancingOption> {
        let removed = self.catalog.remove(option_id)?;

        self.events.emit(Event::OptionRemoved {
            option_id,
            name: removed.name.clone(),
            timestamp: time_provider.now(),
        });

        Ok(removed)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
