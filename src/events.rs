use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RoundingPolicy;
use crate::decimal::{Money, Rate};
use crate::types::OptionId;

/// all events that can be emitted by the financing service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // calculation events
    FinancingCalculated {
        option_id: OptionId,
        principal: Money,
        apr: Rate,
        term_months: u32,
        monthly_payment: Money,
        total_payment: Money,
        total_interest: Money,
        rounding: RoundingPolicy,
        timestamp: DateTime<Utc>,
    },
    InputClamped {
        option_id: OptionId,
        field: String,
        provided: String,
        clamped_to: String,
        timestamp: DateTime<Utc>,
    },

    // eligibility events
    EligibilityEvaluated {
        amount: Money,
        eligible_count: usize,
        catalog_size: usize,
        timestamp: DateTime<Utc>,
    },

    // comparison events
    ComparisonBuilt {
        principal: Money,
        financed_rows: usize,
        cheapest_option: Option<OptionId>,
        timestamp: DateTime<Utc>,
    },

    // catalog events
    OptionAdded {
        option_id: OptionId,
        name: String,
        timestamp: DateTime<Utc>,
    },
    OptionRemoved {
        option_id: OptionId,
        name: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_drains_store() {
        let mut store = EventStore::new();
        store.emit(Event::OptionAdded {
            option_id: Uuid::new_v4(),
            name: "Personal Loan".to_string(),
            timestamp: Utc::now(),
        });
        store.emit(Event::EligibilityEvaluated {
            amount: Money::from_major(1_000),
            eligible_count: 0,
            catalog_size: 1,
            timestamp: Utc::now(),
        });

        assert_eq!(store.len(), 2);

        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_events_serialize_to_json() {
        let event = Event::ComparisonBuilt {
            principal: Money::from_major(1_000),
            financed_rows: 0,
            cheapest_option: None,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ComparisonBuilt"));

        let decoded: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
