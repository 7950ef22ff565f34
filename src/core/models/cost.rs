use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::month::MonthRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCost {
    pub service: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCost {
    pub total: f64,
    pub by_service: Vec<ServiceCost>,
}

impl MonthCost {
    /// Display order: cost descending, ties broken by service name ascending.
    pub fn services_sorted(&self) -> Vec<&ServiceCost> {
        let mut services: Vec<&ServiceCost> = self.by_service.iter().collect();
        services.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.service.cmp(&b.service))
        });
        services
    }
}

/// Everything fetched for one month. Each capability is independently
/// optional: a feature that is disabled or failed stays `None` and leaves a
/// warning. It is never reported as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cost: Option<MonthCost>,
    pub savings_plan_coverage: Option<f64>,
    pub reservation_coverage: Option<f64>,
    pub warnings: Vec<String>,
}

impl CostSummary {
    pub fn empty(range: &MonthRange) -> Self {
        Self {
            label: range.label(),
            start: range.start,
            end: range.end,
            cost: None,
            savings_plan_coverage: None,
            reservation_coverage: None,
            warnings: Vec::new(),
        }
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.cost.as_ref().map(|c| c.total)
    }

    /// "Jan 2026", for trend rows and other tight layouts.
    pub fn short_label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    pub fn has_any_data(&self) -> bool {
        self.cost.is_some()
            || self.savings_plan_coverage.is_some()
            || self.reservation_coverage.is_some()
    }
}
