use serde::{Deserialize, Serialize};

/// Net savings per optimization source for the anchor month. Sources that
/// are not enabled, returned no data, or failed stay `None` with a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub savings_plans: Option<f64>,
    pub rds_reservations: Option<f64>,
    pub opensearch_reservations: Option<f64>,
    pub credits: Option<f64>,
    pub warnings: Vec<String>,
}

impl SavingsBreakdown {
    /// Sum of the sources that reported data; `None` when none did.
    pub fn total(&self) -> Option<f64> {
        let present: Vec<f64> = [
            self.savings_plans,
            self.rds_reservations,
            self.opensearch_reservations,
            self.credits,
        ]
        .into_iter()
        .flatten()
        .collect();
        if present.is_empty() {
            None
        } else {
            Some(present.iter().sum())
        }
    }

    /// Display rows, fixed order.
    pub fn entries(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("Savings Plans", self.savings_plans),
            ("RDS Reservations", self.rds_reservations),
            ("OpenSearch Reservations", self.opensearch_reservations),
            ("Credit Savings", self.credits),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RightsizingSuggestion {
    pub resource_id: String,
    /// "Modify" or "Terminate", as reported by the recommendation.
    pub action: String,
    pub current_instance_type: Option<String>,
    pub estimated_monthly_savings: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_present_sources() {
        let breakdown = SavingsBreakdown {
            savings_plans: Some(120.0),
            rds_reservations: Some(30.5),
            opensearch_reservations: None,
            credits: Some(10.0),
            warnings: vec![],
        };
        assert!((breakdown.total().unwrap() - 160.5).abs() < 1e-10);
    }

    #[test]
    fn total_is_none_when_every_source_is_absent() {
        let breakdown = SavingsBreakdown::default();
        assert!(breakdown.total().is_none());
    }

    #[test]
    fn entries_keep_fixed_order() {
        let breakdown = SavingsBreakdown::default();
        let labels: Vec<&str> = breakdown.entries().iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            [
                "Savings Plans",
                "RDS Reservations",
                "OpenSearch Reservations",
                "Credit Savings"
            ]
        );
    }
}
