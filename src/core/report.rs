use serde::Serialize;

use crate::core::models::cost::CostSummary;
use crate::core::models::savings::{RightsizingSuggestion, SavingsBreakdown};
use crate::core::trend::{self, TrendPoint, TrendResult};

#[derive(Debug, Clone, Serialize)]
pub struct MonthDelta {
    pub previous_label: String,
    pub change: f64,
    /// Absent when the previous month's cost was zero.
    pub percent: Option<f64>,
}

/// The fully assembled report: the anchor month, its two predecessors, and
/// every derived figure the renderers need. Purely derived, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub anchor: CostSummary,
    /// The two months before the anchor, oldest first.
    pub prior: Vec<CostSummary>,
    pub savings_plan_trend: TrendResult,
    pub reservation_trend: TrendResult,
    pub savings: Option<SavingsBreakdown>,
    pub rightsizing: Option<Vec<RightsizingSuggestion>>,
    /// Sum over the three months; absent unless every month reported a cost.
    pub quarter_total: Option<f64>,
    pub quarter_average: Option<f64>,
    pub month_over_month: Option<MonthDelta>,
    /// Total savings as a percentage of the anchor month's cost.
    pub optimization_rate: Option<f64>,
}

/// Assemble the report from per-month summaries (oldest first, anchor last).
pub fn build(
    months: Vec<CostSummary>,
    savings: Option<SavingsBreakdown>,
    rightsizing: Option<Vec<RightsizingSuggestion>>,
) -> CostReport {
    assert!(!months.is_empty(), "report needs at least the anchor month");

    let savings_plan_trend = trend::analyze(&coverage_points(&months, |m| m.savings_plan_coverage));
    let reservation_trend = trend::analyze(&coverage_points(&months, |m| m.reservation_coverage));

    let totals: Vec<Option<f64>> = months.iter().map(|m| m.total_cost()).collect();
    let quarter_total = totals
        .iter()
        .copied()
        .collect::<Option<Vec<f64>>>()
        .map(|all| all.iter().sum::<f64>());
    let quarter_average = quarter_total.map(|total| total / months.len() as f64);

    let mut months = months;
    let anchor = months.pop().expect("checked non-empty");
    let prior = months;

    let month_over_month = prior.last().and_then(|previous| {
        let current = anchor.total_cost()?;
        let before = previous.total_cost()?;
        Some(MonthDelta {
            previous_label: previous.label.clone(),
            change: current - before,
            percent: (before > 0.0).then(|| (current - before) / before * 100.0),
        })
    });

    let optimization_rate = match (&savings, anchor.total_cost()) {
        (Some(savings), Some(total)) if total > 0.0 => {
            savings.total().map(|saved| saved / total * 100.0)
        }
        _ => None,
    };

    CostReport {
        anchor,
        prior,
        savings_plan_trend,
        reservation_trend,
        savings,
        rightsizing,
        quarter_total,
        quarter_average,
        month_over_month,
        optimization_rate,
    }
}

fn coverage_points(months: &[CostSummary], value: fn(&CostSummary) -> Option<f64>) -> Vec<TrendPoint> {
    months
        .iter()
        .map(|month| TrendPoint::new(month.short_label(), value(month)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::{MonthCost, ServiceCost};
    use crate::core::month::{trailing_window, Month, MonthRange};
    use crate::core::trend::TrendDirection;

    fn summary(range: &MonthRange, total: Option<f64>, sp: Option<f64>) -> CostSummary {
        let mut summary = CostSummary::empty(range);
        summary.cost = total.map(|total| MonthCost {
            total,
            by_service: vec![ServiceCost {
                service: "EC2".to_string(),
                amount: total,
            }],
        });
        summary.savings_plan_coverage = sp;
        summary
    }

    fn three_months() -> Vec<MonthRange> {
        trailing_window(MonthRange::of(2026, Month::January), 3)
    }

    #[test]
    fn wires_coverage_into_trends() {
        let ranges = three_months();
        let months = vec![
            summary(&ranges[0], Some(100.0), Some(40.0)),
            summary(&ranges[1], Some(110.0), Some(42.5)),
            summary(&ranges[2], Some(90.0), Some(39.0)),
        ];
        let report = build(months, None, None);

        assert_eq!(report.savings_plan_trend.steps[0].direction, TrendDirection::Up);
        assert_eq!(report.savings_plan_trend.steps[1].direction, TrendDirection::Down);
        assert_eq!(report.savings_plan_trend.points[0].label, "Nov 2025");
        // No reservation data anywhere: every step is unknown.
        assert!(report
            .reservation_trend
            .steps
            .iter()
            .all(|s| s.direction == TrendDirection::Unknown));
    }

    #[test]
    fn month_over_month_change() {
        let ranges = three_months();
        let months = vec![
            summary(&ranges[0], Some(100.0), None),
            summary(&ranges[1], Some(80.0), None),
            summary(&ranges[2], Some(90.0), None),
        ];
        let report = build(months, None, None);

        let delta = report.month_over_month.unwrap();
        assert_eq!(delta.previous_label, "December 2025");
        assert!((delta.change - 10.0).abs() < 1e-10);
        assert!((delta.percent.unwrap() - 12.5).abs() < 1e-10);
    }

    #[test]
    fn quarter_total_requires_all_months() {
        let ranges = three_months();
        let complete = vec![
            summary(&ranges[0], Some(100.0), None),
            summary(&ranges[1], Some(110.0), None),
            summary(&ranges[2], Some(90.0), None),
        ];
        let report = build(complete, None, None);
        assert!((report.quarter_total.unwrap() - 300.0).abs() < 1e-10);
        assert!((report.quarter_average.unwrap() - 100.0).abs() < 1e-10);

        let partial = vec![
            summary(&ranges[0], None, None),
            summary(&ranges[1], Some(110.0), None),
            summary(&ranges[2], Some(90.0), None),
        ];
        let report = build(partial, None, None);
        assert!(report.quarter_total.is_none());
        assert!(report.quarter_average.is_none());
    }

    #[test]
    fn optimization_rate_from_savings_total() {
        let ranges = three_months();
        let months = vec![
            summary(&ranges[0], Some(100.0), None),
            summary(&ranges[1], Some(100.0), None),
            summary(&ranges[2], Some(200.0), None),
        ];
        let savings = SavingsBreakdown {
            savings_plans: Some(30.0),
            rds_reservations: Some(10.0),
            ..Default::default()
        };
        let report = build(months, Some(savings), None);
        assert!((report.optimization_rate.unwrap() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn missing_previous_month_disables_mom() {
        let ranges = three_months();
        let months = vec![
            summary(&ranges[0], Some(100.0), None),
            summary(&ranges[1], None, None),
            summary(&ranges[2], Some(90.0), None),
        ];
        let report = build(months, None, None);
        assert!(report.month_over_month.is_none());
    }
}
