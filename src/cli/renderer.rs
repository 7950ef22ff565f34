use colored::{control, ColoredString, Colorize};

use crate::core::formatter::{
    coverage_status, direction_glyph, format_money, format_optional_money,
    format_optional_percent, format_percent, format_signed,
};
use crate::core::report::CostReport;
use crate::core::trend::{TrendDirection, TrendResult};

const SERVICE_ROWS: usize = 10;
const RIGHTSIZING_ROWS: usize = 5;

/// Render the full report as a colored (or plain) string.
///
/// Layout:
/// ```text
///  AWS Cost Report (January 2026)
///   Period         2026-01-01 to 2026-01-31
///
///   Summary
///   Total          $1234.56
///   Quarter        $3456.78 (avg $1152.26/month)
///
///   Savings Plans Trend
///   Nov 2025       40.0%
///   Dec 2025       42.5% ↗ +2.5
///   Jan 2026       39.0% ↘ -3.5
/// ```
pub fn render_report(report: &CostReport, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();

    let header = format!(" AWS Cost Report ({})", report.anchor.label);
    lines.push(header.bold().to_string());
    push_row(
        &mut lines,
        "Period",
        format!("{} to {}", report.anchor.start, report.anchor.end),
    );

    // Summary
    push_section(&mut lines, "Summary");
    push_row(
        &mut lines,
        "Total",
        format_optional_money(report.anchor.total_cost()),
    );
    if let (Some(total), Some(average)) = (report.quarter_total, report.quarter_average) {
        push_row(
            &mut lines,
            "Quarter",
            format!("{} (avg {}/month)", format_money(total), format_money(average)),
        );
    }
    if let Some(savings) = &report.savings {
        push_row(&mut lines, "Savings", format_optional_money(savings.total()));
    }
    if let Some(rate) = report.optimization_rate {
        push_row(&mut lines, "Optimization", format_percent(rate));
    }

    // Coverage
    push_section(&mut lines, "Coverage");
    push_coverage_row(&mut lines, "Savings Plans", report.anchor.savings_plan_coverage);
    push_coverage_row(&mut lines, "Reservations", report.anchor.reservation_coverage);

    push_trend(&mut lines, "Savings Plans Trend", &report.savings_plan_trend);
    push_trend(&mut lines, "Reservations Trend", &report.reservation_trend);

    // Month over month
    if let Some(delta) = &report.month_over_month {
        push_section(&mut lines, "Month over Month");
        if let Some(previous) = report.prior.last() {
            push_row(
                &mut lines,
                &previous.short_label(),
                format_optional_money(previous.total_cost()),
            );
        }
        push_row(
            &mut lines,
            &report.anchor.short_label(),
            format_optional_money(report.anchor.total_cost()),
        );
        let percent = delta
            .percent
            .map(|p| format!(" ({}%)", format_signed(p)))
            .unwrap_or_default();
        let word = if delta.change > 0.0 {
            "Increasing"
        } else if delta.change < 0.0 {
            "Decreasing"
        } else {
            "Stable"
        };
        push_row(
            &mut lines,
            "Change",
            format!("{}{} {}", format_money(delta.change), percent, word),
        );
    }

    // Savings breakdown
    if let Some(savings) = &report.savings {
        push_section(&mut lines, "Savings Breakdown");
        let total = savings.total();
        for (label, amount) in savings.entries() {
            let share = match (amount, total) {
                (Some(amount), Some(total)) if total > 0.0 => {
                    format!(" ({}%)", format_signed(amount / total * 100.0))
                }
                _ => String::new(),
            };
            let padded = format!("{:<24}", label);
            lines.push(format!(
                "  {} {}{}",
                padded.cyan(),
                format_optional_money(amount),
                share
            ));
        }
    }

    // Per-service costs
    if let Some(cost) = &report.anchor.cost {
        push_section(&mut lines, "Top Services");
        for service in cost.services_sorted().into_iter().take(SERVICE_ROWS) {
            let padded = format!("{:<42}", service.service);
            lines.push(format!("  {} {}", padded.cyan(), format_money(service.amount)));
        }
    }

    // Rightsizing
    if let Some(suggestions) = &report.rightsizing {
        push_section(&mut lines, "Rightsizing");
        if suggestions.is_empty() {
            lines.push("  No recommendations".dimmed().to_string());
        } else {
            let estimated: f64 = suggestions
                .iter()
                .filter_map(|s| s.estimated_monthly_savings)
                .sum();
            lines.push(format!(
                "  {} recommendation{}, estimated {}/month",
                suggestions.len(),
                if suggestions.len() == 1 { "" } else { "s" },
                format_money(estimated)
            ));
            for suggestion in suggestions.iter().take(RIGHTSIZING_ROWS) {
                lines.push(format!(
                    "    {:<20} {:<10} {:<12} {}",
                    suggestion.resource_id,
                    suggestion.action,
                    suggestion.current_instance_type.as_deref().unwrap_or("-"),
                    format_optional_money(suggestion.estimated_monthly_savings)
                ));
            }
        }
    }

    // Degradation warnings for the anchor month and savings sources
    let warnings: Vec<&String> = report
        .anchor
        .warnings
        .iter()
        .chain(report.savings.iter().flat_map(|s| s.warnings.iter()))
        .collect();
    if !warnings.is_empty() {
        push_section(&mut lines, "Warnings");
        for warning in warnings {
            lines.push(format!("  - {}", warning).dimmed().to_string());
        }
    }

    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(format!("  {}", title.bold()));
}

fn push_row(lines: &mut Vec<String>, label: &str, value: impl AsRef<str>) {
    let padded = format!("{:<14}", label);
    lines.push(format!("  {} {}", padded.cyan(), value.as_ref()));
}

fn push_coverage_row(lines: &mut Vec<String>, label: &str, coverage: Option<f64>) {
    let value = match coverage {
        Some(percent) => {
            let text = format!("{} ({})", format_percent(percent), coverage_status(percent));
            color_coverage(percent, &text).to_string()
        }
        None => "N/A".dimmed().to_string(),
    };
    push_row(lines, label, value);
}

fn push_trend(lines: &mut Vec<String>, title: &str, trend: &TrendResult) {
    push_section(lines, title);
    for (index, point) in trend.points.iter().enumerate() {
        let mut value = format!("{:>6}", format_optional_percent(point.value));
        // Steps describe the movement into this point from the one before.
        if index > 0 {
            if let Some(step) = trend.steps.get(index - 1) {
                let glyph = color_direction(step.direction, direction_glyph(step.direction));
                let delta = step
                    .delta
                    .map(|d| format!(" {}", format_signed(d)))
                    .unwrap_or_default();
                value = format!("{} {}{}", value, glyph, delta);
            }
        }
        push_row(lines, &point.label, value);
    }
}

fn color_direction(direction: TrendDirection, text: &str) -> ColoredString {
    match direction {
        TrendDirection::Up => text.green(),
        TrendDirection::Down => text.red(),
        TrendDirection::Flat | TrendDirection::Unknown => text.dimmed(),
    }
}

/// Color coverage text green/yellow/red by the 70/50 thresholds.
fn color_coverage(percent: f64, text: &str) -> ColoredString {
    if percent >= 70.0 {
        text.green()
    } else if percent >= 50.0 {
        text.yellow()
    } else {
        text.red()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::{CostSummary, MonthCost, ServiceCost};
    use crate::core::models::savings::SavingsBreakdown;
    use crate::core::month::{trailing_window, Month, MonthRange};
    use crate::core::report;

    fn summary(range: &MonthRange, total: Option<f64>, sp: Option<f64>) -> CostSummary {
        let mut summary = CostSummary::empty(range);
        summary.cost = total.map(|total| MonthCost {
            total,
            by_service: vec![
                ServiceCost {
                    service: "S3".to_string(),
                    amount: 100.0,
                },
                ServiceCost {
                    service: "EC2".to_string(),
                    amount: 100.0,
                },
                ServiceCost {
                    service: "RDS".to_string(),
                    amount: 50.0,
                },
            ],
        });
        summary.savings_plan_coverage = sp;
        summary
    }

    fn make_report(sp_values: [Option<f64>; 3]) -> CostReport {
        let ranges = trailing_window(MonthRange::of(2026, Month::January), 3);
        let months = vec![
            summary(&ranges[0], Some(100.0), sp_values[0]),
            summary(&ranges[1], Some(110.0), sp_values[1]),
            summary(&ranges[2], Some(250.0), sp_values[2]),
        ];
        let savings = SavingsBreakdown {
            savings_plans: Some(120.0),
            ..Default::default()
        };
        report::build(months, Some(savings), Some(vec![]))
    }

    #[test]
    fn render_contains_header_and_period() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        assert!(output.contains("AWS Cost Report (January 2026)"));
        assert!(output.contains("2026-01-01 to 2026-01-31"));
    }

    #[test]
    fn render_contains_trend_progression() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        assert!(output.contains("Nov 2025"));
        assert!(output.contains("42.5%"));
        assert!(output.contains("↗ +2.5"));
        assert!(output.contains("↘ -3.5"));
    }

    #[test]
    fn absent_coverage_renders_placeholder() {
        let report = make_report([None, None, None]);
        let output = render_report(&report, false);
        assert!(output.contains("Savings Plans  N/A"));
        // Unknown steps show a question mark, never a guessed direction.
        assert!(output.contains('?'));
        assert!(!output.contains('↗'));
    }

    #[test]
    fn services_sorted_with_tie_break() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        // Look inside the services section; "RDS Reservations" appears
        // earlier in the savings breakdown.
        let section = &output[output.find("Top Services").unwrap()..];
        let ec2 = section.find("EC2").unwrap();
        let s3 = section.find("S3").unwrap();
        let rds = section.find("RDS").unwrap();
        assert!(ec2 < s3, "cost tie broken by name ascending");
        assert!(s3 < rds);
    }

    #[test]
    fn month_over_month_section() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        assert!(output.contains("Month over Month"));
        assert!(output.contains("$140.00"));
        assert!(output.contains("Increasing"));
    }

    #[test]
    fn render_no_ansi_when_color_false() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        assert!(!output.contains('\x1b'), "output should not contain ANSI codes");
    }

    #[test]
    fn empty_rightsizing_renders_no_recommendations() {
        let report = make_report([Some(40.0), Some(42.5), Some(39.0)]);
        let output = render_report(&report, false);
        assert!(output.contains("No recommendations"));
    }

    #[test]
    fn warnings_section_lists_degradations() {
        let mut report = make_report([None, None, None]);
        report.anchor.warnings.push("Savings Plans coverage: no data".to_string());
        let output = render_report(&report, false);
        assert!(output.contains("Warnings"));
        assert!(output.contains("Savings Plans coverage: no data"));
    }
}
