use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};

use crate::core::formatter::{
    coverage_status, direction_word, format_money, format_optional_money,
    format_optional_percent, format_percent, format_signed,
};
use crate::core::report::CostReport;
use crate::core::trend::{TrendDirection, TrendResult};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const VALUE_COLUMN: f32 = 90.0;

// Amazon palette, carried over from the console color scheme.
fn orange() -> Color {
    rgb(255, 153, 0) // #FF9900
}
fn dark_blue() -> Color {
    rgb(35, 47, 62) // #232F3E
}
fn dark_gray() -> Color {
    rgb(104, 112, 120) // #687078
}
fn light_gray() -> Color {
    rgb(234, 237, 237) // #EAEDED
}
fn green() -> Color {
    rgb(46, 125, 50)
}
fn red() -> Color {
    rgb(198, 40, 40)
}
fn black() -> Color {
    rgb(0, 0, 0)
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Render the report as an A4 PDF at `path`.
pub fn write_pdf(report: &CostReport, path: &Path) -> Result<()> {
    let mut page = PageWriter::new("AWS Cost Report")?;

    page.text(MARGIN, "AWS Cost Report", 22.0, dark_blue(), true);
    page.advance(8.0);
    page.text(
        MARGIN,
        &format!("Period: {} to {}", report.anchor.start, report.anchor.end),
        11.0,
        black(),
        false,
    );
    page.advance(6.0);
    page.text(
        MARGIN,
        &format!(
            "Generated on: {}",
            chrono::Local::now().format("%B %d, %Y at %I:%M %p")
        ),
        9.0,
        dark_gray(),
        false,
    );
    page.advance(4.0);
    page.rule(orange());

    // Executive summary
    page.section("Executive Summary");
    page.row(
        &format!("{} Cost", report.anchor.label),
        &format_optional_money(report.anchor.total_cost()),
    );
    page.row(
        "Quarterly Total (3 months)",
        &format_optional_money(report.quarter_total),
    );
    page.row(
        "Average Monthly",
        &format_optional_money(report.quarter_average),
    );
    let savings_total = report.savings.as_ref().and_then(|s| s.total());
    page.row("Monthly Savings", &format_optional_money(savings_total));
    page.row(
        "Cost Optimization Rate",
        &format_optional_percent(report.optimization_rate),
    );

    // Coverage
    page.section("Coverage");
    page.coverage_row("Savings Plans Coverage", report.anchor.savings_plan_coverage);
    page.coverage_row(
        "Reserved Instance Coverage",
        report.anchor.reservation_coverage,
    );

    page.trend_section("3-Month Savings Plans Trend", &report.savings_plan_trend);
    page.trend_section("3-Month Reservations Trend", &report.reservation_trend);

    // Month over month
    if let Some(delta) = &report.month_over_month {
        page.section("Month over Month");
        page.row(
            &delta.previous_label,
            &format_optional_money(report.prior.last().and_then(|m| m.total_cost())),
        );
        page.row(
            &report.anchor.label,
            &format_optional_money(report.anchor.total_cost()),
        );
        let percent = delta
            .percent
            .map(|p| format!(" ({}%)", format_signed(p)))
            .unwrap_or_default();
        page.row("Change", &format!("{}{}", format_money(delta.change), percent));
    }

    // Savings breakdown
    if let Some(savings) = &report.savings {
        page.section("Savings Breakdown");
        let total = savings.total();
        for (label, amount) in savings.entries() {
            let share = match (amount, total) {
                (Some(amount), Some(total)) if total > 0.0 => {
                    format!(" ({})", format_percent(amount / total * 100.0))
                }
                _ => String::new(),
            };
            page.row(label, &format!("{}{}", format_optional_money(amount), share));
        }
    }

    // Per-service costs
    if let Some(cost) = &report.anchor.cost {
        page.section("Cost by Service");
        for service in cost.services_sorted() {
            page.row(&service.service, &format_money(service.amount));
        }
    }

    // Rightsizing
    if let Some(suggestions) = &report.rightsizing {
        page.section("Rightsizing Recommendations");
        if suggestions.is_empty() {
            page.text(MARGIN, "No recommendations.", 10.0, dark_gray(), false);
            page.advance(6.0);
        } else {
            for suggestion in suggestions {
                let line = format!(
                    "{}  {}  {}  {}",
                    suggestion.resource_id,
                    suggestion.action,
                    suggestion.current_instance_type.as_deref().unwrap_or("-"),
                    format_optional_money(suggestion.estimated_monthly_savings)
                );
                page.text(MARGIN, &line, 10.0, black(), false);
                page.advance(6.0);
            }
        }
    }

    // Degradation notes
    let warnings: Vec<&String> = report
        .anchor
        .warnings
        .iter()
        .chain(report.savings.iter().flat_map(|s| s.warnings.iter()))
        .collect();
    if !warnings.is_empty() {
        page.section("Data Availability Notes");
        for warning in warnings {
            page.text(MARGIN, warning, 9.0, dark_gray(), false);
            page.advance(5.0);
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    page.doc
        .save(&mut BufWriter::new(file))
        .context("Failed to write PDF document")?;
    Ok(())
}

/// Cursor-based page writer: text flows top to bottom, a new page is added
/// when a section would not fit.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .context("Failed to load builtin font")?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .context("Failed to load builtin font")?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    fn text(&mut self, x: f32, text: &str, size: f32, color: Color, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn section(&mut self, title: &str) {
        self.ensure_space(22.0);
        self.advance(10.0);
        self.text(MARGIN, title, 14.0, orange(), true);
        self.advance(7.0);
        self.rule(light_gray());
    }

    fn row(&mut self, label: &str, value: &str) {
        self.ensure_space(8.0);
        self.text(MARGIN, label, 10.0, black(), false);
        self.text(MARGIN + VALUE_COLUMN, value, 10.0, dark_blue(), false);
        self.advance(6.0);
    }

    fn coverage_row(&mut self, label: &str, coverage: Option<f64>) {
        match coverage {
            Some(percent) => {
                let color = if percent >= 70.0 {
                    green()
                } else if percent >= 50.0 {
                    orange()
                } else {
                    red()
                };
                self.ensure_space(8.0);
                self.text(MARGIN, label, 10.0, black(), false);
                let value = format!(
                    "{} ({})",
                    format_percent(percent),
                    coverage_status(percent)
                );
                self.text(MARGIN + VALUE_COLUMN, &value, 10.0, color, false);
                self.advance(6.0);
            }
            None => self.row(label, "N/A"),
        }
    }

    fn trend_section(&mut self, title: &str, trend: &TrendResult) {
        self.section(title);
        for (index, point) in trend.points.iter().enumerate() {
            self.ensure_space(8.0);
            self.text(MARGIN, &point.label, 10.0, black(), false);
            self.text(
                MARGIN + VALUE_COLUMN,
                &format_optional_percent(point.value),
                10.0,
                dark_blue(),
                false,
            );
            if index > 0 {
                if let Some(step) = trend.steps.get(index - 1) {
                    let color = match step.direction {
                        TrendDirection::Up => green(),
                        TrendDirection::Down => red(),
                        _ => dark_gray(),
                    };
                    let delta = step
                        .delta
                        .map(|d| format!("{} {}", direction_word(step.direction), format_signed(d)))
                        .unwrap_or_else(|| direction_word(step.direction).to_string());
                    self.text(MARGIN + VALUE_COLUMN + 30.0, &delta, 10.0, color, false);
                }
            }
            self.advance(6.0);
        }
    }

    fn rule(&mut self, color: Color) {
        self.layer.set_outline_color(color);
        self.layer.set_outline_thickness(1.0);
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
        self.advance(5.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::{CostSummary, MonthCost, ServiceCost};
    use crate::core::month::{trailing_window, Month, MonthRange};
    use crate::core::report;

    fn make_report() -> CostReport {
        let ranges = trailing_window(MonthRange::of(2026, Month::January), 3);
        let months = ranges
            .iter()
            .enumerate()
            .map(|(index, range)| {
                let mut summary = CostSummary::empty(range);
                summary.cost = Some(MonthCost {
                    total: 100.0 + index as f64,
                    by_service: vec![ServiceCost {
                        service: "Amazon Elastic Compute Cloud - Compute".to_string(),
                        amount: 100.0,
                    }],
                });
                summary.savings_plan_coverage = Some(40.0 + index as f64);
                summary
            })
            .collect();
        report::build(months, None, None)
    }

    #[test]
    fn writes_a_pdf_file() {
        let report = make_report();
        let path = std::env::temp_dir().join("costscope-pdf-smoke-test.pdf");
        write_pdf(&report, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        std::fs::remove_file(&path).ok();
    }
}
