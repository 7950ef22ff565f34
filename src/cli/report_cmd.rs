use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::{pdf, renderer};
use crate::core::aws::{CostExplorerClient, FetchError};
use crate::core::config::AppConfig;
use crate::core::models::cost::CostSummary;
use crate::core::month::{self, MonthRange};
use crate::core::report;

#[derive(Default)]
pub struct ReportArgs {
    pub month: Option<String>,
    pub year: Option<i32>,
    pub output: Option<PathBuf>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub no_pdf: bool,
}

pub async fn run(args: ReportArgs, config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    let today = chrono::Local::now().date_naive();

    let anchor = match &args.month {
        Some(token) => match month::resolve(token, args.year, today) {
            Ok(range) => range,
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        },
        None => MonthRange::containing(today),
    };
    let windows = month::trailing_window(anchor, 3);

    let profile = args.profile.or_else(|| config.aws.profile.clone());
    let region = args.region.unwrap_or_else(|| config.aws.region.clone());

    let text_mode = matches!(opts.format, OutputFormat::Text);
    if text_mode {
        eprintln!("Generating cost report for {}", anchor.label());
        eprintln!("Fetching cost data from AWS Cost Explorer...");
    }

    let client = CostExplorerClient::new(profile.as_deref(), &region).await;

    // Fetch the three month windows concurrently. Each task reports back
    // under its month label so completion order can never mislabel a trend
    // point.
    let handles: Vec<_> = windows
        .iter()
        .map(|range| {
            let client = client.clone();
            let range = *range;
            tokio::spawn(async move {
                let result = client.fetch_month(&range).await;
                (range.label(), result)
            })
        })
        .collect();

    let mut by_label: HashMap<String, CostSummary> = HashMap::new();
    for handle in handles {
        let (label, result) = handle.await?;
        by_label.insert(label, result?);
    }

    let months: Vec<CostSummary> = windows
        .iter()
        .map(|range| {
            by_label
                .remove(&range.label())
                .unwrap_or_else(|| CostSummary::empty(range))
        })
        .collect();

    // Anchor-only extras: savings sources and rightsizing.
    let (savings, rightsizing) =
        tokio::join!(client.savings_breakdown(&anchor), client.rightsizing());
    let savings = flatten_extra(savings, "Savings breakdown", opts)?;
    let rightsizing = flatten_extra(rightsizing, "Rightsizing", opts)?;

    let report = report::build(months, savings, rightsizing);

    // Partial data is fine; an anchor month with nothing at all means the
    // fetch failed outright.
    if !report.anchor.has_any_data() {
        anyhow::bail!(
            "No cost data could be fetched for {}: {}",
            report.anchor.label,
            report.anchor.warnings.join("; ")
        );
    }

    match opts.format {
        OutputFormat::Text => {
            println!("{}", renderer::render_report(&report, opts.use_color));
            if opts.verbose {
                for month in &report.prior {
                    for warning in &month.warnings {
                        eprintln!("{}: {}", month.label, warning);
                    }
                }
            }
        }
        OutputFormat::Json => {
            let json = if opts.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{}", json);
        }
    }

    if !args.no_pdf {
        let path = args
            .output
            .unwrap_or_else(|| PathBuf::from(format!("{}.pdf", anchor.file_stem())));
        pdf::write_pdf(&report, &path)?;
        if text_mode {
            eprintln!("Report written to {}", path.display());
        }
    }

    Ok(())
}

/// Anchor extras degrade to absence like any other capability; only a
/// credential rejection aborts the run.
fn flatten_extra<T>(
    result: Result<T, FetchError>,
    what: &str,
    opts: &OutputOptions,
) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ FetchError::Credentials { .. }) => Err(err.into()),
        Err(err) => {
            if opts.verbose {
                eprintln!("{} unavailable: {}", what, err);
            }
            Ok(None)
        }
    }
}
