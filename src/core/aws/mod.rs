pub mod cost;
pub mod coverage;
pub mod rightsizing;
pub mod savings;

use anyhow::Context;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_costexplorer::types::DateInterval;
use aws_sdk_costexplorer::Client;
use thiserror::Error;

use crate::core::models::cost::CostSummary;
use crate::core::month::MonthRange;

/// Service error codes that mean the caller's credentials are bad, as
/// opposed to a single capability being unavailable.
const CREDENTIAL_CODES: [&str; 4] = [
    "AccessDeniedException",
    "UnrecognizedClientException",
    "ExpiredTokenException",
    "InvalidClientTokenId",
];

#[derive(Error, Debug)]
pub enum FetchError {
    /// Fatal: the service rejected our credentials. Nothing else will work.
    #[error("AWS credentials rejected ({code}): {message}")]
    Credentials { code: String, message: String },
    /// A single query failed; the caller degrades the field and moves on.
    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

/// Thin wrapper over the Cost Explorer SDK client. Query methods live in the
/// sibling modules, one per concern.
#[derive(Clone)]
pub struct CostExplorerClient {
    pub(crate) client: Client,
}

impl CostExplorerClient {
    pub async fn new(profile: Option<&str>, region: &str) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Fetch everything we report per month. Each capability is queried
    /// independently: a failure or missing feature becomes a `None` field
    /// plus a warning, except credential rejection, which is fatal.
    pub async fn fetch_month(&self, range: &MonthRange) -> Result<CostSummary, FetchError> {
        let mut summary = CostSummary::empty(range);

        summary.cost = degrade(
            self.month_cost(range).await,
            "Cost and usage",
            &mut summary.warnings,
        )?;

        summary.savings_plan_coverage = degrade(
            self.savings_plan_coverage(range).await,
            "Savings Plans coverage",
            &mut summary.warnings,
        )?
        .flatten();

        summary.reservation_coverage = degrade(
            self.reservation_coverage(range).await,
            "Reservation coverage",
            &mut summary.warnings,
        )?
        .flatten();

        Ok(summary)
    }
}

/// Convert a per-capability failure into an absence + warning, letting only
/// credential rejection escape.
pub(crate) fn degrade<T>(
    result: Result<T, FetchError>,
    what: &str,
    warnings: &mut Vec<String>,
) -> Result<Option<T>, FetchError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ FetchError::Credentials { .. }) => Err(err),
        Err(err) => {
            warnings.push(format!("{}: {}", what, err));
            Ok(None)
        }
    }
}

pub(crate) fn classify<E>(err: &SdkError<E>, what: &str) -> FetchError
where
    E: ProvideErrorMetadata,
{
    let code = err.as_service_error().and_then(|e| e.code());
    let message = err.as_service_error().and_then(|e| e.message());

    if let Some(code) = code {
        if CREDENTIAL_CODES.contains(&code) {
            return FetchError::Credentials {
                code: code.to_string(),
                message: message.unwrap_or("access denied").to_string(),
            };
        }
    }

    let detail = match (code, message) {
        (Some(code), Some(message)) => format!("{} ({})", message, code),
        (Some(code), None) => code.to_string(),
        _ => err.to_string(),
    };
    FetchError::Query(anyhow::anyhow!("{}: {}", what, detail))
}

/// Cost Explorer treats the end of a time period as exclusive, so the wire
/// interval runs to the day after the month's last day.
pub(crate) fn date_interval(range: &MonthRange) -> Result<DateInterval, FetchError> {
    let end = range.end.succ_opt().expect("valid date");
    let interval = DateInterval::builder()
        .start(range.start.format("%Y-%m-%d").to_string())
        .end(end.format("%Y-%m-%d").to_string())
        .build()
        .context("Failed to build date interval")?;
    Ok(interval)
}

/// Average of the returned period values; `None` when the service returned
/// no periods at all (no data is not the same as 0%).
pub(crate) fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::month::{Month, MonthRange};

    #[test]
    fn average_of_empty_is_none() {
        assert!(average(&[]).is_none());
        assert_eq!(average(&[40.0, 42.0]), Some(41.0));
    }

    #[test]
    fn degrade_converts_query_errors_to_warnings() {
        let mut warnings = Vec::new();
        let result: Result<Option<f64>, FetchError> = degrade(
            Err(FetchError::Query(anyhow::anyhow!("no data for period"))),
            "Savings Plans coverage",
            &mut warnings,
        );
        assert!(matches!(result, Ok(None)));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Savings Plans coverage"));
        assert!(warnings[0].contains("no data for period"));
    }

    #[test]
    fn degrade_lets_credential_errors_escape() {
        let mut warnings = Vec::new();
        let result: Result<Option<f64>, FetchError> = degrade(
            Err(FetchError::Credentials {
                code: "UnrecognizedClientException".to_string(),
                message: "invalid token".to_string(),
            }),
            "Cost and usage",
            &mut warnings,
        );
        assert!(matches!(result, Err(FetchError::Credentials { .. })));
        assert!(warnings.is_empty());
    }

    #[test]
    fn date_interval_end_is_exclusive() {
        let range = MonthRange::of(2026, Month::January);
        let interval = date_interval(&range).unwrap();
        assert_eq!(interval.start(), "2026-01-01");
        assert_eq!(interval.end(), "2026-02-01");
    }

    #[test]
    fn date_interval_handles_leap_february() {
        let range = MonthRange::of(2024, Month::February);
        let interval = date_interval(&range).unwrap();
        assert_eq!(interval.end(), "2024-03-01");
    }
}
