use aws_sdk_costexplorer::types::Granularity;

use super::{average, classify, date_interval, CostExplorerClient, FetchError};
use crate::core::month::MonthRange;

impl CostExplorerClient {
    /// Average Savings Plans coverage percentage over the period, or `None`
    /// when the account has no Savings Plans data for it.
    pub(crate) async fn savings_plan_coverage(
        &self,
        range: &MonthRange,
    ) -> Result<Option<f64>, FetchError> {
        let response = self
            .client
            .get_savings_plans_coverage()
            .time_period(date_interval(range)?)
            .granularity(Granularity::Monthly)
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query Savings Plans coverage"))?;

        let values: Vec<f64> = response
            .savings_plans_coverages()
            .iter()
            .filter_map(|entry| entry.coverage())
            .filter_map(|coverage| coverage.coverage_percentage())
            .filter_map(|percent| percent.parse::<f64>().ok())
            .collect();

        Ok(average(&values))
    }

    /// Average account-wide reserved-instance hours coverage percentage, or
    /// `None` when no reservations exist for the period.
    pub(crate) async fn reservation_coverage(
        &self,
        range: &MonthRange,
    ) -> Result<Option<f64>, FetchError> {
        let response = self
            .client
            .get_reservation_coverage()
            .time_period(date_interval(range)?)
            .granularity(Granularity::Monthly)
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query reservation coverage"))?;

        let values: Vec<f64> = response
            .coverages_by_time()
            .iter()
            .filter_map(|entry| entry.total())
            .filter_map(|total| total.coverage_hours())
            .filter_map(|hours| hours.coverage_hours_percentage())
            .filter_map(|percent| percent.parse::<f64>().ok())
            .collect();

        Ok(average(&values))
    }
}
