use aws_sdk_costexplorer::types::{Dimension, DimensionValues, Expression, Granularity};

use super::{classify, date_interval, degrade, CostExplorerClient, FetchError};
use crate::core::models::savings::SavingsBreakdown;
use crate::core::month::MonthRange;

const RDS_SERVICE: &str = "Amazon Relational Database Service";
const OPENSEARCH_SERVICE: &str = "Amazon OpenSearch Service";

impl CostExplorerClient {
    /// Net savings per optimization source for the month. Every source is
    /// queried independently; a failing or empty source stays absent.
    pub async fn savings_breakdown(
        &self,
        range: &MonthRange,
    ) -> Result<SavingsBreakdown, FetchError> {
        let mut breakdown = SavingsBreakdown::default();

        breakdown.savings_plans = degrade(
            self.savings_plan_net_savings(range).await,
            "Savings Plans",
            &mut breakdown.warnings,
        )?
        .flatten();

        breakdown.rds_reservations = degrade(
            self.reservation_net_savings(range, RDS_SERVICE).await,
            "RDS Reservations",
            &mut breakdown.warnings,
        )?
        .flatten();

        breakdown.opensearch_reservations = degrade(
            self.reservation_net_savings(range, OPENSEARCH_SERVICE).await,
            "OpenSearch Reservations",
            &mut breakdown.warnings,
        )?
        .flatten();

        breakdown.credits = degrade(
            self.credit_savings(range).await,
            "Credit Savings",
            &mut breakdown.warnings,
        )?
        .flatten();

        Ok(breakdown)
    }

    async fn savings_plan_net_savings(
        &self,
        range: &MonthRange,
    ) -> Result<Option<f64>, FetchError> {
        let response = self
            .client
            .get_savings_plans_utilization()
            .time_period(date_interval(range)?)
            .granularity(Granularity::Monthly)
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query Savings Plans utilization"))?;

        let periods = response.savings_plans_utilizations_by_time();
        if periods.is_empty() {
            return Ok(None);
        }

        let total: f64 = periods
            .iter()
            .filter_map(|period| period.savings())
            .filter_map(|savings| savings.net_savings())
            .filter_map(|amount| amount.parse::<f64>().ok())
            .sum();
        Ok(Some(total))
    }

    async fn reservation_net_savings(
        &self,
        range: &MonthRange,
        service: &str,
    ) -> Result<Option<f64>, FetchError> {
        let service_filter = Expression::builder()
            .dimensions(
                DimensionValues::builder()
                    .key(Dimension::Service)
                    .values(service)
                    .build(),
            )
            .build();

        let response = self
            .client
            .get_reservation_utilization()
            .time_period(date_interval(range)?)
            .filter(service_filter)
            .granularity(Granularity::Monthly)
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query reservation utilization"))?;

        let periods = response.utilizations_by_time();
        if periods.is_empty() {
            return Ok(None);
        }

        let total: f64 = periods
            .iter()
            .filter_map(|period| period.total())
            .filter_map(|aggregates| aggregates.net_ri_savings())
            .filter_map(|amount| amount.parse::<f64>().ok())
            .sum();
        Ok(Some(total))
    }

    /// Credits applied during the month. Credit line items come back as
    /// negative amounts, so the absolute value is the saving.
    async fn credit_savings(&self, range: &MonthRange) -> Result<Option<f64>, FetchError> {
        let credit_filter = Expression::builder()
            .dimensions(
                DimensionValues::builder()
                    .key(Dimension::RecordType)
                    .values("Credit")
                    .build(),
            )
            .build();

        let response = self
            .client
            .get_cost_and_usage()
            .time_period(date_interval(range)?)
            .granularity(Granularity::Monthly)
            .metrics("UnblendedCost")
            .filter(credit_filter)
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query credit savings"))?;

        let periods = response.results_by_time();
        if periods.is_empty() {
            return Ok(None);
        }

        let total: f64 = periods
            .iter()
            .filter_map(|period| period.total())
            .filter_map(|metrics| metrics.get("UnblendedCost"))
            .filter_map(|metric| metric.amount())
            .filter_map(|amount| amount.parse::<f64>().ok())
            .map(f64::abs)
            .sum();
        Ok(Some(total))
    }
}
