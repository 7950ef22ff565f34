use std::collections::BTreeMap;

use aws_sdk_costexplorer::types::{Granularity, GroupDefinition, GroupDefinitionType};

use super::{classify, date_interval, CostExplorerClient, FetchError};
use crate::core::models::cost::{MonthCost, ServiceCost};
use crate::core::month::MonthRange;

impl CostExplorerClient {
    /// Total blended cost for the month plus a per-service breakdown.
    pub(crate) async fn month_cost(&self, range: &MonthRange) -> Result<MonthCost, FetchError> {
        let response = self
            .client
            .get_cost_and_usage()
            .time_period(date_interval(range)?)
            .granularity(Granularity::Monthly)
            .metrics("BlendedCost")
            .group_by(
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Dimension)
                    .key("SERVICE")
                    .build(),
            )
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query cost and usage"))?;

        let mut total = 0.0;
        let mut by_service: BTreeMap<String, f64> = BTreeMap::new();

        for result in response.results_by_time() {
            for group in result.groups() {
                let service = group
                    .keys()
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string());
                let amount = group
                    .metrics()
                    .and_then(|metrics| metrics.get("BlendedCost"))
                    .and_then(|metric| metric.amount())
                    .and_then(|amount| amount.parse::<f64>().ok())
                    .unwrap_or(0.0);
                total += amount;
                *by_service.entry(service).or_insert(0.0) += amount;
            }
        }

        Ok(MonthCost {
            total,
            by_service: by_service
                .into_iter()
                .map(|(service, amount)| ServiceCost { service, amount })
                .collect(),
        })
    }
}
