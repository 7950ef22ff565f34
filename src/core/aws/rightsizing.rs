use super::{classify, CostExplorerClient, FetchError};
use crate::core::models::savings::RightsizingSuggestion;

impl CostExplorerClient {
    /// EC2 rightsizing recommendations for the account. Not tied to the
    /// report month: the service only knows the current fleet.
    pub async fn rightsizing(&self) -> Result<Vec<RightsizingSuggestion>, FetchError> {
        let response = self
            .client
            .get_rightsizing_recommendation()
            .service("AmazonEC2")
            .send()
            .await
            .map_err(|e| classify(&e, "Failed to query rightsizing recommendations"))?;

        let suggestions = response
            .rightsizing_recommendations()
            .iter()
            .map(|recommendation| {
                let current = recommendation.current_instance();
                let resource_id = current
                    .and_then(|instance| instance.resource_id())
                    .unwrap_or("unknown")
                    .to_string();
                let current_instance_type = current
                    .and_then(|instance| instance.resource_details())
                    .and_then(|details| details.ec2_resource_details())
                    .and_then(|details| details.instance_type())
                    .map(str::to_string);

                let action = recommendation
                    .rightsizing_type()
                    .map(|kind| kind.as_str())
                    .unwrap_or("UNKNOWN")
                    .to_string();

                let estimated_monthly_savings = if action == "TERMINATE" {
                    recommendation
                        .terminate_recommendation_detail()
                        .and_then(|detail| detail.estimated_monthly_savings())
                        .and_then(|amount| amount.parse::<f64>().ok())
                } else {
                    // Modify recommendations rank target instances best-first.
                    recommendation
                        .modify_recommendation_detail()
                        .and_then(|detail| detail.target_instances().first())
                        .and_then(|target| target.estimated_monthly_savings())
                        .and_then(|amount| amount.parse::<f64>().ok())
                };

                RightsizingSuggestion {
                    resource_id,
                    action,
                    current_instance_type,
                    estimated_monthly_savings,
                }
            })
            .collect();

        Ok(suggestions)
    }
}
