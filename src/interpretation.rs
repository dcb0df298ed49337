use crate::model::ClusterId;

pub const FEATURE_AGE: &str = "Age";
pub const FEATURE_INCOME: &str = "Annual Income (k$)";
pub const FEATURE_SPENDING: &str = "Spending Score (1-100)";
pub const FEATURE_MALE: &str = "Genre_Male";

const CLUSTER_NAMES: [&str; 5] = [
    "High-Value Customers",
    "Standard Customers",
    "Budget Spenders",
    "Affluent but Cautious",
    "Low-Engagement Customers",
];

const FALLBACK_INTERPRETATION: &str =
    "See your cluster profile above for details.";

/// Marketing name of a segment; ids without one get "Cluster N".
pub fn cluster_name(cluster: ClusterId) -> String {
    usize::try_from(cluster.0)
        .ok()
        .and_then(|i| CLUSTER_NAMES.get(i))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Cluster {cluster}"))
}

pub fn interpretation(name: &str) -> &'static str {
    match name {
        "High-Value Customers" => {
            "Premium customers with high income and high spending. \
             Your best customers for premium products and services."
        }
        "Standard Customers" => {
            "Regular customers with average income and spending. \
             Good target for promotions and loyalty programs."
        }
        "Budget Spenders" => {
            "Cost-conscious customers despite lower income. \
             Ideal for value-oriented products and discounts."
        }
        "Affluent but Cautious" => {
            "High earners who don't spend much. \
             Great opportunity for engagement campaigns."
        }
        "Low-Engagement Customers" => {
            "Minimal spending despite moderate income. \
             Opportunity for re-engagement campaigns."
        }
        _ => FALLBACK_INTERPRETATION,
    }
}

/// Label for a cluster-profile feature; unknown names pass through.
pub fn feature_label(feature: &str) -> &str {
    match feature {
        FEATURE_AGE => "Average Age",
        FEATURE_INCOME => "Average Income",
        FEATURE_SPENDING => "Average Spending Score",
        FEATURE_MALE => "Male Percentage",
        other => other,
    }
}
