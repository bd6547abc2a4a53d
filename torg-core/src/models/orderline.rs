use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single order line. Immutable once ingested; identified by
/// `(order_nr, product_nr)`, which makes replayed ingestion a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orderline {
    pub order_nr: String,
    pub product_nr: String,
    pub customer_nr: String,
    #[serde(default)]
    pub season_name: String,
    pub date_time: DateTime<Utc>,
}

impl Orderline {
    /// Identity key used for replay detection.
    pub fn key(&self) -> (&str, &str) {
        (&self.order_nr, &self.product_nr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_camel_case() {
        let line = Orderline {
            order_nr: "o1".into(),
            product_nr: "p1".into(),
            customer_nr: "c1".into(),
            season_name: "winter".into(),
            date_time: Utc::now(),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert!(json.get("orderNr").is_some());
        assert!(json.get("seasonName").is_some());
    }
}
