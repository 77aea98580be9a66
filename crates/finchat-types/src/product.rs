//! Products recommended by the dashboard.
//!
//! The assistant scopes a chat session to the products currently shown to
//! the client; their ids are the context identifiers sent on start-chat.

use serde::{Deserialize, Serialize};

/// A product the dashboard recommends to the signed-in client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Context identifiers for a chat session, in recommendation order.
///
/// No products means an empty id list, which the service accepts.
pub fn context_ids(products: &[RecommendedProduct]) -> Vec<i64> {
    products.iter().map(|product| product.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_keep_order() {
        let products: Vec<RecommendedProduct> = serde_json::from_str(
            r#"[
                {"id": 7, "name": "Savings account"},
                {"id": 3, "name": "FX forward", "description": "EUR/PLN hedge"}
            ]"#,
        )
        .unwrap();
        assert_eq!(context_ids(&products), vec![7, 3]);
        assert_eq!(products[1].description.as_deref(), Some("EUR/PLN hedge"));
    }

    #[test]
    fn test_context_ids_empty() {
        assert!(context_ids(&[]).is_empty());
    }
}
