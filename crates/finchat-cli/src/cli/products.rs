//! Context identifiers for a chat: `--product-id` flags plus an optional
//! JSON file of recommended products.

use std::path::Path;

use anyhow::Context;

use finchat_types::product::{context_ids, RecommendedProduct};

use super::ContextArgs;

/// Read a JSON array of recommended products.
pub async fn load_products(path: &Path) -> anyhow::Result<Vec<RecommendedProduct>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read products file {}", path.display()))?;
    let products = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse products file {}", path.display()))?;
    Ok(products)
}

/// Collect context ids: products from the file first, then `--product-id`
/// flags, keeping the first occurrence of each id.
pub async fn collect_context_ids(args: &ContextArgs) -> anyhow::Result<Vec<i64>> {
    let mut ids = match &args.products {
        Some(path) => context_ids(&load_products(path).await?),
        None => Vec::new(),
    };
    ids.extend_from_slice(&args.product_ids);

    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));

    tracing::debug!(count = ids.len(), "collected context ids");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn write_products(dir: &TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("products.json");
        tokio::fs::write(&path, json).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_products_parses_camel_case() {
        let tmp = TempDir::new().unwrap();
        let path = write_products(
            &tmp,
            r#"[{"id": 4, "name": "Gold Card", "description": "No annual fee"}, {"id": 7, "name": "Saver"}]"#,
        )
        .await;

        let products = load_products(&path).await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Gold Card");
        assert_eq!(products[1].description, None);
    }

    #[tokio::test]
    async fn test_load_products_reports_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = write_products(&tmp, "{not an array}").await;

        let err = load_products(&path).await.unwrap_err();
        assert!(err.to_string().contains("products.json"));
    }

    #[tokio::test]
    async fn test_collect_merges_file_and_flags_without_duplicates() {
        let tmp = TempDir::new().unwrap();
        let path = write_products(&tmp, r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#).await;
        let args = ContextArgs {
            product_ids: vec![2, 5],
            products: Some(path),
        };

        assert_eq!(collect_context_ids(&args).await.unwrap(), vec![1, 2, 5]);
    }

    #[tokio::test]
    async fn test_collect_with_nothing_is_empty() {
        let ids = collect_context_ids(&ContextArgs::default()).await.unwrap();
        assert!(ids.is_empty());
    }
}
