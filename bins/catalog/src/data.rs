//! Loading catalog exports from disk

use catalog_core::listing::ProductQuery;
use catalog_core::model::{Category, Product};
use catalog_core::{Error, Result, ResultExt};
use serde::de::DeserializeOwned;
use std::path::Path;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| Error::from(e).with_context(path.display().to_string()))
}

/// Read a JSON array of products
pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let products: Vec<Product> = load_json_array(path)?;
    tracing::debug!(path = %path.display(), count = products.len(), "Products loaded");
    Ok(products)
}

/// Read a JSON array of categories
pub fn load_categories(path: &Path) -> Result<Vec<Category>> {
    let categories: Vec<Category> = load_json_array(path)?;
    tracing::debug!(path = %path.display(), count = categories.len(), "Categories loaded");
    Ok(categories)
}

/// Read one listing query per line; blank lines and `#` comments are skipped
pub fn load_queries(path: &Path) -> Result<Vec<ProductQuery>> {
    let content = read_file(path)?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str::<ProductQuery>(line)
                .map_err(Error::from)
                .context(format!("{}:{}", path.display(), index + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::ErrorCode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_products() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"id": 1, "name": "Laptop", "sku": "LP-1", "price": 999.0, "quantity": 2}]"#,
        )
        .unwrap();

        let products = load_products(&path).unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].sku, "LP-1");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_products(Path::new("/no/such/products.json")).unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_load_malformed_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("categories.json");
        fs::write(&path, r#"[{"id": "one"}]"#).unwrap();

        let err = load_categories(&path).unwrap_err();

        assert_eq!(err.code, ErrorCode::DataParseError);
        assert!(err.context.unwrap().ends_with("categories.json"));
    }

    #[test]
    fn test_load_queries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.jsonl");
        fs::write(
            &path,
            "# warm-up\n{\"search\": \"laptop\"}\n\n{\"page\": 2, \"pageSize\": 5}\n",
        )
        .unwrap();

        let queries = load_queries(&path).unwrap();

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].search_text(), Some("laptop"));
        assert_eq!(queries[1].page, 2);
    }

    #[test]
    fn test_load_queries_reports_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("queries.jsonl");
        fs::write(&path, "{}\n{\"page\": \"two\"}\n").unwrap();

        let err = load_queries(&path).unwrap_err();

        assert_eq!(err.code, ErrorCode::DataParseError);
        assert!(err.context.unwrap().ends_with(":2"));
    }
}
