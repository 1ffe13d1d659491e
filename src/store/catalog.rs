//! Category configuration and rosters, as provided by the registration side

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::AppError;
use crate::models::{CategoryId, CategoryInfo, Participant};

/// Read access to category configuration and current rosters
pub trait CategoryCatalog {
    fn category(&self, id: CategoryId) -> Result<CategoryInfo, AppError>;

    /// Current roster of a category in seeding order
    fn roster(&self, id: CategoryId) -> Result<Vec<Participant>, AppError> {
        Ok(self.category(id)?.athletes)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryInfo>,
}

/// Catalog loaded from a JSON file `{ "categories": [ ... ] }`
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    categories: HashMap<CategoryId, CategoryInfo>,
}

impl JsonCatalog {
    pub fn from_categories(categories: impl IntoIterator<Item = CategoryInfo>) -> Self {
        Self {
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_categories(file.categories))
    }

    /// Loads the catalog from a JSON file
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let content = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded category catalog from {}: categories={}",
            path.display(),
            catalog.categories.len()
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl CategoryCatalog for JsonCatalog {
    fn category(&self, id: CategoryId) -> Result<CategoryInfo, AppError> {
        self.categories
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::category_not_found(id))
    }
}
