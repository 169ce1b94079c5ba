//! Category and type catalog.
//!
//! Categories are fetched once per form session. The flattened type list is
//! derived from the same response and stored alongside it, so types are never
//! visible without the categories they came from. Asking for types first
//! performs the category load.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use deposit_core::{Category, Error, JsonFetcher, QueryParams, Result, TypeEntry};

#[derive(Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    metadata: CategoryMetadata,
}

#[derive(Deserialize)]
struct CategoryMetadata {
    name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Categories together with the type list derived from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    pub categories: Vec<Category>,
    pub types: Vec<TypeEntry>,
}

impl CategorySet {
    /// Build both collections, types in category order then declared order.
    fn from_hits(hits: Vec<SearchHit>) -> Self {
        let types = hits
            .iter()
            .flat_map(|hit| {
                hit.metadata.types.iter().map(|t| TypeEntry {
                    name: t.clone(),
                    value: t.clone(),
                    category: hit.metadata.name.clone(),
                })
            })
            .collect();

        let categories = hits
            .into_iter()
            .map(|hit| Category {
                value: hit.metadata.name.clone(),
                name: hit.metadata.name,
                types: hit.metadata.types,
            })
            .collect();

        Self { categories, types }
    }
}

/// Session-scoped memo of the category search.
pub struct CategoryCatalog {
    fetcher: Arc<dyn JsonFetcher>,
    url: String,
    cell: OnceCell<CategorySet>,
}

impl CategoryCatalog {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
            cell: OnceCell::new(),
        }
    }

    /// Whether the category search has completed.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Fetch categories on first use and return the cached set afterwards.
    ///
    /// Concurrent first callers share one request. A failed fetch is not
    /// cached and the next call tries again.
    #[instrument(skip(self), fields(subsystem = "autocomplete", component = "categories", op = "load_categories", url = %self.url))]
    pub async fn load(&self) -> Result<&CategorySet> {
        if let Some(set) = self.cell.get() {
            debug!("Category cache hit");
            return Ok(set);
        }
        self.cell
            .get_or_try_init(|| async {
                let response = self.fetcher.get_json(&self.url, &QueryParams::new()).await?;
                let response: SearchResponse = serde_json::from_value(response)?;
                let set = CategorySet::from_hits(response.hits.hits);
                info!(
                    categories = set.categories.len(),
                    types = set.types.len(),
                    "Categories loaded"
                );
                Ok::<_, Error>(set)
            })
            .await
    }

    /// All categories.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.load().await?.categories.clone())
    }

    /// All types, each tagged with its category. Loads categories if needed.
    pub async fn types(&self) -> Result<Vec<TypeEntry>> {
        Ok(self.load().await?.types.clone())
    }
}
