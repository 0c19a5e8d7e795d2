//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod metadata;
pub mod query;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub query: query::QueryService,
    pub metadata: metadata::MetadataService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, metadata: metadata::MetadataService) -> Self {
        let catalog = catalog::CatalogService::new(repository.clone());
        let circulation = circulation::CirculationService::new(repository.clone());
        Self {
            query: query::QueryService::new(catalog.clone(), circulation.clone()),
            catalog,
            circulation,
            metadata,
            repository,
        }
    }

    /// Check that the backing store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
