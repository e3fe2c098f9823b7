//! Application context providing the dependency injection root.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::error::AppError;
use crate::source::ContentSource;

/// Shared, immutable catalog handle.
pub type AppCatalog = Arc<Catalog>;

/// Shared configuration handle.
pub type AppConfig = Arc<Config>;

/// Root application context for dependency injection.
///
/// `#[derive(Context)]` generates `FromRef` implementations for each field,
/// so services such as `QueryService` resolve at compile time.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// The loaded knowledge base.
    pub catalog: AppCatalog,
    /// Application configuration.
    pub config: AppConfig,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(catalog: Catalog, config: Config) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }

    /// Reads every configured content path and loads the catalog.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let source = ContentSource::from_paths(&config.content.effective_paths())?;
        let catalog = source.into_catalog()?;
        Ok(Self::new(catalog, config))
    }

    /// Resolve a service from the context.
    pub fn resolve<T: crate::FromRef<Context>>(&self) -> T {
        T::from_ref(self)
    }
}
