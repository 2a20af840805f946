pub mod catalog_store;
pub mod config_store;

pub use catalog_store::{CatalogStore, CATALOG_FILE};
pub use config_store::{ConfigStoreError, PackageConfigStore};
