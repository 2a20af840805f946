pub mod catalog;
pub mod package_manifest;
pub mod source;
pub mod typedoc_config;

pub use catalog::{Catalog, CatalogError, PythonReferenceOptions, SiteOptions};
pub use package_manifest::{PackageManifest, PACKAGE_MANIFEST_FILE};
pub use source::{distinct_remotes, flatten_sources, Package, PackageGroup, Remote, Source};
pub use typedoc_config::{PackageDocConfig, TYPEDOC_CONFIG_FILE};
