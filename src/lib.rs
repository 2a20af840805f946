//! # refdocs - API reference site assembler
//!
//! `refdocs` builds a single API reference site for a family of JavaScript packages that live
//! in many git repositories. Packages are declared in a YAML catalog; every distinct
//! repository/branch pair is cloned once, dependencies are installed, a per-package TypeDoc
//! configuration is written, and one TypeDoc run renders the combined site.
//!
//! ## Quick Start
//!
//! 1. Describe the packages in `refdocs.yaml`:
//!
//! ```yaml
//! site:
//!   name: Example
//!   out: dist/javascript
//! sources:
//!   - package: "@example/core"
//!     path: libs/core
//!     repo: example/monorepo
//!   - group: Integrations
//!     items:
//!       - package: "@example/openai"
//!         path: libs/openai
//!         repo: example/monorepo
//!         branch: main
//! ```
//!
//! 2. Build the site:
//!
//! ```bash
//! refdocs build
//! ```
//!
//! Without a `refdocs.yaml` in the workspace the built-in catalog is used.
//!
//! ## Pipeline
//!
//! [`application::use_cases::BuildReferenceUseCase`] runs four phases. Work inside a phase is
//! concurrent, and a phase only starts after every task of the previous one has finished:
//!
//! 1. Sync ([`application::services::RepositorySynchronizer`]): clone or refresh each remote
//! 2. Install ([`application::services::DependencyInstaller`]): run the package manager
//! 3. Configure ([`application::services::ConfigMaterializer`]): write `typedoc.json` per package
//! 4. Compile ([`application::services::DocBuilder`]): convert and render the site
//!
//! The prebuilt Python reference is fetched separately by
//! [`application::use_cases::PythonReferenceUseCase`].
//!
//! ## Architecture
//!
//! - [`domain`]: Catalog, packages, remotes and the per-package doc config
//! - [`application`]: Pipeline phases and use cases
//! - [`infrastructure`]: git, GitHub API, package manager, TypeDoc and tarball adapters
//! - [`presentation`]: CLI interface
//! - [`common`]: Shared error handling
//!
//! ## Error Handling
//!
//! - [`common::error::RefdocsError`]: Main error type with detailed context
//! - [`common::result::RefdocsResult`]: Type alias for `Result<T, RefdocsError>`
//!
//! ## Examples
//!
//! ```rust,no_run
//! use refdocs::application::use_cases::{
//!     BuildReferenceConfig, BuildReferenceUseCase, PipelineAdapters,
//! };
//! use refdocs::domain::entities::Catalog;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let catalog = Catalog::builtin()?;
//! let config = BuildReferenceConfig::new(".");
//! let adapters = PipelineAdapters::production(&config, None)?;
//!
//! let report = BuildReferenceUseCase::new(config, adapters)
//!     .execute(&catalog)
//!     .await?;
//! println!("Configured {} packages", report.configs.len());
//! # Ok(())
//! # }
//! ```

// Documentation attributes
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::RefdocsError;
pub use crate::common::result::RefdocsResult as Result;
