use crate::infrastructure::docgen::{CompilerError, DocCompiler, RootOptions};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Compilation errors
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("No packages to document")]
    NoEntryPoints,

    #[error(transparent)]
    Compiler(#[from] CompilerError),
}

/// What `compile_all` produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The site was written to `out`
    Written { out: PathBuf, entry_points: usize },
    /// Conversion yielded nothing; no output was written
    NothingGenerated,
}

/// Runs the documentation compiler once across every package
pub struct DocBuilder {
    compiler: Arc<dyn DocCompiler>,
}

impl DocBuilder {
    /// 新しいDocBuilderインスタンスを作成
    pub fn new(compiler: Arc<dyn DocCompiler>) -> Self {
        Self { compiler }
    }

    /// One conversion pass over all `package_dirs`, then one write to `options.out`.
    pub async fn compile_all(
        &self,
        package_dirs: &[PathBuf],
        options: &RootOptions,
    ) -> Result<CompileOutcome, CompileError> {
        if package_dirs.is_empty() {
            return Err(CompileError::NoEntryPoints);
        }

        info!("Generating docs for {} entry points", package_dirs.len());
        let Some(reflection) = self.compiler.convert(package_dirs, options).await? else {
            warn!("Conversion produced nothing; no docs were generated");
            return Ok(CompileOutcome::NothingGenerated);
        };

        info!("Writing docs to {}", options.out.display());
        self.compiler.generate_docs(&reflection, options).await?;

        Ok(CompileOutcome::Written {
            out: options.out.clone(),
            entry_points: package_dirs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SiteOptions;
    use crate::infrastructure::docgen::typedoc::MockDocCompiler;
    use crate::infrastructure::docgen::ProjectReflection;
    use pretty_assertions::assert_eq;

    fn options() -> RootOptions {
        RootOptions::from_site(&SiteOptions::default(), PathBuf::from("/out"))
    }

    fn dirs() -> Vec<PathBuf> {
        vec![PathBuf::from("/r/core"), PathBuf::from("/r/ext")]
    }

    #[tokio::test]
    async fn test_converts_once_then_writes() {
        let mut compiler = MockDocCompiler::new();
        compiler
            .expect_convert()
            .withf(|entry_points, _| entry_points.len() == 2)
            .times(1)
            .returning(|_, _| {
                Ok(Some(ProjectReflection {
                    path: PathBuf::from("/work/reflection.json"),
                    name: Some("docs".to_string()),
                    child_count: 2,
                }))
            });
        compiler
            .expect_generate_docs()
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = DocBuilder::new(Arc::new(compiler))
            .compile_all(&dirs(), &options())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CompileOutcome::Written {
                out: PathBuf::from("/out"),
                entry_points: 2
            }
        );
    }

    #[tokio::test]
    async fn test_empty_conversion_skips_write() {
        let mut compiler = MockDocCompiler::new();
        compiler.expect_convert().returning(|_, _| Ok(None));
        compiler.expect_generate_docs().never();

        let outcome = DocBuilder::new(Arc::new(compiler))
            .compile_all(&dirs(), &options())
            .await
            .unwrap();
        assert_eq!(outcome, CompileOutcome::NothingGenerated);
    }

    #[tokio::test]
    async fn test_bootstrap_failure_writes_nothing() {
        let mut compiler = MockDocCompiler::new();
        compiler.expect_convert().returning(|_, _| {
            Err(CompilerError::Bootstrap {
                exit_code: 1,
                output: "Unknown option 'bogus'".to_string(),
            })
        });
        compiler.expect_generate_docs().never();

        let result = DocBuilder::new(Arc::new(compiler))
            .compile_all(&dirs(), &options())
            .await;
        assert!(matches!(
            result,
            Err(CompileError::Compiler(CompilerError::Bootstrap { .. }))
        ));
    }

    #[tokio::test]
    async fn test_no_packages_is_an_error() {
        let compiler = MockDocCompiler::new();
        let result = DocBuilder::new(Arc::new(compiler))
            .compile_all(&[], &options())
            .await;
        assert!(matches!(result, Err(CompileError::NoEntryPoints)));
    }
}
