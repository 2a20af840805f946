use crate::domain::entities::SiteOptions;
use crate::infrastructure::process::{CommandExecutor, CommandExecutorError, ExecutionConfig, ExecutionResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Member ordering used across the whole site.
pub const DEFAULT_SORT: [&str; 5] = [
    "kind",
    "visibility",
    "instance-first",
    "required-first",
    "alphabetical",
];

const REFLECTION_FILE: &str = "reflection.json";
const CONVERT_OPTIONS_FILE: &str = "convert-options.json";
const GENERATE_OPTIONS_FILE: &str = "generate-options.json";

/// Documentation compiler errors
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("Could not run the documentation compiler: {0}")]
    Spawn(#[from] CommandExecutorError),

    #[error("Documentation compiler rejected its options (exit code {exit_code}): {output}")]
    Bootstrap { exit_code: i32, output: String },

    #[error("Conversion failed with exit code {exit_code}: {output}")]
    ConvertFailed { exit_code: i32, output: String },

    #[error("Writing docs failed with exit code {exit_code}: {output}")]
    GenerateFailed { exit_code: i32, output: String },

    #[error("Malformed project reflection at {path}: {source}")]
    MalformedReflection {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize compiler options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// How the compiler interprets its entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPointStrategy {
    /// Each entry point is a package root with its own `typedoc.json`
    Packages,
    /// Entry points are JSON reflections to merge and render
    Merge,
}

/// サイト全体に適用するルートオプション
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootOptions {
    /// 出力ディレクトリ
    pub out: PathBuf,

    /// メンバーの並び順
    pub sort: Vec<String>,

    /// 有効化するプラグイン
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugin: Vec<String>,

    /// 報告する最小ログレベル
    pub log_level: String,

    /// 製品名
    pub name: String,

    /// 公開先の正規URL
    pub hosted_base_url: String,

    /// エントリポイントの解釈方法
    pub entry_point_strategy: EntryPointStrategy,

    /// 各パッケージのバージョンをページに埋め込むか
    pub include_version: bool,
}

impl RootOptions {
    /// Options for the site described by `site`, written to `out`.
    pub fn from_site(site: &SiteOptions, out: PathBuf) -> Self {
        Self {
            out,
            sort: DEFAULT_SORT.iter().map(|s| s.to_string()).collect(),
            plugin: site.plugins.clone(),
            log_level: site.log_level.clone(),
            name: site.name.clone(),
            hosted_base_url: site.hosted_base_url.clone(),
            entry_point_strategy: EntryPointStrategy::Packages,
            include_version: true,
        }
    }

    fn to_map(&self) -> Result<Map<String, Value>, CompilerError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Result of a conversion pass, persisted as JSON on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReflection {
    /// Location of the serialized reflection
    pub path: PathBuf,

    /// Project name recorded by the compiler
    pub name: Option<String>,

    /// Number of top-level children (one per documented package)
    pub child_count: usize,
}

/// The documentation compiler: one conversion pass, then one write
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocCompiler: Send + Sync {
    /// Convert all `entry_points` at once; `None` when nothing was produced
    async fn convert(
        &self,
        entry_points: &[PathBuf],
        options: &RootOptions,
    ) -> Result<Option<ProjectReflection>, CompilerError>;

    /// Render `reflection` into `options.out`
    async fn generate_docs(
        &self,
        reflection: &ProjectReflection,
        options: &RootOptions,
    ) -> Result<(), CompilerError>;
}

/// TypeDoc driven through its command line
pub struct TypedocCli {
    program: String,
    prefix_args: Vec<String>,
    work_dir: PathBuf,
}

impl TypedocCli {
    /// `npx typedoc`, keeping intermediate files in `work_dir`
    pub fn npx(work_dir: impl Into<PathBuf>) -> Self {
        Self::new("npx", ["typedoc"], work_dir)
    }

    /// Any launcher plus the arguments that precede `--options`
    pub fn new<I, S>(program: impl Into<String>, prefix_args: I, work_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            prefix_args: prefix_args.into_iter().map(Into::into).collect(),
            work_dir: work_dir.into(),
        }
    }

    /// Where the conversion pass leaves its reflection
    pub fn reflection_path(&self) -> PathBuf {
        self.work_dir.join(REFLECTION_FILE)
    }

    async fn write_options(&self, file_name: &str, options: &Map<String, Value>) -> Result<PathBuf, CompilerError> {
        tokio::fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|source| io_error(&self.work_dir, source))?;

        let path = self.work_dir.join(file_name);
        let mut text = serde_json::to_string_pretty(options)?;
        text.push('\n');
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| io_error(&path, source))?;
        Ok(path)
    }

    async fn run(&self, options_path: &Path) -> Result<ExecutionResult, CompilerError> {
        let mut args = self.prefix_args.clone();
        args.push("--options".to_string());
        args.push(options_path.display().to_string());

        let result = CommandExecutor::execute(&self.program, &args, &ExecutionConfig::new()).await?;
        surface_diagnostics(&result);
        Ok(result)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> CompilerError {
    CompilerError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Re-emits compiler diagnostics through `tracing`; none of them is fatal.
fn surface_diagnostics(result: &ExecutionResult) {
    for line in result.output_lines() {
        if line.contains("[warning]") || line.contains("[error]") {
            warn!("{}", line.trim());
        } else if !line.trim().is_empty() {
            debug!("{}", line.trim());
        }
    }
}

fn combined_output(result: &ExecutionResult) -> String {
    result.output_lines().collect::<Vec<_>>().join("\n")
}

#[async_trait]
impl DocCompiler for TypedocCli {
    async fn convert(
        &self,
        entry_points: &[PathBuf],
        options: &RootOptions,
    ) -> Result<Option<ProjectReflection>, CompilerError> {
        let reflection_path = self.reflection_path();
        match tokio::fs::remove_file(&reflection_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&reflection_path, e)),
        }

        let mut map = options.to_map()?;
        map.remove("out");
        map.insert(
            "entryPoints".to_string(),
            Value::Array(
                entry_points
                    .iter()
                    .map(|p| Value::String(p.display().to_string()))
                    .collect(),
            ),
        );
        map.insert(
            "json".to_string(),
            Value::String(reflection_path.display().to_string()),
        );

        let options_path = self.write_options(CONVERT_OPTIONS_FILE, &map).await?;
        let result = self.run(&options_path).await?;

        match result.exit_code {
            0 => {}
            // Options could not be read or validated
            1 => {
                return Err(CompilerError::Bootstrap {
                    exit_code: result.exit_code,
                    output: combined_output(&result),
                })
            }
            // No entry points / nothing converted
            2 | 3 => return Ok(None),
            exit_code => {
                return Err(CompilerError::ConvertFailed {
                    exit_code,
                    output: combined_output(&result),
                })
            }
        }

        let text = match tokio::fs::read_to_string(&reflection_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&reflection_path, e)),
        };

        let project: Value =
            serde_json::from_str(&text).map_err(|source| CompilerError::MalformedReflection {
                path: reflection_path.display().to_string(),
                source,
            })?;

        Ok(Some(ProjectReflection {
            name: project
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string),
            child_count: project
                .get("children")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
            path: reflection_path,
        }))
    }

    async fn generate_docs(
        &self,
        reflection: &ProjectReflection,
        options: &RootOptions,
    ) -> Result<(), CompilerError> {
        let mut map = options.to_map()?;
        map.insert(
            "entryPointStrategy".to_string(),
            serde_json::to_value(EntryPointStrategy::Merge)?,
        );
        map.insert(
            "entryPoints".to_string(),
            Value::Array(vec![Value::String(reflection.path.display().to_string())]),
        );

        let options_path = self.write_options(GENERATE_OPTIONS_FILE, &map).await?;
        let result = self.run(&options_path).await?;

        if !result.success {
            return Err(CompilerError::GenerateFailed {
                exit_code: result.exit_code,
                output: combined_output(&result),
            });
        }

        Ok(())
    }
}
