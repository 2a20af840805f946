//! Common test utilities and helpers
//!
//! Recording fakes for the pipeline adapters. Every fake appends to one shared
//! [`EventLog`] so tests can assert on the order calls happened in.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use refdocs::application::use_cases::{BuildReferenceConfig, PipelineAdapters};
use refdocs::domain::value_objects::RepoSlug;
use refdocs::infrastructure::docgen::{
    CompilerError, DocCompiler, ProjectReflection, RootOptions,
};
use refdocs::infrastructure::github::{CommitLookup, CommitLookupError};
use refdocs::infrastructure::package_manager::{PackageManager, PackageManagerError};
use refdocs::infrastructure::scm::{ScmError, ScmOperations};

/// Marker file the fake SCM stores the checked-out commit in
const HEAD_FILE: &str = "FAKE_HEAD";

/// Shared, ordered call history
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Events starting with `prefix`
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.starts_with(prefix))
            .collect()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.matching(prefix).len()
    }

    /// Index of the first and last event starting with `prefix`
    pub fn span(&self, prefix: &str) -> Option<(usize, usize)> {
        let events = self.events();
        let first = events.iter().position(|e| e.starts_with(prefix))?;
        let last = events.iter().rposition(|e| e.starts_with(prefix))?;
        Some((first, last))
    }

    /// Indices of every event starting with `prefix`
    pub fn positions(&self, prefix: &str) -> Vec<usize> {
        self.events()
            .iter()
            .enumerate()
            .filter(|(_, event)| event.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Commit lookup answering from a table, `"c1"` for anything unknown
pub struct FakeCommitLookup {
    log: EventLog,
    commits: Mutex<HashMap<String, String>>,
}

impl FakeCommitLookup {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            commits: Mutex::new(HashMap::new()),
        }
    }

    /// Move `repo@branch` to `commit` on the fake host
    pub fn set_commit(&self, key: &str, commit: &str) {
        self.commits
            .lock()
            .unwrap()
            .insert(key.to_string(), commit.to_string());
    }

    fn commit_for(&self, key: &str) -> String {
        self.commits
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or_else(|| "c1".to_string())
    }
}

#[async_trait]
impl CommitLookup for FakeCommitLookup {
    async fn latest_commit(
        &self,
        repo: &RepoSlug,
        branch: &str,
    ) -> Result<String, CommitLookupError> {
        let key = format!("{}@{}", repo, branch);
        self.log.push(format!("lookup {}", key));
        Ok(self.commit_for(&key))
    }
}

/// SCM that "clones" by writing package fixtures into the destination
pub struct FakeScm {
    log: EventLog,
    lookup: Arc<FakeCommitLookup>,
    /// package path inside the repository -> package.json body
    fixtures: Vec<(String, String)>,
    yield_points: bool,
}

impl FakeScm {
    pub fn new(log: EventLog, lookup: Arc<FakeCommitLookup>) -> Self {
        Self {
            log,
            lookup,
            fixtures: Vec::new(),
            yield_points: false,
        }
    }

    /// Hand control back to the runtime around each clone
    pub fn yielding(mut self) -> Self {
        self.yield_points = true;
        self
    }

    /// Every clone gets `package.json` at `path`
    pub fn with_package(mut self, path: &str, manifest: &str) -> Self {
        self.fixtures.push((path.to_string(), manifest.to_string()));
        self
    }
}

fn io_to_scm(error: std::io::Error) -> ScmError {
    ScmError::from(error)
}

#[async_trait]
impl ScmOperations for FakeScm {
    async fn shallow_clone(
        &self,
        url: &str,
        branch: &str,
        dest_path: &Path,
    ) -> Result<(), ScmError> {
        if self.yield_points {
            self.log.push(format!("clone-start {}", url));
            tokio::task::yield_now().await;
        }
        self.log.push(format!("clone {}#{}", url, branch));

        let slug = url
            .trim_start_matches("https://github.com/")
            .trim_end_matches(".git");
        let commit = self.lookup.commit_for(&format!("{}@{}", slug, branch));

        fs::create_dir_all(dest_path.join(".git")).map_err(io_to_scm)?;
        fs::write(dest_path.join(".git").join(HEAD_FILE), commit).map_err(io_to_scm)?;
        for (path, manifest) in &self.fixtures {
            let dir = dest_path.join(path);
            fs::create_dir_all(&dir).map_err(io_to_scm)?;
            fs::write(dir.join("package.json"), manifest).map_err(io_to_scm)?;
        }

        if self.yield_points {
            tokio::task::yield_now().await;
            self.log.push(format!("clone-end {}", url));
        }
        Ok(())
    }

    async fn head_commit(&self, repo_path: &Path, _branch: &str) -> Result<String, ScmError> {
        let head = fs::read_to_string(repo_path.join(".git").join(HEAD_FILE)).map_err(io_to_scm)?;
        Ok(head.trim().to_string())
    }

    async fn remove_clone(&self, repo_path: &Path) -> Result<(), ScmError> {
        if repo_path.exists() {
            self.log.push(format!("remove {}", repo_path.display()));
            fs::remove_dir_all(repo_path).map_err(io_to_scm)?;
        }
        Ok(())
    }

    fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").is_dir()
    }
}

/// Package manager that only records the directory, optionally failing
pub struct FakePackageManager {
    log: EventLog,
    fail_in: Option<PathBuf>,
    yield_points: bool,
}

impl FakePackageManager {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_in: None,
            yield_points: false,
        }
    }

    /// Hand control back to the runtime around each install
    pub fn yielding(mut self) -> Self {
        self.yield_points = true;
        self
    }

    pub fn failing_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fail_in = Some(dir.into());
        self
    }
}

#[async_trait]
impl PackageManager for FakePackageManager {
    async fn install(&self, dir: &Path) -> Result<(), PackageManagerError> {
        if self.yield_points {
            self.log.push(format!("install-start {}", dir.display()));
            tokio::task::yield_now().await;
        }
        self.log.push(format!("install {}", dir.display()));
        if self.fail_in.as_deref() == Some(dir) {
            return Err(PackageManagerError::InstallFailed {
                command: "yarn install".to_string(),
                dir: dir.display().to_string(),
                exit_code: 1,
                output: "network unreachable".to_string(),
            });
        }

        if self.yield_points {
            tokio::task::yield_now().await;
            self.log.push(format!("install-end {}", dir.display()));
        }
        Ok(())
    }
}

/// Compiler that records its entry points and writes a marker page
pub struct FakeCompiler {
    log: EventLog,
    entry_points: Mutex<Vec<PathBuf>>,
    produce_nothing: bool,
}

impl FakeCompiler {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            entry_points: Mutex::new(Vec::new()),
            produce_nothing: false,
        }
    }

    /// Behave like a conversion that emitted no project
    pub fn producing_nothing(mut self) -> Self {
        self.produce_nothing = true;
        self
    }

    pub fn entry_points(&self) -> Vec<PathBuf> {
        self.entry_points.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocCompiler for FakeCompiler {
    async fn convert(
        &self,
        entry_points: &[PathBuf],
        options: &RootOptions,
    ) -> Result<Option<ProjectReflection>, CompilerError> {
        self.log.push(format!("convert {}", entry_points.len()));
        *self.entry_points.lock().unwrap() = entry_points.to_vec();

        if self.produce_nothing {
            return Ok(None);
        }
        Ok(Some(ProjectReflection {
            path: options.out.join("reflection.json"),
            name: Some(options.name.clone()),
            child_count: entry_points.len(),
        }))
    }

    async fn generate_docs(
        &self,
        reflection: &ProjectReflection,
        options: &RootOptions,
    ) -> Result<(), CompilerError> {
        self.log.push(format!("generate {}", reflection.child_count));
        let io = |path: &Path| {
            let path = path.display().to_string();
            move |source| CompilerError::Io { path, source }
        };
        fs::create_dir_all(&options.out).map_err(io(&options.out))?;
        let index = options.out.join("index.html");
        fs::write(&index, "<html></html>").map_err(io(&index))?;
        Ok(())
    }
}

/// All four fakes wired to one log
pub struct TestHarness {
    pub log: EventLog,
    pub lookup: Arc<FakeCommitLookup>,
    pub scm: Arc<FakeScm>,
    pub package_manager: Arc<FakePackageManager>,
    pub compiler: Arc<FakeCompiler>,
}

impl TestHarness {
    /// Harness whose clones contain the given `(path, package.json)` fixtures
    pub fn new(fixtures: &[(&str, &str)]) -> Self {
        Self::build(fixtures, false)
    }

    /// Like [`TestHarness::new`], but clones and installs yield to the runtime
    /// before and after their work, so concurrent tasks interleave
    pub fn yielding(fixtures: &[(&str, &str)]) -> Self {
        Self::build(fixtures, true)
    }

    fn build(fixtures: &[(&str, &str)], yield_points: bool) -> Self {
        let log = EventLog::default();
        let lookup = Arc::new(FakeCommitLookup::new(log.clone()));
        let mut scm = fixtures
            .iter()
            .fold(FakeScm::new(log.clone(), lookup.clone()), |scm, (path, manifest)| {
                scm.with_package(path, manifest)
            });
        let mut package_manager = FakePackageManager::new(log.clone());
        if yield_points {
            scm = scm.yielding();
            package_manager = package_manager.yielding();
        }

        Self {
            package_manager: Arc::new(package_manager),
            compiler: Arc::new(FakeCompiler::new(log.clone())),
            scm: Arc::new(scm),
            lookup,
            log,
        }
    }

    pub fn with_package_manager(mut self, package_manager: FakePackageManager) -> Self {
        self.package_manager = Arc::new(package_manager);
        self
    }

    pub fn with_compiler(mut self, compiler: FakeCompiler) -> Self {
        self.compiler = Arc::new(compiler);
        self
    }

    pub fn adapters(&self) -> PipelineAdapters {
        PipelineAdapters {
            commit_lookup: self.lookup.clone(),
            scm: self.scm.clone(),
            package_manager: self.package_manager.clone(),
            compiler: self.compiler.clone(),
        }
    }
}

/// `package.json` exporting one entry point per `input`
pub fn manifest_json(name: &str, inputs: &[&str]) -> String {
    let exports: Vec<String> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            let key = if i == 0 {
                ".".to_string()
            } else {
                format!("./entry{}", i)
            };
            format!(r#""{}": {{ "input": "{}", "import": "./dist/{}.js" }}"#, key, input, i)
        })
        .collect();
    format!(
        r#"{{ "name": "{}", "version": "1.0.0", "exports": {{ {} }} }}"#,
        name,
        exports.join(", ")
    )
}

/// Build configuration rooted at `workspace`
pub fn build_config(workspace: &Path) -> BuildReferenceConfig {
    BuildReferenceConfig::new(workspace)
}
