//! Shared test utilities for integration tests
//!
//! Provides a scripted process runner and throwaway workspaces so orchestration
//! can be exercised without launching a package manager.

use sitefed::cli::{Overrides, RunContext};
use sitefed::config::{ConfigLoader, FederationConfig};
use sitefed::error::FederationError;
use sitefed::process::{CommandSpec, ExitStatus, ProcessRunner};
use sitefed::workspace::WorkspaceLayout;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

/// How the runner was asked to launch a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Blocking,
    Streaming,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    pub command: CommandSpec,
    pub cwd: PathBuf,
}

impl Invocation {
    /// Final component of the working directory, i.e. the subdomain name for builds.
    pub fn cwd_name(&self) -> String {
        self.cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

type Generator = Box<dyn Fn(&CommandSpec) -> ExitStatus>;

#[derive(Default)]
struct Script {
    calls: RefCell<Vec<Invocation>>,
    statuses: RefCell<HashMap<String, ExitStatus>>,
    spawn_failures: RefCell<HashSet<String>>,
    generator: RefCell<Option<Generator>>,
}

/// Process runner that records every invocation and answers from a script.
///
/// Clones share the same script, so a test keeps one handle while the
/// context owns the boxed copy.
#[derive(Clone, Default)]
pub struct FakeRunner {
    script: Rc<Script>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit status for commands run inside a directory named `name`.
    pub fn with_status(self, name: &str, status: ExitStatus) -> Self {
        self.script
            .statuses
            .borrow_mut()
            .insert(name.to_string(), status);
        self
    }

    /// Simulate a program that cannot be launched inside a directory named `name`.
    pub fn with_spawn_failure(self, name: &str) -> Self {
        self.script
            .spawn_failures
            .borrow_mut()
            .insert(name.to_string());
        self
    }

    /// Handle blocking invocations (the project generator) with `generator`.
    pub fn with_generator(self, generator: impl Fn(&CommandSpec) -> ExitStatus + 'static) -> Self {
        *self.script.generator.borrow_mut() = Some(Box::new(generator));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.script.calls.borrow().clone()
    }

    pub fn calls_in(&self, mode: Mode) -> Vec<Invocation> {
        self.calls().into_iter().filter(|c| c.mode == mode).collect()
    }

    fn answer(
        &self,
        mode: Mode,
        cmd: &CommandSpec,
        cwd: &Path,
    ) -> Result<ExitStatus, FederationError> {
        let invocation = Invocation {
            mode,
            command: cmd.clone(),
            cwd: cwd.to_path_buf(),
        };
        let name = invocation.cwd_name();
        self.script.calls.borrow_mut().push(invocation);

        if self.script.spawn_failures.borrow().contains(&name) {
            return Err(FederationError::Spawn {
                program: cmd.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        if mode == Mode::Blocking {
            if let Some(generator) = self.script.generator.borrow().as_ref() {
                return Ok(generator(cmd));
            }
        }
        Ok(self
            .script
            .statuses
            .borrow()
            .get(&name)
            .copied()
            .unwrap_or(ExitStatus::Code(0)))
    }
}

impl ProcessRunner for FakeRunner {
    fn run_to_completion(
        &self,
        cmd: &CommandSpec,
        cwd: &Path,
    ) -> Result<ExitStatus, FederationError> {
        self.answer(Mode::Blocking, cmd, cwd)
    }

    fn run_streaming(&self, cmd: &CommandSpec, cwd: &Path) -> Result<ExitStatus, FederationError> {
        self.answer(Mode::Streaming, cmd, cwd)
    }
}

/// Target directory of a generator invocation (`create astro@.. <dir> -- ...`).
pub fn generator_target(cmd: &CommandSpec) -> PathBuf {
    PathBuf::from(&cmd.args[2])
}

/// Generator hook that writes a minimal project whose shared component carries `marker`.
pub fn fake_astro_project(marker: &'static str) -> impl Fn(&CommandSpec) -> ExitStatus {
    move |cmd| {
        write_project(&generator_target(cmd), marker);
        ExitStatus::Code(0)
    }
}

/// Lay out a generated project: every default shared folder plus private pages.
pub fn write_project(dir: &Path, marker: &str) {
    let src = dir.join("src");
    write_file(&src.join("components/Card.astro"), marker);
    write_file(&src.join("layouts/Base.astro"), "<slot />");
    write_file(&src.join("styles/global.css"), "body { margin: 0; }");
    write_file(&src.join("assets/logo.svg"), "<svg/>");
    write_file(&src.join("pages/index.astro"), "<h1>home</h1>");
    write_file(&src.join("consts.ts"), "export const SITE = 'x';");
    write_file(&dir.join("package.json"), "{\"name\":\"generated\"}");
}

pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Temporary workspace with the default layout (`shared/`, `subdomains/`).
pub struct TestWorkspace {
    _temp: TempDir,
    pub layout: WorkspaceLayout,
    pub config: FederationConfig,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self::with_config(ConfigLoader::defaults())
    }

    pub fn with_config(config: FederationConfig) -> Self {
        let temp = TempDir::new().unwrap();
        let layout = WorkspaceLayout::resolve(temp.path(), &config).unwrap();
        Self {
            _temp: temp,
            layout,
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    pub fn shared(&self) -> &Path {
        &self.layout.shared_dir
    }

    pub fn subdomain(&self, name: &str) -> PathBuf {
        self.layout.subdomain_dir(name)
    }

    /// Subdomain directory with a build manifest, shaped like a generated project.
    pub fn add_buildable(&self, name: &str) -> PathBuf {
        let dir = self.subdomain(name);
        write_file(&dir.join("package.json"), "{}");
        fs::create_dir_all(dir.join("src")).unwrap();
        dir
    }

    /// Directory under the subdomains root with no manifest.
    pub fn add_plain_dir(&self, name: &str) -> PathBuf {
        let dir = self.subdomain(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Populate the shared pool with one file in every configured folder.
    pub fn seed_shared(&self) {
        for folder in &self.config.shared_folders {
            write_file(&self.shared().join(folder).join("shared.txt"), folder);
        }
    }

    /// Run context over this workspace with `runner` and no environment overrides.
    pub fn context(&self, runner: &FakeRunner) -> RunContext {
        self.context_with(runner, self.overrides())
    }

    pub fn context_with(&self, runner: &FakeRunner, overrides: Overrides) -> RunContext {
        RunContext::with_runner(
            self.config.clone(),
            self.layout.clone(),
            Box::new(runner.clone()),
            overrides,
        )
    }

    /// Overrides with nothing set and the workspace root as current directory.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            subdomains_dir: None,
            subdomain_name: None,
            cwd: self.root().to_path_buf(),
        }
    }
}
