//! Drive the external generator through its build and serve phases.

use std::fmt;
use std::future::Future;
use std::path;
use std::process::ExitStatus;

use itertools::Itertools;
use sitectl_config::{RelPath, Settings};
use tokio::process::Command;

/// Default address of the generator's development server.
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting on `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command `{command}` returned non-zero {status}")]
    Failed { command: String, status: ExitStatus },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Build,
    Serve,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Build => f.write_str("build"),
            Phase::Serve => f.write_str("serve"),
        }
    }
}

/// How a phase ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Interrupted,
}

/// Extra flags for the development server.
///
/// Without any, the server is started with the generator's own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeOptions {
    pub port: Option<u16>,
    pub bind: Option<String>,
    /// Open the site in a browser once the server had a moment to start.
    pub open: bool,
}

impl ServeOptions {
    pub fn url(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("http://{bind}:{port}/")
    }
}

/// The external site generator, run from the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    program: String,
    root: path::PathBuf,
    content: RelPath,
}

impl Generator {
    pub fn new(program: impl Into<String>, root: impl Into<path::PathBuf>, content: RelPath) -> Self {
        Self {
            program: program.into(),
            root: root.into(),
            content,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.generator.program.clone(),
            settings.root.clone(),
            settings.path.clone(),
        )
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn build_args(&self) -> Vec<String> {
        vec![self.content.to_string()]
    }

    pub fn serve_args(&self, options: &ServeOptions) -> Vec<String> {
        let mut args = vec!["--listen".to_owned(), "--autoreload".to_owned()];
        if let Some(port) = options.port {
            args.push("--port".to_owned());
            args.push(port.to_string());
        }
        if let Some(bind) = &options.bind {
            args.push("--bind".to_owned());
            args.push(bind.clone());
        }
        args
    }

    /// Generate the site once.
    pub async fn build(&self) -> Result<Outcome, LaunchError> {
        self.build_until(interrupted()).await
    }

    /// Run the development server until it exits or the user interrupts it.
    pub async fn serve(&self, options: &ServeOptions) -> Result<Outcome, LaunchError> {
        self.serve_until(options, interrupted()).await
    }

    /// Build, then serve.  Serving only starts after a successful build.
    pub async fn launch(&self, options: &ServeOptions) -> Result<Outcome, LaunchError> {
        self.launch_until(options, interrupted()).await
    }

    async fn build_until<F>(&self, shutdown: F) -> Result<Outcome, LaunchError>
    where
        F: Future<Output = ()>,
    {
        self.run_until(Phase::Build, &self.build_args(), shutdown)
            .await
    }

    async fn serve_until<F>(
        &self,
        options: &ServeOptions,
        shutdown: F,
    ) -> Result<Outcome, LaunchError>
    where
        F: Future<Output = ()>,
    {
        if options.open {
            tokio::spawn(open_browser(options.url()));
        }
        log::info!("Server listening on {}", options.url());
        log::info!("Ctrl-c to stop the server");
        self.run_until(Phase::Serve, &self.serve_args(options), shutdown)
            .await
    }

    // One listener for both phases, so a Ctrl-C between them is not lost.
    async fn launch_until<F>(
        &self,
        options: &ServeOptions,
        shutdown: F,
    ) -> Result<Outcome, LaunchError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        match self.build_until(&mut shutdown).await? {
            Outcome::Completed => {
                log::info!("Build successful");
            }
            Outcome::Interrupted => return Ok(Outcome::Interrupted),
        }
        self.serve_until(options, shutdown).await
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .join(" ")
    }

    async fn run_until<F>(
        &self,
        phase: Phase,
        args: &[String],
        shutdown: F,
    ) -> Result<Outcome, LaunchError>
    where
        F: Future<Output = ()>,
    {
        let command_line = self.command_line(args);
        log::info!("Running `{command_line}` ({phase})");
        log::debug!("Working directory `{}`", self.root.display());

        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(&self.root)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        tokio::pin!(shutdown);
        let status = tokio::select! {
            biased;
            () = &mut shutdown => None,
            status = child.wait() => Some(status),
        };

        let Some(status) = status else {
            log::debug!("Interrupted during {phase}, stopping `{}`", self.program);
            if let Err(e) = child.kill().await {
                log::debug!("`{}` already stopped: {e}", self.program);
            }
            return Ok(Outcome::Interrupted);
        };
        let status = status.map_err(|source| LaunchError::Wait {
            program: self.program.clone(),
            source,
        })?;

        if status.success() {
            log::debug!("`{command_line}` finished");
            Ok(Outcome::Completed)
        } else if killed_by_interrupt(&status) {
            Ok(Outcome::Interrupted)
        } else {
            Err(LaunchError::Failed {
                command: command_line,
                status,
            })
        }
    }
}

async fn open_browser(url: String) {
    tokio::time::sleep(BROWSER_DELAY).await;
    match open::that_detached(&url) {
        Ok(()) => log::info!("Please check your browser!"),
        Err(why) => log::error!("Failed to open {url}: {why}"),
    }
}

const BROWSER_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

/// Resolves on Ctrl-C.
///
/// When the handler can't be installed, never resolves.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Unable to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

// Ctrl-C from a terminal reaches the whole process group, so the generator may see it first.
#[cfg(unix)]
fn killed_by_interrupt(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt as _;

    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_status: &ExitStatus) -> bool {
    false
}
