use std::env;
use std::path;

use anyhow::Context as _;

use crate::error::*;

/// Settings and launcher for a Pelican-style static site
#[derive(Debug, clap::Parser)]
#[command(about, version)]
#[command(propagate_version = true)]
#[command(after_help = "Without a command, builds the site and then serves it.")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,

    #[command(flatten, next_help_heading = "Config")]
    pub(crate) config: ConfigArgs,

    #[command(flatten)]
    pub(crate) verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    #[command(flatten)]
    pub(crate) color: colorchoice_clap::Color,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum Command {
    Launch(crate::build::LaunchArgs),
    Build(crate::build::BuildArgs),
    Serve(crate::serve::ServeArgs),
    Export(crate::export::ExportArgs),
    /// Print site debug information
    #[command(subcommand)]
    Debug(crate::debug::DebugCommands),
}

impl Command {
    pub(crate) fn run(&self, config: &ConfigArgs) -> proc_exit::ExitResult {
        match self {
            Self::Launch(cmd) => cmd.run(config),
            Self::Build(cmd) => cmd.run(config),
            Self::Serve(cmd) => cmd.run(config),
            Self::Export(cmd) => cmd.run(config),
            Self::Debug(cmd) => cmd.run(config),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, clap::Args)]
pub(crate) struct ConfigArgs {
    /// Settings file to use [default: _site.yml]
    #[arg(short, long, value_name = "FILE", global = true)]
    pub(crate) config: Option<path::PathBuf>,

    /// Generator program to run [default: pelican]
    #[arg(long, value_name = "PROGRAM", global = true)]
    pub(crate) generator: Option<String>,

    /// Leave the generator settings file untouched
    #[arg(long, global = true)]
    pub(crate) no_export: bool,

    /// Replace a generator settings file not written by sitectl
    #[arg(long, global = true)]
    pub(crate) force: bool,
}

impl ConfigArgs {
    pub(crate) fn load_config(&self) -> Result<sitectl::Settings> {
        let mut settings = if let Some(config_path) = &self.config {
            sitectl::Settings::from_file(config_path).with_context(|| {
                format!("Error reading config file {}", config_path.display())
            })?
        } else {
            let cwd = env::current_dir().context("Failed to find the current directory")?;
            sitectl::Settings::from_cwd(cwd)?
        };

        settings.generator = settings
            .generator
            .with_program(self.generator.as_deref());

        Ok(settings)
    }

    /// Make the generator see `settings`.
    pub(crate) fn export(&self, settings: &sitectl::Settings) -> Result<()> {
        if self.no_export {
            log::debug!("Skipping export of generator settings");
            return Ok(());
        }
        if self.uses_defaults(settings) && !self.force {
            let existing = settings.generator.settings_path(&settings.root);
            if existing.exists() {
                log::info!(
                    "No site settings file, running with the existing `{}`",
                    existing.display()
                );
                return Ok(());
            }
        }
        sitectl::export::write(settings, self.force)?;
        Ok(())
    }

    fn uses_defaults(&self, settings: &sitectl::Settings) -> bool {
        self.config.is_none() && sitectl::Settings::find_file(&settings.root).is_none()
    }
}
