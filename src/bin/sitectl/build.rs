use std::future::Future;

use anyhow::Context as _;
use sitectl::{Generator, LaunchError, Outcome};

use crate::args;
use crate::error::*;
use crate::serve;

/// Build the site, then serve it with autoreload (default)
#[derive(Clone, Debug, Default, PartialEq, Eq, clap::Args)]
pub(crate) struct LaunchArgs {
    #[command(flatten, next_help_heading = "Server")]
    pub(crate) server: serve::ServerArgs,
}

impl LaunchArgs {
    pub(crate) fn run(&self, config: &args::ConfigArgs) -> proc_exit::ExitResult {
        let settings = config.load_config().or_exit()?;
        config.export(&settings).or_exit()?;

        let generator = Generator::from_settings(&settings);
        let options = self.server.options();
        let result = block_on(generator.launch(&options)).or_exit()?;
        report(&generator, result, "Stopping development server...")
    }
}

/// Build the site once
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct BuildArgs {}

impl BuildArgs {
    pub(crate) fn run(&self, config: &args::ConfigArgs) -> proc_exit::ExitResult {
        let settings = config.load_config().or_exit()?;
        config.export(&settings).or_exit()?;

        let generator = Generator::from_settings(&settings);
        log::info!(
            "Building from {} into the generator's output directory",
            settings.content_dir().display()
        );
        let result = block_on(generator.build()).or_exit()?;
        if matches!(result, Ok(Outcome::Completed)) {
            log::info!("Build successful");
        }
        report(&generator, result, "Stopping build...")
    }
}

/// Drive `future` to completion on a single-threaded runtime.
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    Ok(runtime.block_on(future))
}

/// Map how the generator ended to the process exit.
///
/// An interrupt is how the user stops the server, so it exits cleanly.
pub(crate) fn report(
    generator: &Generator,
    result: Result<Outcome, LaunchError>,
    interrupted: &str,
) -> proc_exit::ExitResult {
    match result {
        Ok(Outcome::Completed) => Ok(()),
        Ok(Outcome::Interrupted) => {
            println!("\n{interrupted}");
            Ok(())
        }
        Err(e) => Err(failure(format!("Error running {}: {e}", generator.program()))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn generator() -> Generator {
        Generator::new("pelican", ".", "content".into())
    }

    #[test]
    fn report_completed() {
        let actual = report(&generator(), Ok(Outcome::Completed), "Stopping...");
        assert_eq!(proc_exit::report(actual), proc_exit::Code::SUCCESS);
    }

    #[test]
    fn report_interrupted_exits_cleanly() {
        let actual = report(
            &generator(),
            Ok(Outcome::Interrupted),
            "Stopping development server...",
        );
        assert_eq!(proc_exit::report(actual), proc_exit::Code::SUCCESS);
    }

    #[test]
    fn report_failure() {
        let spawn = LaunchError::Spawn {
            program: "pelican".to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let actual = report(&generator(), Err(spawn), "Stopping...");
        let Err(exit) = actual else {
            panic!("a launch error must not exit cleanly");
        };
        assert!(
            exit.to_string().starts_with("Error running pelican: failed to start `pelican`"),
            "{exit}"
        );
        assert_eq!(proc_exit::report(Err(exit)), proc_exit::Code::FAILURE);
    }
}
