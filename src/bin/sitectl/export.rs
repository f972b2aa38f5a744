use sitectl::export::Written;

use crate::args;
use crate::error::*;

/// Write the generator settings file from the site settings
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ExportArgs {
    /// Print the generator settings instead of writing them
    #[arg(long)]
    pub(crate) stdout: bool,
}

impl ExportArgs {
    pub(crate) fn run(&self, config: &args::ConfigArgs) -> proc_exit::ExitResult {
        let settings = config.load_config().or_exit()?;

        if self.stdout {
            print!("{}", sitectl::export::render(&settings));
            return Ok(());
        }

        let path = settings.generator.settings_path(&settings.root);
        match sitectl::export::write(&settings, config.force).or_exit()? {
            Written::Created => log::info!("Created {}", path.display()),
            Written::Updated => log::info!("Updated {}", path.display()),
            Written::Unchanged => log::info!("{} is up to date", path.display()),
        }
        Ok(())
    }
}
