use sitectl::{Generator, ServeOptions};

use crate::args;
use crate::build;
use crate::error::*;

/// Serve the site with autoreload, without building it first
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ServeArgs {
    #[command(flatten, next_help_heading = "Server")]
    pub(crate) server: ServerArgs,
}

impl ServeArgs {
    pub(crate) fn run(&self, config: &args::ConfigArgs) -> proc_exit::ExitResult {
        let settings = config.load_config().or_exit()?;
        config.export(&settings).or_exit()?;

        let generator = Generator::from_settings(&settings);
        let options = self.server.options();
        let result = build::block_on(generator.serve(&options)).or_exit()?;
        build::report(&generator, result, "Stopping development server...")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, clap::Args)]
pub(crate) struct ServerArgs {
    /// Open a browser
    #[arg(long)]
    pub(crate) open: bool,

    /// Address to bind the server to [default: 127.0.0.1]
    #[arg(long, value_name = "HOSTNAME_OR_IP")]
    pub(crate) bind: Option<String>,

    /// Port to serve from [default: 8000]
    #[arg(short = 'P', long, value_name = "NUM")]
    pub(crate) port: Option<u16>,
}

impl ServerArgs {
    pub(crate) fn options(&self) -> ServeOptions {
        ServeOptions {
            port: self.port,
            bind: self.bind.clone(),
            open: self.open,
        }
    }
}
