use sitectl_config::content_attributes;

use crate::args;
use crate::error::*;

/// Print site debug information
#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum DebugCommands {
    /// Prints post-processed config
    Config,

    /// Prints where a piece of content is published
    Permalink {
        /// Category, for articles
        #[arg(long)]
        category: Option<String>,

        /// Title or slug of the content
        #[arg(long)]
        slug: String,

        /// Resolve as a page instead of an article
        #[arg(long)]
        page: bool,

        /// Fail when the saved file isn't served at the URL
        #[arg(long)]
        check: bool,
    },
}

impl DebugCommands {
    pub(crate) fn run(&self, config: &args::ConfigArgs) -> proc_exit::ExitResult {
        match self {
            Self::Config => {
                let settings = config.load_config().or_exit()?;
                print!("{settings}");
            }
            Self::Permalink {
                category,
                slug,
                page,
                check,
            } => {
                let settings = config.load_config().or_exit()?;
                let pair = if *page {
                    &settings.page
                } else {
                    &settings.article
                };
                let attributes = content_attributes(category.as_deref(), slug);
                let resolved = if *check {
                    pair.check(&attributes)
                } else {
                    pair.resolve(&attributes)
                };
                let resolved = resolved.map_err(failure)?;
                println!("url: {}", resolved.url);
                println!("save_as: {}", resolved.save_as);
            }
        }

        Ok(())
    }
}
