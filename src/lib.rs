#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::print_stderr)]
#![warn(clippy::print_stdout)]

pub mod error;
pub mod export;
pub mod launcher;

pub use error::Error;
pub use error::Result;
pub use launcher::Generator;
pub use launcher::LaunchError;
pub use launcher::Outcome;
pub use launcher::ServeOptions;
pub use sitectl_config::Settings;
