mod config;
mod feeds;
mod generator;
mod links;
mod url;

pub mod path;

pub use self::config::*;
pub use self::feeds::*;
pub use self::generator::*;
pub use self::links::*;
pub use self::url::*;

pub type RelPath = relative_path::RelativePathBuf;

pub type Status = status::Status;
pub type Result<T, E = Status> = std::result::Result<T, E>;
