pub(crate) type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Print `err` on stderr and exit with status 1.
pub(crate) fn failure(err: impl std::fmt::Display) -> proc_exit::Exit {
    proc_exit::Exit::new(proc_exit::Code::FAILURE).with_message(err.to_string())
}

pub(crate) trait ExitExt<T> {
    fn or_exit(self) -> Result<T, proc_exit::Exit>;
}

impl<T> ExitExt<T> for Result<T> {
    fn or_exit(self) -> Result<T, proc_exit::Exit> {
        self.map_err(|e| failure(format!("{e:#}")))
    }
}
