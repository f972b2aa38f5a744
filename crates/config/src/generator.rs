/// How to reach the external site generator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct Generator {
    /// Program name (looked up on `PATH`) or path to the generator.
    pub program: String,
    /// Settings file the generator loads from the project root.
    pub settings_file: crate::RelPath,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_owned(),
            settings_file: DEFAULT_SETTINGS_FILE.into(),
        }
    }
}

pub const DEFAULT_PROGRAM: &str = "pelican";
pub const DEFAULT_SETTINGS_FILE: &str = "pelicanconf.py";

impl Generator {
    pub fn with_program(mut self, program: Option<&str>) -> Self {
        if let Some(program) = program {
            log::debug!("Overriding config `generator.program` with `{program}`");
            program.clone_into(&mut self.program);
        }
        self
    }

    pub fn settings_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        self.settings_file.to_path(root)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn with_program_overrides() {
        let actual = Generator::default().with_program(Some("/opt/bin/pelican"));
        assert_eq!(actual.program, "/opt/bin/pelican");
        assert_eq!(actual.settings_file.as_str(), DEFAULT_SETTINGS_FILE);
    }

    #[test]
    fn with_program_keeps_default() {
        let actual = Generator::default().with_program(None);
        assert_eq!(actual.program, DEFAULT_PROGRAM);
    }

    #[test]
    fn settings_path_is_under_root() {
        let actual = Generator::default().settings_path(std::path::Path::new("site"));
        assert_eq!(actual, std::path::Path::new("site").join("pelicanconf.py"));
    }
}
