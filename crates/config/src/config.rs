use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::path;

use super::*;

/// Settings files looked up from the current directory upwards, in order.
pub const SETTINGS_FILES: &[&str] = &["_site.yml", "_site.toml"];

/// Per-file overrides, keyed by path relative to the content directory.
pub type PathMetadata = BTreeMap<String, BTreeMap<String, String>>;

/// Site settings, read once at startup and shared by reference afterwards.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(skip)]
    pub root: path::PathBuf,
    pub author: String,
    pub site_name: String,
    pub site_url: String,
    /// Content directory, passed to the generator when building.
    pub path: RelPath,
    pub timezone: String,
    pub default_lang: String,
    pub feeds: Feeds,
    pub links: Vec<Link>,
    pub social: Vec<Link>,
    pub default_pagination: Option<NonZeroU32>,
    pub relative_urls: bool,
    pub theme: String,
    pub display_pages_on_menu: bool,
    pub display_categories_on_menu: bool,
    pub article: UrlPair,
    pub page: UrlPair,
    pub author_bio: Option<String>,
    pub plugin_paths: Vec<RelPath>,
    pub plugins: Vec<String>,
    pub static_paths: Vec<RelPath>,
    pub extra_path_metadata: PathMetadata,
    pub menu_items: Vec<MenuItem>,
    pub generator: Generator,
}

impl Default for Settings {
    fn default() -> Settings {
        let mut extra_path_metadata = PathMetadata::new();
        extra_path_metadata.insert(
            "assets/images/bio-photo.jpg".to_owned(),
            [("path".to_owned(), "assets/images/bio-photo.jpg".to_owned())].into(),
        );

        Settings {
            root: Default::default(),
            author: "Xingchen Wang".to_owned(),
            site_name: "Xingchen Wang".to_owned(),
            site_url: String::new(),
            path: "content".into(),
            timezone: "America/New_York".to_owned(),
            default_lang: "en".to_owned(),
            feeds: Feeds::default(),
            links: vec![
                Link::new("Pelican", "https://getpelican.com/"),
                Link::new("Python.org", "https://www.python.org/"),
                Link::new("Jinja2", "https://palletsprojects.com/p/jinja/"),
            ],
            social: vec![
                Link::new("LinkedIn", "https://www.linkedin.com/in/xingchen-wang"),
                Link::new("GitHub", "https://github.com/Xingchen1224"),
            ],
            default_pagination: NonZeroU32::new(5),
            relative_urls: false,
            theme: "simple".to_owned(),
            display_pages_on_menu: true,
            display_categories_on_menu: true,
            article: UrlPair::new("blog/{category}/{slug}/", "blog/{category}/{slug}/index.html"),
            page: UrlPair::new("{slug}/", "{slug}/index.html"),
            author_bio: Some("Simplicity is the ultimate sophistication.".to_owned()),
            plugin_paths: vec!["plugins".into()],
            plugins: Vec::new(),
            static_paths: vec!["images".into(), "assets".into()],
            extra_path_metadata,
            menu_items: vec![
                MenuItem::new("Posts", "/archives.html"),
                MenuItem::new("About", "/about/"),
            ],
            generator: Generator::default(),
        }
    }
}

impl Settings {
    pub fn from_file<P: Into<path::PathBuf>>(path: P) -> Result<Settings> {
        Self::from_file_internal(path.into())
    }

    fn from_file_internal(path: path::PathBuf) -> Result<Settings> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Status::new("Failed to read config")
                .with_source(e)
                .context_with(|c| c.insert("Path", path.display().to_string()))
        })?;

        let mut settings = if content.trim().is_empty() {
            Settings::default()
        } else {
            parse(&path, &content)?
        };

        let mut root = path;
        root.pop(); // Remove filename
        if root == path::Path::new("") {
            root = path::Path::new(".").to_owned();
        }
        settings.root = root;

        settings.warn_on_unreachable_urls();

        Ok(settings)
    }

    pub fn from_cwd<P: Into<path::PathBuf>>(cwd: P) -> Result<Settings> {
        Self::from_cwd_internal(cwd.into())
    }

    /// The settings file that [`Settings::from_cwd`] would load, if any.
    pub fn find_file<P: Into<path::PathBuf>>(cwd: P) -> Option<path::PathBuf> {
        find_project_file(cwd, SETTINGS_FILES)
    }

    fn from_cwd_internal(cwd: path::PathBuf) -> Result<Settings> {
        let file_path = Self::find_file(&cwd);
        let settings = file_path
            .map(|p| {
                log::debug!("Using config file `{}`", p.display());
                Self::from_file(&p)
            })
            .unwrap_or_else(|| {
                log::warn!("No _site.yml file found in current directory, using default config.");
                let settings = Settings {
                    root: cwd,
                    ..Default::default()
                };
                Ok(settings)
            })?;
        Ok(settings)
    }

    /// Absolute (or root-relative) location of the content directory.
    pub fn content_dir(&self) -> path::PathBuf {
        self.path.to_path(&self.root)
    }

    /// Check every URL pair against a sample article or page.
    pub fn check_urls(&self) -> Result<()> {
        let attributes = content_attributes(Some("category"), "slug");
        self.article.check(&attributes).map_err(|e| {
            Status::new("Inconsistent article URL settings").with_source(e)
        })?;
        self.page
            .check(&attributes)
            .map_err(|e| Status::new("Inconsistent page URL settings").with_source(e))?;
        Ok(())
    }

    fn warn_on_unreachable_urls(&self) {
        if let Err(e) = self.check_urls() {
            log::warn!("{e}");
        }
    }
}

fn parse(path: &path::Path, content: &str) -> Result<Settings> {
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let parsed = if is_toml {
        toml::from_str(content).map_err(|e| Status::new("Failed to parse config").with_source(e))
    } else {
        serde_yaml::from_str(content)
            .map_err(|e| Status::new("Failed to parse config").with_source(e))
    };
    parsed.map_err(|e| e.context_with(|c| c.insert("Path", path.display().to_string())))
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{converted}")
    }
}

fn find_project_file<P: Into<path::PathBuf>>(dir: P, names: &[&str]) -> Option<path::PathBuf> {
    find_project_file_internal(dir.into(), names)
}

// Nearest directory wins, then the order of `names`.
fn find_project_file_internal(dir: path::PathBuf, names: &[&str]) -> Option<path::PathBuf> {
    let mut dir = dir;
    loop {
        if let Some(found) = names.iter().map(|name| dir.join(name)).find(|p| p.exists()) {
            return Some(found);
        }
        let hit_bottom = !dir.pop();
        if hit_bottom {
            return None;
        }
    }
}
