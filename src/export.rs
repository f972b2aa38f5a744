//! Write [`Settings`] as the generator's own settings file.
//!
//! The generator loads its settings as module-level constants from `pelicanconf.py` in the
//! project root, so every field is written out under the constant name it looks for.

use std::fmt::{self, Write as _};
use std::fs;
use std::io;

use anyhow::Context as _;
use sitectl_config::{Link, MenuItem, Settings};

use crate::error::Result;

/// First line of every generated file.
pub const MARKER: &str = "# Generated by sitectl from the site settings.";

/// The generator settings file contents for `settings`.
pub fn render(settings: &Settings) -> String {
    GeneratorConf(settings).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Written {
    Created,
    Updated,
    Unchanged,
}

/// Write the generator settings file under the project root.
///
/// A file that sitectl did not generate is only replaced when `force` is set.
pub fn write(settings: &Settings, force: bool) -> Result<Written> {
    let path = settings.generator.settings_path(&settings.root);
    let content = render(settings);

    let written = match fs::read_to_string(&path) {
        Ok(existing) if existing == content => {
            log::debug!("`{}` is up to date", path.display());
            return Ok(Written::Unchanged);
        }
        Ok(existing) => {
            if !existing.starts_with(MARKER) && !force {
                anyhow::bail!(
                    "`{}` was not generated by sitectl, pass `--force` to replace it",
                    path.display()
                );
            }
            Written::Updated
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Written::Created,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read `{}`", path.display()));
        }
    };

    fs::write(&path, content).with_context(|| format!("Failed to write `{}`", path.display()))?;
    log::info!("Wrote generator settings to `{}`", path.display());

    Ok(written)
}

struct GeneratorConf<'s>(&'s Settings);

impl fmt::Display for GeneratorConf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0;
        writeln!(f, "{MARKER}")?;
        writeln!(f, "# Edit the site settings instead, this file is rewritten on every run.")?;
        writeln!(f)?;
        assign(f, "AUTHOR", Py::Str(&s.author))?;
        assign(f, "SITENAME", Py::Str(&s.site_name))?;
        assign(f, "SITEURL", Py::Str(&s.site_url))?;
        writeln!(f)?;
        assign(f, "PATH", Py::Str(s.path.as_str()))?;
        writeln!(f)?;
        assign(f, "TIMEZONE", Py::Str(&s.timezone))?;
        writeln!(f)?;
        assign(f, "DEFAULT_LANG", Py::Str(&s.default_lang))?;
        writeln!(f)?;
        assign(f, "FEED_ALL_ATOM", Py::opt_str(s.feeds.all_atom.as_deref()))?;
        assign(f, "CATEGORY_FEED_ATOM", Py::opt_str(s.feeds.category_atom.as_deref()))?;
        assign(f, "TRANSLATION_FEED_ATOM", Py::opt_str(s.feeds.translation_atom.as_deref()))?;
        assign(f, "AUTHOR_FEED_ATOM", Py::opt_str(s.feeds.author_atom.as_deref()))?;
        assign(f, "AUTHOR_FEED_RSS", Py::opt_str(s.feeds.author_rss.as_deref()))?;
        writeln!(f)?;
        pairs(f, "LINKS", s.links.iter().map(Link::as_pair))?;
        writeln!(f)?;
        pairs(f, "SOCIAL", s.social.iter().map(Link::as_pair))?;
        writeln!(f)?;
        match s.default_pagination {
            Some(per_page) => assign(f, "DEFAULT_PAGINATION", Py::Int(per_page.get()))?,
            None => assign(f, "DEFAULT_PAGINATION", Py::Bool(false))?,
        }
        assign(f, "RELATIVE_URLS", Py::Bool(s.relative_urls))?;
        writeln!(f)?;
        assign(f, "THEME", Py::Str(&s.theme))?;
        assign(f, "DISPLAY_PAGES_ON_MENU", Py::Bool(s.display_pages_on_menu))?;
        assign(
            f,
            "DISPLAY_CATEGORIES_ON_MENU",
            Py::Bool(s.display_categories_on_menu),
        )?;
        writeln!(f)?;
        assign(f, "ARTICLE_URL", Py::Str(s.article.url.as_str()))?;
        assign(f, "ARTICLE_SAVE_AS", Py::Str(s.article.save_as.as_str()))?;
        assign(f, "PAGE_URL", Py::Str(s.page.url.as_str()))?;
        assign(f, "PAGE_SAVE_AS", Py::Str(s.page.save_as.as_str()))?;
        writeln!(f)?;
        assign(f, "AUTHOR_BIO", Py::opt_str(s.author_bio.as_deref()))?;
        writeln!(f)?;
        list(f, "PLUGIN_PATHS", s.plugin_paths.iter().map(|p| p.as_str()))?;
        list(f, "PLUGINS", s.plugins.iter().map(String::as_str))?;
        writeln!(f)?;
        list(f, "STATIC_PATHS", s.static_paths.iter().map(|p| p.as_str()))?;
        writeln!(f)?;
        if s.extra_path_metadata.is_empty() {
            writeln!(f, "EXTRA_PATH_METADATA = {{}}")?;
        } else {
            writeln!(f, "EXTRA_PATH_METADATA = {{")?;
            for (path, metadata) in &s.extra_path_metadata {
                write!(f, "    {}: {{", Py::Str(path))?;
                for (i, (key, value)) in metadata.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", Py::Str(key), Py::Str(value))?;
                }
                writeln!(f, "}},")?;
            }
            writeln!(f, "}}")?;
        }
        writeln!(f)?;
        pairs(f, "MENUITEMS", s.menu_items.iter().map(MenuItem::as_pair))?;
        Ok(())
    }
}

trait AsPair {
    fn as_pair(&self) -> (&str, &str);
}

impl AsPair for Link {
    fn as_pair(&self) -> (&str, &str) {
        (&self.name, &self.url)
    }
}

impl AsPair for MenuItem {
    fn as_pair(&self) -> (&str, &str) {
        (&self.label, &self.path)
    }
}

fn assign(f: &mut fmt::Formatter<'_>, name: &str, value: Py<'_>) -> fmt::Result {
    writeln!(f, "{name} = {value}")
}

fn pairs<'a>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: impl Iterator<Item = (&'a str, &'a str)>,
) -> fmt::Result {
    let mut items = items.peekable();
    if items.peek().is_none() {
        return writeln!(f, "{name} = ()");
    }
    writeln!(f, "{name} = (")?;
    for (label, target) in items {
        writeln!(f, "    ({}, {}),", Py::Str(label), Py::Str(target))?;
    }
    writeln!(f, ")")
}

fn list<'a>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    items: impl Iterator<Item = &'a str>,
) -> fmt::Result {
    write!(f, "{name} = [")?;
    for (i, item) in items.enumerate() {
        if i != 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", Py::Str(item))?;
    }
    writeln!(f, "]")
}

/// A Python literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Py<'s> {
    Str(&'s str),
    Int(u32),
    Bool(bool),
    None,
}

impl<'s> Py<'s> {
    fn opt_str(value: Option<&'s str>) -> Self {
        value.map(Py::Str).unwrap_or(Py::None)
    }
}

impl fmt::Display for Py<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Py::Str(s) => {
                f.write_char('\'')?;
                for c in s.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '\'' => f.write_str("\\'")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('\'')
            }
            Py::Int(i) => write!(f, "{i}"),
            Py::Bool(true) => f.write_str("True"),
            Py::Bool(false) => f.write_str("False"),
            Py::None => f.write_str("None"),
        }
    }
}
