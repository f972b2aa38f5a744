use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;

use crate::Status;

static PLACEHOLDER: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Values substituted into `{name}` placeholders.
pub type Attributes = BTreeMap<String, String>;

/// Placeholder values for a piece of content.
///
/// Both values are slugified, as the generator does when it builds paths.
pub fn content_attributes(category: Option<&str>, slug: &str) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(
        "category".to_owned(),
        category.map(crate::path::slugify).unwrap_or_default(),
    );
    attributes.insert("slug".to_owned(), crate::path::slugify(slug));
    attributes
}

/// A URL or output path pattern such as `blog/{category}/{slug}/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder names, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        PLACEHOLDER
            .captures_iter(&self.0)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn render(&self, attributes: &Attributes) -> crate::Result<String> {
        let unknown = self
            .placeholders()
            .filter(|name| !attributes.contains_key(*name))
            .unique()
            .join(", ");
        if !unknown.is_empty() {
            return Err(Status::new("Unknown placeholder in URL template").context_with(|c| {
                c.insert("Template", self.0.clone())
                    .insert("Placeholders", unknown.clone())
            }));
        }

        let mut p = PLACEHOLDER
            .replace_all(&self.0, |caps: &regex::Captures<'_>| {
                attributes.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned();

        // Handle the user doing windows-style
        p = p.replace('\\', "/");

        // Handle cases where substitutions were blank
        while p.contains("//") {
            p = p.replace("//", "/");
        }

        if p.starts_with('/') {
            p.remove(0);
        }

        Ok(p)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UrlTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

/// The public URL of a content type and where the generator saves it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct UrlPair {
    pub url: UrlTemplate,
    pub save_as: UrlTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub url: String,
    pub save_as: String,
}

impl UrlPair {
    pub fn new(url: impl Into<UrlTemplate>, save_as: impl Into<UrlTemplate>) -> Self {
        Self {
            url: url.into(),
            save_as: save_as.into(),
        }
    }

    pub fn resolve(&self, attributes: &Attributes) -> crate::Result<Resolved> {
        Ok(Resolved {
            url: self.url.render(attributes)?,
            save_as: self.save_as.render(attributes)?,
        })
    }

    /// Verify the saved file is what a server returns for the URL.
    ///
    /// Directory-style URLs are served from their `index.html`.
    pub fn check(&self, attributes: &Attributes) -> crate::Result<Resolved> {
        let resolved = self.resolve(attributes)?;
        let expected = format_url_as_file(&resolved.url);
        if expected.as_str() != resolved.save_as {
            return Err(
                Status::new("`save_as` is not reachable through `url`").context_with(|c| {
                    c.insert("url", resolved.url.clone())
                        .insert("save_as", resolved.save_as.clone())
                        .insert("expected", expected.to_string())
                }),
            );
        }
        Ok(resolved)
    }
}

pub fn format_url_as_file<S: AsRef<str>>(url: S) -> crate::RelPath {
    format_url_as_file_str(url.as_ref())
}

fn format_url_as_file_str(url: &str) -> crate::RelPath {
    // remove the root prefix
    let mut path = crate::RelPath::from(url.trim_start_matches('/'));

    // explode the url if no extension was specified
    if path.extension().is_none() {
        path.push("index.html");
    }

    path
}

#[cfg(test)]
mod test {
    use super::*;

    fn article() -> UrlPair {
        UrlPair::new("blog/{category}/{slug}/", "blog/{category}/{slug}/index.html")
    }

    #[test]
    fn placeholders_in_order() {
        let template = UrlTemplate::new("blog/{category}/{slug}/");
        let actual: Vec<_> = template.placeholders().collect();
        assert_eq!(actual, ["category", "slug"]);
    }

    #[test]
    fn render_substitutes() {
        let attributes = content_attributes(Some("Rust"), "hello-world");
        let actual = UrlTemplate::new("blog/{category}/{slug}/")
            .render(&attributes)
            .unwrap();
        assert_eq!(actual, "blog/rust/hello-world/");
    }

    #[test]
    fn render_absolute() {
        let attributes = content_attributes(None, "about");
        let actual = UrlTemplate::new("/{slug}/").render(&attributes).unwrap();
        assert_eq!(actual, "about/");
    }

    #[test]
    fn render_blank_substitution() {
        let attributes = content_attributes(None, "hello");
        let actual = UrlTemplate::new("blog/{category}/{slug}/")
            .render(&attributes)
            .unwrap();
        assert_eq!(actual, "blog/hello/");
    }

    #[test]
    fn render_unknown_placeholder() {
        let attributes = content_attributes(None, "hello");
        let actual = UrlTemplate::new("{lang}/{slug}/").render(&attributes);
        assert!(actual.is_err());
    }

    #[test]
    fn render_leaves_format_specs() {
        let attributes = content_attributes(None, "hello");
        let actual = UrlTemplate::new("{date:%Y}/{slug}.html")
            .render(&attributes)
            .unwrap();
        assert_eq!(actual, "{date:%Y}/hello.html");
    }

    #[test]
    fn format_url_as_file_absolute() {
        let actual = format_url_as_file("/hello/world.html");
        assert_eq!(actual.as_str(), "hello/world.html");
    }

    #[test]
    fn format_url_as_file_no_explode() {
        let actual = format_url_as_file("/hello/world.custom");
        assert_eq!(actual.as_str(), "hello/world.custom");
    }

    #[test]
    fn format_url_as_file_explode() {
        let actual = format_url_as_file("/hello/world/");
        assert_eq!(actual.as_str(), "hello/world/index.html");
    }

    #[test]
    fn article_pair_is_consistent() {
        for (category, slug) in [
            (Some("Rust"), "hello-world"),
            (Some("Life & Travel"), "Tokyo, Day 1"),
            (None, "untitled"),
        ] {
            let attributes = content_attributes(category, slug);
            let resolved = article().check(&attributes).unwrap();
            let dir = resolved.save_as.trim_end_matches("index.html");
            assert_eq!(dir, resolved.url);
        }
    }

    #[test]
    fn page_pair_is_consistent() {
        let page = UrlPair::new("{slug}/", "{slug}/index.html");
        let resolved = page.check(&content_attributes(None, "About")).unwrap();
        assert_eq!(resolved.url, "about/");
        assert_eq!(resolved.save_as, "about/index.html");
    }

    #[test]
    fn file_style_pair_is_consistent() {
        let page = UrlPair::new("pages/{slug}.html", "pages/{slug}.html");
        assert!(page.check(&content_attributes(None, "cv")).is_ok());
    }

    #[test]
    fn mismatched_pair_is_rejected() {
        let article = UrlPair::new("blog/{slug}/", "posts/{slug}/index.html");
        let actual = article.check(&content_attributes(Some("rust"), "hello"));
        assert!(actual.is_err());
    }
}
