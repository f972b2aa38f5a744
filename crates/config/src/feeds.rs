/// Syndication feeds handed to the generator.
///
/// Each feed is disabled when absent; when set, the value is the output path of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub struct Feeds {
    pub all_atom: Option<String>,
    pub category_atom: Option<String>,
    pub translation_atom: Option<String>,
    pub author_atom: Option<String>,
    pub author_rss: Option<String>,
}
