static SLUG_INVALID_CHARS: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"([^a-zA-Z0-9]+)").unwrap());

/// Create a slug for a category or title, the way the generator derives `{slug}` and
/// `{category}` path segments.
pub fn slugify<S: AsRef<str>>(name: S) -> String {
    slugify_str(name.as_ref())
}

fn slugify_str(name: &str) -> String {
    let name = deunicode::deunicode_with_tofu(name, "-");
    let slug = SLUG_INVALID_CHARS.replace_all(&name, "-");
    slug.trim_matches('-').to_lowercase()
}

#[cfg(test)]
mod test_slug {
    use super::*;

    #[test]
    fn test_slugify() {
        let actual = slugify("___filE-worlD-__09___");
        assert_eq!(actual, "file-world-09");
    }

    #[test]
    fn test_slugify_unicode() {
        let actual = slugify("__Æneid__北亰-worlD-__09___");
        assert_eq!(actual, "aeneid-bei-jing-world-09");
    }

    #[test]
    fn test_slugify_category() {
        let actual = slugify("Rust Tips & Tricks");
        assert_eq!(actual, "rust-tips-tricks");
    }
}
