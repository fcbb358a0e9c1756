use html_escape::decode_html_entities;

const TITLE_OPEN: &str = "<title";
const TITLE_CLOSE: &str = "</title>";

const CONTENT_MARKER: &str = r#"<span class="attribute-name">content</span>"#;
const CONTENT_PREFIX: &str = r#"="<a class="attribute-value">"#;
const CONTENT_END: &str = "</a>";

/// Text between the first `start` marker and the following `end` marker.
pub fn between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let rest = &haystack[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}

/// Contents of the page's `<title>` element, trimmed and entity-decoded.
pub fn page_title(html: &str) -> Option<String> {
    let open = html.find(TITLE_OPEN)?;
    let after_tag = open + html[open..].find('>')? + 1;
    let title = between(&html[after_tag..], "", TITLE_CLOSE)?.trim();

    (!title.is_empty()).then(|| decode_html_entities(title).into_owned())
}

/// Value of the `content` attribute as rendered in an HTML source listing.
pub fn embedded_content(html: &str) -> Option<String> {
    let raw = between(html, CONTENT_MARKER, CONTENT_END)?;
    let value = raw.strip_prefix(CONTENT_PREFIX).unwrap_or(raw).trim();

    (!value.is_empty()).then(|| decode_html_entities(value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_between() {
        assert_eq!(between("a[b]c", "[", "]"), Some("b"));
        assert_eq!(between("a[b", "[", "]"), None);
        assert_eq!(between("abc", "[", "]"), None);
    }

    #[test]
    fn test_page_title() {
        let html = "<html><head><title>\n  Storm op komst &amp; regen\n</title></head></html>";
        assert_eq!(page_title(html).as_deref(), Some("Storm op komst & regen"));
    }

    #[test]
    fn test_page_title_with_attributes() {
        let html = r#"<head><title data-rh="true">Headline</title></head>"#;
        assert_eq!(page_title(html).as_deref(), Some("Headline"));
    }

    #[test]
    fn test_page_title_missing() {
        assert_eq!(page_title("<html><body>no title</body></html>"), None);
        assert_eq!(page_title("<title>   </title>"), None);
    }

    #[test]
    fn test_embedded_content() {
        let html = concat!(
            r#"<span class="attribute-name">property</span>="og:description" "#,
            r#"<span class="attribute-name">content</span>="<a class="attribute-value">"#,
            "Live now: speedrun practice</a>\"",
        );
        assert_eq!(
            embedded_content(html).as_deref(),
            Some("Live now: speedrun practice")
        );
    }

    #[test]
    fn test_embedded_content_missing_marker() {
        assert_eq!(embedded_content("<html></html>"), None);
    }
}
