use once_cell::sync::Lazy;
use regex::Regex;

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"•\s*").expect("valid bullet pattern"));

/// Renders an HTML fragment as Markdown.
pub fn to_markdown(html: &str) -> String {
    html2md::parse_html(html)
}

/// Leaves exactly one space after every `•` bullet.
pub fn normalize_bullets(markdown: &str) -> String {
    BULLET.replace_all(markdown, "• ").into_owned()
}
