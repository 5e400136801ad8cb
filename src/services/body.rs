use ammonia::Builder;
use once_cell::sync::Lazy;

// The post body arrives as an HTML string from whatever rich-text
// editor the operator pastes out of; it is never trusted as-is.
static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .add_tags(["figure", "figcaption", "del", "span"])
        .add_tag_attributes("img", ["src", "alt", "title", "width", "height", "loading"]);
    builder
});

/// Cleans rich-text editor output down to a safe HTML fragment.
pub fn sanitize_html(body: &str) -> String {
    SANITIZER.clean(body).to_string()
}

/// Plain-text excerpt of an HTML body, for cards and the RSS feed.
/// Truncates on a word boundary and appends an ellipsis.
pub fn text_excerpt(body_html: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(body_html.len());
    let mut in_tag = false;
    for c in body_html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                if !text.ends_with(' ') && !text.is_empty() {
                    text.push(' ');
                }
            }
            c if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }

    let mut out = String::new();
    for word in text.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out.push_str("...");
    out
}
