//! Markdown Rendering
//!
//! Job offer and workshop descriptions are authored in Markdown by
//! exhibitors. Raw HTML in the source is shown as text, never injected,
//! and link or image targets outside http(s)/mailto are blanked.

use pulldown_cmark::{html::push_html, CowStr, Event, Options, Parser, Tag, TagEnd};

fn get_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Relative targets and the allowed schemes pass; anything else does not
fn is_safe_url(url: &str) -> bool {
    // Browsers skip whitespace and control characters inside a scheme
    let compact: String = url.chars().filter(|c| !c.is_whitespace() && !c.is_control()).collect();
    match compact.find([':', '/', '?', '#']) {
        Some(idx) if compact[idx..].starts_with(':') => {
            let scheme = compact[..idx].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
        _ => true,
    }
}

fn sanitize_url<'a>(url: CowStr<'a>, blocked: &'static str) -> CowStr<'a> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed(blocked)
    }
}

/// Render Markdown to HTML safe for `inner_html`
pub fn parse_markdown(text: &str) -> String {
    let events = Parser::new_ext(text, get_options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url, "#"),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url, ""),
            title,
            id,
        }),
        other => other,
    });
    let mut html_output = String::new();
    push_html(&mut html_output, events);
    html_output
}

/// Plain-text preview for list cards, cut at a word boundary
pub fn plain_excerpt(text: &str, max_chars: usize) -> String {
    let mut plain = String::new();
    for event in Parser::new_ext(text, get_options()) {
        match event {
            Event::Text(t) | Event::Code(t) => plain.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                if !plain.ends_with(' ') && !plain.is_empty() {
                    plain.push(' ');
                }
            }
            _ => {}
        }
    }
    let plain = plain.trim();
    if plain.chars().count() <= max_chars {
        return plain.to_string();
    }
    let cut: String = plain.chars().take(max_chars).collect();
    let cut = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}
