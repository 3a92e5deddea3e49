//! Markdown to the intermediate XHTML document fed to the stylesheets.

use crate::error::Result;
use crate::tools::{self, Toolchain};
use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;

lazy_static::lazy_static! {
    static ref BARE_URL: Regex =
        Regex::new(r#"\b(?:https?|ftp)://[^\s<>]*[^\s<>.,;:!?)\]'"]"#)
            .expect("couldn't compile regex");
}

/// Turns bare URLs in running text into links, leaving code, links and image
/// captions untouched.
fn autolink<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut linked = Vec::new();
    // nesting of links, images and code blocks around the current event
    let mut verbatim = 0usize;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                verbatim += 1
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                verbatim = verbatim.saturating_sub(1)
            }
            Event::Text(text) if verbatim == 0 && BARE_URL.is_match(text) => {
                let mut last = 0;
                for url in BARE_URL.find_iter(text) {
                    if url.start() > last {
                        linked.push(Event::Text(CowStr::from(text[last..url.start()].to_string())));
                    }
                    linked.push(Event::Start(Tag::Link {
                        link_type: LinkType::Autolink,
                        dest_url: CowStr::from(url.as_str().to_string()),
                        title: CowStr::from(""),
                        id: CowStr::from(""),
                    }));
                    linked.push(Event::Text(CowStr::from(url.as_str().to_string())));
                    linked.push(Event::End(TagEnd::Link));
                    last = url.end();
                }
                if last < text.len() {
                    linked.push(Event::Text(CowStr::from(text[last..].to_string())));
                }
                continue;
            }
            _ => {}
        }
        linked.push(event);
    }

    linked
}

/// Renders Markdown in-process, wrapped as `<xhtml><body>…</body></xhtml>`.
pub fn render(markdown: &str) -> String {
    let mut md_parser_options = Options::empty();
    md_parser_options.insert(Options::ENABLE_TABLES);
    md_parser_options.insert(Options::ENABLE_FOOTNOTES);
    md_parser_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_parser_options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    md_parser_options.insert(Options::ENABLE_DEFINITION_LIST);

    let events = autolink(Parser::new_ext(markdown, md_parser_options));

    let mut content = String::with_capacity(markdown.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut content, events.into_iter());

    format!("<xhtml>\n<body>\n\n{content}\n</body>\n</xhtml>")
}

/// Has pandoc render the Markdown to HTML, wrapped as `<xhtml>…</xhtml>`.
pub fn pandoc(toolchain: &Toolchain, markdown: &str) -> Result<String> {
    let source = tools::scratch_file("md2xml-", ".md", markdown.as_bytes())?;

    let mut command = tools::command(&toolchain.pandoc)?;
    command
        .arg(source.path())
        .args(["-f", "markdown", "-t", "html"]);
    let html = tools::run(&mut command)?;

    Ok(format!("<xhtml>\n{}\n</xhtml>", String::from_utf8_lossy(&html)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_wrapped_for_the_stylesheet() {
        let xhtml = render("Hello *world*");
        assert!(xhtml.starts_with("<xhtml>\n<body>\n\n<p>Hello <em>world</em></p>"));
        assert!(xhtml.ends_with("\n</body>\n</xhtml>"));
    }

    #[test]
    fn void_elements_are_self_closed() {
        let xhtml = render("![a cat](/img/cat.png)\n\n---\n");
        assert!(xhtml.contains(r#"<img src="/img/cat.png" alt="a cat" />"#));
        assert!(xhtml.contains("<hr />"));
    }

    #[test]
    fn tables_and_strikethrough_are_enabled() {
        let xhtml = render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~");
        assert!(xhtml.contains("<table>"));
        assert!(xhtml.contains("<td>2</td>"));
        assert!(xhtml.contains("<del>gone</del>"));
    }

    #[test]
    fn explicit_heading_ids() {
        let xhtml = render("# Introduction {#intro}");
        assert!(xhtml.contains(r#"<h1 id="intro">Introduction</h1>"#));
    }

    #[test]
    fn bare_urls_become_links() {
        let xhtml = render("Visit https://example.com/docs. Thanks");
        assert!(xhtml.contains(
            r#"Visit <a href="https://example.com/docs">https://example.com/docs</a>. Thanks"#
        ));
    }

    #[test]
    fn urls_in_code_and_links_stay_as_they_are() {
        let xhtml = render("[site](https://a.org)\n\n```\nhttps://b.org\n```\n\n`https://c.org`");
        assert!(xhtml.contains(r#"<a href="https://a.org">site</a>"#));
        assert!(xhtml.contains("<code>https://b.org\n</code>"));
        assert!(xhtml.contains("<code>https://c.org</code>"));
        assert_eq!(xhtml.matches("<a ").count(), 1);
    }

    #[test]
    fn markup_characters_are_escaped() {
        let xhtml = render("a < b & c");
        assert!(xhtml.contains("<p>a &lt; b &amp; c</p>"));
    }
}
