//! Markdown outline extraction.
//!
//! Headings, inline links, images and list items come from the markdown
//! parser's offset events. Wikilinks are not markdown syntax, so they are
//! matched on the raw text and dropped when they fall inside code or the
//! frontmatter block.

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use crate::frontmatter::extract_frontmatter;
use crate::outline::{Embed, Heading, Link, ListItem, Outline, Point, Position};

/// `[[target]]`, `[[target|alias]]` and the `![[...]]` embed form.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]\n]+?)\]\]").unwrap());

/// Maps byte offsets to 0-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn point(&self, offset: usize) -> Point {
        let line = self
            .starts
            .partition_point(|&s| s <= offset)
            .saturating_sub(1);
        Point { line, offset }
    }

    /// Position of `body[range]` with trailing whitespace trimmed.
    fn span(&self, body: &str, range: Range<usize>) -> Position {
        let trimmed = body
            .get(range.clone())
            .map_or(0, |s| s.trim_end().len());
        Position::new(self.point(range.start), self.point(range.start + trimmed))
    }
}

struct OpenItem {
    /// Index into `Outline::list_items`.
    idx: usize,
    line: usize,
    range: Range<usize>,
    own_end: Option<usize>,
    /// Bullet whose nested list starts on its own line (`- - Inner`). It has
    /// no text and is not recorded; its nested items take its place.
    bare: bool,
}

struct OpenText {
    range: Range<usize>,
    target: String,
    text: String,
}

/// Extract the positional outline of a markdown document.
#[must_use]
pub fn extract_outline(body: &str) -> Outline {
    let lines = LineIndex::new(body);
    let mut outline = Outline {
        frontmatter: extract_frontmatter(body),
        ..Outline::default()
    };

    let mut items: Vec<OpenItem> = Vec::new();
    let mut heading: Option<(Range<usize>, u8, String)> = None;
    let mut link: Option<OpenText> = None;
    let mut image: Option<OpenText> = None;
    let mut opaque: Vec<Range<usize>> = Vec::new();

    let options = Options::ENABLE_YAML_STYLE_METADATA_BLOCKS | Options::ENABLE_TASKLISTS;
    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((range, level as u8, String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((range, level, text)) = heading.take() {
                    outline.headings.push(Heading {
                        text: text.trim().to_owned(),
                        level,
                        position: lines.span(body, range),
                    });
                }
            }
            Event::Start(Tag::Item) => {
                let line = lines.point(range.start).line;
                if let Some(open) = items.last_mut()
                    && !open.bare
                    && open.line == line
                {
                    open.bare = true;
                    outline.list_items.truncate(open.idx);
                }
                let parent = items.iter().rev().find(|open| !open.bare).map(|open| open.line);
                let idx = outline.list_items.len();
                outline.list_items.push(ListItem {
                    position: lines.span(body, range.clone()),
                    parent,
                });
                items.push(OpenItem {
                    idx,
                    line,
                    range,
                    own_end: None,
                    bare: false,
                });
            }
            Event::Start(Tag::List(_)) => {
                if let Some(open) = items.last_mut()
                    && open.own_end.is_none()
                {
                    open.own_end = Some(range.start);
                }
            }
            Event::End(TagEnd::Item) => {
                if let Some(open) = items.pop().filter(|open| !open.bare) {
                    let end = open.own_end.unwrap_or(open.range.end);
                    outline.list_items[open.idx].position =
                        lines.span(body, open.range.start..end);
                }
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                link = Some(OpenText {
                    range,
                    target: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Link) => {
                if let Some(open) = link.take() {
                    let display_text = if open.text.trim().is_empty() {
                        open.target.clone()
                    } else {
                        open.text.trim().to_owned()
                    };
                    outline.links.push(Link {
                        target: open.target,
                        display_text,
                        position: lines.span(body, open.range),
                    });
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                image = Some(OpenText {
                    range,
                    target: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Event::End(TagEnd::Image) => {
                if let Some(open) = image.take() {
                    outline.embeds.push(Embed {
                        target: open.target,
                        display_text: open.text.trim().to_owned(),
                        position: lines.span(body, open.range),
                    });
                }
            }
            Event::Start(Tag::CodeBlock(_) | Tag::MetadataBlock(_)) => opaque.push(range),
            Event::Code(text) => {
                opaque.push(range);
                append_text(&mut heading, &mut link, &mut image, &text);
            }
            Event::Text(text) => append_text(&mut heading, &mut link, &mut image, &text),
            _ => {}
        }
    }

    collect_wikilinks(body, &lines, &opaque, &mut outline);
    outline.links.sort_by_key(|l| l.position.start.offset);
    outline.embeds.sort_by_key(|e| e.position.start.offset);
    outline
}

fn append_text(
    heading: &mut Option<(Range<usize>, u8, String)>,
    link: &mut Option<OpenText>,
    image: &mut Option<OpenText>,
    text: &str,
) {
    if let Some((_, _, buf)) = heading {
        buf.push_str(text);
    }
    if let Some(open) = link {
        open.text.push_str(text);
    }
    if let Some(open) = image {
        open.text.push_str(text);
    }
}

fn collect_wikilinks(
    body: &str,
    lines: &LineIndex,
    opaque: &[Range<usize>],
    outline: &mut Outline,
) {
    for caps in WIKILINK_RE.captures_iter(body) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        if opaque
            .iter()
            .any(|r| r.start <= whole.start() && whole.end() <= r.end)
        {
            continue;
        }

        let (target, alias) = match inner.as_str().split_once('|') {
            Some((target, alias)) => (target.trim(), Some(alias.trim())),
            None => (inner.as_str().trim(), None),
        };
        if target.is_empty() {
            continue;
        }
        let display_text = alias.filter(|a| !a.is_empty()).unwrap_or(target).to_owned();
        let position = lines.span(body, whole.range());

        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            outline.embeds.push(Embed {
                target: target.to_owned(),
                display_text,
                position,
            });
        } else {
            outline.links.push(Link {
                target: target.to_owned(),
                display_text,
                position,
            });
        }
    }
}
