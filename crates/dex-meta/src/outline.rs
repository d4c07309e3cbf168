//! Outline data types.

use serde::{Deserialize, Serialize};

use crate::Frontmatter;

/// A location in a document body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// 0-based line number.
    pub line: usize,
    /// Byte offset from the start of the body.
    pub offset: usize,
}

/// Span of an outline item, `start` inclusive and `end` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    /// Create a position from explicit lines and offsets.
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Position covering whole lines, with offsets left at zero.
    ///
    /// Useful for outlines assembled by hand where only lines matter.
    #[must_use]
    pub fn lines(start: usize, end: usize) -> Self {
        Self {
            start: Point {
                line: start,
                offset: 0,
            },
            end: Point {
                line: end,
                offset: 0,
            },
        }
    }
}

/// A section heading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading text without the `#` markers.
    pub text: String,
    /// Heading level (1-6).
    pub level: u8,
    pub position: Position,
}

/// A link to another document (wikilink or inline markdown link).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Raw link target as written, e.g. `Page Simple` or `docs/guide.md#setup`.
    pub target: String,
    /// Text shown for the link: alias, link text, or the target itself.
    pub display_text: String,
    pub position: Position,
}

/// An embedded resource (`![[file]]` or `![alt](file)`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub target: String,
    pub display_text: String,
    pub position: Position,
}

/// A list item.
///
/// `position` covers the item's own text only; nested lists belong to the
/// child items.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub position: Position,
    /// Start line of the enclosing list item, `None` for top-level items.
    pub parent: Option<usize>,
}

/// Positional outline of one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub headings: Vec<Heading>,
    pub links: Vec<Link>,
    pub embeds: Vec<Embed>,
    pub list_items: Vec<ListItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
}

impl Outline {
    /// Declared publish slug from frontmatter.
    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.slug.as_deref()
    }

    /// Declared title from frontmatter.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.title.as_deref()
    }

    /// First link starting on `line`.
    #[must_use]
    pub fn link_on_line(&self, line: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.position.start.line == line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(target: &str, line: usize) -> Link {
        Link {
            target: target.to_owned(),
            display_text: target.to_owned(),
            position: Position::lines(line, line),
        }
    }

    #[test]
    fn test_link_on_line_returns_first_match() {
        let outline = Outline {
            links: vec![link("A", 1), link("B", 2), link("C", 2)],
            ..Outline::default()
        };

        assert_eq!(outline.link_on_line(2).map(|l| l.target.as_str()), Some("B"));
        assert!(outline.link_on_line(3).is_none());
    }

    #[test]
    fn test_slug_without_frontmatter_is_none() {
        let outline = Outline::default();

        assert!(outline.slug().is_none());
        assert!(outline.title().is_none());
    }

    #[test]
    fn test_slug_from_frontmatter() {
        let outline = Outline {
            frontmatter: Some(Frontmatter {
                slug: Some("/".to_owned()),
                ..Frontmatter::default()
            }),
            ..Outline::default()
        };

        assert_eq!(outline.slug(), Some("/"));
    }
}
