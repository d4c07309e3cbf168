//! Outline metadata for vault documents.
//!
//! This crate provides the positional outline of a markdown document: its
//! headings, links, embeds, list items and frontmatter. Line numbers are
//! 0-based and offsets are byte offsets into the document body, so consumers
//! can slice the original text for any item.
//!
//! # Example
//!
//! ```
//! use dex_meta::extract_outline;
//!
//! let outline = extract_outline("# Pages\n\n- [[Page Simple]]\n");
//! assert_eq!(outline.headings[0].text, "Pages");
//! assert_eq!(outline.links[0].target, "Page Simple");
//! assert_eq!(outline.list_items[0].position.start.line, 2);
//! ```

mod extract;
mod frontmatter;
mod outline;

pub use extract::extract_outline;
pub use frontmatter::{Frontmatter, extract_frontmatter};
pub use outline::{Embed, Heading, Link, ListItem, Outline, Point, Position};
