//! Heading-scoped outline slices.

use dex_meta::{Outline, Position};

/// Restrict `outline` to the items owned by the first heading titled `heading`.
///
/// The section runs from the heading's line up to the next heading (of any
/// level) or the end of the document. An item belongs to it only if its whole
/// span lies strictly inside that range, so a multi-line item straddling the
/// boundary is dropped. Returns an empty outline if no heading matches.
#[must_use]
pub fn for_heading(outline: &Outline, heading: &str) -> Outline {
    let Some(i) = outline.headings.iter().position(|h| h.text == heading) else {
        return Outline::default();
    };

    let start = outline.headings[i].position.start.line;
    let end = outline
        .headings
        .get(i + 1)
        .map_or(usize::MAX, |h| h.position.start.line);
    let in_range = |p: &Position| p.start.line > start && p.end.line < end;

    Outline {
        headings: filtered(&outline.headings, |h| in_range(&h.position)),
        links: filtered(&outline.links, |l| in_range(&l.position)),
        embeds: filtered(&outline.embeds, |e| in_range(&e.position)),
        list_items: filtered(&outline.list_items, |item| in_range(&item.position)),
        frontmatter: None,
    }
}

fn filtered<T: Clone>(items: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| keep(item)).cloned().collect()
}
