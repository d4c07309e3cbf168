//! Link lists and link trees under manifest headings.

use std::sync::LazyLock;

use dex_meta::{ListItem, Outline};
use dex_storage::File;
use futures::future::try_join_all;
use regex::Regex;

use crate::error::BuildError;
use crate::link::LinkResolver;
use crate::model::{Leaf, TreeNode};
use crate::section::for_heading;
use crate::tree::{Node, TreeBuilder};

/// Leading list marker: `-`, `*`, `+`, `1.` or `1)`, with an optional task box.
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s*(?:\[[ xX]\]\s+)?").unwrap());

/// List items of a section in line order.
fn sorted_items(section: &Outline) -> Vec<&ListItem> {
    let mut items: Vec<&ListItem> = section.list_items.iter().collect();
    items.sort_by_key(|item| item.position.start.line);
    items
}

/// Literal text of a list item with its bullet stripped.
fn item_text(body: &str, item: &ListItem) -> String {
    let text = body
        .get(item.position.start.offset..item.position.end.offset)
        .unwrap_or_default();
    BULLET_RE.replace(text, "").trim().to_owned()
}

/// Leaf for a linked item, branch labelled with the item text otherwise.
async fn item_node(
    resolver: &LinkResolver<'_>,
    section: &Outline,
    body: &str,
    item: &ListItem,
) -> Result<Node, BuildError> {
    match section.link_on_line(item.position.start.line) {
        Some(link) => resolver.resolve(link).await.map(Node::Leaf),
        None => Ok(Node::Branch(item_text(body, item))),
    }
}

/// Leaves for every linked list item under `heading`.
///
/// Nested items count too. Items without a link on their first line are
/// skipped.
pub(crate) async fn extract_links(
    resolver: &LinkResolver<'_>,
    outline: &Outline,
    heading: &str,
) -> Result<Vec<Leaf>, BuildError> {
    let section = for_heading(outline, heading);
    let links = sorted_items(&section).into_iter().filter_map(|item| {
        let line = item.position.start.line;
        let link = section.link_on_line(line);
        if link.is_none() {
            tracing::warn!(
                path = resolver.source(),
                line = line + 1,
                heading,
                "List item without link, skipping"
            );
        }
        link
    });

    try_join_all(links.map(|link| resolver.resolve(link))).await
}

/// Navigation tree for the list under `heading`.
///
/// Linked items become leaves and plain-text items become branches labelled
/// with their text. Links resolve concurrently; attaching nodes to parents
/// is a single pass in line order.
pub(crate) async fn extract_link_tree(
    resolver: &LinkResolver<'_>,
    file: &File,
    outline: &Outline,
    heading: &str,
) -> Result<Vec<TreeNode>, BuildError> {
    let section = for_heading(outline, heading);
    let items = sorted_items(&section);

    let nodes = try_join_all(
        items
            .iter()
            .map(|item| item_node(resolver, &section, &file.body, item)),
    )
    .await?;

    let mut builder = TreeBuilder::new(&file.path);
    for (item, node) in items.iter().zip(nodes) {
        builder.add_item(item.position.start.line, node, item.parent)?;
    }

    let tree = builder.build();
    tracing::debug!(path = %file.path, heading, roots = tree.len(), "Link tree extracted");
    Ok(tree)
}
