//! YAML frontmatter parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fields declared in a document's frontmatter block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Document title override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Publish slug, e.g. `/` to make the document the site root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Remaining fields, kept for templating.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Extract the frontmatter block at the start of a document.
///
/// The block must open with `---` on the first line (a leading BOM is
/// allowed) and close with `---` or `...`. Returns `None` when there is no
/// block, it is empty, or it is not a YAML mapping.
#[must_use]
pub fn extract_frontmatter(body: &str) -> Option<Frontmatter> {
    let mut lines = body.lines();

    let first = lines.next()?.trim_start_matches('\u{feff}').trim_end();
    if first != "---" {
        return None;
    }

    let mut yaml_lines = Vec::new();
    let mut closed = false;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            closed = true;
            break;
        }
        yaml_lines.push(line);
    }

    if !closed || yaml_lines.iter().all(|l| l.trim().is_empty()) {
        return None;
    }

    serde_yaml::from_str(&yaml_lines.join("\n")).ok()
}
