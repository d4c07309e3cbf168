//! Site export.
//!
//! Output layout under the site's export directory:
//!
//! ```text
//! <path>/
//! ├── site.json            # site model without document bodies
//! ├── blog/<sourcePath>    # blog posts
//! ├── docs/<sourcePath>    # doc pages
//! └── static/img/logo.png  # logo, if any
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use dex_storage::{ContentStore, FileRef};
use futures::future::try_join_all;

use crate::error::WriteError;
use crate::model::{Document, Site};

/// Name of the generated site model file.
pub const SITE_FILE: &str = "site.json";

const LOGO_DEST: &str = "static/img/logo.png";

/// Counts of exported files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files written from generated or loaded text.
    pub files_written: usize,
    /// Files copied from the corpus.
    pub files_copied: usize,
}

enum Output {
    Write { data: String, dest: PathBuf },
    Copy { file: FileRef, dest: PathBuf },
}

/// Writes a finished [`Site`] through a content store.
pub struct SiteWriter {
    store: Arc<dyn ContentStore>,
}

impl SiteWriter {
    #[must_use]
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Export the site to `site.path`.
    ///
    /// Documents with loaded content are written from it; the rest are
    /// copied from the corpus. All writes run concurrently after the export
    /// directory exists.
    ///
    /// # Errors
    ///
    /// Returns the first storage failure, or [`WriteError::Serialize`] if the
    /// site model can't be rendered.
    pub async fn write(&self, site: &Site) -> Result<WriteSummary, WriteError> {
        let start = Instant::now();
        let dir = site.path.as_path();

        let mut outputs = vec![Output::Write {
            data: serde_json::to_string_pretty(&site.without_content())?,
            dest: dir.join(SITE_FILE),
        }];
        outputs.extend(site.blog.posts.values().map(|doc| document(doc, &dir.join("blog"))));
        outputs.extend(site.pages.docs.values().map(|doc| document(doc, &dir.join("docs"))));
        if !site.logo.path.is_empty() {
            outputs.push(Output::Copy {
                file: FileRef::new(site.logo.path.clone()),
                dest: dir.join(LOGO_DEST),
            });
        }

        let summary = outputs
            .iter()
            .fold(WriteSummary::default(), |mut summary, output| {
                match output {
                    Output::Write { .. } => summary.files_written += 1,
                    Output::Copy { .. } => summary.files_copied += 1,
                }
                summary
            });

        self.store.mkdir(dir).await?;
        let store = self.store.as_ref();
        try_join_all(outputs.iter().map(|output| async move {
            match output {
                Output::Write { data, dest } => store.write(data, dest).await,
                Output::Copy { file, dest } => store.copy(file, dest).await,
            }
        }))
        .await?;

        tracing::info!(
            path = %dir.display(),
            written = summary.files_written,
            copied = summary.files_copied,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Site written"
        );
        Ok(summary)
    }
}

fn document(doc: &Document, dir: &Path) -> Output {
    let dest = dir.join(&doc.source_path);
    match &doc.content {
        Some(content) => Output::Write {
            data: content.clone(),
            dest,
        },
        None => Output::Copy {
            file: FileRef::new(doc.source_path.clone()),
            dest,
        },
    }
}
