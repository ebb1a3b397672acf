//! # Page Walker
//!
//! Drives the top-level pagination loop: fetch a page, decode it,
//! render the matching records (resolving each record's annotation on
//! the way), then follow `links.next` until the leader stops supplying
//! one.
//!
//! ## Termination:
//! - An absent `links.next` ends the walk gracefully with a
//!   [`WalkStats`] summary.
//! - A transport or decode failure stops the walk and surfaces as a
//!   [`WalkError`]; it is never conflated with end-of-data.
//! - Record-level extraction failures skip that record with a warning
//!   and count in `WalkStats::skipped`.

use std::io::Write;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::annotations;
use super::record::EventRecord;
use crate::render::TableRenderer;
use crate::retrieve::decode::{fetch_document, FetchError};
use crate::retrieve::transport::Transport;

/// Failures that abort the walk.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to write table output: {0}")]
    Render(#[from] std::io::Error),
}

/// Summary of one completed walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    /// Pages fetched from the leader.
    pub pages: usize,
    /// System event rows written to the table.
    pub rendered: usize,
    /// Records dropped because extraction failed.
    pub skipped: usize,
}

/// Sequentially walks the paginated alert listing.
pub struct PageWalker<'a, T: ?Sized> {
    transport: &'a T,
    first_page: String,
}

impl<'a, T> PageWalker<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T, first_page: impl Into<String>) -> Self {
        Self {
            transport,
            first_page: first_page.into(),
        }
    }

    /// Run the walk to completion, rendering rows as pages arrive.
    pub fn run<W: Write>(&self, renderer: &mut TableRenderer<W>) -> Result<WalkStats, WalkError> {
        let mut stats = WalkStats::default();
        let mut next = Some(self.first_page.clone());

        while let Some(url) = next {
            let document = fetch_document(self.transport, &url)?;
            stats.pages += 1;

            let resources: &[Value] = match document.get("data").and_then(Value::as_array) {
                Some(items) => items,
                None => {
                    warn!("page {} has no data array", url);
                    &[]
                }
            };

            for resource in resources {
                match EventRecord::from_resource(resource) {
                    Ok(Some(record)) => {
                        let annotation = annotations::resolve(self.transport, &record);
                        renderer.row(&record, &annotation)?;
                        stats.rendered += 1;
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("skipping malformed alert record: {}", e);
                        stats.skipped += 1;
                    }
                }
            }

            next = document
                .get("links")
                .and_then(|links| links.get("next"))
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        info!(
            "walk complete: {} pages, {} rows, {} skipped",
            stats.pages, stats.rendered, stats.skipped
        );
        Ok(stats)
    }
}
