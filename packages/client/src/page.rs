//! Pagination traversal for list endpoints.
//!
//! Walks a paginated endpoint to completion (or a page cap), rate-limiting
//! before each request and draining every page into memory. Partial results
//! are a feature: once at least one page has been fetched, any failure ends
//! the walk with the accumulated items instead of an error.

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::endpoint::detail_path;
use crate::error::Result;
use crate::limiter::RateLimiter;
use crate::transport::Transport;

/// Default items per page; the maximum the API allows.
pub const DEFAULT_PAGE_SIZE: u32 = 250;

/// Item-collection keys used across the API, one per entity kind.
const ITEM_KEYS: &[&str] = &[
    "bills",
    "members",
    "amendments",
    "committees",
    "nominations",
    "treaties",
    "reports",
    "hearings",
    "items",
];

/// Pagination metadata returned with every list page.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Fetch every page of a list endpoint, in server order.
///
/// Terminates when the server stops providing a `next` cursor, after
/// `max_pages` pages, or on a non-success status (logged; the items fetched
/// so far are returned). A transport-level failure before anything was
/// accumulated is an error; after the first items it degrades to a logged
/// partial result. No retries.
pub async fn fetch_paginated(
    transport: &dyn Transport,
    limiter: &RateLimiter,
    endpoint: &str,
    page_size: u32,
    max_pages: Option<u32>,
) -> Result<Vec<Value>> {
    let mut all_items = Vec::new();
    let mut page: u32 = 0;

    let separator = if endpoint.contains('?') { '&' } else { '?' };
    let mut next_path = Some(format!("{endpoint}{separator}limit={page_size}&offset=0"));

    while let Some(path) = next_path {
        if max_pages.is_some_and(|max| page >= max) {
            info!(page, "page cap reached, stopping pagination");
            break;
        }

        limiter.wait().await;

        let (body, status) = match transport.get(&path).await {
            Ok(response) => response,
            Err(e) if all_items.is_empty() => return Err(e),
            Err(e) => {
                warn!(%path, error = %e, "fetch failed mid-pagination, returning partial result");
                break;
            }
        };

        if !(200..300).contains(&status) {
            error!(%path, status, "non-success status, stopping pagination");
            break;
        }

        let items = extract_items(&body);
        all_items.extend(items);
        page += 1;

        next_path = next_cursor(&body, transport.base_url());
        info!(page, total = all_items.len(), "fetched page");
    }

    Ok(all_items)
}

/// Extract the item collection from a list response, whichever entity kind
/// the payload carries.
pub fn extract_items(body: &Value) -> Vec<Value> {
    for key in ITEM_KEYS {
        if let Some(items) = body.get(*key) {
            return match items {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
        }
    }
    Vec::new()
}

/// Resolve the `pagination.next` cursor to a transport path.
fn next_cursor(body: &Value, base_url: &str) -> Option<String> {
    let pagination: Pagination = serde_json::from_value(body.get("pagination")?.clone()).ok()?;
    let next = pagination.next?;
    // The cursor is an absolute URL; strip the transport's base when it
    // matches and pass anything else through verbatim.
    Some(detail_path(&next, base_url).unwrap_or(next))
}
