//! Detail enrichment for abbreviated list projections.
//!
//! List pages sometimes return only a summary view of an item. When a field
//! the pipeline needs is missing, the item's self link is followed to the
//! detail endpoint and the fuller record is merged over the summary.

use serde_json::Value;
use tracing::debug;

use crate::endpoint::detail_path;
use crate::error::{ClientError, Result};
use crate::limiter::RateLimiter;
use crate::transport::Transport;

/// Complete `item` through its detail endpoint when `required_field` is
/// missing or empty.
///
/// The detail response nests the full record under `entity_key` (`"bill"`,
/// `"member"`, ...); its fields win over the summary's on overlap. An item
/// without a usable self link is returned unchanged. A failed detail fetch
/// is an error, isolated per item by the caller.
pub async fn enrich(
    transport: &dyn Transport,
    limiter: &RateLimiter,
    item: Value,
    required_field: &str,
    entity_key: &str,
) -> Result<Value> {
    if is_present(item.get(required_field)) {
        return Ok(item);
    }

    let Some(path) = item
        .get("url")
        .and_then(Value::as_str)
        .and_then(|url| detail_path(url, transport.base_url()))
    else {
        debug!(required_field, "item has no derivable detail link");
        return Ok(item);
    };

    limiter.wait().await;
    let (body, status) = transport.get(&path).await?;

    if !(200..300).contains(&status) {
        return Err(ClientError::DetailStatus { path, status });
    }

    match body.get(entity_key) {
        Some(Value::Object(detail)) => Ok(merge(item, detail)),
        // Detail response without the expected entity: keep the summary
        _ => Ok(item),
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn merge(item: Value, detail: &serde_json::Map<String, Value>) -> Value {
    let mut merged = match item {
        Value::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    for (key, value) in detail {
        merged.insert(key.clone(), value.clone());
    }
    Value::Object(merged)
}
