//! Endpoint construction for the Congress.gov v3 API.
//!
//! All paths are relative to the API base URL. List endpoints narrow by
//! congress number and sub-type; bills additionally accept an ISO-8601
//! `fromDateTime`/`toDateTime` window.

/// Build the bill list endpoint.
///
/// `bill`, `bill/{congress}`, or `bill/{congress}/{type}`, with optional
/// date-range query parameters.
pub fn bills(
    congress: Option<u16>,
    bill_type: Option<&str>,
    from_date: Option<&str>,
    to_date: Option<&str>,
) -> String {
    let mut endpoint = match (congress, bill_type) {
        (Some(congress), Some(bill_type)) => format!("bill/{congress}/{bill_type}"),
        (Some(congress), None) => format!("bill/{congress}"),
        _ => "bill".to_string(),
    };

    let mut params = Vec::new();
    if let Some(from) = from_date {
        params.push(format!("fromDateTime={from}"));
    }
    if let Some(to) = to_date {
        params.push(format!("toDateTime={to}"));
    }
    if !params.is_empty() {
        endpoint.push('?');
        endpoint.push_str(&params.join("&"));
    }

    endpoint
}

/// Build the member list endpoint, optionally scoped to one congress.
pub fn members(congress: Option<u16>) -> String {
    match congress {
        Some(congress) => format!("member/congress/{congress}"),
        None => "member".to_string(),
    }
}

/// Build the amendment list endpoint, optionally scoped to one congress.
pub fn amendments(congress: Option<u16>) -> String {
    match congress {
        Some(congress) => format!("amendment/{congress}"),
        None => "amendment".to_string(),
    }
}

/// Build the committee list endpoint for a chamber.
pub fn committees(chamber: &str) -> String {
    format!("committee/{chamber}")
}

/// Derive a transport path from an item's absolute self link, resolved
/// against the transport's configured base URL.
///
/// Returns `None` when the link does not point into that API, so callers fall
/// back to the item as-is.
pub fn detail_path(url: &str, base_url: &str) -> Option<String> {
    let path = url.strip_prefix(base_url)?;
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}
