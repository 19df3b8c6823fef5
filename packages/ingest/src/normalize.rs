//! Normalizers mapping raw API payloads to canonical records.
//!
//! Pure functions, one per entity kind. Natural-key fields are required; a
//! missing one is a per-item failure. Everything else is optional with
//! explicit defaults. The API is loose about scalar types (numbers arrive as
//! strings in list projections), so numeric fields accept both.

use serde_json::{json, Value};

use crate::error::{IngestError, Result};
use crate::models::{AmendmentRecord, BillRecord, CommitteeRecord, MemberRecord};

/// Map a raw bill payload to its canonical record.
///
/// Law number/type are taken from the first entry of the laws list;
/// `is_law` is true iff that list is present and non-empty.
pub fn bill(raw: &Value) -> Result<BillRecord> {
    let congress = require_i32(raw, "bill", "congress")?;
    let bill_type = require_str(raw, "bill", "type")?;
    let bill_number = require_i32(raw, "bill", "number")?;

    let laws = raw.get("laws").and_then(Value::as_array);
    let first_law = laws.and_then(|laws| laws.first());
    let is_law = laws.is_some_and(|laws| !laws.is_empty());

    Ok(BillRecord {
        congress,
        bill_type,
        bill_number,
        title: opt_str(raw, "title"),
        origin_chamber: opt_str(raw, "originChamber"),
        origin_chamber_code: opt_str(raw, "originChamberCode"),
        update_date: opt_str(raw, "updateDate"),
        update_date_including_text: opt_str(raw, "updateDateIncludingText"),
        introduced_date: opt_str(raw, "introducedDate"),
        constitution_authority_statement_text: opt_str(raw, "constitutionAuthorityStatementText"),
        policy_area: opt_value(raw, "policyArea"),
        subjects: opt_value(raw, "subjects"),
        latest_action: opt_value(raw, "latestAction"),
        sponsors: list_or_empty(raw, "sponsors"),
        cosponsors_count: opt_i32(raw, "cosponsorsCount").unwrap_or(0),
        committees: list_or_empty(raw, "committees"),
        related_bills: list_or_empty(raw, "relatedBills"),
        actions: list_or_empty(raw, "actions"),
        summaries: list_or_empty(raw, "summaries"),
        amendments: list_or_empty(raw, "amendments"),
        texts: list_or_empty(raw, "texts"),
        titles: list_or_empty(raw, "titles"),
        law_number: first_law.and_then(|law| opt_str(law, "number")),
        law_type: first_law.and_then(|law| opt_str(law, "type")),
        is_law,
        raw: raw.clone(),
    })
}

/// Map a raw member payload to its canonical record.
pub fn member(raw: &Value) -> Result<MemberRecord> {
    let bioguide_id = require_str(raw, "member", "bioguideId")?;

    Ok(MemberRecord {
        bioguide_id,
        first_name: opt_str(raw, "firstName"),
        last_name: opt_str(raw, "lastName"),
        middle_name: opt_str(raw, "middleName"),
        suffix: opt_str(raw, "suffix"),
        nickname: opt_str(raw, "nickname"),
        party: opt_str(raw, "party"),
        state: opt_str(raw, "state"),
        district: opt_i32(raw, "district"),
        birth_year: opt_i32(raw, "birthYear"),
        death_year: opt_i32(raw, "deathYear"),
        terms: list_or_empty(raw, "terms"),
    })
}

/// Map a raw amendment payload to its canonical record.
///
/// References to the amended bill are flattened to identifier snapshots.
pub fn amendment(raw: &Value) -> Result<AmendmentRecord> {
    let congress = require_i32(raw, "amendment", "congress")?;
    let amendment_type = require_str(raw, "amendment", "type")?;
    let amendment_number = require_i32(raw, "amendment", "number")?;

    let amended_bill = raw.get("amendedBill").unwrap_or(&Value::Null);

    Ok(AmendmentRecord {
        congress,
        amendment_type,
        amendment_number,
        bill_congress: opt_i32(amended_bill, "congress"),
        bill_type: opt_str(amended_bill, "type"),
        bill_number: opt_i32(amended_bill, "number"),
        purpose: opt_str(raw, "purpose"),
        description: opt_str(raw, "description"),
        chamber: opt_str(raw, "chamber"),
        amendment_to_amendment: opt_value(raw, "amendedAmendment"),
        sponsors: list_or_empty(raw, "sponsors"),
        cosponsors: list_or_empty(raw, "cosponsors"),
        proposed_date: opt_str(raw, "proposedDate"),
        submitted_date: opt_str(raw, "submittedDate"),
        latest_action: opt_value(raw, "latestAction"),
        actions: list_or_empty(raw, "actions"),
        raw: raw.clone(),
    })
}

/// Map a raw committee payload to its canonical record.
pub fn committee(raw: &Value) -> Result<CommitteeRecord> {
    let system_code = require_str(raw, "committee", "systemCode")?;

    Ok(CommitteeRecord {
        system_code,
        name: opt_str(raw, "name"),
        chamber: opt_str(raw, "chamber"),
        committee_type: opt_str(raw, "type"),
        subcommittees: list_or_empty(raw, "subcommittees"),
        parent_system_code: opt_str(raw, "parentCommitteeCode"),
    })
}

fn require_str(raw: &Value, entity: &'static str, field: &'static str) -> Result<String> {
    opt_str(raw, field).ok_or(IngestError::MissingField { entity, field })
}

fn require_i32(raw: &Value, entity: &'static str, field: &'static str) -> Result<i32> {
    opt_i32(raw, field).ok_or(IngestError::MissingField { entity, field })
}

fn opt_str(raw: &Value, field: &str) -> Option<String> {
    raw.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Integer field tolerant of the API's string-encoded numbers.
fn opt_i32(raw: &Value, field: &str) -> Option<i32> {
    match raw.get(field)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn opt_value(raw: &Value, field: &str) -> Option<Value> {
    raw.get(field).filter(|v| !v.is_null()).cloned()
}

fn list_or_empty(raw: &Value, field: &str) -> Value {
    raw.get(field)
        .filter(|v| v.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]))
}
