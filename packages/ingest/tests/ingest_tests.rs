mod common;

use chrono::{Duration, NaiveDateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use congress_client::transport::test_support::{MockResponse, MockTransport};
use congress_ingest::models::SyncStatus;
use congress_ingest::{sync_log, BillFilter, Ingestor};

fn bill(number: u32, title: &str) -> Value {
    json!({
        "congress": 118,
        "type": "HR",
        "number": number,
        "title": title,
        "updateDate": "2024-03-11T04:15:00Z",
        "url": format!("https://api.congress.gov/v3/bill/118/hr/{number}")
    })
}

fn bills_page(bills: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "bills": bills,
        "pagination": { "count": 4, "next": next, "prev": null }
    })
}

fn ingestor(transport: MockTransport, pool: sqlx::PgPool) -> Ingestor<MockTransport> {
    Ingestor::new(transport, pool).with_rate_limit(std::time::Duration::ZERO)
}

#[tokio::test]
async fn test_bill_ingestion_end_to_end() {
    let db = common::TestDb::new().await;

    // Two pages of two bills; the last one lacks a title and is completed
    // through its detail endpoint.
    let mut untitled = bill(4, "");
    untitled["title"] = Value::Null;

    let transport = MockTransport::with_pages(vec![
        bills_page(
            vec![bill(1, "First Act"), bill(2, "Second Act")],
            Some("https://api.congress.gov/v3/bill/118/hr?offset=2&limit=250"),
        ),
        bills_page(vec![bill(3, "Third Act"), untitled], None),
        json!({"bill": bill(4, "Fourth Act")}),
    ]);

    let filter = BillFilter::new().with_congress(118).with_bill_type("hr");
    let stats = ingestor(transport, db.pool.clone())
        .ingest_bills(&filter)
        .await
        .unwrap();

    assert_eq!(stats.processed, 4);
    assert_eq!(stats.created, 4);
    assert_eq!(stats.updated, 0);
    assert_eq!(stats.failed, 0);
    assert!(stats.errors.is_empty());
    assert_eq!(db.count("bills").await, 4);

    // The enriched bill carries the detail title
    let (title,): (Option<String>,) =
        sqlx::query_as("SELECT title FROM bills WHERE bill_number = 4")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(title.as_deref(), Some("Fourth Act"));

    let runs = sync_log::list_sync_runs(&db.pool, 1).await.unwrap();
    assert_eq!(runs[0].status, SyncStatus::Completed);
    assert_eq!(runs[0].endpoint, "bills");
    assert_eq!(runs[0].records_processed, 4);
    assert_eq!(runs[0].records_created, 4);
    assert!(runs[0].completed_at.is_some());
}

#[tokio::test]
async fn test_one_bad_record_does_not_abort_the_batch() {
    let db = common::TestDb::new().await;

    // Item 2 has no bill number, so normalization fails. No self link, so
    // no detail fetch either.
    let transport = MockTransport::with_pages(vec![bills_page(
        vec![
            json!({"congress": 118, "type": "HR", "number": 1, "title": "Good"}),
            json!({"congress": 118, "type": "HR", "title": "No number"}),
            json!({"congress": 118, "type": "HR", "number": 3, "title": "Also good"}),
        ],
        None,
    )]);

    let stats = ingestor(transport, db.pool.clone())
        .ingest_bills(&BillFilter::new())
        .await
        .unwrap();

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.created, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.errors.len(), 1);
    assert!(stats.errors[0].contains("number"));
    assert_eq!(db.count("bills").await, 2);

    // One bad record still finalizes the run as completed
    let runs = sync_log::list_sync_runs(&db.pool, 1).await.unwrap();
    assert_eq!(runs[0].status, SyncStatus::Completed);
    assert_eq!(runs[0].records_failed, 1);
}

#[tokio::test]
async fn test_fetch_failure_finalizes_run_as_failed() {
    let db = common::TestDb::new().await;

    let transport = MockTransport::new(vec![MockResponse::Error("connection refused".into())]);

    let stats = ingestor(transport, db.pool.clone())
        .ingest_bills(&BillFilter::new())
        .await
        .unwrap();

    assert_eq!(stats.processed, 0);
    assert_eq!(stats.created, 0);
    assert_eq!(stats.failed, 0);

    let runs = sync_log::list_sync_runs(&db.pool, 1).await.unwrap();
    assert_eq!(runs[0].status, SyncStatus::Failed);
    assert!(runs[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("connection refused"));
    assert!(runs[0].completed_at.is_some());
}

#[tokio::test]
async fn test_reingesting_same_bills_counts_updates() {
    let db = common::TestDb::new().await;

    let page = bills_page(vec![bill(1, "First Act"), bill(2, "Second Act")], None);

    let first = ingestor(
        MockTransport::with_pages(vec![page.clone()]),
        db.pool.clone(),
    )
    .ingest_bills(&BillFilter::new())
    .await
    .unwrap();
    assert_eq!(first.created, 2);
    assert_eq!(first.updated, 0);

    let second = ingestor(MockTransport::with_pages(vec![page]), db.pool.clone())
        .ingest_bills(&BillFilter::new())
        .await
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 2);
    assert_eq!(db.count("bills").await, 2);
}

#[tokio::test]
async fn test_sync_recent_bills_builds_date_window() {
    let db = common::TestDb::new().await;

    let ingestor = ingestor(
        MockTransport::with_pages(vec![bills_page(vec![], None)]),
        db.pool.clone(),
    );
    let stats = ingestor.sync_recent_bills(7).await.unwrap();
    assert_eq!(stats.processed, 0);

    let requests = ingestor.transport().requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("bill?fromDateTime="));

    let from = query_param(&requests[0], "fromDateTime");
    let to = query_param(&requests[0], "toDateTime");
    let from = NaiveDateTime::parse_from_str(&from, "%Y-%m-%dT%H:%M:%SZ")
        .unwrap()
        .and_utc();
    let to = NaiveDateTime::parse_from_str(&to, "%Y-%m-%dT%H:%M:%SZ")
        .unwrap()
        .and_utc();

    assert_eq!(to - from, Duration::days(7));
    assert!((Utc::now() - to) < Duration::minutes(1));
}

fn query_param(path: &str, name: &str) -> String {
    path.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(&format!("{name}=")))
        .unwrap_or_else(|| panic!("no {name} parameter in {path}"))
        .to_string()
}

#[tokio::test]
async fn test_member_ingestion_enriches_list_projections() {
    let db = common::TestDb::new().await;

    // List projection without name parts; the detail response completes it.
    let transport = MockTransport::with_pages(vec![
        json!({
            "members": [{
                "bioguideId": "P000197",
                "state": "California",
                "partyName": "Democratic",
                "url": "https://api.congress.gov/v3/member/P000197"
            }],
            "pagination": {"count": 1, "next": null}
        }),
        json!({
            "member": {
                "bioguideId": "P000197",
                "firstName": "Nancy",
                "lastName": "Pelosi",
                "party": "D",
                "state": "CA",
                "district": 11,
                "birthYear": "1940"
            }
        }),
    ]);

    let stats = ingestor(transport, db.pool.clone())
        .ingest_members(Some(118), None)
        .await
        .unwrap();

    assert_eq!(stats.processed, 1);
    assert_eq!(stats.created, 1);

    let (first_name, birth_year): (Option<String>, Option<i32>) =
        sqlx::query_as("SELECT first_name, birth_year FROM members WHERE bioguide_id = $1")
            .bind("P000197")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(first_name.as_deref(), Some("Nancy"));
    assert_eq!(birth_year, Some(1940));
}

#[tokio::test]
async fn test_committee_ingestion_covers_both_chambers_in_one_run() {
    let db = common::TestDb::new().await;

    let transport = MockTransport::with_pages(vec![
        json!({
            "committees": [{"systemCode": "hsag00", "name": "Agriculture", "chamber": "House"}],
            "pagination": {"count": 1, "next": null}
        }),
        json!({
            "committees": [{"systemCode": "ssaf00", "name": "Agriculture, Nutrition, and Forestry", "chamber": "Senate"}],
            "pagination": {"count": 1, "next": null}
        }),
    ]);

    let stats = ingestor(transport, db.pool.clone())
        .ingest_committees(None)
        .await
        .unwrap();

    assert_eq!(stats.processed, 2);
    assert_eq!(stats.created, 2);

    let runs = sync_log::list_sync_runs(&db.pool, 10).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].endpoint, "committees");
    assert_eq!(runs[0].records_processed, 2);
}

#[tokio::test]
async fn test_amendment_ingestion() {
    let db = common::TestDb::new().await;

    let transport = MockTransport::with_pages(vec![json!({
        "amendments": [{
            "congress": 117,
            "type": "SAMDT",
            "number": "2137",
            "purpose": "To improve the bill",
            "amendedBill": {"congress": 117, "type": "HR", "number": "3684"}
        }],
        "pagination": {"count": 1, "next": null}
    })]);

    let stats = ingestor(transport, db.pool.clone())
        .ingest_amendments(Some(117), None)
        .await
        .unwrap();

    assert_eq!(stats.processed, 1);
    assert_eq!(stats.created, 1);

    let (purpose,): (Option<String>,) =
        sqlx::query_as("SELECT purpose FROM amendments WHERE amendment_number = 2137")
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(purpose.as_deref(), Some("To improve the bill"));
}
