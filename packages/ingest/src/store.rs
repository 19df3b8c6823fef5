//! Idempotent persistence keyed by natural keys.
//!
//! Each upsert is a single `INSERT .. ON CONFLICT DO UPDATE` statement: the
//! update arm overwrites only mutable columns and never touches the natural
//! key or `created_at`. Whether the insert or the update arm fired is
//! reported through `(xmax = 0)` inside the same statement, so the caller
//! gets a created/updated boolean without a second round trip or a race.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{AmendmentRecord, BillRecord, CommitteeRecord, MemberRecord, Upsert};

/// Insert or update a bill by (congress, bill_type, bill_number).
#[tracing::instrument(
    skip(pool, record),
    fields(congress = record.congress, bill_type = %record.bill_type, number = record.bill_number)
)]
pub async fn upsert_bill(pool: &PgPool, record: &BillRecord) -> Result<Upsert> {
    let outcome = sqlx::query_as::<_, Upsert>(
        r#"
        INSERT INTO bills (
            congress, bill_type, bill_number, title, origin_chamber,
            origin_chamber_code, update_date, update_date_including_text,
            introduced_date, constitution_authority_statement_text,
            policy_area, subjects, latest_action, sponsors, cosponsors_count,
            committees, related_bills, actions, summaries, amendments,
            texts, titles, law_number, law_type, is_law, raw_data
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
            $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26
        )
        ON CONFLICT (congress, bill_type, bill_number) DO UPDATE SET
            title = EXCLUDED.title,
            origin_chamber = EXCLUDED.origin_chamber,
            origin_chamber_code = EXCLUDED.origin_chamber_code,
            update_date = EXCLUDED.update_date,
            update_date_including_text = EXCLUDED.update_date_including_text,
            introduced_date = EXCLUDED.introduced_date,
            constitution_authority_statement_text = EXCLUDED.constitution_authority_statement_text,
            policy_area = EXCLUDED.policy_area,
            subjects = EXCLUDED.subjects,
            latest_action = EXCLUDED.latest_action,
            sponsors = EXCLUDED.sponsors,
            cosponsors_count = EXCLUDED.cosponsors_count,
            committees = EXCLUDED.committees,
            related_bills = EXCLUDED.related_bills,
            actions = EXCLUDED.actions,
            summaries = EXCLUDED.summaries,
            amendments = EXCLUDED.amendments,
            texts = EXCLUDED.texts,
            titles = EXCLUDED.titles,
            law_number = EXCLUDED.law_number,
            law_type = EXCLUDED.law_type,
            is_law = EXCLUDED.is_law,
            raw_data = EXCLUDED.raw_data,
            updated_at = now()
        RETURNING id, (xmax = 0) AS created
        "#,
    )
    .bind(record.congress)
    .bind(&record.bill_type)
    .bind(record.bill_number)
    .bind(&record.title)
    .bind(&record.origin_chamber)
    .bind(&record.origin_chamber_code)
    .bind(&record.update_date)
    .bind(&record.update_date_including_text)
    .bind(&record.introduced_date)
    .bind(&record.constitution_authority_statement_text)
    .bind(&record.policy_area)
    .bind(&record.subjects)
    .bind(&record.latest_action)
    .bind(&record.sponsors)
    .bind(record.cosponsors_count)
    .bind(&record.committees)
    .bind(&record.related_bills)
    .bind(&record.actions)
    .bind(&record.summaries)
    .bind(&record.amendments)
    .bind(&record.texts)
    .bind(&record.titles)
    .bind(&record.law_number)
    .bind(&record.law_type)
    .bind(record.is_law)
    .bind(&record.raw)
    .fetch_one(pool)
    .await?;

    tracing::debug!(id = outcome.id, created = outcome.created, "bill upserted");
    Ok(outcome)
}

/// Insert or update a member by bioguide id.
#[tracing::instrument(skip(pool, record), fields(bioguide_id = %record.bioguide_id))]
pub async fn upsert_member(pool: &PgPool, record: &MemberRecord) -> Result<Upsert> {
    let outcome = sqlx::query_as::<_, Upsert>(
        r#"
        INSERT INTO members (
            bioguide_id, first_name, last_name, middle_name, suffix,
            nickname, party, state, district, birth_year, death_year, terms
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (bioguide_id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            middle_name = EXCLUDED.middle_name,
            suffix = EXCLUDED.suffix,
            nickname = EXCLUDED.nickname,
            party = EXCLUDED.party,
            state = EXCLUDED.state,
            district = EXCLUDED.district,
            birth_year = EXCLUDED.birth_year,
            death_year = EXCLUDED.death_year,
            terms = EXCLUDED.terms,
            updated_at = now()
        RETURNING id, (xmax = 0) AS created
        "#,
    )
    .bind(&record.bioguide_id)
    .bind(&record.first_name)
    .bind(&record.last_name)
    .bind(&record.middle_name)
    .bind(&record.suffix)
    .bind(&record.nickname)
    .bind(&record.party)
    .bind(&record.state)
    .bind(record.district)
    .bind(record.birth_year)
    .bind(record.death_year)
    .bind(&record.terms)
    .fetch_one(pool)
    .await?;

    tracing::debug!(id = outcome.id, created = outcome.created, "member upserted");
    Ok(outcome)
}

/// Insert or update an amendment by (congress, amendment_type, amendment_number).
#[tracing::instrument(
    skip(pool, record),
    fields(congress = record.congress, amendment_type = %record.amendment_type, number = record.amendment_number)
)]
pub async fn upsert_amendment(pool: &PgPool, record: &AmendmentRecord) -> Result<Upsert> {
    let outcome = sqlx::query_as::<_, Upsert>(
        r#"
        INSERT INTO amendments (
            congress, amendment_type, amendment_number, bill_congress,
            bill_type, bill_number, purpose, description, chamber,
            amendment_to_amendment, sponsors, cosponsors, proposed_date,
            submitted_date, latest_action, actions, raw_data
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17
        )
        ON CONFLICT (congress, amendment_type, amendment_number) DO UPDATE SET
            bill_congress = EXCLUDED.bill_congress,
            bill_type = EXCLUDED.bill_type,
            bill_number = EXCLUDED.bill_number,
            purpose = EXCLUDED.purpose,
            description = EXCLUDED.description,
            chamber = EXCLUDED.chamber,
            amendment_to_amendment = EXCLUDED.amendment_to_amendment,
            sponsors = EXCLUDED.sponsors,
            cosponsors = EXCLUDED.cosponsors,
            proposed_date = EXCLUDED.proposed_date,
            submitted_date = EXCLUDED.submitted_date,
            latest_action = EXCLUDED.latest_action,
            actions = EXCLUDED.actions,
            raw_data = EXCLUDED.raw_data,
            updated_at = now()
        RETURNING id, (xmax = 0) AS created
        "#,
    )
    .bind(record.congress)
    .bind(&record.amendment_type)
    .bind(record.amendment_number)
    .bind(record.bill_congress)
    .bind(&record.bill_type)
    .bind(record.bill_number)
    .bind(&record.purpose)
    .bind(&record.description)
    .bind(&record.chamber)
    .bind(&record.amendment_to_amendment)
    .bind(&record.sponsors)
    .bind(&record.cosponsors)
    .bind(&record.proposed_date)
    .bind(&record.submitted_date)
    .bind(&record.latest_action)
    .bind(&record.actions)
    .bind(&record.raw)
    .fetch_one(pool)
    .await?;

    tracing::debug!(id = outcome.id, created = outcome.created, "amendment upserted");
    Ok(outcome)
}

/// Insert or update a committee by system code.
#[tracing::instrument(skip(pool, record), fields(system_code = %record.system_code))]
pub async fn upsert_committee(pool: &PgPool, record: &CommitteeRecord) -> Result<Upsert> {
    let outcome = sqlx::query_as::<_, Upsert>(
        r#"
        INSERT INTO committees (
            system_code, name, chamber, committee_type, subcommittees, parent_system_code
        ) VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (system_code) DO UPDATE SET
            name = EXCLUDED.name,
            chamber = EXCLUDED.chamber,
            committee_type = EXCLUDED.committee_type,
            subcommittees = EXCLUDED.subcommittees,
            parent_system_code = EXCLUDED.parent_system_code,
            updated_at = now()
        RETURNING id, (xmax = 0) AS created
        "#,
    )
    .bind(&record.system_code)
    .bind(&record.name)
    .bind(&record.chamber)
    .bind(&record.committee_type)
    .bind(&record.subcommittees)
    .bind(&record.parent_system_code)
    .fetch_one(pool)
    .await?;

    tracing::debug!(id = outcome.id, created = outcome.created, "committee upserted");
    Ok(outcome)
}
