use crate::models::DbTimeSlot;
use chrono::{NaiveDate, Utc};
use eyre::Result;
use medslot_core::models::time_slot::{DateRange, SlotDraft};
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const SLOT_COLUMNS: &str =
    "id, doctor_id, branch_id, date, start_time, end_time, is_booked, created_at";

/// Takes the transaction-scoped advisory lock guarding one doctor's day.
///
/// Callers locking several dates must do so in ascending order.
pub async fn lock_doctor_date(
    conn: &mut PgConnection,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<()> {
    let key = format!("time_slots:{}:{}", doctor_id, date);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(conn)
        .await?;

    Ok(())
}

pub async fn get_time_slots_between(
    conn: &mut PgConnection,
    doctor_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE doctor_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(from)
    .bind(to)
    .fetch_all(conn)
    .await?;

    Ok(time_slots)
}

pub async fn create_time_slot(
    conn: &mut PgConnection,
    doctor_id: Uuid,
    branch_id: Uuid,
    draft: &SlotDraft,
) -> Result<DbTimeSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        INSERT INTO time_slots
            (id, doctor_id, branch_id, date, start_time, end_time, is_booked, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(doctor_id)
    .bind(branch_id)
    .bind(draft.date)
    .bind(draft.start_time)
    .bind(draft.end_time)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(time_slot)
}

pub async fn get_time_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Flips an available slot to booked. Returns `None` when the slot is missing
/// or already booked; the row update is the compare-and-set.
pub async fn mark_booked(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_booked = TRUE
        WHERE id = $1 AND is_booked = FALSE
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

pub async fn mark_available(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTimeSlot>> {
    let time_slot = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        UPDATE time_slots
        SET is_booked = FALSE
        WHERE id = $1
        RETURNING {SLOT_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(time_slot)
}

/// Deletes the slot only while it is unbooked. Returns whether a row was removed.
pub async fn delete_unbooked_time_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn get_time_slots_by_doctor_id(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    range: DateRange,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {SLOT_COLUMNS}
        FROM time_slots
        WHERE doctor_id = $1
          AND ($2::date IS NULL OR date >= $2)
          AND ($3::date IS NULL OR date <= $3)
          AND (NOT $4 OR is_booked = FALSE)
        ORDER BY date ASC, start_time ASC
        "#
    ))
    .bind(doctor_id)
    .bind(range.from)
    .bind(range.to)
    .bind(range.available_only)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn delete_unbooked_time_slots_before(
    pool: &Pool<Postgres>,
    date: NaiveDate,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE date < $1 AND is_booked = FALSE
        "#,
    )
    .bind(date)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
