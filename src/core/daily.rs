//! Daily journal business logic - one record per user per day.
//!
//! A record is only writable on its own day. Saving recomputes the achievement
//! level from the current goal TODOs, replaces the day's todo records and, when
//! recovery mode is on, stores the recovery outcome and switches the mode off,
//! all in one transaction.

use super::{achievement, goals, other_todos, recovery};
use crate::{
    entities::{
        AchievementLevel, DailyRecord, DailyTodoRecord, TodoType, daily_record, daily_todo_record,
    },
    errors::{Error, Guard, Result, is_unique_violation},
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Longest accepted journal entry, in characters.
pub const MAX_JOURNAL_LENGTH: usize = 2000;

/// What the user submits for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyEntry {
    /// Goal TODOs checked off
    pub achieved_goal_todo_ids: Vec<i64>,
    /// Other TODOs checked off
    pub achieved_other_todo_ids: Vec<i64>,
    /// Optional journal text
    pub journal: Option<String>,
    /// Whether the recovery action was done; only stored while recovery mode is on
    pub recovery_achieved: Option<bool>,
}

/// Result of saving a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDay {
    /// The stored daily record
    pub record: daily_record::Model,
    /// One row per active TODO at save time
    pub todo_records: Vec<daily_todo_record::Model>,
    /// Whether this save ended an active recovery mode
    pub recovery_deactivated: bool,
}

/// Finds the record for a day.
pub async fn get_daily_record<C>(
    db: &C,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<daily_record::Model>>
where
    C: ConnectionTrait,
{
    DailyRecord::find()
        .filter(daily_record::Column::UserId.eq(user_id))
        .filter(daily_record::Column::RecordDate.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists records in `from..=to`, oldest first.
pub async fn list_daily_records<C>(
    db: &C,
    user_id: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<daily_record::Model>>
where
    C: ConnectionTrait,
{
    DailyRecord::find()
        .filter(daily_record::Column::UserId.eq(user_id))
        .filter(daily_record::Column::RecordDate.between(from, to))
        .order_by_asc(daily_record::Column::RecordDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every record up to and including `to`, oldest first.
pub async fn list_daily_records_through<C>(
    db: &C,
    user_id: &str,
    to: NaiveDate,
) -> Result<Vec<daily_record::Model>>
where
    C: ConnectionTrait,
{
    DailyRecord::find()
        .filter(daily_record::Column::UserId.eq(user_id))
        .filter(daily_record::Column::RecordDate.lte(to))
        .order_by_asc(daily_record::Column::RecordDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Todo records attached to a daily record.
pub async fn get_daily_todo_records<C>(
    db: &C,
    daily_record_id: i64,
) -> Result<Vec<daily_todo_record::Model>>
where
    C: ConnectionTrait,
{
    DailyTodoRecord::find()
        .filter(daily_todo_record::Column::DailyRecordId.eq(daily_record_id))
        .order_by_asc(daily_todo_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Parses a user-typed id list such as `"3, 4 7"`.
///
/// # Errors
/// Returns a validation error for anything that is not a positive integer.
pub fn parse_todo_ids(input: &str) -> Result<Vec<i64>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim_start_matches('#')
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| Error::validation("todo_ids", format!("'{part}' is not a TODO id")))
        })
        .collect()
}

fn check_ids(field: &'static str, requested: &[i64], active: &HashSet<i64>) -> Result<HashSet<i64>> {
    if let Some(unknown) = requested.iter().find(|id| !active.contains(id)) {
        return Err(Error::validation(
            field,
            format!("#{unknown} is not one of your active TODOs"),
        ));
    }
    Ok(requested.iter().copied().collect())
}

fn normalize_journal(journal: Option<String>) -> Result<Option<String>> {
    let journal = journal
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    if journal
        .as_ref()
        .is_some_and(|text| text.chars().count() > MAX_JOURNAL_LENGTH)
    {
        return Err(Error::validation(
            "journal",
            format!("must be at most {MAX_JOURNAL_LENGTH} characters"),
        ));
    }
    Ok(journal)
}

/// Creates or replaces the record for `date`.
///
/// # Arguments
/// * `db` - Database connection; the save runs in its own transaction
/// * `user_id` - Discord user ID who owns the record
/// * `date` - Day being recorded; must equal `today`
/// * `entry` - Checked-off TODO ids, journal text and recovery outcome
/// * `today` - The journal's current day
///
/// # Errors
/// - validation error for a future date, unknown TODO ids or an overlong journal
/// - [`Guard::RecordSealed`] for any day before `today`
#[instrument(skip(db, entry))]
pub async fn save_daily_record<C>(
    db: &C,
    user_id: &str,
    date: NaiveDate,
    entry: DailyEntry,
    today: NaiveDate,
) -> Result<SavedDay>
where
    C: ConnectionTrait + TransactionTrait,
{
    if date > today {
        return Err(Error::validation("date", format!("{date} is in the future")));
    }
    if date < today {
        return Err(Guard::RecordSealed(date).into());
    }
    let journal = normalize_journal(entry.journal)?;

    let txn = db.begin().await?;

    let goal_todos = goals::get_goal_todos_by_level(&txn, user_id).await?;
    let other_todos = other_todos::list_other_todos(&txn, user_id).await?;

    let active_goal_ids: HashSet<i64> = goal_todos
        .iter()
        .flat_map(|(_, todos)| todos.iter().map(|todo| todo.id))
        .collect();
    let active_other_ids: HashSet<i64> = other_todos.iter().map(|todo| todo.id).collect();
    let achieved_goal = check_ids(
        "achieved_goal_todo_ids",
        &entry.achieved_goal_todo_ids,
        &active_goal_ids,
    )?;
    let achieved_other = check_ids(
        "achieved_other_todo_ids",
        &entry.achieved_other_todo_ids,
        &active_other_ids,
    )?;

    let level = achievement::compute_achievement_level(&goal_todos, &achieved_goal);
    let do_text = goal_todos
        .iter()
        .flat_map(|(_, todos)| todos.iter())
        .filter(|todo| achieved_goal.contains(&todo.id))
        .map(|todo| todo.content.as_str())
        .chain(
            other_todos
                .iter()
                .filter(|todo| achieved_other.contains(&todo.id))
                .map(|todo| todo.content.as_str()),
        )
        .collect::<Vec<_>>()
        .join("\n");

    let recovery_status = recovery::get_recovery_status(&txn, user_id).await?;
    let recovery_achieved = recovery_status
        .is_active
        .then(|| entry.recovery_achieved.unwrap_or(false));

    let now = Utc::now().naive_utc();
    let fields = RecordFields {
        level,
        journal,
        do_text,
        recovery_achieved,
        now,
    };

    let existing = get_daily_record(&txn, user_id, date).await?;
    let record = fields.upsert(&txn, user_id, date, existing).await?;

    DailyTodoRecord::delete_many()
        .filter(daily_todo_record::Column::DailyRecordId.eq(record.id))
        .exec(&txn)
        .await?;

    let goal_rows = goal_todos.iter().flat_map(|(_, todos)| {
        todos
            .iter()
            .map(|todo| (TodoType::Goal, todo.id, achieved_goal.contains(&todo.id)))
    });
    let other_rows = other_todos
        .iter()
        .map(|todo| (TodoType::Other, todo.id, achieved_other.contains(&todo.id)));

    let rows: Vec<_> = goal_rows.chain(other_rows).collect();

    let mut todo_records = Vec::with_capacity(rows.len());
    for (todo_type, todo_id, is_achieved) in rows {
        let row = daily_todo_record::ActiveModel {
            daily_record_id: Set(record.id),
            todo_type: Set(todo_type),
            todo_id: Set(todo_id),
            is_achieved: Set(is_achieved),
            ..Default::default()
        };
        todo_records.push(row.insert(&txn).await?);
    }

    let recovery_deactivated = if recovery_status.is_active {
        recovery::deactivate_in(&txn, user_id).await?.is_some()
    } else {
        false
    };

    txn.commit().await?;

    info!(
        "Saved record for user {} on {}: {} ({} TODO rows)",
        user_id,
        date,
        record.achievement_level,
        todo_records.len()
    );
    if recovery_deactivated {
        debug!("Recovery mode ended by today's record");
    }

    Ok(SavedDay {
        record,
        todo_records,
        recovery_deactivated,
    })
}

/// Column values shared by the insert and update paths of a save.
struct RecordFields {
    level: AchievementLevel,
    journal: Option<String>,
    do_text: String,
    recovery_achieved: Option<bool>,
    now: NaiveDateTime,
}

impl RecordFields {
    /// Writes the day's record given what an earlier read found.
    ///
    /// The insert runs in a savepoint; if another save created the row in the
    /// meantime the unique index rejects it and the row is updated instead.
    async fn upsert<C>(
        &self,
        txn: &C,
        user_id: &str,
        date: NaiveDate,
        existing: Option<daily_record::Model>,
    ) -> Result<daily_record::Model>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if let Some(existing) = existing {
            return self.update(txn, existing).await;
        }

        let savepoint = txn.begin().await?;
        match self.insert(&savepoint, user_id, date).await {
            Ok(record) => {
                savepoint.commit().await?;
                Ok(record)
            }
            Err(e) if is_unique_violation(&e) => {
                savepoint.rollback().await?;
                warn!(%date, "Concurrent insert for the same day, updating instead");
                let existing = get_daily_record(txn, user_id, date)
                    .await?
                    .ok_or_else(|| Error::Conflict {
                        message: format!("record for {date} vanished during save"),
                    })?;
                self.update(txn, existing).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert<C>(
        &self,
        db: &C,
        user_id: &str,
        date: NaiveDate,
    ) -> std::result::Result<daily_record::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        daily_record::ActiveModel {
            user_id: Set(user_id.to_string()),
            record_date: Set(date),
            achievement_level: Set(self.level),
            journal: Set(self.journal.clone()),
            do_text: Set(self.do_text.clone()),
            recovery_achieved: Set(self.recovery_achieved),
            created_at: Set(self.now),
            updated_at: Set(self.now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn update<C>(&self, db: &C, existing: daily_record::Model) -> Result<daily_record::Model>
    where
        C: ConnectionTrait,
    {
        let mut record: daily_record::ActiveModel = existing.into();
        record.achievement_level = Set(self.level);
        record.journal = Set(self.journal.clone());
        record.do_text = Set(self.do_text.clone());
        record.recovery_achieved = Set(self.recovery_achieved);
        record.updated_at = Set(self.now);
        record.update(db).await.map_err(Into::into)
    }
}
