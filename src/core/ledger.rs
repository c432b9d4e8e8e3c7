//! Goal history ledger - the sealed timeline of goal-level slots per tier.
//!
//! Each tier moves through `no history -> slot #1 -> slot #2 -> ...`. Opening a
//! slot always seals the previous one (its `ended_at` becomes the day before the
//! new slot starts) within the same transaction, and sealed slots are never
//! touched again. The ledger is the single source of truth for what a tier's goal
//! was on any given day.

use super::{goals, tiers::Tiers};
use crate::{
    entities::{ChangeReason, GoalLevel, GoalLevelHistory, goal_level_history},
    errors::{Error, Guard, Result, is_unique_violation},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    Condition, ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Finds the open slot of a tier.
///
/// # Errors
/// Returns [`Error::Integrity`] if more than one open slot exists.
pub async fn current_slot<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
) -> Result<Option<goal_level_history::Model>>
where
    C: ConnectionTrait,
{
    let mut open = GoalLevelHistory::find()
        .filter(goal_level_history::Column::UserId.eq(user_id))
        .filter(goal_level_history::Column::GoalType.eq(level))
        .filter(goal_level_history::Column::EndedAt.is_null())
        .all(db)
        .await?;

    if open.len() > 1 {
        return Err(Error::Integrity {
            message: format!(
                "{} open {level} slots for user {user_id}",
                open.len()
            ),
        });
    }
    Ok(open.pop())
}

/// Finds the open slot of every tier.
pub async fn current_slots<C>(
    db: &C,
    user_id: &str,
) -> Result<Tiers<Option<goal_level_history::Model>>>
where
    C: ConnectionTrait,
{
    let mut slots: Tiers<Option<goal_level_history::Model>> = Tiers::default();
    for level in GoalLevel::ALL {
        *slots.get_mut(level) = current_slot(db, user_id, level).await?;
    }
    Ok(slots)
}

/// Whether the user has any goal history at all.
pub async fn has_goal_history<C>(db: &C, user_id: &str) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = GoalLevelHistory::find()
        .filter(goal_level_history::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Full timeline of a tier, oldest slot first.
pub async fn slot_history<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
) -> Result<Vec<goal_level_history::Model>>
where
    C: ConnectionTrait,
{
    GoalLevelHistory::find()
        .filter(goal_level_history::Column::UserId.eq(user_id))
        .filter(goal_level_history::Column::GoalType.eq(level))
        .order_by_asc(goal_level_history::Column::StartedAt)
        .order_by_asc(goal_level_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The slot that was in effect for a tier on a given day.
pub async fn goal_on_date<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
    date: NaiveDate,
) -> Result<Option<goal_level_history::Model>>
where
    C: ConnectionTrait,
{
    GoalLevelHistory::find()
        .filter(goal_level_history::Column::UserId.eq(user_id))
        .filter(goal_level_history::Column::GoalType.eq(level))
        .filter(goal_level_history::Column::StartedAt.lte(date))
        .filter(
            Condition::any()
                .add(goal_level_history::Column::EndedAt.is_null())
                .add(goal_level_history::Column::EndedAt.gte(date)),
        )
        .one(db)
        .await
        .map_err(Into::into)
}

/// Level number for a slot opened after one with level `previous`.
///
/// Level-downs step back one level but never below 1.
#[must_use]
pub const fn next_level_number(previous: i32, reason: ChangeReason) -> i32 {
    match reason {
        ChangeReason::Initial => 1,
        ChangeReason::LevelUp => previous.saturating_add(1),
        ChangeReason::LevelDown => {
            if previous > 1 {
                previous - 1
            } else {
                1
            }
        }
    }
}

/// Closes an open slot on `ended_at`.
///
/// The update only matches while the slot is still open.
///
/// # Errors
/// Returns [`Error::Conflict`] if the slot was already sealed.
async fn seal_slot<C>(
    db: &C,
    slot: &goal_level_history::Model,
    ended_at: NaiveDate,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let sealed = GoalLevelHistory::update_many()
        .col_expr(goal_level_history::Column::EndedAt, Expr::value(ended_at))
        .filter(goal_level_history::Column::Id.eq(slot.id))
        .filter(goal_level_history::Column::EndedAt.is_null())
        .exec(db)
        .await?;
    if sealed.rows_affected != 1 {
        warn!(slot_id = slot.id, "Slot was sealed by a concurrent writer");
        return Err(Error::Conflict {
            message: format!("{} slot {} was already sealed", slot.goal_type, slot.id),
        });
    }
    debug!(slot_id = slot.id, %ended_at, "Sealed previous slot");
    Ok(())
}

/// Seals a tier's current slot and opens a new one starting `today`, atomically.
///
/// The first slot of a tier is always recorded as [`ChangeReason::Initial`] with level 1.
///
/// # Arguments
/// * `db` - Database connection or an enclosing transaction
/// * `user_id` - Discord user ID
/// * `level` - Tier whose slot changes
/// * `content` - Goal text for the new slot
/// * `reason` - Why the slot is opened
/// * `today` - First day of the new slot
///
/// # Errors
/// - [`Guard::HistoryExists`] for an `initial` transition on a tier that has a slot
/// - [`Guard::GoalsChangedToday`] if the current slot started today
/// - [`Error::Conflict`] if another writer sealed the slot first
/// - [`Error::Integrity`] if the insert would leave two open slots
#[instrument(skip(db, content))]
pub async fn seal_and_insert_slot<C>(
    db: &C,
    user_id: &str,
    level: GoalLevel,
    content: &str,
    reason: ChangeReason,
    today: NaiveDate,
) -> Result<goal_level_history::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let (level_number, reason) = match current_slot(&txn, user_id, level).await? {
        None => (1, ChangeReason::Initial),
        Some(previous) => {
            if reason == ChangeReason::Initial {
                return Err(Guard::HistoryExists.into());
            }
            if previous.started_at >= today {
                return Err(Guard::GoalsChangedToday.into());
            }
            let ended_at = today.pred_opt().ok_or_else(|| {
                Error::validation("today", format!("{today} has no previous day"))
            })?;

            seal_slot(&txn, &previous, ended_at).await?;

            (next_level_number(previous.level, reason), reason)
        }
    };

    let slot = goal_level_history::ActiveModel {
        user_id: Set(user_id.to_string()),
        goal_type: Set(level),
        level: Set(level_number),
        goal_content: Set(content.to_string()),
        started_at: Set(today),
        ended_at: Set(None),
        change_reason: Set(reason),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let slot = slot.insert(&txn).await.map_err(|e| {
        if is_unique_violation(&e) {
            Error::Integrity {
                message: format!("a second open {level} slot was inserted for user {user_id}"),
            }
        } else {
            e.into()
        }
    })?;

    txn.commit().await?;
    Ok(slot)
}

/// Applies a confirmed goal transition.
///
/// Every tier in `editable` whose TODO list differs from its current slot gets a
/// new slot and a fresh TODO list; all other tiers keep their current slot. The
/// whole call is one transaction: on any error nothing is written.
///
/// # Arguments
/// * `contents` - New TODO list per tier; only tiers in `editable` are read
/// * `editable` - Tiers the transition may change
/// * `reason` - Recorded on every opened slot
/// * `today` - Start day of the opened slots
///
/// # Returns
/// The slots that were opened, lowest tier first.
#[instrument(skip(db, contents))]
pub async fn apply_transition<C>(
    db: &C,
    user_id: &str,
    contents: &Tiers<Vec<String>>,
    editable: &BTreeSet<GoalLevel>,
    reason: ChangeReason,
    today: NaiveDate,
) -> Result<Vec<goal_level_history::Model>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let mut edits = Vec::with_capacity(editable.len());
    for &level in editable {
        let todos = goals::normalize_todos(level.as_str(), contents.get(level))?;
        edits.push((level, todos));
    }

    let txn = db.begin().await?;
    let mut opened = Vec::new();

    for (level, todos) in edits {
        let content = goals::goal_content(&todos);
        let current = current_slot(&txn, user_id, level).await?;
        if current.is_some_and(|slot| slot.goal_content == content) {
            debug!(%level, "Goal unchanged, keeping current slot");
            continue;
        }

        let slot = seal_and_insert_slot(&txn, user_id, level, &content, reason, today).await?;
        goals::replace_goal_todos(&txn, user_id, level, &todos).await?;
        opened.push(slot);
    }

    txn.commit().await?;
    info!(
        "Applied {:?} transition for user {}: {} slot(s) opened",
        reason,
        user_id,
        opened.len()
    );
    Ok(opened)
}

/// Creates the first slot of every tier.
///
/// # Errors
/// Returns [`Guard::HistoryExists`] if the user already has goal history, or a
/// validation error if any tier has no TODOs.
pub async fn initialize_goals<C>(
    db: &C,
    user_id: &str,
    contents: &Tiers<Vec<String>>,
    today: NaiveDate,
) -> Result<Vec<goal_level_history::Model>>
where
    C: ConnectionTrait + TransactionTrait,
{
    if has_goal_history(db, user_id).await? {
        return Err(Guard::HistoryExists.into());
    }
    let all_tiers: BTreeSet<GoalLevel> = GoalLevel::ALL.into_iter().collect();
    apply_transition(db, user_id, contents, &all_tiers, ChangeReason::Initial, today).await
}

/// Seeds the configured starter goals for a user without any goal history.
///
/// # Returns
/// `true` if goals were seeded, `false` if the user already had history or no
/// complete set of starter goals is configured.
pub async fn seed_starter_goals<C>(
    db: &C,
    user_id: &str,
    starter: &Tiers<Vec<String>>,
    today: NaiveDate,
) -> Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    if starter.iter().any(|(_, todos)| todos.is_empty()) {
        return Ok(false);
    }
    if has_goal_history(db, user_id).await? {
        return Ok(false);
    }
    initialize_goals(db, user_id, starter, today).await?;
    info!("Seeded starter goals for user {}", user_id);
    Ok(true)
}
