/// Reorder/reparent engine
///
/// The state-changing core of the ordering protocol. Two operations:
/// moving a list within its board, and moving a card within or between the
/// lists of one board. Each runs in a single database transaction: the
/// current sibling order is read, the position allocator plans the target
/// 1..N sequence, and only the placements that actually change are written.
/// No reader ever observes a partially-renumbered parent.
///
/// # Concurrency
///
/// Sibling positions under one parent are the only genuinely shared
/// mutable resource. Every parent carries an order version
/// (`boards.list_order_version` for list ordering,
/// `lists.card_order_version` for card ordering). A move reads the version
/// alongside the sibling rows and bumps it with a guard on the observed
/// value before touching any child row. Two concurrent moves of the same
/// parent therefore serialize on the parent row: the loser's guard matches
/// zero rows, the transaction rolls back untouched, and the caller gets
/// [`OrderingError::Conflict`] to reload and retry. The guard doubles as
/// the parent lock, so child-row updates can never deadlock between two
/// movers of the same parent.
///
/// A move to the entity's current slot is detected by the allocator and
/// performs no writes at all: sibling positions, timestamps, and the order
/// version are untouched.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::models::card::Card;
use crate::ordering::position::{self, Placement};

/// Error type for reorder/reparent operations
#[derive(Debug, thiserror::Error)]
pub enum OrderingError {
    /// The board does not exist
    #[error("board not found")]
    BoardNotFound,

    /// The list does not exist (or does not belong to the given board)
    #[error("list not found")]
    ListNotFound,

    /// The card does not exist
    #[error("card not found")]
    CardNotFound,

    /// The destination list belongs to a different board; a card's lineage
    /// is fixed to one board for its lifetime
    #[error("destination list belongs to a different board")]
    InvalidDestination,

    /// The sibling order changed concurrently; the caller should reload
    /// authoritative state and retry
    #[error("sibling order changed concurrently")]
    Conflict,

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Source/destination list metadata read inside the move transaction
#[derive(Debug, sqlx::FromRow)]
struct ListRef {
    id: i64,
    board_id: i64,
    card_order_version: i64,
}

/// Moves a list to `new_index` among its board's lists
///
/// The index is zero-based and clamped to the valid range. All of the
/// board's lists are renumbered to 1..N in the new order; rows whose
/// position is unchanged are not written.
///
/// # Errors
///
/// - [`OrderingError::BoardNotFound`] if the board does not exist
/// - [`OrderingError::ListNotFound`] if the list is not on the board
/// - [`OrderingError::Conflict`] if a concurrent move renumbered the same
///   board first
pub async fn move_list(
    pool: &PgPool,
    board_id: i64,
    list_id: i64,
    new_index: usize,
) -> Result<(), OrderingError> {
    let mut tx = pool.begin().await?;

    let observed: i64 = sqlx::query_scalar("SELECT list_order_version FROM boards WHERE id = $1")
        .bind(board_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(OrderingError::BoardNotFound)?;

    let siblings: Vec<(i64, i32)> = sqlx::query_as(
        "SELECT id, position FROM lists WHERE board_id = $1 ORDER BY position ASC, id ASC",
    )
    .bind(board_id)
    .fetch_all(&mut *tx)
    .await?;

    let plan = position::plan_reorder(&siblings, list_id, new_index)
        .ok_or(OrderingError::ListNotFound)?;

    if plan.is_noop() {
        debug!(board_id, list_id, new_index, "List already in target slot, skipping");
        return Ok(());
    }

    let bumped = sqlx::query(
        "UPDATE boards SET list_order_version = list_order_version + 1 \
         WHERE id = $1 AND list_order_version = $2",
    )
    .bind(board_id)
    .bind(observed)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        warn!(board_id, list_id, "Concurrent list renumber detected, aborting");
        return Err(OrderingError::Conflict);
    }

    apply_list_placements(&mut tx, &plan.changed).await?;

    tx.commit().await?;

    info!(
        board_id,
        list_id,
        new_index,
        rewritten = plan.changed.len(),
        "List moved"
    );
    Ok(())
}

/// Moves a card to `dest_index` within `dest_list_id`
///
/// When the destination is the card's current list this is a same-list
/// reorder. Otherwise the card leaves its source list (survivors renumber
/// to close the gap), enters the destination list at the target index
/// (siblings renumber to make room), and its list reference is updated.
/// Both affected lists end with contiguous 1..N positions.
///
/// Cross-board destinations are rejected: a card never changes boards.
///
/// # Returns
///
/// The card as persisted after the move
///
/// # Errors
///
/// - [`OrderingError::CardNotFound`] if the card does not exist
/// - [`OrderingError::ListNotFound`] if the destination list does not exist
/// - [`OrderingError::InvalidDestination`] on a cross-board destination
/// - [`OrderingError::Conflict`] if a concurrent move renumbered an
///   affected list first
pub async fn move_card(
    pool: &PgPool,
    card_id: i64,
    dest_list_id: i64,
    dest_index: usize,
) -> Result<Card, OrderingError> {
    let mut tx = pool.begin().await?;

    let card = sqlx::query_as::<_, Card>(
        r#"
        SELECT id, title, description, list_id, position, created_by,
               due_date, created_at, updated_at
        FROM cards
        WHERE id = $1
        "#,
    )
    .bind(card_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(OrderingError::CardNotFound)?;

    let source = find_list_ref(&mut tx, card.list_id)
        .await?
        .ok_or(OrderingError::ListNotFound)?;
    let dest = find_list_ref(&mut tx, dest_list_id)
        .await?
        .ok_or(OrderingError::ListNotFound)?;

    if source.board_id != dest.board_id {
        warn!(
            card_id,
            source_board = source.board_id,
            dest_board = dest.board_id,
            "Cross-board card move rejected"
        );
        return Err(OrderingError::InvalidDestination);
    }

    if source.id == dest.id {
        let siblings = load_card_siblings(&mut tx, source.id).await?;
        let plan = position::plan_reorder(&siblings, card_id, dest_index)
            .ok_or(OrderingError::CardNotFound)?;

        if plan.is_noop() {
            debug!(card_id, dest_index, "Card already in target slot, skipping");
            return Ok(card);
        }

        bump_card_order_version(&mut tx, source.id, source.card_order_version).await?;
        apply_card_placements(&mut tx, &plan.changed).await?;

        tx.commit().await?;

        info!(
            card_id,
            list_id = source.id,
            dest_index,
            rewritten = plan.changed.len(),
            "Card reordered within list"
        );
    } else {
        let source_siblings = load_card_siblings(&mut tx, source.id).await?;
        let dest_siblings = load_card_siblings(&mut tx, dest.id).await?;

        let removal = position::plan_removal(&source_siblings, card_id)
            .ok_or(OrderingError::CardNotFound)?;
        let insertion = position::plan_insert(&dest_siblings, card_id, dest_index);

        // Bump both parents in id order so two concurrent cross-movers of
        // the same pair of lists contend in the same order
        let mut parents = [
            (source.id, source.card_order_version),
            (dest.id, dest.card_order_version),
        ];
        parents.sort_by_key(|&(id, _)| id);
        for (list_id, observed) in parents {
            bump_card_order_version(&mut tx, list_id, observed).await?;
        }

        // The moving card picks up its new list and position in one write
        let new_position = insertion
            .sequence
            .iter()
            .position(|&id| id == card_id)
            .map(|index| (index + 1) as i32)
            .ok_or(OrderingError::CardNotFound)?;

        sqlx::query(
            "UPDATE cards SET list_id = $2, position = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(card_id)
        .bind(dest.id)
        .bind(new_position)
        .execute(&mut *tx)
        .await?;

        apply_card_placements(&mut tx, &removal.changed).await?;

        let shifted: Vec<Placement> = insertion
            .changed
            .iter()
            .copied()
            .filter(|p| p.id != card_id)
            .collect();
        apply_card_placements(&mut tx, &shifted).await?;

        tx.commit().await?;

        info!(
            card_id,
            source_list = source.id,
            dest_list = dest.id,
            dest_index,
            rewritten = removal.changed.len() + insertion.changed.len(),
            "Card moved between lists"
        );
    }

    let moved = Card::find_by_id(pool, card_id)
        .await?
        .ok_or(OrderingError::CardNotFound)?;
    Ok(moved)
}

async fn find_list_ref(
    tx: &mut Transaction<'_, Postgres>,
    list_id: i64,
) -> Result<Option<ListRef>, sqlx::Error> {
    sqlx::query_as::<_, ListRef>(
        "SELECT id, board_id, card_order_version FROM lists WHERE id = $1",
    )
    .bind(list_id)
    .fetch_optional(&mut **tx)
    .await
}

async fn load_card_siblings(
    tx: &mut Transaction<'_, Postgres>,
    list_id: i64,
) -> Result<Vec<(i64, i32)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, position FROM cards WHERE list_id = $1 ORDER BY position ASC, id ASC",
    )
    .bind(list_id)
    .fetch_all(&mut **tx)
    .await
}

/// Bumps a list's card order version, guarded by the observed value.
/// Zero affected rows means a concurrent renumber won; the whole move
/// rolls back with [`OrderingError::Conflict`].
async fn bump_card_order_version(
    tx: &mut Transaction<'_, Postgres>,
    list_id: i64,
    observed: i64,
) -> Result<(), OrderingError> {
    let bumped = sqlx::query(
        "UPDATE lists SET card_order_version = card_order_version + 1 \
         WHERE id = $1 AND card_order_version = $2",
    )
    .bind(list_id)
    .bind(observed)
    .execute(&mut **tx)
    .await?;

    if bumped.rows_affected() == 0 {
        warn!(list_id, "Concurrent card renumber detected, aborting");
        return Err(OrderingError::Conflict);
    }

    Ok(())
}

async fn apply_list_placements(
    tx: &mut Transaction<'_, Postgres>,
    placements: &[Placement],
) -> Result<(), sqlx::Error> {
    for placement in placements {
        sqlx::query("UPDATE lists SET position = $2, updated_at = NOW() WHERE id = $1")
            .bind(placement.id)
            .bind(placement.position)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

async fn apply_card_placements(
    tx: &mut Transaction<'_, Postgres>,
    placements: &[Placement],
) -> Result<(), sqlx::Error> {
    for placement in placements {
        sqlx::query("UPDATE cards SET position = $2, updated_at = NOW() WHERE id = $1")
            .bind(placement.id)
            .bind(placement.position)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
