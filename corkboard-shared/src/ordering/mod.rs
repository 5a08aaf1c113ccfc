/// Position-ordering protocol for Corkboard
///
/// Lists within a board and cards within a list are ordered by an integer
/// `position` column holding a contiguous 1..N sequence per parent. Instead
/// of fractional insertion keys, every reorder or cross-list move renumbers
/// the affected parent in full: O(N) writes per move, but positions stay
/// small, human-debuggable integers and the "no integer between adjacent
/// positions" problem never arises.
///
/// # Modules
///
/// - [`position`]: the pure allocator - computes target position sequences
///   and minimal change sets, with no I/O
/// - [`engine`]: the reorder/reparent engine - applies allocator plans to
///   the database, one transaction per move, guarded by per-parent order
///   versions
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::ordering::engine;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// // Move list 42 to the front of board 7
/// engine::move_list(&pool, 7, 42, 0).await?;
///
/// // Move card 99 to the top of list 43
/// engine::move_card(&pool, 99, 43, 0).await?;
/// # Ok(())
/// # }
/// ```

pub mod engine;
pub mod position;
