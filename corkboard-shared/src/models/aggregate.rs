/// Board aggregate loader
///
/// Assembles the full read-model of one board in a single coherent
/// snapshot: the owning workspace and creator, the board's members, its
/// lists ordered by position, each list's cards ordered by position, and
/// each card's labels and members.
///
/// Sub-collections are always present as sequences: a board with no lists
/// serializes `"lists": []`, a card with no labels serializes
/// `"labels": []`. Consumers never see null where a collection belongs.
///
/// Nested collections are fetched with batched `= ANY(...)` queries rather
/// than per-row lookups, so loading a board costs a fixed number of round
/// trips regardless of its size.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::models::board::Board;
use crate::models::card::Card;
use crate::models::label::Label;
use crate::models::list::List;
use crate::models::user::User;
use crate::models::workspace::Workspace;

/// Card with its attached labels and assigned members
#[derive(Debug, Clone, Serialize)]
pub struct CardAggregate {
    /// The card row
    #[serde(flatten)]
    pub card: Card,

    /// Labels attached to the card, in attach order
    pub labels: Vec<Label>,

    /// Members assigned to the card, in assignment order
    pub members: Vec<User>,
}

/// List with its cards in position order
#[derive(Debug, Clone, Serialize)]
pub struct ListAggregate {
    /// The list row
    #[serde(flatten)]
    pub list: List,

    /// Cards ordered by position, ties broken by id
    pub cards: Vec<CardAggregate>,
}

/// The full nested board read-model
#[derive(Debug, Clone, Serialize)]
pub struct BoardAggregate {
    /// Board id
    pub id: i64,

    /// Board name
    pub name: String,

    /// Owning workspace
    pub workspace: Workspace,

    /// The board's creator
    pub creator: User,

    /// Explicit members (the creator is not duplicated here)
    pub members: Vec<User>,

    /// Lists ordered by position, ties broken by id
    pub lists: Vec<ListAggregate>,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CardLabelRow {
    card_id: i64,
    id: i64,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CardMemberRow {
    card_id: i64,
    id: String,
    name: Option<String>,
    email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BoardAggregate {
    /// Loads the full aggregate for one board
    ///
    /// # Returns
    ///
    /// The aggregate if the board exists, None otherwise. Access control is
    /// the caller's responsibility: this loader only reads.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or referential
    /// integrity is broken (a board whose workspace or creator row is
    /// missing).
    pub async fn load(pool: &PgPool, board_id: i64) -> Result<Option<Self>, sqlx::Error> {
        let Some(board) = Board::find_by_id(pool, board_id).await? else {
            return Ok(None);
        };

        // The schema's foreign keys guarantee these rows exist
        let workspace = Workspace::find_by_id(pool, board.workspace_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let creator = User::find_by_id(pool, &board.created_by)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let members = User::list_board_members(pool, board.id).await?;
        let lists = List::list_by_board(pool, board.id).await?;

        let list_ids: Vec<i64> = lists.iter().map(|l| l.id).collect();
        let cards = Self::load_cards(pool, &list_ids).await?;

        let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        let mut labels_by_card = Self::load_card_labels(pool, &card_ids).await?;
        let mut members_by_card = Self::load_card_members(pool, &card_ids).await?;

        // Group cards under their lists; the query's (position, id) order
        // is preserved within each group
        let mut cards_by_list: HashMap<i64, Vec<CardAggregate>> = HashMap::new();
        for card in cards {
            let labels = labels_by_card.remove(&card.id).unwrap_or_default();
            let card_members = members_by_card.remove(&card.id).unwrap_or_default();
            cards_by_list
                .entry(card.list_id)
                .or_default()
                .push(CardAggregate {
                    card,
                    labels,
                    members: card_members,
                });
        }

        let lists = lists
            .into_iter()
            .map(|list| {
                let cards = cards_by_list.remove(&list.id).unwrap_or_default();
                ListAggregate { list, cards }
            })
            .collect();

        Ok(Some(BoardAggregate {
            id: board.id,
            name: board.name,
            workspace,
            creator,
            members,
            lists,
            created_at: board.created_at,
            updated_at: board.updated_at,
        }))
    }

    async fn load_cards(pool: &PgPool, list_ids: &[i64]) -> Result<Vec<Card>, sqlx::Error> {
        if list_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Card>(
            r#"
            SELECT id, title, description, list_id, position, created_by,
                   due_date, created_at, updated_at
            FROM cards
            WHERE list_id = ANY($1)
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(list_ids)
        .fetch_all(pool)
        .await
    }

    async fn load_card_labels(
        pool: &PgPool,
        card_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Label>>, sqlx::Error> {
        if card_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CardLabelRow>(
            r#"
            SELECT cl.card_id, l.id, l.name, l.color, l.created_at, l.updated_at
            FROM card_labels cl
            JOIN labels l ON l.id = cl.label_id
            WHERE cl.card_id = ANY($1)
            ORDER BY cl.created_at ASC, l.id ASC
            "#,
        )
        .bind(card_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Label>> = HashMap::new();
        for row in rows {
            grouped.entry(row.card_id).or_default().push(Label {
                id: row.id,
                name: row.name,
                color: row.color,
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }

        Ok(grouped)
    }

    async fn load_card_members(
        pool: &PgPool,
        card_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<User>>, sqlx::Error> {
        if card_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CardMemberRow>(
            r#"
            SELECT cm.card_id, u.id, u.name, u.email, u.created_at, u.updated_at
            FROM card_members cm
            JOIN users u ON u.id = cm.member_id
            WHERE cm.card_id = ANY($1)
            ORDER BY cm.created_at ASC, u.id ASC
            "#,
        )
        .bind(card_ids)
        .fetch_all(pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<User>> = HashMap::new();
        for row in rows {
            grouped.entry(row.card_id).or_default().push(User {
                id: row.id,
                name: row.name,
                email: row.email,
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }

        Ok(grouped)
    }
}

impl CardAggregate {
    /// Loads one card with its labels and members attached
    pub async fn load(pool: &PgPool, card: Card) -> Result<Self, sqlx::Error> {
        let labels = Label::list_by_card(pool, card.id).await?;
        let members = User::list_card_members(pool, card.id).await?;

        Ok(CardAggregate {
            card,
            labels,
            members,
        })
    }
}
