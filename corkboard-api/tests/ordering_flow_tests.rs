/// Integration tests for the ordering endpoints
///
/// These tests drive moves through the HTTP surface and verify the
/// position invariants in storage: after any sequence of list/card moves,
/// every affected parent holds a contiguous 1..N position sequence.
///
/// Requires a running PostgreSQL database (DATABASE_URL).
/// Run with: cargo test --test ordering_flow_tests -- --test-threads=1

mod common;

use axum::http::StatusCode;
use common::TestContext;
use corkboard_shared::models::card::Card;
use corkboard_shared::models::list::List;
use serde_json::json;

async fn create_list(ctx: &TestContext, name: &str) -> i64 {
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/lists",
            &ctx.user.id,
            Some(json!({"board_id": ctx.board.id, "name": name})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create list: {}", body);
    body["id"].as_i64().expect("list id")
}

async fn create_card(ctx: &TestContext, list_id: i64, title: &str) -> i64 {
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/cards",
            &ctx.user.id,
            Some(json!({"list_id": list_id, "title": title})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "create card: {}", body);
    body["id"].as_i64().expect("card id")
}

async fn card_positions(ctx: &TestContext, list_id: i64) -> Vec<(i64, i32)> {
    Card::list_by_list(&ctx.db, list_id)
        .await
        .expect("cards")
        .into_iter()
        .map(|c| (c.id, c.position))
        .collect()
}

async fn list_positions(ctx: &TestContext) -> Vec<(i64, i32)> {
    List::list_by_board(&ctx.db, ctx.board.id)
        .await
        .expect("lists")
        .into_iter()
        .map(|l| (l.id, l.position))
        .collect()
}

/// Creating N cards by repeated append reads back 1..N in creation order
#[tokio::test]
async fn test_append_round_trip() {
    let ctx = TestContext::new().await.unwrap();
    let list = create_list(&ctx, "Backlog").await;

    let mut created = Vec::new();
    for i in 1..=5 {
        created.push(create_card(&ctx, list, &format!("Card {}", i)).await);
    }

    let rows = card_positions(&ctx, list).await;
    let ids: Vec<i64> = rows.iter().map(|&(id, _)| id).collect();
    let positions: Vec<i32> = rows.iter().map(|&(_, p)| p).collect();

    assert_eq!(ids, created);
    assert_eq!(positions, vec![1, 2, 3, 4, 5]);
}

/// Scenario: L1 holds C1,C2,C3; L2 is empty. Moving C2 to the top of L2
/// leaves L1 = C1(1),C3(2) and L2 = C2(1).
#[tokio::test]
async fn test_move_card_to_other_list() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let c1 = create_card(&ctx, l1, "C1").await;
    let c2 = create_card(&ctx, l1, "C2").await;
    let c3 = create_card(&ctx, l1, "C3").await;

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", c2),
            &ctx.user.id,
            Some(json!({"list_id": l2, "position": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "move card: {}", body);
    assert_eq!(body["list_id"].as_i64(), Some(l2));
    assert_eq!(body["position"].as_i64(), Some(1));

    assert_eq!(card_positions(&ctx, l1).await, vec![(c1, 1), (c3, 2)]);
    assert_eq!(card_positions(&ctx, l2).await, vec![(c2, 1)]);
}

/// Scenario: lists L1,L2,L3 at 1,2,3; moving L3 to the front yields
/// L3(1), L1(2), L2(3).
#[tokio::test]
async fn test_move_list_to_front() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let l3 = create_list(&ctx, "L3").await;

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/lists/{}", l3),
            &ctx.user.id,
            Some(json!({"position": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "move list: {}", body);

    assert_eq!(list_positions(&ctx).await, vec![(l3, 1), (l1, 2), (l2, 3)]);
}

/// Moving a card to its current slot leaves positions and timestamps of
/// every sibling unchanged
#[tokio::test]
async fn test_move_to_current_slot_is_idempotent() {
    let ctx = TestContext::new().await.unwrap();
    let list = create_list(&ctx, "L1").await;
    create_card(&ctx, list, "C1").await;
    let c2 = create_card(&ctx, list, "C2").await;
    create_card(&ctx, list, "C3").await;

    let before = Card::list_by_list(&ctx.db, list).await.unwrap();

    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", c2),
            &ctx.user.id,
            Some(json!({"position": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let after = Card::list_by_list(&ctx.db, list).await.unwrap();

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert_eq!(b.id, a.id);
        assert_eq!(b.position, a.position);
        assert_eq!(b.updated_at, a.updated_at, "no-op move must not touch rows");
    }
}

/// Out-of-range target positions clamp to the ends instead of failing
#[tokio::test]
async fn test_position_clamping() {
    let ctx = TestContext::new().await.unwrap();
    let list = create_list(&ctx, "L1").await;
    let c1 = create_card(&ctx, list, "C1").await;
    let c2 = create_card(&ctx, list, "C2").await;
    let c3 = create_card(&ctx, list, "C3").await;

    // Far beyond the end clamps to the last slot
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", c1),
            &ctx.user.id,
            Some(json!({"position": 99})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_positions(&ctx, list).await, vec![(c2, 1), (c3, 2), (c1, 3)]);

    // Zero and negative clamp to the front
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", c1),
            &ctx.user.id,
            Some(json!({"position": -5})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_positions(&ctx, list).await, vec![(c1, 1), (c2, 2), (c3, 3)]);
}

/// Scenario: a user who is neither creator nor member gets 403 and no
/// state changes
#[tokio::test]
async fn test_outsider_cannot_move_cards() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let card = create_card(&ctx, l1, "C1").await;

    let outsider = ctx.create_user(false).await.unwrap();

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &outsider.id,
            Some(json!({"list_id": l2, "position": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
    assert_eq!(body["error"], "forbidden");

    // Nothing moved
    assert_eq!(card_positions(&ctx, l1).await, vec![(card, 1)]);
    assert!(card_positions(&ctx, l2).await.is_empty());
}

/// A member (not creator) may move cards
#[tokio::test]
async fn test_member_can_move_cards() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let card = create_card(&ctx, l1, "C1").await;

    let member = ctx.create_user(true).await.unwrap();

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &member.id,
            Some(json!({"list_id": l2, "position": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(card_positions(&ctx, l2).await, vec![(card, 1)]);
}

/// Scenario: a destination list on a different board is rejected with
/// `invalid_destination` and no state changes
#[tokio::test]
async fn test_cross_board_move_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let card = create_card(&ctx, l1, "C1").await;

    // A second board owned by the same creator, with one list
    let (status, other_board) = ctx
        .send(
            "POST",
            "/v1/boards",
            &ctx.user.id,
            Some(json!({"workspace_id": ctx.workspace.id, "name": "Other board"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let other_board_id = other_board["id"].as_i64().unwrap();

    let (status, foreign_list) = ctx
        .send(
            "POST",
            "/v1/lists",
            &ctx.user.id,
            Some(json!({"board_id": other_board_id, "name": "Foreign"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let foreign_list_id = foreign_list["id"].as_i64().unwrap();

    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &ctx.user.id,
            Some(json!({"list_id": foreign_list_id, "position": 1})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "invalid_destination");

    // Nothing moved
    assert_eq!(card_positions(&ctx, l1).await, vec![(card, 1)]);
    assert!(card_positions(&ctx, foreign_list_id).await.is_empty());
}

/// A PATCH with list_id but no position appends to the destination's end
#[tokio::test]
async fn test_move_without_position_appends() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let c1 = create_card(&ctx, l1, "C1").await;
    let d1 = create_card(&ctx, l2, "D1").await;
    let d2 = create_card(&ctx, l2, "D2").await;

    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", c1),
            &ctx.user.id,
            Some(json!({"list_id": l2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        card_positions(&ctx, l2).await,
        vec![(d1, 1), (d2, 2), (c1, 3)]
    );
}

/// Positions stay 1..N through an arbitrary sequence of mixed moves
#[tokio::test]
async fn test_positions_stay_contiguous_through_mixed_moves() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;
    let mut cards = Vec::new();
    for i in 1..=4 {
        cards.push(create_card(&ctx, l1, &format!("C{}", i)).await);
    }

    let moves = [
        (cards[0], l2, 1),
        (cards[2], l2, 1),
        (cards[1], l1, 1),
        (cards[0], l1, 2),
        (cards[3], l2, 2),
    ];

    for (card, dest, position) in moves {
        let (status, body) = ctx
            .send(
                "PATCH",
                &format!("/v1/cards/{}", card),
                &ctx.user.id,
                Some(json!({"list_id": dest, "position": position})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        for list in [l1, l2] {
            let rows = card_positions(&ctx, list).await;
            let positions: Vec<i32> = rows.iter().map(|&(_, p)| p).collect();
            let expected: Vec<i32> = (1..=rows.len() as i32).collect();
            assert_eq!(positions, expected, "list {} lost contiguity", list);
        }
    }
}
