/// Integration tests for board CRUD, the aggregate read, authorization
/// policy, cascade deletes, and the identity webhook
///
/// Requires a running PostgreSQL database (DATABASE_URL).
/// Run with: cargo test --test board_tests -- --test-threads=1

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use common::{TestContext, WEBHOOK_SECRET};
use corkboard_shared::auth::webhook::sign_payload;
use corkboard_shared::models::card::Card;
use corkboard_shared::models::list::List;
use corkboard_shared::models::user::User;
use serde_json::json;
use tower::Service as _;

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

/// The aggregate returns nested lists/cards in position order with empty
/// collections as arrays, never null
#[tokio::test]
async fn test_board_aggregate_shape() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "Todo").await;
    create_list(&ctx, "Done").await;
    let card = create_card(&ctx, l1, "First task").await;

    let (status, body) = ctx
        .send(
            "GET",
            &format!("/v1/boards/{}", ctx.board.id),
            &ctx.user.id,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["id"].as_i64(), Some(ctx.board.id));
    assert_eq!(body["workspace"]["id"].as_i64(), Some(ctx.workspace.id));
    assert_eq!(body["creator"]["id"].as_str(), Some(ctx.user.id.as_str()));

    // Members of a fresh board: empty array, not null
    assert!(body["members"].is_array());
    assert_eq!(body["members"].as_array().unwrap().len(), 0);

    let lists = body["lists"].as_array().expect("lists array");
    assert_eq!(lists.len(), 2);
    assert_eq!(lists[0]["name"], "Todo");
    assert_eq!(lists[0]["position"].as_i64(), Some(1));
    assert_eq!(lists[1]["name"], "Done");
    assert_eq!(lists[1]["position"].as_i64(), Some(2));

    let cards = lists[0]["cards"].as_array().expect("cards array");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"].as_i64(), Some(card));
    // Label/member sub-collections are empty arrays
    assert!(cards[0]["labels"].as_array().unwrap().is_empty());
    assert!(cards[0]["members"].as_array().unwrap().is_empty());

    // The empty list renders its cards as an empty array
    assert!(lists[1]["cards"].as_array().unwrap().is_empty());
}

/// A missing board reads as 404 for everyone; an existing board reads as
/// 403 for outsiders
#[tokio::test]
async fn test_existence_checked_before_access() {
    let ctx = TestContext::new().await.unwrap();
    let outsider = ctx.create_user(false).await.unwrap();

    let (status, body) = ctx
        .send("GET", "/v1/boards/999999999", &outsider.id, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);

    let (status, body) = ctx
        .send(
            "GET",
            &format!("/v1/boards/{}", ctx.board.id),
            &outsider.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
}

/// Board rename and delete are creator-only; list/card mutation is open
/// to members
#[tokio::test]
async fn test_authorization_policy_split() {
    let ctx = TestContext::new().await.unwrap();
    let member = ctx.create_user(true).await.unwrap();

    // Member cannot rename the board
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/boards/{}", ctx.board.id),
            &member.id,
            Some(json!({"name": "Hijacked"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Member cannot delete the board
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/v1/boards/{}", ctx.board.id),
            &member.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Member cannot manage membership
    let other = ctx.create_user(false).await.unwrap();
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/boards/{}/members", ctx.board.id),
            &member.id,
            Some(json!({"member_id": other.id})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // But a member may create lists
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/lists",
            &member.id,
            Some(json!({"board_id": ctx.board.id, "name": "Member's list"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    // And rename them
    let list_id = body["id"].as_i64().unwrap();
    let (status, _) = ctx
        .send(
            "PATCH",
            &format!("/v1/lists/{}", list_id),
            &member.id,
            Some(json!({"name": "Renamed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

/// Membership management: add, duplicate add, remove, creator protection
#[tokio::test]
async fn test_membership_management() {
    let ctx = TestContext::new().await.unwrap();
    let user = ctx.create_user(false).await.unwrap();

    // Add
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/boards/{}/members", ctx.board.id),
            &ctx.user.id,
            Some(json!({"member_id": user.id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Duplicate add is an idempotency violation, not a crash
    let (status, body) = ctx
        .send(
            "POST",
            &format!("/v1/boards/{}/members", ctx.board.id),
            &ctx.user.id,
            Some(json!({"member_id": user.id})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    // The creator cannot be added as a member
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/boards/{}/members", ctx.board.id),
            &ctx.user.id,
            Some(json!({"member_id": ctx.user.id})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Members list shows the added user
    let (status, body) = ctx
        .send(
            "GET",
            &format!("/v1/boards/{}/members", ctx.board.id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Remove
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/v1/boards/{}/members/{}", ctx.board.id, user.id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Removing again is a 404
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/v1/boards/{}/members/{}", ctx.board.id, user.id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Scenario: deleting a board with 2 lists and 5 cards removes the lists,
/// cards, and join rows; subsequent reads 404
#[tokio::test]
async fn test_board_delete_cascades() {
    let ctx = TestContext::new().await.unwrap();
    let l1 = create_list(&ctx, "L1").await;
    let l2 = create_list(&ctx, "L2").await;

    let mut cards = Vec::new();
    for i in 1..=3 {
        cards.push(create_card(&ctx, l1, &format!("A{}", i)).await);
    }
    for i in 1..=2 {
        cards.push(create_card(&ctx, l2, &format!("B{}", i)).await);
    }

    // Attach a label and a member to one card so join rows exist
    let (status, label) = ctx
        .send(
            "POST",
            "/v1/labels",
            &ctx.user.id,
            Some(json!({"name": "Urgent", "color": "#f97316"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/cards/{}/labels", cards[0]),
            &ctx.user.id,
            Some(json!({"label_id": label["id"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let member = ctx.create_user(true).await.unwrap();
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/cards/{}/members", cards[0]),
            &ctx.user.id,
            Some(json!({"member_id": member.id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Delete the board
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/v1/boards/{}", ctx.board.id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Everything under it is gone
    let (status, _) = ctx
        .send(
            "GET",
            &format!("/v1/boards/{}", ctx.board.id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for list_id in [l1, l2] {
        assert!(List::find_by_id(&ctx.db, list_id).await.unwrap().is_none());
    }
    for card_id in cards {
        assert!(Card::find_by_id(&ctx.db, card_id).await.unwrap().is_none());
        let (status, _) = ctx
            .send("GET", &format!("/v1/cards/{}", card_id), &ctx.user.id, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (labels, members): (i64, i64) = (
        sqlx::query_scalar("SELECT COUNT(*) FROM card_labels cl WHERE NOT EXISTS (SELECT 1 FROM cards c WHERE c.id = cl.card_id)")
            .fetch_one(&ctx.db)
            .await
            .unwrap(),
        sqlx::query_scalar("SELECT COUNT(*) FROM card_members cm WHERE NOT EXISTS (SELECT 1 FROM cards c WHERE c.id = cm.card_id)")
            .fetch_one(&ctx.db)
            .await
            .unwrap(),
    );
    assert_eq!(labels, 0, "no orphaned card_labels rows");
    assert_eq!(members, 0, "no orphaned card_members rows");
}

/// Clearing a due date with explicit null, leaving it alone when omitted
#[tokio::test]
async fn test_due_date_null_semantics() {
    let ctx = TestContext::new().await.unwrap();
    let list = create_list(&ctx, "L1").await;
    let card = create_card(&ctx, list, "C1").await;

    // Set a due date
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &ctx.user.id,
            Some(json!({"due_date": "2026-09-01T12:00:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["due_date"].is_string());

    // A PATCH that omits due_date leaves it in place
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &ctx.user.id,
            Some(json!({"title": "Renamed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["due_date"].is_string(), "omitted field must survive");

    // Explicit null clears it
    let (status, body) = ctx
        .send(
            "PATCH",
            &format!("/v1/cards/{}", card),
            &ctx.user.id,
            Some(json!({"due_date": null})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["due_date"].is_null());
}

/// The identity webhook creates, updates, and deletes users when the
/// signature verifies, and rejects bad signatures
#[tokio::test]
async fn test_identity_webhook_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let user_id = format!("user_{}", common::unique_suffix());

    let payload = json!({
        "type": "user.created",
        "data": {"id": user_id, "name": "Hook User", "email": format!("{}@example.com", user_id)}
    })
    .to_string();

    let signature = sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), payload.as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/v1/identity/webhook")
        .header("content-type", "application/json")
        .header("x-identity-signature", signature)
        .body(Body::from(payload.clone()))
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let user = User::find_by_id(&ctx.db, &user_id).await.unwrap();
    assert!(user.is_some());
    assert_eq!(user.unwrap().name.as_deref(), Some("Hook User"));

    // A tampered body is rejected and applies nothing
    let bad_request = Request::builder()
        .method("POST")
        .uri("/v1/identity/webhook")
        .header("content-type", "application/json")
        .header(
            "x-identity-signature",
            sign_payload("wrong-secret", Utc::now().timestamp(), payload.as_bytes()),
        )
        .body(Body::from(payload))
        .unwrap();
    let response = ctx.app.clone().call(bad_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Deletion removes the row
    let delete_payload = json!({"type": "user.deleted", "data": {"id": user_id}}).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/identity/webhook")
        .header("content-type", "application/json")
        .header(
            "x-identity-signature",
            sign_payload(WEBHOOK_SECRET, Utc::now().timestamp(), delete_payload.as_bytes()),
        )
        .body(Body::from(delete_payload))
        .unwrap();
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(User::find_by_id(&ctx.db, &user_id).await.unwrap().is_none());
}

/// Label validation and attach/detach flow
#[tokio::test]
async fn test_label_attach_flow() {
    let ctx = TestContext::new().await.unwrap();
    let list = create_list(&ctx, "L1").await;
    let card = create_card(&ctx, list, "C1").await;

    // Bad color is a validation error
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/labels",
            &ctx.user.id,
            Some(json!({"name": "Bad", "color": "orange"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, label) = ctx
        .send(
            "POST",
            "/v1/labels",
            &ctx.user.id,
            Some(json!({"name": "Urgent", "color": "#F97316"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(label["color"], "#f97316", "colors normalize to lowercase");

    let label_id = label["id"].as_i64().unwrap();

    // Attach, duplicate attach, read back, detach
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/cards/{}/labels", card),
            &ctx.user.id,
            Some(json!({"label_id": label_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(
            "POST",
            &format!("/v1/cards/{}/labels", card),
            &ctx.user.id,
            Some(json!({"label_id": label_id})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .send("GET", &format!("/v1/cards/{}", card), &ctx.user.id, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["labels"].as_array().unwrap().len(), 1);
    assert_eq!(body["labels"][0]["name"], "Urgent");

    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/v1/cards/{}/labels/{}", card, label_id),
            &ctx.user.id,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
