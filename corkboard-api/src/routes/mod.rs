/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `identity_webhook`: Identity provider lifecycle events
/// - `workspaces`: Workspace CRUD
/// - `boards`: Board CRUD and the aggregate read
/// - `board_members`: Board membership management
/// - `lists`: List create/rename/move/delete
/// - `cards`: Card create/read/update/move/delete
/// - `card_labels`: Label attach/detach on cards
/// - `card_members`: Member attach/detach on cards
/// - `labels`: Global label list/create

pub mod board_members;
pub mod boards;
pub mod card_labels;
pub mod card_members;
pub mod cards;
pub mod health;
pub mod identity_webhook;
pub mod labels;
pub mod lists;
pub mod workspaces;
