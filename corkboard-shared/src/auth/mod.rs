/// Access control and identity integration
///
/// Corkboard does not authenticate users itself: an external identity
/// provider owns credentials and issues session tokens whose subject is
/// the provider's stable user id. This module verifies those tokens,
/// resolves the acting user, and evaluates board-level access.
///
/// # Modules
///
/// - [`identity`]: session token verification (provider-issued HS256 JWTs)
/// - [`middleware`]: request identity resolution for Axum handlers
/// - [`authorization`]: the board access evaluator (creator / member)
/// - [`webhook`]: signature verification for identity lifecycle webhooks
///
/// # Access model
///
/// Two roles exist per board. The **creator** holds irrevocable
/// administrative rights (rename, delete, manage membership). A **member**
/// (explicit `board_members` row) may read the board and mutate its lists
/// and cards. Everyone else has no access. Existence is always checked
/// before access, so a missing resource reads as not-found regardless of
/// the caller's rights.

pub mod authorization;
pub mod identity;
pub mod middleware;
pub mod webhook;
