pub mod admin;
pub mod audit;
pub mod auth;
pub mod debug;
pub mod inventory;
pub mod product;

use stockroom_auth::identity::Identity;

use crate::domain::types::Actor;

/// Revision-log attribution for the authenticated caller.
pub(crate) fn actor_of(identity: &Identity) -> Actor {
    Actor {
        username: identity.username.clone(),
        user_id: identity.user_id,
    }
}
