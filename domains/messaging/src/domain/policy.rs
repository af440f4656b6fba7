//! Access-control policies for the Messaging domain
//!
//! Two deliberately distinct policies, kept as separate named functions:
//! user-scoped resources (thread listings, unread counts) are admin-or-self,
//! while thread-scoped mutations are participant-only with NO admin
//! override. Thread deletion in particular never consults `is_admin`.

use parley_auth::AuthContext;
use uuid::Uuid;

/// A user-scoped resource is accessible to the subject themselves or to an
/// admin.
pub fn can_access_user_scope(actor: &AuthContext, subject_user_id: Uuid) -> bool {
    actor.is_admin() || actor.user.id == subject_user_id
}

/// A single message may be marked read by an admin, or by a thread
/// participant who did not send it.
pub fn can_mark_message_read(actor: &AuthContext, sender_id: Uuid, is_participant: bool) -> bool {
    actor.is_admin() || (sender_id != actor.user.id && is_participant)
}
