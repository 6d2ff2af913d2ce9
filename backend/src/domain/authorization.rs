//! Ownership checks for profile and feedback access.
//!
//! Both predicates are pure: they take the resolved session identity as an
//! explicit parameter, touch no persistence, and have no side effects. A
//! caller receiving `false` must reject the operation with an unauthorized
//! error and perform no mutation.

use super::feedback::Feedback;
use super::user::Username;

/// Whether the session identity may view or delete the targeted profile.
///
/// True iff an identity is present and equals the target username.
pub fn can_access_own_profile(session_identity: Option<&Username>, target: &Username) -> bool {
    session_identity.is_some_and(|identity| identity == target)
}

/// Whether the session identity may edit or delete the feedback entry.
///
/// True iff an identity is present and equals the entry's owner.
pub fn can_modify_feedback(session_identity: Option<&Username>, feedback: &Feedback) -> bool {
    session_identity.is_some_and(|identity| identity == feedback.owner())
}
