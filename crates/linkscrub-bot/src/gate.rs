//! Sender/chat gating for incoming updates.

use crate::telegram::{ChatKind, Message};

/// What the webhook handler should do with a message that passed parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Process and answer in the private chat (forwarding to the target
    /// group when one is configured).
    Private,
    /// Process, repost in the group, and delete the original.
    Group,
    /// Silently ignore.
    Ignore,
}

/// Applies the allow-lists. An empty list allows everyone; channels and
/// unknown chat kinds are always ignored.
pub fn gate(message: &Message, allowed_users: &[i64], allowed_groups: &[i64]) -> GateDecision {
    let Some(from) = message.from.as_ref() else {
        return GateDecision::Ignore;
    };

    match message.chat.kind {
        ChatKind::Private => {
            if !allowed_users.is_empty() && !allowed_users.contains(&from.id) {
                tracing::debug!("ignoring private message from unlisted user {}", from.id);
                GateDecision::Ignore
            } else {
                GateDecision::Private
            }
        }
        ChatKind::Group | ChatKind::Supergroup => {
            if !allowed_groups.is_empty() && !allowed_groups.contains(&message.chat.id) {
                tracing::debug!("ignoring message in unlisted group {}", message.chat.id);
                GateDecision::Ignore
            } else {
                GateDecision::Group
            }
        }
        ChatKind::Channel | ChatKind::Unknown => GateDecision::Ignore,
    }
}
