//! Full re-derivation of the snapshot list from the message history. The
//! list is rebuilt from scratch on every history change; snapshots are cheap
//! value objects and only the navigator's selection carries identity across
//! rebuilds.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::extract::Extractor;
use crate::logging;
use crate::types::{Message, Role, ToolInvocation};

/// Immutable record of one completed invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCallSnapshot {
    /// Stable identity, composed from the owning message and the ordinal of
    /// the invocation within it. Never reused for a different invocation.
    pub id: String,
    /// Owning message; a lookup key, not ownership.
    pub message_id: String,
    pub invocation: ToolInvocation,
    /// Position in the derived list. Shifts across re-derivation when
    /// history is edited; consumers must key identity by `id`.
    pub sequence_index: usize,
    pub timestamp: SystemTime,
}

pub fn snapshot_id(message_id: &str, ordinal: usize) -> String {
    format!("{message_id}#{ordinal}")
}

/// Walk the full history in order and emit one snapshot per completed
/// invocation in each assistant message. Deterministic: the same history
/// always yields the same ids in the same order.
///
/// A message whose markup cannot be parsed contributes zero snapshots; it is
/// logged and skipped rather than failing the whole derivation.
pub fn derive(history: &[Message], extractor: &Extractor) -> Vec<ToolCallSnapshot> {
    let mut snapshots = Vec::new();

    for message in history {
        if message.role != Role::Assistant {
            continue;
        }

        let invocations = extractor.extract_all(&message.content);
        if invocations.is_empty() {
            if looks_like_markup(&message.content) {
                logging::emit_malformed_markup(&message.id, "no complete invocation recovered");
            }
            continue;
        }

        for (ordinal, invocation) in invocations.into_iter().enumerate() {
            snapshots.push(ToolCallSnapshot {
                id: snapshot_id(&message.id, ordinal),
                message_id: message.id.clone(),
                invocation,
                sequence_index: snapshots.len(),
                timestamp: message.created_at,
            });
        }
    }

    snapshots
}

fn looks_like_markup(content: &str) -> bool {
    content.contains("<invoke") || content.contains("<function_calls")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_id_composition() {
        assert_eq!(snapshot_id("msg_1", 0), "msg_1#0");
        assert_eq!(snapshot_id("msg_1", 3), "msg_1#3");
        assert_ne!(snapshot_id("msg_1", 0), snapshot_id("msg_2", 0));
    }

    #[test]
    fn test_looks_like_markup() {
        assert!(looks_like_markup("text <invoke name=\"x\">"));
        assert!(looks_like_markup("<function_calls>"));
        assert!(!looks_like_markup("plain prose"));
    }
}
