use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::category::Category;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One row of the conversation history as supplied by the store on every
/// history-changed notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: SystemTime,
}

impl Message {
    pub fn new(id: impl Into<String>, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            created_at: SystemTime::now(),
        }
    }
}

/// A name/value pair pulled out of invocation markup. `complete` is false
/// while the close marker for this value has not arrived yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    pub complete: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>, complete: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            complete,
        }
    }
}

/// Best-effort structured view of one tool invocation, recomputed from the
/// full buffer on every call. Values only ever grow by appending while the
/// invocation is still streaming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInvocation {
    pub raw_name: String,
    pub display_name: String,
    pub category: Category,
    /// Insertion order matches order of appearance in the buffer.
    pub parameters: Vec<Parameter>,
    /// The parameter chosen for preview display, when one qualifies.
    pub primary_parameter: Option<Parameter>,
    /// True only once the invocation's own close marker has been seen.
    pub complete: bool,
}
