use serde::{Deserialize, Serialize};

/// The author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A user input.
    User,
    /// A reply from the model.
    Assistant,
}

impl Role {
    /// Returns the wire name of this role.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Returns the role required at the given 0-based index of a
    /// conversation.
    #[inline]
    pub fn expected_at(index: usize) -> Self {
        if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

/// One turn of a conversation.
///
/// A conversation is a plain slice of messages. It is accepted by the
/// service only if it starts with a user turn, alternates roles strictly
/// and ends on a user turn, see [`validate_messages`].
///
/// [`validate_messages`]: crate::validate::validate_messages
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub role: Role,
    /// The text content.
    pub content: String,
}

impl Message {
    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
