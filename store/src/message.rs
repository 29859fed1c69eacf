//! Message data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message row.
///
/// The embedding field is a one-way flag per row: it starts out absent
/// (pending) and is set at most once to a full, fixed-length vector. The
/// pipeline never clears a generated embedding and never regenerates one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, immutable once created.
    pub id: Uuid,

    /// Conversation this message belongs to.
    pub conversation_id: Uuid,

    /// Author of the message.
    pub author_id: Uuid,

    /// Message text.
    pub content: String,

    /// Whether the message was produced by an AI responder.
    pub is_ai: bool,

    /// Optional structured payload attached to the message.
    pub attachment: Option<MessageAttachment>,

    /// Embedding vector, absent while pending.
    pub embedding: Option<Vec<f32>>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether this row still needs an embedding.
    pub fn is_pending(&self) -> bool {
        self.embedding.is_none()
    }
}

/// Structured payload carried by a message, discriminated by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageAttachment {
    /// A proposed task extracted from the conversation.
    TaskProposal {
        title: String,
        description: String,
        due_date: Option<DateTime<Utc>>,
    },

    /// Results of a search performed on behalf of the user.
    SearchResult {
        query: String,
        results: Vec<String>,
    },
}

/// Fields required to create a new message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Conversation the message belongs to.
    pub conversation_id: Uuid,

    /// Author of the message.
    pub author_id: Uuid,

    /// Message text; must be non-empty.
    pub content: String,

    /// Whether the message was produced by an AI responder.
    pub is_ai: bool,

    /// Optional structured payload.
    pub attachment: Option<MessageAttachment>,
}

impl NewMessage {
    /// Create a new message with just the required fields.
    pub fn new(conversation_id: Uuid, author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            author_id,
            content: content.into(),
            is_ai: false,
            attachment: None,
        }
    }

    /// Mark the message as AI-generated.
    pub fn with_is_ai(mut self, is_ai: bool) -> Self {
        self.is_ai = is_ai;
        self
    }

    /// Attach a structured payload.
    pub fn with_attachment(mut self, attachment: MessageAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Materialize into a full row with a fresh id and timestamp.
    pub fn into_message(self, embedding: Option<Vec<f32>>) -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id: self.conversation_id,
            author_id: self.author_id,
            content: self.content,
            is_ai: self.is_ai,
            attachment: self.attachment,
            embedding,
            created_at: Utc::now(),
        }
    }
}

/// Projection of a row awaiting an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMessage {
    /// Row id.
    pub id: Uuid,

    /// Message text.
    pub content: String,

    /// Creation timestamp, used for oldest-first ordering.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_materialization() {
        let conversation = Uuid::new_v4();
        let author = Uuid::new_v4();

        let message = NewMessage::new(conversation, author, "hello")
            .with_is_ai(true)
            .into_message(None);

        assert_eq!(message.conversation_id, conversation);
        assert_eq!(message.author_id, author);
        assert_eq!(message.content, "hello");
        assert!(message.is_ai);
        assert!(message.is_pending());
    }

    #[test]
    fn test_attachment_serde_tagging() {
        let attachment = MessageAttachment::TaskProposal {
            title: "Book flights".to_string(),
            description: "Before Friday".to_string(),
            due_date: None,
        };

        let value = serde_json::to_value(&attachment).unwrap();
        assert_eq!(value["kind"], "task_proposal");
        assert_eq!(value["title"], "Book flights");

        let parsed: MessageAttachment = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed, MessageAttachment::TaskProposal { .. }));
    }
}
