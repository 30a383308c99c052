//! Message state threaded through both stages.

use serde::{Deserialize, Serialize};

use crate::types::LLMMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One conversation message, optionally tagged with the node that wrote it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Ordered, append-only message sequence for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    messages: Vec<Message>,
}

impl PipelineState {
    /// A fresh state holding the single seed user message
    pub fn seed(request: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(request)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn authored_by(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.name.as_deref() == Some(name))
    }

    /// Messages in the shape the model API expects.
    ///
    /// Consecutive messages with the same role are merged, since stage output
    /// is handed on as a user turn right after the seed request.
    pub fn to_llm_messages(&self) -> Vec<LLMMessage> {
        let mut out: Vec<(Role, String)> = Vec::with_capacity(self.messages.len());
        for message in &self.messages {
            match out.last_mut() {
                Some((role, content)) if *role == message.role => {
                    content.push_str("\n\n");
                    content.push_str(&message.content);
                }
                _ => out.push((message.role, message.content.clone())),
            }
        }
        out.into_iter()
            .map(|(role, content)| LLMMessage::new(role.as_str(), content))
            .collect()
    }
}
