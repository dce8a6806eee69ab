use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod openai;
pub mod prompt;
pub mod fallback;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Talk {
    pub role: Role,
    pub content: String,
}

impl Talk {
    pub fn new(role: Role, content: String) -> Self {
        Self { role, content }
    }

    pub fn system(content: String) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: String) -> Self {
        Self::new(Role::User, content)
    }
}

/// A chat-completion backend. Returns the assistant reply for `messages`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, model: &str, messages: &[Talk]) -> anyhow::Result<String>;
}
