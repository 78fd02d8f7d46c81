use async_trait::async_trait;

use crate::error::AiError;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// =============================================================================
// TextGenerator Trait
// =============================================================================

/// Anything that turns a conversation into a single block of text.
///
/// Dyn-compatible so services can hold `Arc<dyn TextGenerator>` and swap in a
/// stub under test.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: Vec<Message>) -> Result<String, AiError>;

    /// Single-turn convenience wrapper around [`TextGenerator::generate`].
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.generate(vec![Message::user(prompt)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, messages: Vec<Message>) -> Result<String, AiError> {
            Ok(messages
                .into_iter()
                .map(|m| m.content)
                .collect::<Vec<_>>()
                .join("|"))
        }
    }

    #[test]
    fn complete_sends_one_user_message() {
        let out = tokio_test::block_on(Echo.complete("hello")).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn message_constructors_set_role() {
        assert_eq!(Message::system("s").role, MessageRole::System);
        assert_eq!(Message::assistant("a").role, MessageRole::Assistant);
    }
}
