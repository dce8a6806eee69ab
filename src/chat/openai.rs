use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{ChatModel, Talk};
use crate::Config;

/// Client for OpenAI-compatible `chat/completions` endpoints.
pub struct ChatClient {
    client: Client,
    api_key: String,
    url: String,
}

impl ChatClient {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: config.openai_api_key.clone(),
            url: config.openai_url.clone(),
        })
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, model: &str, messages: &[Talk]) -> anyhow::Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow!("No API key configured for {}", self.url));
        }

        let request = ChatRequest { model, messages };
        let response = self.client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", &self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        if response.status() != StatusCode::OK {
            return Err(anyhow!(
                "Chat completion failed:\n\tstatus: {}\n\tbody: {}",
                response.status(),
                response.text().await?
            ));
        }

        let response_body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        response_body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Chat completion returned no content"))
    }
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Talk],
}

#[derive(Deserialize, Debug)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Role;
    use mockito::Matcher;

    fn client_for(server: &mockito::Server, api_key: &str) -> anyhow::Result<ChatClient> {
        let dir = tempfile::tempdir()?;
        let mut config = crate::test_config(dir.path());
        config.openai_url = format!("{}/v1/chat/completions", server.url());
        config.openai_api_key = api_key.to_string();
        ChatClient::from_config(&config)
    }

    #[tokio::test]
    async fn test_completion() -> anyhow::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hello"},
                ],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"hi there"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, "sk-test")?;
        let messages = vec![
            Talk::new(Role::System, "be brief".to_string()),
            Talk::new(Role::User, "hello".to_string()),
        ];
        let reply = client.complete("gpt-4o", &messages).await?;

        assert_eq!(reply, "hi there");
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status() -> anyhow::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/v1/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = client_for(&server, "sk-test")?;
        let err = client.complete("gpt-4o", &[Talk::user("hello".to_string())])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("rate limited"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() -> anyhow::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/v1/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server, "")?;
        assert!(client.complete("gpt-4o", &[Talk::user("hello".to_string())]).await.is_err());
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_choices() -> anyhow::Result<()> {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server, "sk-test")?;
        assert!(client.complete("gpt-4o", &[Talk::user("hello".to_string())]).await.is_err());
        Ok(())
    }
}
