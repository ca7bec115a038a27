//! JSON-over-HTTP backend with bearer token authentication.

use crate::{Backend, Campaign, DraftPayload, NewSnippet, Snippet, StoreError, StoreResult};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> StoreResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("mailcraft/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Backend request");

        let request = self.client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> StoreResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> StoreResult<T> {
        let response = self.send(request, what).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_snippets(&self) -> StoreResult<Vec<Snippet>> {
        let request = self.request(Method::GET, "/snippets");
        self.send_json(request, "snippets").await
    }

    async fn create_snippet(&self, snippet: &NewSnippet) -> StoreResult<Snippet> {
        let request = self.request(Method::POST, "/snippets").json(snippet);
        let created: Snippet = self.send_json(request, "snippets").await?;
        info!(snippet_id = %created.id, name = %created.name, "Snippet saved");
        Ok(created)
    }

    async fn delete_snippet(&self, id: &str) -> StoreResult<()> {
        let request = self.request(Method::DELETE, &format!("/snippets/{}", id));
        self.send(request, &format!("snippet {}", id)).await?;
        info!(snippet_id = %id, "Snippet deleted");
        Ok(())
    }

    async fn create_campaign(&self, draft: &DraftPayload) -> StoreResult<Campaign> {
        let request = self.request(Method::POST, "/campaigns").json(draft);
        self.send_json(request, "campaigns").await
    }

    async fn update_campaign(&self, id: &str, draft: &DraftPayload) -> StoreResult<Campaign> {
        let request = self.request(Method::PUT, &format!("/campaigns/{}", id)).json(draft);
        self.send_json(request, &format!("campaign {}", id)).await
    }

    async fn get_campaign(&self, id: &str) -> StoreResult<Campaign> {
        let request = self.request(Method::GET, &format!("/campaigns/{}", id));
        self.send_json(request, &format!("campaign {}", id)).await
    }
}
