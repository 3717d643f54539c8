//! HTTP transport for the [`UserCollection`] contract.
//!
//! Speaks the reference server's JSON protocol: `GET /users`,
//! `POST /users`, `PUT /users/{id}`, `DELETE /users/{id}`, with an
//! [`ErrorBody`] envelope on every non-2xx response. Failure descriptions
//! from the envelope are surfaced verbatim so they reach the view's error
//! slot unchanged.

use anyhow::Context;
use async_trait::async_trait;

use roster_core::{ErrorBody, User, UserCollection, UserDraft, UserId};

/// A [`UserCollection`] backed by an HTTP endpoint.
pub struct HttpCollection {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCollection {
    /// Creates a transport for the collection served under `base_url`
    /// (scheme, host, and port -- no trailing slash required).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{id}", self.base_url)
    }

    /// Turns a non-2xx response into a failure description, preferring the
    /// server's [`ErrorBody`] message over the bare status code.
    async fn describe_failure(op: &str, response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => anyhow::anyhow!("{op} failed: {}", body.message),
            Err(_) => anyhow::anyhow!("{op} failed with status {status}"),
        }
    }
}

#[async_trait]
impl UserCollection for HttpCollection {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let response = self
            .client
            .get(self.users_url())
            .send()
            .await
            .context("users listing request failed")?;
        if !response.status().is_success() {
            return Err(Self::describe_failure("listing users", response).await);
        }

        let body = response
            .text()
            .await
            .context("users listing response could not be read")?;
        if body.is_empty() {
            // Absent payload counts as an empty collection.
            return Ok(Vec::new());
        }
        serde_json::from_str(&body).context("users listing response was not valid JSON")
    }

    async fn insert(&self, draft: &UserDraft) -> anyhow::Result<User> {
        let response = self
            .client
            .post(self.users_url())
            .json(draft)
            .send()
            .await
            .context("user insert request failed")?;
        if !response.status().is_success() {
            return Err(Self::describe_failure("inserting user", response).await);
        }
        response
            .json()
            .await
            .context("inserted user response was not valid JSON")
    }

    async fn update_by_id(&self, id: UserId, draft: &UserDraft) -> anyhow::Result<User> {
        let response = self
            .client
            .put(self.user_url(id))
            .json(draft)
            .send()
            .await
            .context("user update request failed")?;
        if !response.status().is_success() {
            return Err(Self::describe_failure("updating user", response).await);
        }
        response
            .json()
            .await
            .context("updated user response was not valid JSON")
    }

    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(self.user_url(id))
            .send()
            .await
            .context("user delete request failed")?;
        if !response.status().is_success() {
            return Err(Self::describe_failure("deleting user", response).await);
        }
        Ok(())
    }
}
