//! HTTP implementation of the remote authority protocol
//!
//! Maps the trait onto the REST surface: `GET /{group}`, `POST /{group}`,
//! `PUT /{group}/{id}`, `DELETE /{group}/{id}`. Non-success statuses carry
//! a plain-text error body which becomes the rejection message.

use crate::authority::{AuthorityError, RemoteAuthority, WriteReply};
use async_trait::async_trait;
use jobforge_model::Group;

/// Authority client over HTTP
#[derive(Debug, Clone)]
pub struct HttpAuthority {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthority {
    /// Create a client against the authority's base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Configured base URL
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn group_url(&self, group: Group) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), group.path())
    }

    fn entity_url(&self, group: Group, id: &str) -> String {
        format!("{}/{}", self.group_url(group), id)
    }

    async fn read_write_reply(response: reqwest::Response) -> Result<WriteReply, AuthorityError> {
        if response.status().is_success() {
            response
                .json::<WriteReply>()
                .await
                .map_err(|err| AuthorityError::Decode(err.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AuthorityError::Rejected {
                message,
                job_update_results: None,
            })
        }
    }
}

#[async_trait]
impl RemoteAuthority for HttpAuthority {
    async fn fetch_all(&self, group: Group) -> Result<Vec<serde_json::Value>, AuthorityError> {
        let response = self
            .client
            .get(self.group_url(group))
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthorityError::Rejected {
                message,
                job_update_results: None,
            });
        }
        response
            .json::<Vec<serde_json::Value>>()
            .await
            .map_err(|err| AuthorityError::Decode(err.to_string()))
    }

    async fn create(
        &self,
        group: Group,
        body: serde_json::Value,
    ) -> Result<WriteReply, AuthorityError> {
        let response = self
            .client
            .post(self.group_url(group))
            .json(&body)
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        Self::read_write_reply(response).await
    }

    async fn update(
        &self,
        group: Group,
        id: &str,
        body: serde_json::Value,
    ) -> Result<WriteReply, AuthorityError> {
        let response = self
            .client
            .put(self.entity_url(group, id))
            .json(&body)
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        Self::read_write_reply(response).await
    }

    async fn delete(&self, group: Group, id: &str) -> Result<WriteReply, AuthorityError> {
        let response = self
            .client
            .delete(self.entity_url(group, id))
            .send()
            .await
            .map_err(|err| AuthorityError::Transport(err.to_string()))?;
        Self::read_write_reply(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_compose_from_group_paths() {
        let authority = HttpAuthority::new("https://config.example.org/api/");
        assert_eq!(
            authority.group_url(Group::TaskVariants),
            "https://config.example.org/api/taskVariants"
        );
        assert_eq!(
            authority.entity_url(Group::Tasks, "tck"),
            "https://config.example.org/api/tasks/tck"
        );
    }
}
