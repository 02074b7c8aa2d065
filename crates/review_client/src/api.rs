use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ProjectId, SubmissionId},
    error::ApiErrorBody,
    protocol::{
        Metrics, Project, QuickApproveRequest, RecalculateAllResponse, Submission,
        UpdateSubmissionRequest, User,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

pub type ApiResult<T> = std::result::Result<T, ClientError>;

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_submissions(&self) -> ApiResult<Vec<Submission>>;
    async fn list_projects(&self) -> ApiResult<Vec<Project>>;
    async fn list_users(&self) -> ApiResult<Vec<User>>;
    async fn metrics(&self) -> ApiResult<Metrics>;
    async fn update_submission(
        &self,
        id: SubmissionId,
        payload: &UpdateSubmissionRequest,
    ) -> ApiResult<Submission>;
    async fn quick_approve(
        &self,
        id: SubmissionId,
        hours_justification: Option<String>,
    ) -> ApiResult<()>;
    async fn recalculate_project(&self, id: ProjectId) -> ApiResult<Project>;
    async fn recalculate_all(&self) -> ApiResult<u64>;
    async fn delete_project(&self, id: ProjectId) -> ApiResult<()>;
}

pub struct HttpAdminApi {
    http: Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn new(server_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let parsed =
            Url::parse(server_url).with_context(|| format!("invalid server url: {server_url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(anyhow!("server_url must start with http:// or https://"));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            http,
            base_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(method = method.as_str(), path, "admin api request");
        self.http
            .request(method, format!("{}/api/admin{path}", self.base_url))
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(ClientError::Rejected {
            status,
            message: ApiErrorBody::message_from_bytes(&body),
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_submissions(&self) -> ApiResult<Vec<Submission>> {
        self.fetch("/submissions").await
    }

    async fn list_projects(&self) -> ApiResult<Vec<Project>> {
        self.fetch("/projects").await
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.fetch("/users").await
    }

    async fn metrics(&self) -> ApiResult<Metrics> {
        self.fetch("/metrics").await
    }

    async fn update_submission(
        &self,
        id: SubmissionId,
        payload: &UpdateSubmissionRequest,
    ) -> ApiResult<Submission> {
        let response = self
            .send(
                self.request(Method::PATCH, &format!("/submissions/{id}"))
                    .json(payload),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn quick_approve(
        &self,
        id: SubmissionId,
        hours_justification: Option<String>,
    ) -> ApiResult<()> {
        self.send(
            self.request(Method::POST, &format!("/submissions/{id}/approve"))
                .json(&QuickApproveRequest {
                    hours_justification,
                }),
        )
        .await?;
        Ok(())
    }

    async fn recalculate_project(&self, id: ProjectId) -> ApiResult<Project> {
        let response = self
            .send(self.request(Method::POST, &format!("/projects/{id}/recalculate")))
            .await?;
        Ok(response.json().await?)
    }

    async fn recalculate_all(&self) -> ApiResult<u64> {
        let response = self
            .send(self.request(Method::POST, "/projects/recalculate"))
            .await?;
        let body: RecalculateAllResponse = response.json().await?;
        Ok(body.updated)
    }

    async fn delete_project(&self, id: ProjectId) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, &format!("/projects/{id}")))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
