//! Production adapter for [`GreetingRepository`] over HTTP/JSON.

use super::{GreetingRepository, RepositoryError};
use crate::application::dto::{CreateGreetingRequestDto, GreetingResponseDto};
use crate::config::ApiConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, instrument};

const GREETINGS_PATH: &str = "api/v2/greetings";

/// The list endpoint historically answered with a single object.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<GreetingResponseDto>),
    One(GreetingResponseDto),
}

impl From<OneOrMany> for Vec<GreetingResponseDto> {
    fn from(body: OneOrMany) -> Self {
        match body {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Talks to `{base_url}/api/v2/greetings`.
#[derive(Clone)]
pub struct HttpGreetingRepository {
    client: Client,
    collection_url: Url,
}

impl HttpGreetingRepository {
    pub fn new(config: &ApiConfig) -> Result<Self, RepositoryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        let mut base = config.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let collection_url = base
            .join(GREETINGS_PATH)
            .map_err(|e| RepositoryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            collection_url,
        })
    }

    fn item_url(&self, id: &str) -> Result<Url, RepositoryError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::Transport("base url cannot be a base".into()))?
            .push(id);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        not_found: Option<&str>,
    ) -> Result<T, RepositoryError> {
        let response = request.send().await.map_err(|e| {
            error!(url = ?e.url().map(Url::as_str), error = %e, "API no response");
            RepositoryError::Transport(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().to_string();
        debug!(status = status.as_u16(), %url, "HTTP response");

        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                error!(%url, error = %e, "API malformed body");
                RepositoryError::Decode(e.to_string())
            });
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), %url, body = %body, "API error response");

        Err(match status {
            StatusCode::NOT_FOUND => {
                RepositoryError::NotFound(not_found.map(str::to_string).unwrap_or(url))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::Rejected(body)
            }
            other => RepositoryError::Status {
                status: other.as_u16(),
                message: body,
            },
        })
    }
}

#[async_trait]
impl GreetingRepository for HttpGreetingRepository {
    #[instrument(skip(self))]
    async fn get_greeting(&self) -> Result<GreetingResponseDto, RepositoryError> {
        debug!(url = %self.collection_url, "HTTP GET");
        self.send(self.client.get(self.collection_url.clone()), None)
            .await
    }

    #[instrument(skip(self))]
    async fn get_greeting_by_id(&self, id: &str) -> Result<GreetingResponseDto, RepositoryError> {
        let url = self.item_url(id)?;
        debug!(%url, "HTTP GET");
        self.send(self.client.get(url), Some(id)).await
    }

    #[instrument(skip(self))]
    async fn create_greeting(
        &self,
        request: CreateGreetingRequestDto,
    ) -> Result<GreetingResponseDto, RepositoryError> {
        debug!(url = %self.collection_url, "HTTP POST");
        self.send(
            self.client.post(self.collection_url.clone()).json(&request),
            None,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn list_greetings(&self) -> Result<Vec<GreetingResponseDto>, RepositoryError> {
        debug!(url = %self.collection_url, "HTTP GET");
        let body: OneOrMany = self
            .send(self.client.get(self.collection_url.clone()), None)
            .await?;
        Ok(body.into())
    }
}
