//! HTTP push of the filtered pool to the downstream aggregator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::outbound::publisher::{PoolPublisher, PublishReceipt};

#[derive(Serialize)]
struct PublishRequest<'a> {
    servers: &'a [String],
}

pub struct HttpPoolPublisher {
    http: HttpClient,
    url: String,
}

impl HttpPoolPublisher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl PoolPublisher for HttpPoolPublisher {
    async fn publish(&self, job_ids: &[String]) -> Result<PublishReceipt> {
        let response = self
            .http
            .post(&self.url)
            .json(&PublishRequest { servers: job_ids })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Publish {
                status: status.as_u16(),
                body,
            });
        }

        // The aggregator is expected to answer `{"added": ...}`; anything else
        // still counts as accepted.
        let added = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|mut value| value.get_mut("added").map(serde_json::Value::take));
        debug!(status = status.as_u16(), "Aggregator accepted pool");

        Ok(PublishReceipt { added })
    }
}
