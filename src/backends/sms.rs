// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::errors::ClientError;
use crate::observability::messages::incidents::DryRunDelivery;
use crate::observability::messages::StructuredLog;
use crate::traits::SmsGateway;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SmsRequest<'a> {
    phone_number: &'a str,
    message: &'a str,
}

/// Posts `{"phoneNumber", "message"}` to an SMS provider webhook. Any 2xx is accepted.
pub struct HttpSmsGateway {
    client: Client,
    endpoint: String,
}

impl HttpSmsGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ClientError::Transport {
                url: endpoint.clone(),
                source,
            })?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SmsGateway for HttpSmsGateway {
    async fn send(&self, phone_number: &str, text: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&SmsRequest {
                phone_number,
                message: text,
            })
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                url: self.endpoint.clone(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// Logs SMS instead of sending them.
#[derive(Default)]
pub struct LogSmsGateway;

#[async_trait]
impl SmsGateway for LogSmsGateway {
    async fn send(&self, phone_number: &str, text: &str) -> Result<(), ClientError> {
        DryRunDelivery {
            channel: "sms",
            recipient: phone_number,
            content: text,
        }
        .log();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_posts_phone_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(body_json(json!({
                "phoneNumber": "+51999999999",
                "message": "🚨 ALERTA UTEC"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let gateway =
            HttpSmsGateway::new(format!("{}/send", server.uri()), Duration::from_secs(5)).unwrap();
        gateway.send("+51999999999", "🚨 ALERTA UTEC").await.unwrap();
    }

    #[tokio::test]
    async fn test_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let gateway = HttpSmsGateway::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = gateway.send("+51111", "x").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
