// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use futures::SinkExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::errors::ClientError;
use crate::model::AlertMessage;
use crate::observability::messages::incidents::DryRunDelivery;
use crate::observability::messages::StructuredLog;
use crate::traits::RealtimeChannel;

/// Route key the gateway dispatches notification frames on.
const NOTIFY_ACTION: &str = "notify";

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Render the frame sent to the gateway: the alert plus its route key.
pub fn alert_frame(message: &AlertMessage) -> Result<String, ClientError> {
    let mut frame = serde_json::to_value(message)?;
    if let Value::Object(fields) = &mut frame {
        fields.insert("action".to_string(), Value::String(NOTIFY_ACTION.to_string()));
    }
    Ok(frame.to_string())
}

/// Pushes alerts to the WebSocket gateway over one lazily opened connection.
///
/// A failed send drops the connection; the next publish reconnects.
pub struct WebSocketChannel {
    url: String,
    socket: Mutex<Option<Socket>>,
}

impl WebSocketChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            socket: Mutex::new(None),
        }
    }

    fn ws_error(&self, source: tokio_tungstenite::tungstenite::Error) -> ClientError {
        ClientError::WebSocket {
            url: self.url.clone(),
            source: Box::new(source),
        }
    }
}

#[async_trait]
impl RealtimeChannel for WebSocketChannel {
    async fn publish(&self, message: &AlertMessage) -> Result<(), ClientError> {
        let frame = alert_frame(message)?;
        let mut guard = self.socket.lock().await;

        if guard.is_none() {
            let (stream, _) = connect_async(self.url.as_str())
                .await
                .map_err(|e| self.ws_error(e))?;
            *guard = Some(stream);
        }

        if let Some(stream) = guard.as_mut() {
            if let Err(e) = stream.send(Message::Text(frame)).await {
                *guard = None;
                return Err(self.ws_error(e));
            }
        }

        Ok(())
    }
}

/// Logs alerts instead of sending them.
#[derive(Default)]
pub struct LogChannel;

#[async_trait]
impl RealtimeChannel for LogChannel {
    async fn publish(&self, message: &AlertMessage) -> Result<(), ClientError> {
        let frame = alert_frame(message)?;
        DryRunDelivery {
            channel: "websocket",
            recipient: "dashboards",
            content: &frame,
        }
        .log();
        Ok(())
    }
}
