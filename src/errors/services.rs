// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by the external collaborators: the document store, the REST
//! API, the WebSocket gateway and the SMS provider.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("incident '{0}' not found")]
    NotFound(String),

    #[error("store I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("websocket error on {url}: {source}")]
    WebSocket {
        url: String,
        #[source]
        source: Box<tokio_tungstenite::tungstenite::Error>,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
