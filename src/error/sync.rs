use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Bind error on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error during {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("WebSocket error during {context}: {source}")]
    WebSocket {
        context: &'static str,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("Connection error to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("Serialization error during {context}: {source}")]
    Serialize {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed submission: {source}")]
    MalformedSubmission {
        #[source]
        source: serde_json::Error,
    },
    #[error("Malformed server message: {source}")]
    MalformedServerMessage {
        #[source]
        source: serde_json::Error,
    },
    #[error("Connection closed.")]
    ConnectionClosed,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
