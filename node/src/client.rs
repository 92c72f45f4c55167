//! # Public Node Client
//!
//! A thin async client for the REST API of an LTO public node. Transactions
//! are built and signed offline by `lto-protocol`; this module only moves
//! their JSON form over HTTP and reads chain state back.
//!
//! The HTTP layer sits behind [`NodeTransport`] so that the polling and
//! error mapping can be tested without a node.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use lto_protocol::config::{
    node_url_for_chain, CONFIRMATION_POLL_INTERVAL, CONFIRMATION_TIMEOUT, SCRIPT_PREFIX,
};
use lto_protocol::crypto::base64_decode;
use lto_protocol::transaction::{AnyTransaction, TransactionError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum NodeError {
    /// The request never got a response.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The node answered with a non-success status.
    #[error("node returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The transaction did not show up before the deadline.
    #[error("transaction {id} not confirmed after {waited:?}")]
    Timeout { id: String, waited: Duration },

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The node answered, but not with what the endpoint documents.
    #[error("unexpected response from node: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for NodeError {
    fn from(err: reqwest::Error) -> Self {
        NodeError::Http(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where the node is and how patiently to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Base URL without a trailing slash.
    pub url: String,
    /// Delay between two `transaction_info` polls while waiting.
    pub poll_interval: Duration,
    /// Overall deadline for `wait_for_transaction`.
    pub timeout: Duration,
}

impl NodeConfig {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            poll_interval: CONFIRMATION_POLL_INTERVAL,
            timeout: CONFIRMATION_TIMEOUT,
        }
    }

    /// The public node of a well-known network.
    pub fn for_chain(chain_id: char) -> Option<Self> {
        node_url_for_chain(chain_id).map(Self::new)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// A decoded HTTP response. Bodies that are not JSON come back as a JSON
/// string.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeResponse {
    pub status: u16,
    pub body: Value,
}

impl NodeResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How requests reach the node.
#[async_trait]
pub trait NodeTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<NodeResponse, NodeError>;

    /// POST `body` as `application/json`.
    async fn post(&self, path: &str, body: String) -> Result<NodeResponse, NodeError>;
}

/// [`NodeTransport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, NodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn decode(response: reqwest::Response) -> Result<NodeResponse, NodeError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(NodeResponse { status, body })
    }
}

#[async_trait]
impl NodeTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<NodeResponse, NodeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET");
        Self::decode(self.client.get(&url).send().await?).await
    }

    async fn post(&self, path: &str, body: String) -> Result<NodeResponse, NodeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::decode(response).await
    }
}

// ---------------------------------------------------------------------------
// PublicNode
// ---------------------------------------------------------------------------

/// Client for one public node.
pub struct PublicNode<T = HttpTransport> {
    transport: T,
    config: NodeConfig,
}

impl PublicNode<HttpTransport> {
    pub fn connect(config: NodeConfig) -> Result<Self, NodeError> {
        let transport = HttpTransport::new(&config.url)?;
        Ok(Self { transport, config })
    }
}

impl<T: NodeTransport> PublicNode<T> {
    pub fn with_transport(transport: T, config: NodeConfig) -> Self {
        Self { transport, config }
    }

    /// Submit a signed transaction and return the id the node assigned.
    pub async fn broadcast(&self, transaction: &Value) -> Result<String, NodeError> {
        let body = serde_json::to_string(transaction).map_err(TransactionError::from)?;
        let response = expect_success(self.transport.post("/transactions/broadcast", body).await?)?;
        let id = string_field(&response, "id")?;
        info!(%id, "transaction broadcast");
        Ok(id)
    }

    /// A confirmed or pending transaction, or `None` if the node does not
    /// know the id (yet).
    pub async fn transaction_info(&self, id: &str) -> Result<Option<Value>, NodeError> {
        let response = self.transport.get(&format!("/transactions/info/{id}")).await?;
        if response.status == 404 {
            return Ok(None);
        }
        expect_success(response).map(Some)
    }

    /// [`transaction_info`](Self::transaction_info), parsed.
    pub async fn transaction(&self, id: &str) -> Result<Option<AnyTransaction>, NodeError> {
        match self.transaction_info(id).await? {
            Some(value) => Ok(Some(AnyTransaction::from_json(&value)?)),
            None => Ok(None),
        }
    }

    /// Poll until the node reports the transaction, or fail with `Timeout`.
    pub async fn wait_for_transaction(&self, id: &str) -> Result<Value, NodeError> {
        let poll = async {
            loop {
                if let Some(info) = self.transaction_info(id).await? {
                    if info.get("id").and_then(Value::as_str) == Some(id) {
                        return Ok::<_, NodeError>(info);
                    }
                }
                debug!(%id, "transaction not yet known, polling again");
                sleep(self.config.poll_interval).await;
            }
        };

        match timeout(self.config.timeout, poll).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%id, timeout = ?self.config.timeout, "gave up waiting for transaction");
                Err(NodeError::Timeout {
                    id: id.to_string(),
                    waited: self.config.timeout,
                })
            }
        }
    }

    /// Regular balance in the smallest unit.
    pub async fn balance(&self, address: &str) -> Result<u64, NodeError> {
        let response = self.get_ok(&format!("/addresses/balance/{address}")).await?;
        u64_field(&response, "balance")
    }

    pub async fn height(&self) -> Result<u64, NodeError> {
        let response = self.get_ok("/blocks/height").await?;
        u64_field(&response, "height")
    }

    pub async fn last_block(&self) -> Result<Value, NodeError> {
        self.get_ok("/blocks/last").await
    }

    pub async fn block_at(&self, height: u64) -> Result<Value, NodeError> {
        self.get_ok(&format!("/blocks/at/{height}")).await
    }

    /// Transactions involving `address`, newest first. `after` continues
    /// from a previous page.
    pub async fn transactions(&self, address: &str, limit: u32, after: Option<&str>) -> Result<Value, NodeError> {
        let mut path = format!("/transactions/address/{address}/limit/{limit}");
        if let Some(after) = after {
            path.push_str(&format!("?after={after}"));
        }
        self.get_ok(&path).await
    }

    /// Active leases of `address`.
    pub async fn lease_list(&self, address: &str) -> Result<Value, NodeError> {
        self.get_ok(&format!("/leasing/active/{address}")).await
    }

    pub async fn sponsorship_list(&self, address: &str) -> Result<Value, NodeError> {
        self.get_ok(&format!("/sponsorship/status/{address}")).await
    }

    pub async fn association_list(&self, address: &str) -> Result<Value, NodeError> {
        self.get_ok(&format!("/associations/status/{address}")).await
    }

    /// Compile a script on the node and return its bytes, ready for a
    /// `SetScript` transaction.
    pub async fn compile_script(&self, source: &str) -> Result<Vec<u8>, NodeError> {
        let response = expect_success(
            self.transport
                .post("/utils/script/compile", source.to_string())
                .await?,
        )?;
        let script = string_field(&response, "script")?;
        let encoded = script.strip_prefix(SCRIPT_PREFIX).unwrap_or(&script);
        Ok(base64_decode(encoded).map_err(TransactionError::from)?)
    }

    async fn get_ok(&self, path: &str) -> Result<Value, NodeError> {
        expect_success(self.transport.get(path).await?)
    }
}

fn expect_success(response: NodeResponse) -> Result<Value, NodeError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let message = match &response.body {
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| response.body.to_string()),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Err(NodeError::Status {
        status: response.status,
        message,
    })
}

fn string_field(body: &Value, name: &str) -> Result<String, NodeError> {
    body.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| NodeError::Malformed(format!("missing string field \"{name}\"")))
}

fn u64_field(body: &Value, name: &str) -> Result<u64, NodeError> {
    body.get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| NodeError::Malformed(format!("missing integer field \"{name}\"")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct MockTransport {
        responses: Mutex<VecDeque<NodeResponse>>,
        requests: Mutex<Vec<(String, String, Option<String>)>>,
    }

    impl MockTransport {
        fn with(responses: Vec<(u16, Value)>) -> Self {
            let responses = responses
                .into_iter()
                .map(|(status, body)| NodeResponse { status, body })
                .collect();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::default(),
            }
        }

        fn next(&self) -> Result<NodeResponse, NodeError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| NodeError::Http("no more canned responses".into()))
        }
    }

    #[async_trait]
    impl NodeTransport for MockTransport {
        async fn get(&self, path: &str) -> Result<NodeResponse, NodeError> {
            self.requests.lock().unwrap().push(("GET".into(), path.into(), None));
            self.next()
        }

        async fn post(&self, path: &str, body: String) -> Result<NodeResponse, NodeError> {
            self.requests.lock().unwrap().push(("POST".into(), path.into(), Some(body)));
            self.next()
        }
    }

    fn node(responses: Vec<(u16, Value)>) -> PublicNode<MockTransport> {
        let config = NodeConfig {
            url: "http://node.test".into(),
            poll_interval: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        };
        PublicNode::with_transport(MockTransport::with(responses), config)
    }

    #[test]
    fn config_trims_slash_and_knows_networks() {
        assert_eq!(NodeConfig::new("http://localhost:6869/").url, "http://localhost:6869");
        assert!(NodeConfig::for_chain('L').is_some());
        assert!(NodeConfig::for_chain('T').is_some());
        assert!(NodeConfig::for_chain('X').is_none());
    }

    #[tokio::test]
    async fn broadcast_returns_id() {
        let node = node(vec![(200, json!({ "id": "abc", "type": 15 }))]);
        let id = node.broadcast(&json!({ "type": 15 })).await.unwrap();
        assert_eq!(id, "abc");

        let requests = node.transport.requests.lock().unwrap();
        assert_eq!(requests[0].0, "POST");
        assert_eq!(requests[0].1, "/transactions/broadcast");
        assert_eq!(requests[0].2.as_deref(), Some(r#"{"type":15}"#));
    }

    #[tokio::test]
    async fn error_status_carries_node_message() {
        let node = node(vec![(400, json!({ "error": 112, "message": "State check failed" }))]);
        match node.broadcast(&json!({})).await {
            Err(NodeError::Status { status: 400, message }) => assert_eq!(message, "State check failed"),
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_transaction_is_none() {
        let node = node(vec![(404, json!({ "message": "transactions does not exist" }))]);
        assert_eq!(node.transaction_info("nope").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_polls_until_known() {
        let node = node(vec![
            (404, json!({})),
            (404, json!({})),
            (200, json!({ "id": "tx1", "height": 5 })),
        ]);
        let info = node.wait_for_transaction("tx1").await.unwrap();
        assert_eq!(info["height"], 5);
        assert_eq!(node.transport.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let responses = (0..20).map(|_| (404, json!({}))).collect();
        let node = node(responses);
        match node.wait_for_transaction("tx1").await {
            Err(NodeError::Timeout { id, waited }) => {
                assert_eq!(id, "tx1");
                assert_eq!(waited, Duration::from_secs(10));
            }
            other => panic!("expected Timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn read_endpoints() {
        let node = node(vec![
            (200, json!({ "address": "3N...", "balance": 1_500_000_000u64 })),
            (200, json!({ "height": 1234 })),
            (200, json!([])),
            (200, json!({ "sponsor": [] })),
            (200, json!({ "address": "3N...", "outgoing": [], "incoming": [] })),
        ]);
        assert_eq!(node.balance("3N...").await.unwrap(), 1_500_000_000);
        assert_eq!(node.height().await.unwrap(), 1234);
        node.lease_list("3N...").await.unwrap();
        node.sponsorship_list("3N...").await.unwrap();
        node.association_list("3N...").await.unwrap();

        let paths: Vec<String> = node
            .transport
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, path, _)| path.clone())
            .collect();
        assert_eq!(
            paths,
            vec![
                "/addresses/balance/3N...",
                "/blocks/height",
                "/leasing/active/3N...",
                "/sponsorship/status/3N...",
                "/associations/status/3N...",
            ]
        );
    }

    #[tokio::test]
    async fn compile_script_strips_prefix() {
        let node = node(vec![(200, json!({ "script": "base64:AQID", "complexity": 1 }))]);
        let script = node.compile_script("true").await.unwrap();
        assert_eq!(script, vec![1, 2, 3]);
        let requests = node.transport.requests.lock().unwrap();
        assert_eq!(requests[0].1, "/utils/script/compile");
        assert_eq!(requests[0].2.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn missing_field_is_malformed() {
        let node = node(vec![(200, json!({ "nothing": true }))]);
        assert!(matches!(node.height().await, Err(NodeError::Malformed(_))));
    }

    #[tokio::test]
    async fn transactions_page_path() {
        let node = node(vec![(200, json!([[]]))]);
        node.transactions("3N...", 50, Some("xyz")).await.unwrap();
        let requests = node.transport.requests.lock().unwrap();
        assert_eq!(requests[0].1, "/transactions/address/3N.../limit/50?after=xyz");
    }
}
