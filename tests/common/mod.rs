//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use course_rewards::ledger::types::{PendingTransaction, RpcError, RpcResult};
use course_rewards::wallet::{AccountInfo, ProviderError};
use course_rewards::{LedgerRpc, TransactionRequest, WalletProvider};

/// Wallet provider that records every call.
pub struct MockWallet {
    address: String,
    pub reject_connect: AtomicBool,
    pub reject_submit: AtomicBool,
    calls: AtomicUsize,
    submitted: Mutex<Vec<TransactionRequest>>,
}

impl MockWallet {
    pub fn new(address: &str) -> Arc<Self> {
        Arc::new(Self {
            address: address.to_string(),
            reject_connect: AtomicBool::new(false),
            reject_submit: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn info(&self) -> AccountInfo {
        AccountInfo {
            address: self.address.clone(),
            public_key: vec![1; 32],
        }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn connect(&self) -> Result<AccountInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_connect.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected("user declined".to_string()));
        }
        Ok(self.info())
    }

    async fn account(&self) -> Result<AccountInfo, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info())
    }

    async fn sign_and_submit_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<PendingTransaction, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_submit.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected("insufficient balance".to_string()));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(PendingTransaction {
            hash: format!("0x{:064x}", submitted.len()),
        })
    }
}

/// How [`MockRpc`] answers finality waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finality {
    Commit,
    Timeout,
    Abort,
}

/// Ledger RPC that records every call.
pub struct MockRpc {
    finality: Mutex<Finality>,
    calls: AtomicUsize,
}

impl MockRpc {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            finality: Mutex::new(Finality::Commit),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_finality(&self, finality: Finality) {
        *self.finality.lock().unwrap() = finality;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerRpc for MockRpc {
    async fn wait_for_transaction(&self, hash: &str) -> RpcResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let finality = *self.finality.lock().unwrap();
        match finality {
            Finality::Commit => Ok(()),
            Finality::Timeout => Err(RpcError::Timeout(20)),
            Finality::Abort => Err(RpcError::TransactionFailed {
                hash: hash.to_string(),
                vm_status: "Move abort in Reward: ENOT_APPROVED".to_string(),
            }),
        }
    }
}

/// Programmable stand-in for a fullnode's REST API.
pub struct MockNode {
    pub chain_id: u8,
    pub sequence_number: u64,
    pub gas_estimate: u64,
    /// `by_hash` answers pending this many times before committing.
    pub pending_polls: usize,
    /// Committed transactions report `success: false` when set.
    pub vm_failure: Option<String>,
    /// Never reports the transaction as committed.
    pub never_commit: bool,
    /// `by_hash` answers with `poll_error_status` this many times first.
    pub failing_polls: usize,
    pub poll_error_status: StatusCode,
    pub signing_message: Vec<u8>,
    pub polls: AtomicUsize,
    pub submissions: Mutex<Vec<Value>>,
    pub encode_requests: Mutex<Vec<Value>>,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            chain_id: 4,
            sequence_number: 7,
            gas_estimate: 100,
            pending_polls: 0,
            vm_failure: None,
            never_commit: false,
            failing_polls: 0,
            poll_error_status: StatusCode::SERVICE_UNAVAILABLE,
            signing_message: b"mock signing message".to_vec(),
            polls: AtomicUsize::new(0),
            submissions: Mutex::new(Vec::new()),
            encode_requests: Mutex::new(Vec::new()),
        }
    }
}

impl MockNode {
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

/// Start `node` on an ephemeral port. Returns its base URL.
pub async fn start_mock_node(node: MockNode) -> (String, Arc<MockNode>) {
    let node = Arc::new(node);
    let app = Router::new()
        .route("/v1", get(ledger_info))
        .route("/v1/accounts/{address}", get(account))
        .route("/v1/estimate_gas_price", get(gas_price))
        .route("/v1/transactions/encode_submission", post(encode_submission))
        .route("/v1/transactions", post(submit))
        .route("/v1/transactions/by_hash/{hash}", get(by_hash))
        .with_state(node.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), node)
}

async fn ledger_info(State(node): State<Arc<MockNode>>) -> Json<Value> {
    Json(json!({
        "chain_id": node.chain_id,
        "epoch": "1",
        "ledger_version": "1000",
        "ledger_timestamp": "1700000000000000",
        "node_role": "full_node"
    }))
}

async fn account(
    State(node): State<Arc<MockNode>>,
    Path(address): Path<String>,
) -> Json<Value> {
    Json(json!({
        "sequence_number": node.sequence_number.to_string(),
        "authentication_key": address
    }))
}

async fn gas_price(State(node): State<Arc<MockNode>>) -> Json<Value> {
    Json(json!({
        "deprioritized_gas_estimate": node.gas_estimate,
        "gas_estimate": node.gas_estimate,
        "prioritized_gas_estimate": node.gas_estimate * 2
    }))
}

async fn encode_submission(
    State(node): State<Arc<MockNode>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    node.encode_requests.lock().unwrap().push(body);
    Json(json!(format!("0x{}", hex::encode(&node.signing_message))))
}

async fn submit(State(node): State<Arc<MockNode>>, Json(body): Json<Value>) -> Response {
    let mut submissions = node.submissions.lock().unwrap();
    submissions.push(body);
    let hash = format!("0x{:064x}", submissions.len());
    (StatusCode::ACCEPTED, Json(json!({ "hash": hash }))).into_response()
}

async fn by_hash(State(node): State<Arc<MockNode>>, Path(hash): Path<String>) -> Response {
    let poll = node.polls.fetch_add(1, Ordering::SeqCst);
    let known = node.submissions.lock().unwrap().len();
    if known == 0 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Transaction not found", "error_code": "transaction_not_found" })),
        )
            .into_response();
    }
    if poll < node.failing_polls {
        return (
            node.poll_error_status,
            Json(json!({ "message": "overloaded", "error_code": "internal_error" })),
        )
            .into_response();
    }
    if node.never_commit || poll < node.failing_polls + node.pending_polls {
        return Json(json!({ "type": "pending_transaction", "hash": hash })).into_response();
    }
    let body = match &node.vm_failure {
        Some(vm_status) => json!({
            "type": "user_transaction",
            "hash": hash,
            "version": "1001",
            "success": false,
            "vm_status": vm_status
        }),
        None => json!({
            "type": "user_transaction",
            "hash": hash,
            "version": "1001",
            "success": true,
            "vm_status": "Executed successfully"
        }),
    };
    Json(body).into_response()
}
