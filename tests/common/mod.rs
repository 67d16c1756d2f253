//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use deposit_tracker::blockchain::{
    Block, ChainError, ChainResult, ChainSource, Transaction, TransactionReceipt,
};
use deposit_tracker::notify::{Notifier, NotifyOutcome};
use deposit_tracker::observability::json_layer;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;

pub const WATCHED: &str = "0x00000000219ab540356cBB839Cbe05303d7705Fa";

pub fn watched() -> Address {
    WATCHED.parse().unwrap()
}

pub fn tx(hash_byte: u8, to: Option<&str>, gas_price: u128, block_number: u64) -> Transaction {
    Transaction {
        hash: TxHash::repeat_byte(hash_byte),
        from: Address::repeat_byte(0xee),
        to: to.map(|s| s.parse().unwrap()),
        gas_price,
        block_number: Some(block_number),
    }
}

/// In-memory chain with injectable failures.
#[derive(Default)]
pub struct MockChain {
    blocks: Mutex<HashMap<u64, Block>>,
    receipts: Mutex<HashMap<TxHash, TransactionReceipt>>,
    failing_blocks: Mutex<HashSet<u64>>,
}

impl MockChain {
    pub fn with_block(self, number: u64, timestamp: u64, transactions: Vec<Transaction>) -> Self {
        self.blocks.lock().unwrap().insert(
            number,
            Block {
                number,
                timestamp,
                transactions,
            },
        );
        self
    }

    pub fn with_receipt(self, hash: TxHash, gas_used: u64) -> Self {
        self.receipts.lock().unwrap().insert(
            hash,
            TransactionReceipt { gas_used },
        );
        self
    }

    pub fn failing_block(self, number: u64) -> Self {
        self.failing_blocks.lock().unwrap().insert(number);
        self
    }
}

#[async_trait]
impl ChainSource for MockChain {
    async fn block_with_transactions(&self, number: u64) -> ChainResult<Block> {
        if self.failing_blocks.lock().unwrap().contains(&number) {
            return Err(ChainError::Rpc("connection reset".to_string()));
        }
        self.blocks
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or(ChainError::BlockNotFound(number))
    }

    async fn transaction_receipt(&self, hash: TxHash) -> ChainResult<TransactionReceipt> {
        self.receipts
            .lock()
            .unwrap()
            .get(&hash)
            .copied()
            .ok_or(ChainError::ReceiptNotFound(hash))
    }

    async fn block_timestamp(&self, number: u64) -> ChainResult<u64> {
        self.blocks
            .lock()
            .unwrap()
            .get(&number)
            .map(|b| b.timestamp)
            .ok_or(ChainError::BlockNotFound(number))
    }
}

/// Notifier that records every message and answers with a fixed outcome.
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    outcome: NotifyOutcome,
}

impl RecordingNotifier {
    pub fn new(outcome: NotifyOutcome) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            outcome,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new(NotifyOutcome::Delivered)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> NotifyOutcome {
        self.messages.lock().unwrap().push(message.to_string());
        self.outcome.clone()
    }
}

/// Notifier whose delivery never completes, like a POST to a hung server.
#[derive(Default)]
pub struct StalledNotifier {
    calls: Mutex<usize>,
}

impl StalledNotifier {
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for StalledNotifier {
    async fn notify(&self, _message: &str) -> NotifyOutcome {
        *self.calls.lock().unwrap() += 1;
        std::future::pending().await
    }
}

/// Captures JSON log records for the current thread.
///
/// Use with the default current-thread `#[tokio::test]` runtime so spawned
/// tasks log through the same subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let buf = self.0.clone();
        let subscriber =
            tracing_subscriber::registry().with(json_layer(move || CaptureWriter(buf.clone())));
        tracing::subscriber::set_default(subscriber)
    }

    pub fn records(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    /// Records whose message starts with `prefix`, optionally filtered by level.
    pub fn matching(&self, level: &str, prefix: &str) -> Vec<serde_json::Value> {
        self.records()
            .into_iter()
            .filter(|r| r["level"] == level)
            .filter(|r| {
                r["fields"]["message"]
                    .as_str()
                    .is_some_and(|m| m.starts_with(prefix))
            })
            .collect()
    }
}

/// Start a mock Bot API that answers every request with `status` and `body`.
///
/// Returns the base URL and the captured request bodies.
pub async fn start_telegram_backend(
    status: u16,
    body: &'static str,
) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let captured = captured.clone();
                    tokio::spawn(async move {
                        let request_body = read_request_body(&mut socket).await;
                        captured.lock().unwrap().push(request_body);

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (format!("http://{}", addr), requests)
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return String::new();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf[header_end..]).into_owned()
}
