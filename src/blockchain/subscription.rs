//! Adapts a `newHeads` subscription into a stream of [`SubscriptionEvent`]s.

use alloy::pubsub::Subscription;
use alloy::rpc::types::Header;
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::blockchain::types::{BlockHeader, SubscriptionEvent};

/// Stream of header and error events for the watcher loop.
pub type HeadStream = BoxStream<'static, SubscriptionEvent>;

impl From<&Header> for BlockHeader {
    fn from(header: &Header) -> Self {
        Self {
            number: header.inner.number,
        }
    }
}

/// A receiver of block headers with broadcast channel semantics.
#[async_trait]
pub trait HeaderSource: Send + 'static {
    async fn recv_header(&mut self) -> Result<BlockHeader, RecvError>;
}

#[async_trait]
impl HeaderSource for Subscription<Header> {
    async fn recv_header(&mut self) -> Result<BlockHeader, RecvError> {
        self.recv().await.map(|header| BlockHeader::from(&header))
    }
}

#[async_trait]
impl HeaderSource for broadcast::Receiver<BlockHeader> {
    async fn recv_header(&mut self) -> Result<BlockHeader, RecvError> {
        self.recv().await
    }
}

/// Wrap a header source.
///
/// A lagged receiver yields an error event and keeps going. A closed
/// source yields one final error event and then ends the stream.
pub fn head_events<S: HeaderSource>(source: S) -> HeadStream {
    stream::unfold(Some(source), |state| async move {
        let Some(mut source) = state else {
            return None;
        };
        match source.recv_header().await {
            Ok(header) => Some((SubscriptionEvent::Header(header), Some(source))),
            Err(RecvError::Lagged(skipped)) => Some((
                SubscriptionEvent::Error(format!("subscription lagged, {} headers dropped", skipped)),
                Some(source),
            )),
            Err(RecvError::Closed) => Some((
                SubscriptionEvent::Error("subscription closed by transport".to_string()),
                None,
            )),
        }
    })
    .boxed()
}
