//! 输出通道 - 回调向对端写数据的句柄
//! Output sink - the handle callbacks use to write data back to the peer

use super::ConnectionId;
use crate::error::{Error, Result};
use bytes::Bytes;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

/// The transport side of an [`OutputSink`]. Yields every chunk written by
/// callbacks, and `None` once the sink has been closed.
///
/// [`OutputSink`] 的传输端。
pub type SinkReceiver = mpsc::Receiver<Bytes>;

/// A write-capable handle bound to one connection.
///
/// 绑定到单个连接的可写句柄。
#[derive(Debug)]
pub struct OutputSink {
    cid: ConnectionId,
    tx: Mutex<Option<mpsc::Sender<Bytes>>>,
}

impl OutputSink {
    pub(crate) fn new(cid: ConnectionId, capacity: usize) -> (Self, SinkReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let sink = Self {
            cid,
            tx: Mutex::new(Some(tx)),
        };
        (sink, rx)
    }

    /// The connection this sink writes to.
    pub fn connection_id(&self) -> ConnectionId {
        self.cid
    }

    /// Writes one chunk to the peer, waiting if the transport side is behind.
    ///
    /// 向对端写入一个数据块；如果传输端积压则等待。
    pub async fn write(&self, data: impl Into<Bytes>) -> Result<()> {
        let tx = self.sender()?;
        let data = data.into();
        trace!(cid = %self.cid, len = data.len(), "Writing to output sink");
        tx.send(data).await.map_err(|_| Error::SinkClosed)
    }

    /// Closes the sink. The transport side drains what was already written and
    /// then observes end-of-stream. Closing twice is a no-op.
    ///
    /// 关闭输出通道。重复关闭无副作用。
    pub fn close(&self) {
        let mut guard = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            trace!(cid = %self.cid, "Output sink closed");
        }
    }

    /// Whether the sink is closed, either locally or because the transport
    /// side went away.
    pub fn is_closed(&self) -> bool {
        self.sender().map(|tx| tx.is_closed()).unwrap_or(true)
    }

    fn sender(&self) -> Result<mpsc::Sender<Bytes>> {
        let guard = match self.tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().cloned().ok_or(Error::SinkClosed)
    }
}
