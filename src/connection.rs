//! 保持连接 - 运行时拥有的连接模型
//! Held-open connection - the runtime-owned connection model
//!
//! 连接拥有身份、当前阶段和输出通道。阶段由外部运行时通过
//! [`Connection::transition_to`] 修改；分发器只读取它。
//!
//! A connection owns its identity, current phase, and output sink. The
//! surrounding runtime moves the phase with [`Connection::transition_to`];
//! the dispatcher only reads it.

pub mod phase;
pub mod sink;

pub use phase::Phase;
pub use sink::{OutputSink, SinkReceiver};

use crate::{
    config::ConnectionConfig,
    error::{Error, Result},
};
use std::{
    fmt,
    sync::atomic::{AtomicU8, AtomicU64, Ordering},
};
use tracing::{debug, warn};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a held-open connection. Identities from
/// [`ConnectionId::next`] are unique within the process.
///
/// 保持连接的不透明标识。由 `next` 分配的标识在进程内唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Allocates a fresh identity.
    /// 分配一个新的标识。
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps an identity assigned by the runtime.
    /// 包装由运行时分配的标识。
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identity value.
    /// 原始标识值。
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// One held-open client channel.
///
/// 一个保持打开的客户端通道。
pub struct Connection {
    id: ConnectionId,
    phase: AtomicU8,
    sink: OutputSink,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("sink_closed", &self.sink.is_closed())
            .finish()
    }
}

impl Connection {
    /// Creates an `Active` connection with a freshly allocated identity.
    /// Returns the transport side of its output sink alongside it.
    ///
    /// 创建一个处于 `Active` 阶段的新连接，并返回其输出通道的传输端。
    pub fn new(config: &ConnectionConfig) -> (Self, SinkReceiver) {
        Self::with_id(ConnectionId::next(), config)
    }

    /// Creates an `Active` connection with an identity assigned by the runtime.
    /// 使用运行时分配的标识创建处于 `Active` 阶段的连接。
    pub fn with_id(id: ConnectionId, config: &ConnectionConfig) -> (Self, SinkReceiver) {
        let (sink, rx) = OutputSink::new(id, config.sink_capacity);
        let connection = Self {
            id,
            phase: AtomicU8::new(Phase::Active as u8),
            sink,
        };
        debug!(cid = %id, "Connection created");
        (connection, rx)
    }

    /// 获取连接标识
    /// Gets the connection identity
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// 获取当前阶段
    /// Gets the current phase
    pub fn phase(&self) -> Phase {
        // Only valid discriminants are ever stored.
        Phase::from_u8(self.phase.load(Ordering::Acquire)).unwrap_or(Phase::Cancelled)
    }

    /// 获取输出通道
    /// Gets the output sink
    pub fn output_sink(&self) -> &OutputSink {
        &self.sink
    }

    /// Moves the connection to `next`, returning the phase it left.
    ///
    /// The check and the store happen atomically, so concurrent runtime tasks
    /// racing on the same connection cannot both leave the same phase.
    ///
    /// 将连接移动到 `next` 阶段，返回离开的阶段。检查与写入是原子的。
    pub fn transition_to(&self, next: Phase) -> Result<Phase> {
        let mut current = self.phase();
        loop {
            if !current.can_transition_to(next) {
                warn!(
                    cid = %self.id,
                    from = %current,
                    to = %next,
                    "Invalid phase transition attempted"
                );
                return Err(Error::InvalidTransition {
                    from: current,
                    to: next,
                });
            }

            match self.phase.compare_exchange(
                current as u8,
                next as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if current != next {
                        debug!(cid = %self.id, from = %current, to = %next, "Phase changed");
                    }
                    return Ok(current);
                }
                Err(actual) => {
                    current = Phase::from_u8(actual).unwrap_or(Phase::Cancelled);
                }
            }
        }
    }
}
