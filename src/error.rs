//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::connection::{ConnectionId, Phase};
use thiserror::Error;

/// The primary error type for the lifecycle dispatcher.
/// 生命周期分发器的主要错误类型。
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying I/O error occurred inside a callback.
    /// 回调中发生了底层的I/O错误。
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The event concerns a connection other than the one the dispatcher is bound to.
    /// 事件所属的连接与分发器绑定的连接不一致。
    #[error("event for connection {actual} dispatched to handler bound to {expected}")]
    InvalidBinding {
        expected: ConnectionId,
        actual: ConnectionId,
    },

    /// A callback body failed.
    /// 回调执行失败。
    #[error("callback failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The delivered payload is not of the type the handler declared.
    /// 投递的消息载荷与处理器声明的类型不符。
    #[error("payload type mismatch: expected `{expected}`, found `{found}`")]
    PayloadTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The output sink has been closed and can no longer be written to.
    /// 输出通道已关闭，无法再写入。
    #[error("output sink is closed")]
    SinkClosed,

    /// The runtime attempted a phase change the connection state machine forbids.
    /// 运行时尝试了连接状态机不允许的阶段转换。
    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// The post-dispatch hook failed. This is a configuration error and is never retried.
    /// 分发后钩子失败。这是配置错误，不会重试。
    #[error("post-dispatch hook failed: {0}")]
    PostDispatch(#[source] Box<Error>),
}

impl Error {
    /// Wraps an arbitrary error raised by a callback body.
    /// 包装回调体抛出的任意错误。
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Callback(err.into())
    }
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;
        match err {
            Error::Io(e) => e,
            Error::InvalidBinding { .. } => std::io::Error::new(ErrorKind::InvalidInput, err),
            Error::Callback(e) => std::io::Error::other(e),
            Error::PayloadTypeMismatch { .. } => std::io::Error::new(ErrorKind::InvalidData, err),
            Error::SinkClosed => ErrorKind::BrokenPipe.into(),
            Error::InvalidTransition { .. } => std::io::Error::new(ErrorKind::InvalidInput, err),
            Error::PostDispatch(_) => std::io::Error::other(err),
        }
    }
}
