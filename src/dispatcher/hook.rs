//! 分发后钩子 - 每次分发结束后无条件运行
//! Post-dispatch hooks - run unconditionally after every dispatch

use crate::{connection::Connection, error::Result, event::Classification};
use async_trait::async_trait;
use tracing::{debug, info};

/// What a single dispatch did, as reported to the post-dispatch hook.
/// 单次分发的结果，报告给分发后钩子。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub classification: Classification,
    pub callback_failed: bool,
}

impl DispatchOutcome {
    /// A timed-out or cancelled transition has been dispatched.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.classification,
            Classification::TimedOut | Classification::Cancelled
        )
    }
}

/// Runs exactly once after every dispatch, whether a callback fired, failed,
/// or nothing matched. A failing hook is fatal for that dispatch.
///
/// 每次分发之后恰好运行一次，无论回调是否触发或失败。钩子失败是致命的。
#[async_trait]
pub trait PostDispatchHook: Send + Sync + 'static {
    async fn post_dispatch(&self, connection: &Connection, outcome: &DispatchOutcome) -> Result<()>;

    /// Runs `self`, then `next`.
    /// 先运行 `self`，再运行 `next`。
    fn then<N: PostDispatchHook>(self, next: N) -> HookChain<Self, N>
    where
        Self: Sized,
    {
        HookChain { first: self, second: next }
    }
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

#[async_trait]
impl PostDispatchHook for NoopHook {
    async fn post_dispatch(&self, _connection: &Connection, _outcome: &DispatchOutcome) -> Result<()> {
        Ok(())
    }
}

/// Logs every completed dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

#[async_trait]
impl PostDispatchHook for TracingHook {
    async fn post_dispatch(&self, connection: &Connection, outcome: &DispatchOutcome) -> Result<()> {
        if outcome.is_terminal() {
            info!(
                cid = %connection.id(),
                kind = ?outcome.classification,
                callback_failed = outcome.callback_failed,
                "Connection reached end of life"
            );
        } else {
            debug!(
                cid = %connection.id(),
                kind = ?outcome.classification,
                callback_failed = outcome.callback_failed,
                "Dispatch completed"
            );
        }
        Ok(())
    }
}

/// Closes the connection's output sink once a timed-out or cancelled
/// transition has been dispatched, so the transport side sees end-of-stream
/// even when the callback failed.
///
/// 超时或取消转换分发后关闭输出通道，即使回调失败传输端也能看到流结束。
#[derive(Debug, Clone, Copy, Default)]
pub struct CloseOnTerminalHook;

#[async_trait]
impl PostDispatchHook for CloseOnTerminalHook {
    async fn post_dispatch(&self, connection: &Connection, outcome: &DispatchOutcome) -> Result<()> {
        if outcome.is_terminal() {
            connection.output_sink().close();
        }
        Ok(())
    }
}

/// Two hooks run in order. The first failure short-circuits.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookChain<A, B> {
    first: A,
    second: B,
}

#[async_trait]
impl<A: PostDispatchHook, B: PostDispatchHook> PostDispatchHook for HookChain<A, B> {
    async fn post_dispatch(&self, connection: &Connection, outcome: &DispatchOutcome) -> Result<()> {
        self.first.post_dispatch(connection, outcome).await?;
        self.second.post_dispatch(connection, outcome).await
    }
}
