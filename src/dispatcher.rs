//! 生命周期分发器 - 将每个转换事件路由到唯一的回调
//! Lifecycle Dispatcher - Routes each transition event to exactly one callback
//!
//! 分发器绑定到单个连接。对于每个事件，它最多调用一个类型化回调，
//! 然后无条件运行分发后钩子，最后再传播回调的错误。分发器本身不做 I/O，
//! 也不保存跨调用的状态。
//!
//! A dispatcher is bound to one connection. For each event it invokes at most
//! one typed callback, then runs the post-dispatch hook unconditionally, and
//! only then propagates a callback failure. The dispatcher performs no I/O of
//! its own and keeps no state between calls.
//!
//! Events for one connection must be dispatched one at a time; the caller is
//! responsible for that ordering.

pub mod hook;
pub mod runtime;


pub use hook::{
    CloseOnTerminalHook, DispatchOutcome, HookChain, NoopHook, PostDispatchHook, TracingHook,
};
pub use runtime::ConnectionHandler;

use crate::{
    config::DispatchConfig,
    connection::Connection,
    error::{Error, Result},
    event::{Transition, TransitionEvent},
    handler::TypedHandler,
};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Routes transitions of one connection to a [`TypedHandler`].
///
/// 将单个连接的转换路由到 [`TypedHandler`]。
pub struct LifecycleDispatcher<H, P = NoopHook> {
    connection: Arc<Connection>,
    handler: H,
    hook: P,
    config: DispatchConfig,
}

impl<H, P> std::fmt::Debug for LifecycleDispatcher<H, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleDispatcher")
            .field("connection", &self.connection.id())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<H: TypedHandler> LifecycleDispatcher<H> {
    /// Binds `handler` to `connection` with no post-dispatch hook.
    /// 将处理器绑定到连接，不带分发后钩子。
    pub fn new(connection: Arc<Connection>, handler: H) -> Self {
        Self {
            connection,
            handler,
            hook: NoopHook,
            config: DispatchConfig::default(),
        }
    }
}

impl<H: TypedHandler, P: PostDispatchHook> LifecycleDispatcher<H, P> {
    /// Replaces the post-dispatch hook.
    /// 替换分发后钩子。
    pub fn with_hook<Q: PostDispatchHook>(self, hook: Q) -> LifecycleDispatcher<H, Q> {
        LifecycleDispatcher {
            connection: self.connection,
            handler: self.handler,
            hook,
            config: self.config,
        }
    }

    /// Replaces the dispatcher configuration.
    /// 替换分发器配置。
    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// The connection this dispatcher is bound to.
    /// 分发器绑定的连接。
    pub fn connection(&self) -> &Arc<Connection> {
        &self.connection
    }

    /// The typed handler callbacks are routed to.
    /// 回调被路由到的类型化处理器。
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// 分发一个转换事件
    /// Dispatches one transition event
    ///
    /// Fails with `InvalidBinding`, before any callback or hook runs, if the
    /// event concerns another connection. Otherwise the post-dispatch hook has
    /// always run by the time this returns. A hook failure is returned as
    /// `PostDispatch` and takes precedence over a callback failure.
    pub async fn dispatch(&self, event: TransitionEvent<'_>) -> Result<()> {
        let actual = event.connection().id();
        let expected = self.connection.id();
        // Runtime-assigned ids may collide; the bound allocation is the identity.
        if !std::ptr::eq(event.connection(), Arc::as_ptr(&self.connection)) {
            warn!(cid = %expected, foreign = %actual, "Event bound to a foreign connection");
            return Err(Error::InvalidBinding { expected, actual });
        }

        let classification = event.classification();
        trace!(cid = %expected, kind = ?classification, "Dispatching transition");

        let result = self.route(event.into_transition()).await;
        if let Err(err) = &result {
            debug!(cid = %expected, kind = ?classification, error = %err, "Callback failed");
        }

        let outcome = DispatchOutcome {
            classification,
            callback_failed: result.is_err(),
        };
        if let Err(hook_err) = self.hook.post_dispatch(&self.connection, &outcome).await {
            error!(
                cid = %expected,
                kind = ?classification,
                error = %hook_err,
                "Post-dispatch hook failed"
            );
            if let Err(callback_err) = result {
                error!(cid = %expected, error = %callback_err, "Callback failure superseded by hook failure");
            }
            return Err(Error::PostDispatch(Box::new(hook_err)));
        }

        result
    }

    async fn route(&self, transition: Transition) -> Result<()> {
        let sink = self.connection.output_sink();
        match transition {
            Transition::Message(payload) => {
                let message = self.handler.decode(&payload)?;
                self.handler.on_message(sink, message).await
            }
            Transition::Resuming => self.handler.on_resume(sink).await,
            Transition::TimedOut => self.handler.on_timeout(sink).await,
            Transition::Cancelled => self.handler.on_disconnect(sink).await,
            Transition::Unclassified => {
                if self.config.trace_unclassified {
                    debug!(
                        cid = %self.connection.id(),
                        phase = %self.connection.phase(),
                        "Ignoring unclassified transition"
                    );
                }
                Ok(())
            }
        }
    }
}
