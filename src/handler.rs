//! 类型化处理器 - 应用实现的四个回调
//! Typed handler - the four callbacks an application implements

use crate::{
    connection::OutputSink,
    error::Result,
    event::Payload,
};
use async_trait::async_trait;
use std::sync::Arc;

/// The callbacks a lifecycle dispatcher routes transitions to.
///
/// Only [`TypedHandler::on_message`] is required; the other callbacks default
/// to doing nothing. Every callback may write to the sink and may fail.
///
/// 生命周期分发器将转换路由到的回调。只有 `on_message` 是必需的，
/// 其余回调默认不做任何事。
#[async_trait]
pub trait TypedHandler: Send + Sync + 'static {
    /// The payload type this handler agreed on with its publishers.
    /// 该处理器与发布者约定的载荷类型。
    type Message: Send + Sync + 'static;

    /// Narrows a delivered payload to [`TypedHandler::Message`].
    ///
    /// The default shares the publisher's allocation and fails with
    /// `PayloadTypeMismatch` when the publisher sent something else.
    ///
    /// 将投递的载荷收窄为 `Message`。类型不符时返回 `PayloadTypeMismatch`。
    fn decode(&self, payload: &Payload) -> Result<Arc<Self::Message>> {
        payload.downcast::<Self::Message>()
    }

    /// Invoked once per delivered message.
    /// 每条投递的消息调用一次。
    async fn on_message(&self, sink: &OutputSink, message: Arc<Self::Message>) -> Result<()>;

    /// Invoked while a suspended connection is being resumed.
    /// 挂起的连接恢复时调用。
    async fn on_resume(&self, _sink: &OutputSink) -> Result<()> {
        Ok(())
    }

    /// Invoked when a suspended connection hits its inactivity deadline.
    /// 挂起的连接超时时调用。
    async fn on_timeout(&self, _sink: &OutputSink) -> Result<()> {
        Ok(())
    }

    /// Invoked when the peer disconnected or the runtime tore the connection down.
    /// Not every transport can detect a silent peer.
    ///
    /// 对端断开或连接被拆除时调用。
    async fn on_disconnect(&self, _sink: &OutputSink) -> Result<()> {
        Ok(())
    }
}
