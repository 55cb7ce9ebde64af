//! 运行时适配 - 外部运行时期望的更宽的处理器接口
//! Runtime adapter - the broader handler contract a surrounding runtime expects

use super::{LifecycleDispatcher, PostDispatchHook};
use crate::{
    connection::Connection,
    error::Result,
    event::TransitionEvent,
    handler::TypedHandler,
};
use async_trait::async_trait;
use tracing::trace;

/// The handler contract a connection runtime drives: it announces new
/// connections, feeds transitions, and tears handlers down.
///
/// 连接运行时驱动的处理器接口：通知新连接、投递转换、拆除处理器。
#[async_trait]
pub trait ConnectionHandler: Send + Sync {
    async fn on_new_connection(&self, connection: &Connection) -> Result<()>;

    async fn dispatch(&self, event: TransitionEvent<'_>) -> Result<()>;

    async fn on_teardown(&self);
}

/// New connections and teardown need no work from a lifecycle dispatcher;
/// both are empty.
#[async_trait]
impl<H: TypedHandler, P: PostDispatchHook> ConnectionHandler for LifecycleDispatcher<H, P> {
    async fn on_new_connection(&self, connection: &Connection) -> Result<()> {
        trace!(cid = %connection.id(), "New connection accepted");
        Ok(())
    }

    async fn dispatch(&self, event: TransitionEvent<'_>) -> Result<()> {
        LifecycleDispatcher::dispatch(self, event).await
    }

    async fn on_teardown(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ConnectionConfig,
        connection::Phase,
        event::{Payload, Transition},
        testing::{Call, CountingHook, RecordingHandler},
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runtime_drives_dispatcher_through_trait_object() {
        let (conn, _rx) = Connection::new(&ConnectionConfig::default());
        let conn = Arc::new(conn);
        let handler = RecordingHandler::<String>::new();
        let hook = CountingHook::default();

        let runtime: Box<dyn ConnectionHandler> = Box::new(
            LifecycleDispatcher::new(Arc::clone(&conn), handler.clone()).with_hook(hook.clone()),
        );

        runtime.on_new_connection(&conn).await.unwrap();
        assert_eq!(handler.call_count(), 0);
        assert_eq!(hook.calls(), 0);

        conn.transition_to(Phase::Suspended).unwrap();
        runtime
            .dispatch(TransitionEvent::new(
                &conn,
                Transition::message(Payload::new(String::from("tick"))),
            ))
            .await
            .unwrap();

        runtime.on_teardown().await;

        assert_eq!(
            handler.calls(),
            vec![Call::Message(Arc::new(String::from("tick")))]
        );
        assert_eq!(hook.calls(), 1);
    }
}
