//! tests/common/harness.rs
use async_trait::async_trait;
use bytes::Bytes;
use holdline::{
    Connection, LifecycleDispatcher, OutputSink, Payload, Phase, Result, SinkReceiver,
    Transition, TransitionEvent, TypedHandler,
    config::Config,
    dispatcher::{CloseOnTerminalHook, HookChain, PostDispatchHook, TracingHook},
};
use std::sync::{Arc, Once};

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "holdline=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .init();
    });
}

/// A chat line pushed by a publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub from: String,
    pub text: String,
}

impl ChatLine {
    pub fn new(from: &str, text: &str) -> Self {
        Self {
            from: from.to_string(),
            text: text.to_string(),
        }
    }
}

/// A long-poll chat handler that renders every transition onto the sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatHandler;

#[async_trait]
impl TypedHandler for ChatHandler {
    type Message = ChatLine;

    async fn on_message(&self, sink: &OutputSink, line: Arc<ChatLine>) -> Result<()> {
        sink.write(format!("{}: {}", line.from, line.text)).await
    }

    async fn on_resume(&self, sink: &OutputSink) -> Result<()> {
        sink.write("event: resumed").await
    }

    async fn on_timeout(&self, sink: &OutputSink) -> Result<()> {
        sink.write("event: timeout").await
    }
}

pub type ChatHook = HookChain<CloseOnTerminalHook, TracingHook>;

/// Plays the role of the surrounding runtime for one connection: it owns the
/// phase changes and feeds each one to the dispatcher.
pub struct Session<H: TypedHandler, P: PostDispatchHook> {
    pub connection: Arc<Connection>,
    pub rx: SinkReceiver,
    pub dispatcher: LifecycleDispatcher<H, P>,
}

impl Session<ChatHandler, ChatHook> {
    pub fn chat(config: &Config) -> Self {
        Session::new(config, ChatHandler, CloseOnTerminalHook.then(TracingHook))
    }
}

impl<H: TypedHandler, P: PostDispatchHook> Session<H, P> {
    pub fn new(config: &Config, handler: H, hook: P) -> Self {
        init_tracing();
        let (connection, rx) = Connection::new(&config.connection);
        let connection = Arc::new(connection);
        let dispatcher = LifecycleDispatcher::new(Arc::clone(&connection), handler)
            .with_hook(hook)
            .with_config(config.dispatch.clone());
        Self {
            connection,
            rx,
            dispatcher,
        }
    }

    /// Moves the connection to `next` and dispatches the resulting transition.
    pub async fn advance(&self, next: Phase) -> Result<()> {
        let from = self.connection.transition_to(next)?;
        let transition = Transition::from_phase_change(from, next, None);
        self.dispatcher
            .dispatch(TransitionEvent::new(&self.connection, transition))
            .await
    }

    /// Delivers a published payload to the suspended connection.
    pub async fn publish(&self, payload: Payload) -> Result<()> {
        self.dispatcher
            .dispatch(TransitionEvent::new(
                &self.connection,
                Transition::message(payload),
            ))
            .await
    }

    /// Drains everything the callbacks have written so far.
    pub fn drain(&mut self) -> Vec<Bytes> {
        let mut out = Vec::new();
        while let Ok(chunk) = self.rx.try_recv() {
            out.push(chunk);
        }
        out
    }
}
