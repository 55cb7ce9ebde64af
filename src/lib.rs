#![deny(clippy::expect_used, clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

//! Lifecycle dispatch for held-open (long-poll, streaming, push) connections.
//! 保持连接（长轮询、流式、推送）的生命周期分发库的根。
//!
//! A [`LifecycleDispatcher`] is bound to one [`Connection`]. Each
//! [`TransitionEvent`] it receives is routed to exactly one callback of a
//! [`TypedHandler`], or to none, and the post-dispatch hook runs afterwards
//! in every case.

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod handler;

mod testing;

pub use connection::{Connection, ConnectionId, OutputSink, Phase, SinkReceiver};
pub use dispatcher::{ConnectionHandler, DispatchOutcome, LifecycleDispatcher, PostDispatchHook};
pub use error::{Error, Result};
pub use event::{Classification, Payload, Transition, TransitionEvent, TransitionFlags};
pub use handler::TypedHandler;
