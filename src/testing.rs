//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::{
    connection::{Connection, OutputSink},
    dispatcher::{DispatchOutcome, PostDispatchHook},
    error::{Error, Result},
    handler::TypedHandler,
};
use async_trait::async_trait;
use std::{
    marker::PhantomData,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// One recorded callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call<M> {
    Message(Arc<M>),
    Resume,
    Timeout,
    Disconnect,
}

/// A handler that records every callback and can be told to fail one of them.
pub struct RecordingHandler<M> {
    calls: Arc<Mutex<Vec<Call<M>>>>,
    fail_on: Option<&'static str>,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Clone for RecordingHandler<M> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
            fail_on: self.fail_on,
            _marker: PhantomData,
        }
    }
}

impl<M: Send + Sync + 'static> RecordingHandler<M> {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            _marker: PhantomData,
        }
    }

    /// Makes the named callback (`"message"`, `"resume"`, `"timeout"`,
    /// `"disconnect"`) fail after recording itself.
    pub fn failing_on(mut self, callback: &'static str) -> Self {
        self.fail_on = Some(callback);
        self
    }

    pub fn calls(&self) -> Vec<Call<M>>
    where
        M: Clone,
    {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, name: &'static str, call: Call<M>) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_on == Some(name) {
            return Err(Error::callback(format!("{name} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl<M: Send + Sync + 'static> TypedHandler for RecordingHandler<M> {
    type Message = M;

    async fn on_message(&self, _sink: &OutputSink, message: Arc<M>) -> Result<()> {
        self.record("message", Call::Message(message))
    }

    async fn on_resume(&self, _sink: &OutputSink) -> Result<()> {
        self.record("resume", Call::Resume)
    }

    async fn on_timeout(&self, _sink: &OutputSink) -> Result<()> {
        self.record("timeout", Call::Timeout)
    }

    async fn on_disconnect(&self, _sink: &OutputSink) -> Result<()> {
        self.record("disconnect", Call::Disconnect)
    }
}

/// A hook that counts its invocations and keeps the outcomes it saw.
#[derive(Clone, Default)]
pub struct CountingHook {
    calls: Arc<AtomicUsize>,
    outcomes: Arc<Mutex<Vec<DispatchOutcome>>>,
}

impl CountingHook {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn outcomes(&self) -> Vec<DispatchOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostDispatchHook for CountingHook {
    async fn post_dispatch(&self, _connection: &Connection, outcome: &DispatchOutcome) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes.lock().unwrap().push(*outcome);
        Ok(())
    }
}

/// A hook that always fails.
#[derive(Clone, Copy, Default)]
pub struct FailingHook;

#[async_trait]
impl PostDispatchHook for FailingHook {
    async fn post_dispatch(&self, _connection: &Connection, _outcome: &DispatchOutcome) -> Result<()> {
        Err(Error::callback("hook misconfigured"))
    }
}
