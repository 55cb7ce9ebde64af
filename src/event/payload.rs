//! 不透明的消息载荷
//! Opaque message payload

use crate::error::{Error, Result};
use std::{
    any::{Any, type_name},
    fmt,
    sync::Arc,
};

/// A message published out-of-band for delivery to a connection.
///
/// The concrete type is agreed between publisher and handler; the payload
/// itself carries it only as a runtime type, recovered with [`Payload::downcast`].
///
/// 由外部发布者投递给连接的消息。具体类型由发布者与处理器约定。
#[derive(Clone)]
pub struct Payload {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without copying it.
    /// 包装已共享的值而不复制。
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }

    /// The type name the publisher used.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Narrows the payload to `T`, sharing the publisher's allocation.
    ///
    /// 将载荷收窄为 `T`，与发布者共享同一分配。
    pub fn downcast<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        Arc::clone(&self.value)
            .downcast::<T>()
            .map_err(|_| Error::PayloadTypeMismatch {
                expected: type_name::<T>(),
                found: self.type_name,
            })
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
