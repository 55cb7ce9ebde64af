//! 定义了连接和分发器的可配置参数。
//! Defines configurable parameters for connections and the dispatcher.

/// A structure containing all configurable parameters.
///
/// 包含所有可配置参数的结构体。
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Connection and sink-related parameters.
    /// 连接和输出通道相关参数。
    pub connection: ConnectionConfig,

    /// Dispatcher-related parameters.
    /// 分发器相关参数。
    pub dispatch: DispatchConfig,
}

/// Connection and sink-related parameters.
///
/// 连接和输出通道相关参数。
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// The number of chunks the output sink can hold before a write waits
    /// for the transport side to drain it.
    ///
    /// 输出通道在写入等待传输端消费之前可容纳的数据块数量。
    pub sink_capacity: usize,
}

/// Dispatcher-related parameters.
///
/// 分发器相关参数。
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Log transitions that match no callback at debug level.
    /// 以 debug 级别记录未匹配任何回调的状态转换。
    pub trace_unclassified: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { sink_capacity: 64 }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            trace_unclassified: true,
        }
    }
}
