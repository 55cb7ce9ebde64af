//! 状态转换事件 - 描述一次连接生命周期变化的不可变快照
//! Transition events - immutable snapshots of one connection lifecycle change
//!
//! 每个事件的分类在构造时确定一次，之后不会根据连接的实时阶段重新推导。
//!
//! Each event is classified exactly once, at construction. Dispatch never
//! re-derives the classification from the connection's live phase.

pub mod payload;

pub use payload::Payload;

use crate::connection::{Connection, Phase};

/// What happened to a connection.
///
/// 连接上发生了什么。
#[derive(Debug, Clone)]
pub enum Transition {
    /// A publisher delivered a payload.
    /// 发布者投递了消息。
    Message(Payload),

    /// The connection is leaving `Suspended` under application control.
    /// 连接在应用控制下恢复。
    Resuming,

    /// The connection left `Suspended` because its inactivity deadline passed.
    /// 连接因不活动而超时。
    TimedOut,

    /// The peer disconnected or the runtime tore the connection down.
    /// 对端断开或连接被拆除。
    Cancelled,

    /// A transition no callback cares about, such as the first activation of
    /// a fresh connection.
    /// 没有回调关心的转换。
    Unclassified,
}

/// The payload-free tag of a [`Transition`].
/// [`Transition`] 的无载荷标签。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    MessageDelivered,
    Resuming,
    TimedOut,
    Cancelled,
    Unclassified,
}

impl Transition {
    pub fn message(payload: Payload) -> Self {
        Transition::Message(payload)
    }

    pub fn classification(&self) -> Classification {
        match self {
            Transition::Message(_) => Classification::MessageDelivered,
            Transition::Resuming => Classification::Resuming,
            Transition::TimedOut => Classification::TimedOut,
            Transition::Cancelled => Classification::Cancelled,
            Transition::Unclassified => Classification::Unclassified,
        }
    }

    /// Classifies a phase change performed by the runtime.
    ///
    /// 对运行时执行的阶段变化进行分类。
    pub fn from_phase_change(from: Phase, to: Phase, payload: Option<Payload>) -> Self {
        if let Some(payload) = payload {
            return Transition::Message(payload);
        }
        match (from, to) {
            (Phase::Suspended, Phase::Resuming) => Transition::Resuming,
            (_, Phase::TimedOut) => Transition::TimedOut,
            (_, Phase::Cancelled) => Transition::Cancelled,
            _ => Transition::Unclassified,
        }
    }
}

/// The flag-per-condition shape some runtimes report transitions in.
///
/// A well-formed runtime sets at most one condition. [`TransitionFlags::classify`]
/// still resolves conflicting flags deterministically, in the order
/// message, resuming, timed out, cancelled.
///
/// 部分运行时以"每个条件一个标志"的形式报告转换。
#[derive(Debug, Clone, Default)]
pub struct TransitionFlags {
    pub payload: Option<Payload>,
    pub resuming: bool,
    pub timed_out: bool,
    pub cancelled: bool,
}

impl TransitionFlags {
    /// 按固定优先级解析为单一转换
    /// Resolves to a single transition by fixed priority
    pub fn classify(self) -> Transition {
        if let Some(payload) = self.payload {
            Transition::Message(payload)
        } else if self.resuming {
            Transition::Resuming
        } else if self.timed_out {
            Transition::TimedOut
        } else if self.cancelled {
            Transition::Cancelled
        } else {
            Transition::Unclassified
        }
    }
}

/// One lifecycle occurrence for a connection. Borrows the connection, so it
/// can never outlive it; consumed by dispatch.
///
/// 连接的一次生命周期事件。借用连接，因此不会比连接活得更久。
#[derive(Debug)]
pub struct TransitionEvent<'a> {
    connection: &'a Connection,
    transition: Transition,
}

impl<'a> TransitionEvent<'a> {
    pub fn new(connection: &'a Connection, transition: Transition) -> Self {
        Self {
            connection,
            transition,
        }
    }

    pub fn from_flags(connection: &'a Connection, flags: TransitionFlags) -> Self {
        Self::new(connection, flags.classify())
    }

    pub fn connection(&self) -> &'a Connection {
        self.connection
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn classification(&self) -> Classification {
        self.transition.classification()
    }

    pub(crate) fn into_transition(self) -> Transition {
        self.transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;

    #[test]
    fn test_flags_priority_order() {
        let all = TransitionFlags {
            payload: Some(Payload::new("hello")),
            resuming: true,
            timed_out: true,
            cancelled: true,
        };
        assert_eq!(all.classify().classification(), Classification::MessageDelivered);

        let no_payload = TransitionFlags {
            payload: None,
            resuming: true,
            timed_out: true,
            cancelled: true,
        };
        assert_eq!(no_payload.classify().classification(), Classification::Resuming);

        let timeout_and_cancel = TransitionFlags {
            timed_out: true,
            cancelled: true,
            ..Default::default()
        };
        assert_eq!(
            timeout_and_cancel.classify().classification(),
            Classification::TimedOut
        );

        let cancel = TransitionFlags {
            cancelled: true,
            ..Default::default()
        };
        assert_eq!(cancel.classify().classification(), Classification::Cancelled);

        assert_eq!(
            TransitionFlags::default().classify().classification(),
            Classification::Unclassified
        );
    }

    #[test]
    fn test_from_phase_change() {
        use Phase::*;

        let cases = [
            (Suspended, Resuming, Classification::Resuming),
            (Suspended, TimedOut, Classification::TimedOut),
            (Suspended, Cancelled, Classification::Cancelled),
            (Active, Cancelled, Classification::Cancelled),
            (Active, Suspended, Classification::Unclassified),
            (Resuming, Active, Classification::Unclassified),
        ];
        for (from, to, expected) in cases {
            assert_eq!(
                Transition::from_phase_change(from, to, None).classification(),
                expected,
                "{from} -> {to}"
            );
        }

        let with_payload = Transition::from_phase_change(Suspended, Cancelled, Some(Payload::new(1u8)));
        assert_eq!(with_payload.classification(), Classification::MessageDelivered);
    }

    #[test]
    fn test_classification_is_fixed_at_construction() {
        let (conn, _rx) = Connection::new(&ConnectionConfig::default());
        conn.transition_to(Phase::Suspended).unwrap();

        let event = TransitionEvent::new(&conn, Transition::Resuming);
        conn.transition_to(Phase::Cancelled).unwrap();

        assert_eq!(event.classification(), Classification::Resuming);
        assert_eq!(event.connection().id(), conn.id());
    }
}
