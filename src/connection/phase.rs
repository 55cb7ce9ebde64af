//! 连接阶段状态机
//! Connection phase state machine
//!
//! 阶段由外部运行时独占修改，分发器只读取它。
//!
//! Phases are mutated exclusively by the surrounding runtime; the dispatcher
//! only ever reads them.

use std::fmt;

/// The phase of a held-open connection.
/// 保持连接的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// The connection is under normal application control.
    /// 连接处于正常的应用控制下。
    Active = 0,

    /// The connection is held open waiting for future data.
    /// 连接保持打开，等待后续数据。
    Suspended = 1,

    /// The connection is leaving `Suspended` under application control.
    /// 连接在应用控制下离开 `Suspended`。
    Resuming = 2,

    /// The connection left `Suspended` because its inactivity deadline passed.
    /// 连接因不活动超时而离开 `Suspended`。
    TimedOut = 3,

    /// The peer disconnected or the runtime tore the connection down.
    /// 对端断开或运行时拆除了连接。
    Cancelled = 4,
}

impl Phase {
    pub(crate) fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Phase::Active),
            1 => Some(Phase::Suspended),
            2 => Some(Phase::Resuming),
            3 => Some(Phase::TimedOut),
            4 => Some(Phase::Cancelled),
            _ => None,
        }
    }

    /// 获取阶段名称
    /// Gets the phase name
    pub fn name(self) -> &'static str {
        match self {
            Phase::Active => "Active",
            Phase::Suspended => "Suspended",
            Phase::Resuming => "Resuming",
            Phase::TimedOut => "TimedOut",
            Phase::Cancelled => "Cancelled",
        }
    }

    /// No further phase change leaves a terminal phase.
    /// 终止阶段之后不再有阶段转换。
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::TimedOut | Phase::Cancelled)
    }

    /// 验证阶段转换是否合法
    /// Validates whether a phase transition is legal
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;

        match (self, next) {
            // 终止阶段不能离开
            // Terminal phases cannot be left
            (TimedOut | Cancelled, other) => self == other,

            // 任何活跃阶段都可以被取消
            // Any live phase can be cancelled
            (_, Cancelled) => true,

            (Active, Suspended) => true,
            (Suspended, Resuming) => true,
            (Suspended, TimedOut) => true,
            (Resuming, Active) => true,
            (Resuming, Suspended) => true,

            // 同阶段转换（幂等）
            // Same phase transition (idempotent)
            (a, b) if a == b => true,

            _ => false,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_round_trip_and_unknown() {
        for phase in [
            Phase::Active,
            Phase::Suspended,
            Phase::Resuming,
            Phase::TimedOut,
            Phase::Cancelled,
        ] {
            assert_eq!(Phase::from_u8(phase as u8), Some(phase));
        }
        assert_eq!(Phase::from_u8(5), None);
    }

    #[test]
    fn test_legal_transitions() {
        assert!(Phase::Active.can_transition_to(Phase::Suspended));
        assert!(Phase::Suspended.can_transition_to(Phase::Resuming));
        assert!(Phase::Suspended.can_transition_to(Phase::TimedOut));
        assert!(Phase::Suspended.can_transition_to(Phase::Cancelled));
        assert!(Phase::Resuming.can_transition_to(Phase::Active));
        assert!(Phase::Resuming.can_transition_to(Phase::Suspended));
        assert!(Phase::Active.can_transition_to(Phase::Cancelled));
        assert!(Phase::Suspended.can_transition_to(Phase::Suspended));
        assert!(Phase::Cancelled.can_transition_to(Phase::Cancelled));
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!Phase::Active.can_transition_to(Phase::Resuming));
        assert!(!Phase::Active.can_transition_to(Phase::TimedOut));
        assert!(!Phase::Resuming.can_transition_to(Phase::TimedOut));
        assert!(!Phase::TimedOut.can_transition_to(Phase::Cancelled));
        assert!(!Phase::Cancelled.can_transition_to(Phase::Active));
        assert!(!Phase::TimedOut.can_transition_to(Phase::Suspended));
    }

    #[test]
    fn test_terminal() {
        assert!(Phase::TimedOut.is_terminal());
        assert!(Phase::Cancelled.is_terminal());
        assert!(!Phase::Suspended.is_terminal());
        assert_eq!(Phase::Resuming.to_string(), "Resuming");
    }
}
