use serde::Serialize;
use std::fmt;

/// Lifecycle of a time session.
///
/// ```text
/// OPEN ──► CLOSED ──► APPROVED ──► PAID
///   ▲        │  └──────────────────▲
///   └────────┘ (editor clears clock_out)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Open,
    Closed,
    Approved,
    Paid,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Open,
        SessionStatus::Closed,
        SessionStatus::Approved,
        SessionStatus::Paid,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "OPEN",
            SessionStatus::Closed => "CLOSED",
            SessionStatus::Approved => "APPROVED",
            SessionStatus::Paid => "PAID",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(SessionStatus::Open),
            "CLOSED" => Some(SessionStatus::Closed),
            "APPROVED" => Some(SessionStatus::Approved),
            "PAID" => Some(SessionStatus::Paid),
            _ => None,
        }
    }

    /// Helper: parse user input (any case)
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_db_str(&code.trim().to_uppercase())
    }

    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }

    /// PAID sessions are frozen for every ordinary mutation path.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Paid)
    }

    /// Statuses from which `target` is directly reachable.
    pub fn sources_of(target: SessionStatus) -> Vec<SessionStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| can_transition(*from, target))
            .collect()
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// The single transition table every mutating path consults.
///
/// APPROVED is optional on the way to PAID; CLOSED → OPEN is the only
/// backwards edge.
pub fn can_transition(from: SessionStatus, to: SessionStatus) -> bool {
    use SessionStatus::*;
    matches!(
        (from, to),
        (Open, Closed) | (Closed, Open) | (Closed, Approved) | (Closed, Paid) | (Approved, Paid)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_is_a_sink() {
        for to in SessionStatus::ALL {
            assert!(!can_transition(SessionStatus::Paid, to));
        }
    }

    #[test]
    fn no_skipping_except_closed_to_paid() {
        assert!(!can_transition(SessionStatus::Open, SessionStatus::Approved));
        assert!(!can_transition(SessionStatus::Open, SessionStatus::Paid));
        assert!(!can_transition(SessionStatus::Approved, SessionStatus::Open));
        assert!(can_transition(SessionStatus::Closed, SessionStatus::Paid));
    }

    #[test]
    fn payable_sources() {
        assert_eq!(
            SessionStatus::sources_of(SessionStatus::Paid),
            vec![SessionStatus::Closed, SessionStatus::Approved]
        );
    }
}
