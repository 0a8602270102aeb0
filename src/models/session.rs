use super::status::SessionStatus;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSession {
    pub id: String,                    // ⇔ time_sessions.id (uuid v4, TEXT)
    pub tenant_id: i64,                // ⇔ time_sessions.tenant_id
    pub worker_id: String,             // ⇔ time_sessions.worker_id (worker directory key)
    pub shift_id: Option<String>,      // advisory only
    pub clock_in: NaiveDateTime,       // UTC
    pub clock_out: Option<NaiveDateTime>, // UTC, None while OPEN
    pub status: SessionStatus,

    pub duration_minutes: Option<i64>,
    pub hourly_rate: Option<Decimal>,
    pub gross_pay: Option<Decimal>,

    pub clock_in_source: Option<String>,
    pub clock_out_source: Option<String>,
    pub clock_in_ip: Option<String>,
    pub clock_out_ip: Option<String>,

    pub is_manual: bool,
    pub created_by_id: Option<String>,
    pub edited_by_id: Option<String>,
    pub edited_at: Option<NaiveDateTime>,
    pub edit_reason: Option<String>,

    pub notes: Option<String>,
}

impl TimeSession {
    /// A fresh OPEN session with a new id and no snapshot.
    pub fn open(tenant_id: i64, worker_id: &str, clock_in: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id,
            worker_id: worker_id.to_string(),
            shift_id: None,
            clock_in,
            clock_out: None,
            status: SessionStatus::Open,
            duration_minutes: None,
            hourly_rate: None,
            gross_pay: None,
            clock_in_source: None,
            clock_out_source: None,
            clock_in_ip: None,
            clock_out_ip: None,
            is_manual: false,
            created_by_id: None,
            edited_by_id: None,
            edited_at: None,
            edit_reason: None,
            notes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Append a note fragment, keeping whatever was there.
    pub fn append_note(&mut self, fragment: &str) {
        let mut notes = self.notes.take().unwrap_or_default();
        notes.push_str(fragment);
        self.notes = Some(notes);
    }
}

/// What an edit does to `clock_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockOutChange {
    #[default]
    Keep,
    Set(NaiveDateTime),
    Clear,
}

/// Input for a manually fabricated session.
#[derive(Debug, Clone)]
pub struct ManualSession {
    pub tenant_id: i64,
    pub worker_id: String,
    pub created_by_id: String,
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub shift_id: Option<String>,
    pub status: Option<SessionStatus>,
    pub hourly_rate: Option<Decimal>,
    pub notes: Option<String>,
    pub source: Option<String>,
}

impl ManualSession {
    pub fn new(tenant_id: i64, worker_id: &str, created_by_id: &str, clock_in: NaiveDateTime) -> Self {
        Self {
            tenant_id,
            worker_id: worker_id.to_string(),
            created_by_id: created_by_id.to_string(),
            clock_in,
            clock_out: None,
            shift_id: None,
            status: None,
            hourly_rate: None,
            notes: None,
            source: None,
        }
    }

    pub fn closing_at(mut self, clock_out: NaiveDateTime) -> Self {
        self.clock_out = Some(clock_out);
        self
    }
}

/// Retroactive change set applied by a privileged editor.
/// Fields left `None` are kept as stored.
#[derive(Debug, Clone, Default)]
pub struct SessionEdit {
    pub edited_by_id: String,
    pub edit_reason: Option<String>,
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: ClockOutChange,
    pub status: Option<SessionStatus>,
    pub hourly_rate: Option<Decimal>,
    pub notes: Option<String>,
    pub shift_id: Option<String>,
}

impl SessionEdit {
    pub fn by(editor_id: &str) -> Self {
        Self {
            edited_by_id: editor_id.to_string(),
            ..Default::default()
        }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.edit_reason = Some(reason.to_string());
        self
    }
}
