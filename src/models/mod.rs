pub mod report;
pub mod session;
pub mod status;

pub use report::{PayrollKpis, StatusFilter, TimeWindow, WorkerSummary};
pub use session::{ClockOutChange, ManualSession, SessionEdit, TimeSession};
pub use status::{SessionStatus, can_transition};
