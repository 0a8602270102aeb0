//! Overlap Detector.
//!
//! Intervals are half-open `[clock_in, clock_out)`; a session without a
//! clock_out (OPEN) reaches to infinity.

use crate::models::TimeSession;
use chrono::{Duration, NaiveDateTime};

/// Overlap between `s` and the bounded candidate, or `None` if disjoint.
fn overlap_with(s: &TimeSession, new_in: NaiveDateTime, new_out: NaiveDateTime) -> Option<Duration> {
    let s_end = match s.clock_out {
        Some(out) if !s.is_open() => out,
        _ => new_out,
    };

    let start = s.clock_in.max(new_in);
    let end = s_end.min(new_out);
    (start < end).then(|| end - start)
}

/// First session in `existing` conflicting with `[new_in, new_out)`.
///
/// An open-ended candidate (`new_out == None`) is never reported as
/// conflicting. When several sessions collide, the one sharing the most time
/// with the candidate wins; ties go to the earliest clock_in.
pub fn find_conflict<'a>(
    existing: &'a [TimeSession],
    new_in: NaiveDateTime,
    new_out: Option<NaiveDateTime>,
    exclude_id: Option<&str>,
) -> Option<&'a TimeSession> {
    let new_out = new_out?;

    existing
        .iter()
        .filter(|s| Some(s.id.as_str()) != exclude_id)
        .filter_map(|s| overlap_with(s, new_in, new_out).map(|d| (s, d)))
        .max_by(|(a, da), (b, db)| da.cmp(db).then_with(|| b.clock_in.cmp(&a.clock_in)))
        .map(|(s, _)| s)
}
