use rtimeclock::core::{ClockLogic, EditorLogic, Punch, StaticRates};
use rtimeclock::db::log::load_log;
use rtimeclock::db::queries::find_by_id;
use rtimeclock::models::{ClockOutChange, ManualSession, SessionEdit, SessionStatus, TimeSession};

mod common;
use common::{TENANT, clock_at, dec, memory_pool, rates, ts};

fn manual(
    pool: &mut rtimeclock::db::pool::DbPool,
    worker: &str,
    from: &str,
    to: Option<&str>,
) -> rtimeclock::errors::AppResult<TimeSession> {
    let mut req = ManualSession::new(TENANT, worker, "admin", ts(from));
    req.clock_out = to.map(ts);
    EditorLogic::create_manual(pool, &clock_at("2025-10-10 12:00"), &rates(), req)
}

#[test]
fn test_manual_overlap_is_rejected_and_boundary_is_free() {
    let mut pool = memory_pool();
    let existing = manual(&mut pool, "w1", "2025-10-06 10:00", Some("2025-10-06 12:00")).unwrap();

    let err = manual(&mut pool, "w1", "2025-10-06 11:00", Some("2025-10-06 13:00")).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.conflicting_id(), Some(existing.id.as_str()));

    let adjacent = manual(&mut pool, "w1", "2025-10-06 12:00", Some("2025-10-06 13:00")).unwrap();
    assert_eq!(adjacent.status, SessionStatus::Closed);

    // Other workers are never in the way.
    manual(&mut pool, "w2", "2025-10-06 11:00", Some("2025-10-06 13:00")).unwrap();
}

#[test]
fn test_manual_session_snapshot_and_provenance() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:30")).unwrap();

    assert!(s.is_manual);
    assert_eq!(s.created_by_id.as_deref(), Some("admin"));
    assert_eq!(s.clock_in_source.as_deref(), Some("admin_manual"));
    assert_eq!(s.duration_minutes, Some(510));
    assert_eq!(s.gross_pay, Some(dec("170.00")));
}

#[test]
fn test_manual_supplied_rate_wins() {
    let mut pool = memory_pool();
    let mut req = ManualSession::new(TENANT, "w1", "admin", ts("2025-10-06 09:00"))
        .closing_at(ts("2025-10-06 10:30"));
    req.hourly_rate = Some(dec("30"));

    let s = EditorLogic::create_manual(&mut pool, &clock_at("2025-10-10 12:00"), &rates(), req)
        .unwrap();
    assert_eq!(s.hourly_rate, Some(dec("30")));
    assert_eq!(s.gross_pay, Some(dec("45.00")));
}

#[test]
fn test_manual_open_session_conflicts_with_existing_open() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");
    let open = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();

    let err = manual(&mut pool, "w1", "2025-10-05 09:00", None).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.conflicting_id(), Some(open.id.as_str()));
}

#[test]
fn test_manual_rejects_inverted_bounds_and_bad_status_shape() {
    let mut pool = memory_pool();
    let err = manual(&mut pool, "w1", "2025-10-06 12:00", Some("2025-10-06 12:00")).unwrap_err();
    assert!(err.is_validation());

    let mut req = ManualSession::new(TENANT, "w1", "admin", ts("2025-10-06 09:00"));
    req.status = Some(SessionStatus::Approved);
    let err = EditorLogic::create_manual(&mut pool, &clock_at("2025-10-10 12:00"), &rates(), req)
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_edit_moves_bounds_and_recomputes_with_frozen_rate() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:00")).unwrap();

    // A raise after close must not leak into the recomputed snapshot.
    let raised = StaticRates::new().with(TENANT, "w1", dec("99"));
    let mut edit = SessionEdit::by("boss").reason("forgot to clock out later");
    edit.clock_out = ClockOutChange::Set(ts("2025-10-06 18:00"));

    let after =
        EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &raised, TENANT, &s.id, edit)
            .unwrap();

    assert_eq!(after.duration_minutes, Some(540));
    assert_eq!(after.hourly_rate, Some(dec("20.00")));
    assert_eq!(after.gross_pay, Some(dec("180.00")));
    assert_eq!(after.edited_by_id.as_deref(), Some("boss"));
    assert_eq!(after.edited_at, Some(ts("2025-10-07 08:00")));
    assert_eq!(after.edit_reason.as_deref(), Some("forgot to clock out later"));
}

#[test]
fn test_edit_overlap_excludes_self_but_not_neighbours() {
    let mut pool = memory_pool();
    let a = manual(&mut pool, "w1", "2025-10-06 08:00", Some("2025-10-06 10:00")).unwrap();
    let b = manual(&mut pool, "w1", "2025-10-06 10:00", Some("2025-10-06 12:00")).unwrap();

    let mut widen = SessionEdit::by("boss");
    widen.clock_in = Some(ts("2025-10-06 09:30"));
    let err = EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &b.id, widen)
        .unwrap_err();
    assert_eq!(err.conflicting_id(), Some(a.id.as_str()));

    let mut shrink = SessionEdit::by("boss");
    shrink.clock_in = Some(ts("2025-10-06 10:30"));
    let after =
        EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &b.id, shrink)
            .unwrap();
    assert_eq!(after.duration_minutes, Some(90));
}

#[test]
fn test_clearing_clock_out_reopens_session() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:00")).unwrap();

    let mut edit = SessionEdit::by("boss");
    edit.clock_out = ClockOutChange::Clear;
    let after = EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &s.id, edit)
        .unwrap();

    assert_eq!(after.status, SessionStatus::Open);
    assert!(after.clock_out.is_none());
    assert!(after.duration_minutes.is_none());
    assert!(after.gross_pay.is_none());

    let stored = find_by_id(&pool.conn, TENANT, &s.id).unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Open);
}

#[test]
fn test_reopening_collides_with_another_open_session() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:00")).unwrap();
    let open = ClockLogic::clock_in(
        &mut pool,
        &clock_at("2025-10-07 09:00"),
        TENANT,
        "w1",
        Punch::default(),
    )
    .unwrap();

    let mut edit = SessionEdit::by("boss");
    edit.clock_out = ClockOutChange::Clear;
    let err = EditorLogic::edit(&mut pool, &clock_at("2025-10-07 10:00"), &rates(), TENANT, &s.id, edit)
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.conflicting_id(), Some(open.id.as_str()));
}

#[test]
fn test_editor_can_close_open_session() {
    let mut pool = memory_pool();
    let open = ClockLogic::clock_in(
        &mut pool,
        &clock_at("2025-10-06 09:00"),
        TENANT,
        "w2",
        Punch::default(),
    )
    .unwrap();

    let mut edit = SessionEdit::by("boss");
    edit.clock_out = ClockOutChange::Set(ts("2025-10-06 13:00"));
    let after = EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &open.id, edit)
        .unwrap();

    assert_eq!(after.status, SessionStatus::Closed);
    assert_eq!(after.hourly_rate, Some(dec("15.50")));
    assert_eq!(after.gross_pay, Some(dec("62.00")));
}

#[test]
fn test_status_walk_and_illegal_transitions() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 10:00")).unwrap();
    let clock = clock_at("2025-10-07 08:00");

    let mut approve = SessionEdit::by("boss");
    approve.status = Some(SessionStatus::Approved);
    let approved = EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, &s.id, approve).unwrap();
    assert_eq!(approved.status, SessionStatus::Approved);

    // APPROVED cannot go back to OPEN.
    let mut reopen = SessionEdit::by("boss");
    reopen.clock_out = ClockOutChange::Clear;
    let err = EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, &s.id, reopen).unwrap_err();
    assert!(err.is_conflict());

    let mut pay = SessionEdit::by("boss");
    pay.status = Some(SessionStatus::Paid);
    let paid = EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, &s.id, pay).unwrap();
    assert_eq!(paid.status, SessionStatus::Paid);
    assert_eq!(paid.gross_pay, Some(dec("20.00")));
}

#[test]
fn test_paid_session_is_immutable() {
    let mut pool = memory_pool();
    let mut req = ManualSession::new(TENANT, "w1", "admin", ts("2025-10-06 09:00"))
        .closing_at(ts("2025-10-06 10:00"));
    req.status = Some(SessionStatus::Paid);
    let s = EditorLogic::create_manual(&mut pool, &clock_at("2025-10-10 12:00"), &rates(), req)
        .unwrap();
    let clock = clock_at("2025-10-11 08:00");

    let err = EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, &s.id, SessionEdit::by("boss"))
        .unwrap_err();
    assert!(err.is_conflict());

    let mut notes = SessionEdit::by("boss");
    notes.notes = Some("typo".into());
    assert!(
        EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, &s.id, notes)
            .unwrap_err()
            .is_conflict()
    );

    let err = EditorLogic::delete(&mut pool, &clock, TENANT, &s.id, "boss", None).unwrap_err();
    assert!(err.is_conflict());
    assert!(find_by_id(&pool.conn, TENANT, &s.id).unwrap().is_some());
}

#[test]
fn test_unknown_session_is_not_found() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-11 08:00");

    let err = EditorLogic::edit(&mut pool, &clock, &rates(), TENANT, "nope", SessionEdit::by("boss"))
        .unwrap_err();
    assert!(err.is_not_found());
    let err = EditorLogic::delete(&mut pool, &clock, TENANT, "nope", "boss", None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_every_editor_mutation_is_audited() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:00")).unwrap();

    let mut edit = SessionEdit::by("boss").reason("late start");
    edit.clock_in = Some(ts("2025-10-06 09:30"));
    EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &s.id, edit)
        .unwrap();
    EditorLogic::delete(
        &mut pool,
        &clock_at("2025-10-08 08:00"),
        TENANT,
        &s.id,
        "boss",
        Some("duplicate"),
    )
    .unwrap();

    let ops: Vec<String> = load_log(&pool.conn, None)
        .unwrap()
        .into_iter()
        .filter(|r| r.target == s.id)
        .map(|r| r.operation)
        .collect();
    assert_eq!(ops, vec!["create", "edit", "delete"]);

    let edit_row = &load_log(&pool.conn, Some("edit")).unwrap()[0];
    let msg: serde_json::Value = serde_json::from_str(&edit_row.message).unwrap();
    assert_eq!(msg["actor"], "boss");
    assert_eq!(msg["reason"], "late start");
    assert_eq!(msg["before"]["clock_in"], "2025-10-06T09:00:00");
    assert_eq!(msg["after"]["clock_in"], "2025-10-06T09:30:00");
    assert_eq!(msg["after"]["status"], "CLOSED");

    let del_row = &load_log(&pool.conn, Some("delete")).unwrap()[0];
    let msg: serde_json::Value = serde_json::from_str(&del_row.message).unwrap();
    assert!(msg["after"].is_null());
    assert_eq!(msg["reason"], "duplicate");
}

#[test]
fn test_failed_edit_leaves_no_trace() {
    let mut pool = memory_pool();
    let s = manual(&mut pool, "w1", "2025-10-06 09:00", Some("2025-10-06 17:00")).unwrap();

    let mut edit = SessionEdit::by("boss");
    edit.clock_out = ClockOutChange::Set(ts("2025-10-06 08:00"));
    let err = EditorLogic::edit(&mut pool, &clock_at("2025-10-07 08:00"), &rates(), TENANT, &s.id, edit)
        .unwrap_err();
    assert!(err.is_validation());

    let stored = find_by_id(&pool.conn, TENANT, &s.id).unwrap().unwrap();
    assert_eq!(stored, s);
    assert!(load_log(&pool.conn, Some("edit")).unwrap().is_empty());
}
