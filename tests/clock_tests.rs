use chrono::Duration;
use rtimeclock::core::{ClockLogic, Punch};
use rtimeclock::db::queries::{count_open, find_by_id};
use rtimeclock::errors::AppError;
use rtimeclock::models::SessionStatus;
use std::thread;

mod common;
use common::{TENANT, clock_at, dec, file_pool, memory_pool, rates};

#[test]
fn test_clock_in_twice_returns_same_session() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");

    let first = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();
    clock.advance(Duration::minutes(5));
    let second = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.clock_in, common::ts("2025-10-06 09:00"));
    assert_eq!(count_open(&pool.conn, TENANT).unwrap(), 1);

    let rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM time_sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn test_clock_in_records_punch_metadata() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");
    let punch = Punch {
        shift_id: Some("morning".into()),
        ip: Some("10.0.0.7".into()),
        source: None,
    };

    let s = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", punch).unwrap();
    assert_eq!(s.status, SessionStatus::Open);
    assert_eq!(s.clock_in_source.as_deref(), Some("web"));
    assert_eq!(s.clock_in_ip.as_deref(), Some("10.0.0.7"));
    assert_eq!(s.shift_id.as_deref(), Some("morning"));
    assert!(s.duration_minutes.is_none() && s.gross_pay.is_none());
}

#[test]
fn test_clock_out_without_open_session_is_not_found() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 17:00");

    let err = ClockLogic::clock_out(&mut pool, &clock, &rates(), TENANT, "w1", Punch::default())
        .unwrap_err();
    assert!(err.is_not_found());

    let rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM time_sessions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_clock_out_freezes_payroll_snapshot() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");

    let open = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();
    clock.set(common::ts("2025-10-06 17:30"));
    let closed = ClockLogic::clock_out(
        &mut pool,
        &clock,
        &rates(),
        TENANT,
        "w1",
        Punch::from_source("kiosk"),
    )
    .unwrap();

    assert_eq!(closed.id, open.id);
    assert_eq!(closed.status, SessionStatus::Closed);
    assert_eq!(closed.duration_minutes, Some(510));
    assert_eq!(closed.hourly_rate, Some(dec("20.00")));
    assert_eq!(closed.gross_pay, Some(dec("170.00")));
    assert_eq!(closed.clock_out_source.as_deref(), Some("kiosk"));

    let stored = find_by_id(&pool.conn, TENANT, &open.id).unwrap().unwrap();
    assert_eq!(stored, closed);
}

#[test]
fn test_clock_in_after_close_opens_new_session() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");
    let first = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();
    clock.advance(Duration::hours(2));
    ClockLogic::clock_out(&mut pool, &clock, &rates(), TENANT, "w1", Punch::default()).unwrap();

    clock.advance(Duration::minutes(30));
    let second = ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(second.clock_in, common::ts("2025-10-06 11:30"));

    let stored = find_by_id(&pool.conn, TENANT, &first.id).unwrap().unwrap();
    assert_eq!(stored.status, SessionStatus::Closed);
    assert_eq!(stored.gross_pay, Some(dec("40.00")));
}

#[test]
fn test_clock_out_unknown_rate_pays_zero() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");
    ClockLogic::clock_in(&mut pool, &clock, TENANT, "ghost", Punch::default()).unwrap();
    clock.advance(Duration::minutes(45));

    let s = ClockLogic::clock_out(&mut pool, &clock, &rates(), TENANT, "ghost", Punch::default())
        .unwrap();
    assert_eq!(s.duration_minutes, Some(45));
    assert_eq!(s.hourly_rate, Some(dec("0")));
    assert_eq!(s.gross_pay, Some(dec("0")));
}

#[test]
fn test_clock_out_same_second_is_rejected() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");
    ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default()).unwrap();

    let err = ClockLogic::clock_out(&mut pool, &clock, &rates(), TENANT, "w1", Punch::default())
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count_open(&pool.conn, TENANT).unwrap(), 1);
}

#[test]
fn test_tenants_are_isolated() {
    let mut pool = memory_pool();
    let clock = clock_at("2025-10-06 09:00");

    let a = ClockLogic::clock_in(&mut pool, &clock, 1, "w1", Punch::default()).unwrap();
    let b = ClockLogic::clock_in(&mut pool, &clock, 2, "w1", Punch::default()).unwrap();
    assert_ne!(a.id, b.id);

    clock.advance(Duration::hours(1));
    let err = ClockLogic::clock_out(&mut pool, &clock, &rates(), 3, "w1", Punch::default())
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn test_concurrent_clock_in_leaves_one_open_session() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir
        .path()
        .join("concurrent_clock_in.sqlite")
        .to_string_lossy()
        .to_string();
    drop(file_pool(&db_path));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = db_path.clone();
            thread::spawn(move || {
                let mut pool = file_pool(&path);
                let clock = clock_at("2025-10-06 09:00");
                ClockLogic::clock_in(&mut pool, &clock, TENANT, "w1", Punch::default())
                    .map(|s| s.id)
            })
        })
        .collect();

    let ids: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked").expect("clock_in failed"))
        .collect();

    assert!(ids.iter().all(|id| id == &ids[0]));

    let pool = file_pool(&db_path);
    let rows: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM time_sessions WHERE worker_id = 'w1' AND status = 'OPEN'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
}
