use rtimeclock::core::{ClockLogic, EditorLogic, PayoutLogic, Punch};
use rtimeclock::db::log::load_log;
use rtimeclock::db::queries::find_by_id;
use rtimeclock::models::{ManualSession, SessionStatus, TimeWindow};
use rtimeclock::utils::date::window_from_period;

mod common;
use common::{TENANT, clock_at, memory_pool, rates, ts};

fn seed(pool: &mut rtimeclock::db::pool::DbPool, worker: &str, from: &str, to: &str, status: SessionStatus) -> String {
    let mut req = ManualSession::new(TENANT, worker, "admin", ts(from)).closing_at(ts(to));
    req.status = Some(status);
    EditorLogic::create_manual(pool, &clock_at("2025-10-31 12:00"), &rates(), req)
        .unwrap()
        .id
}

#[test]
fn test_bulk_payout_skips_open_sessions() {
    let mut pool = memory_pool();
    let closed = seed(&mut pool, "w1", "2025-10-06 09:00", "2025-10-06 12:00", SessionStatus::Closed);
    let approved = seed(&mut pool, "w1", "2025-10-07 09:00", "2025-10-07 12:00", SessionStatus::Approved);
    let open = ClockLogic::clock_in(
        &mut pool,
        &clock_at("2025-10-08 09:00"),
        TENANT,
        "w1",
        Punch::default(),
    )
    .unwrap();

    let window = window_from_period("2025-10").unwrap();
    let paid = PayoutLogic::mark_paid_bulk(
        &mut pool,
        &clock_at("2025-10-31 18:00"),
        TENANT,
        &["w1".to_string()],
        window,
    )
    .unwrap();
    assert_eq!(paid, 2);

    for id in [&closed, &approved] {
        let s = find_by_id(&pool.conn, TENANT, id).unwrap().unwrap();
        assert_eq!(s.status, SessionStatus::Paid);
    }
    let s = find_by_id(&pool.conn, TENANT, &open.id).unwrap().unwrap();
    assert_eq!(s.status, SessionStatus::Open);
    assert_eq!(load_log(&pool.conn, Some("pay")).unwrap().len(), 1);
}

#[test]
fn test_bulk_payout_respects_window_and_worker_list() {
    let mut pool = memory_pool();
    let inside = seed(&mut pool, "w1", "2025-10-31 22:00", "2025-11-01 02:00", SessionStatus::Closed);
    let outside = seed(&mut pool, "w1", "2025-11-01 09:00", "2025-11-01 10:00", SessionStatus::Closed);
    let other = seed(&mut pool, "w2", "2025-10-10 09:00", "2025-10-10 10:00", SessionStatus::Closed);

    let window = TimeWindow::new(ts("2025-10-01 00:00"), ts("2025-11-01 00:00")).unwrap();
    let clock = clock_at("2025-11-02 08:00");
    let paid = PayoutLogic::mark_paid_bulk(&mut pool, &clock, TENANT, &["w1".to_string()], window)
        .unwrap();
    assert_eq!(paid, 1);

    let status = |id: &str| find_by_id(&pool.conn, TENANT, id).unwrap().unwrap().status;
    assert_eq!(status(&inside), SessionStatus::Paid);
    assert_eq!(status(&outside), SessionStatus::Closed);
    assert_eq!(status(&other), SessionStatus::Closed);
}

#[test]
fn test_bulk_payout_is_idempotent() {
    let mut pool = memory_pool();
    seed(&mut pool, "w1", "2025-10-06 09:00", "2025-10-06 12:00", SessionStatus::Closed);
    let window = window_from_period("2025-10").unwrap();
    let clock = clock_at("2025-10-31 18:00");
    let workers = vec!["w1".to_string()];

    assert_eq!(PayoutLogic::mark_paid_bulk(&mut pool, &clock, TENANT, &workers, window).unwrap(), 1);
    assert_eq!(PayoutLogic::mark_paid_bulk(&mut pool, &clock, TENANT, &workers, window).unwrap(), 0);
    assert_eq!(PayoutLogic::mark_paid_bulk(&mut pool, &clock, TENANT, &[], window).unwrap(), 0);
}
