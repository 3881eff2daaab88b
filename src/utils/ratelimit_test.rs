use super::*;

const LIMIT: usize = 3;
const WINDOW: Duration = Duration::from_secs(60);

fn limiter() -> LoginRateLimiter {
    LoginRateLimiter::with_config(LIMIT, WINDOW)
}

#[test]
fn allows_attempts_up_to_limit() {
    let rl = limiter();
    let now = Instant::now();

    for i in 0..LIMIT {
        assert!(
            rl.check_and_record_at("jane@vitstudent.ac.in", now).is_ok(),
            "attempt {i} should succeed"
        );
    }
    assert!(rl.check_and_record_at("jane@vitstudent.ac.in", now).is_err());
}

#[test]
fn window_expiry_readmits_account() {
    let rl = limiter();
    let start = Instant::now();

    for _ in 0..LIMIT {
        rl.check_and_record_at("jane@vitstudent.ac.in", start).unwrap();
    }
    assert!(rl.check_and_record_at("jane@vitstudent.ac.in", start).is_err());

    let after_window = start + WINDOW + Duration::from_millis(1);
    assert!(rl
        .check_and_record_at("jane@vitstudent.ac.in", after_window)
        .is_ok());
}

#[test]
fn distinct_accounts_do_not_interfere() {
    let rl = limiter();
    let now = Instant::now();

    for _ in 0..LIMIT {
        rl.check_and_record_at("jane@vitstudent.ac.in", now).unwrap();
    }
    assert!(rl.check_and_record_at("jane@vitstudent.ac.in", now).is_err());
    assert!(rl.check_and_record_at("john@vitstudent.ac.in", now).is_ok());
}

#[test]
fn denied_attempts_do_not_extend_the_window() {
    let rl = limiter();
    let start = Instant::now();

    for _ in 0..LIMIT {
        rl.check_and_record_at("jane@vitstudent.ac.in", start).unwrap();
    }
    // Hammering while locked out must not push the window forward.
    for _ in 0..10 {
        assert!(rl
            .check_and_record_at("jane@vitstudent.ac.in", start + WINDOW)
            .is_err());
    }
    let after_window = start + WINDOW + Duration::from_millis(1);
    assert!(rl
        .check_and_record_at("jane@vitstudent.ac.in", after_window)
        .is_ok());
}

#[test]
fn clones_share_state() {
    let rl = limiter();
    let clone = rl.clone();
    let now = Instant::now();

    for _ in 0..LIMIT {
        rl.check_and_record_at("jane@vitstudent.ac.in", now).unwrap();
    }
    assert!(clone
        .check_and_record_at("jane@vitstudent.ac.in", now)
        .is_err());
}
