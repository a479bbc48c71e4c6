use super::*;

fn instant(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay_ms: 0,
        max_delay_ms: 0,
    }
}

#[test]
fn delay_doubles_per_attempt_up_to_the_cap() {
    let config = RetryConfig {
        max_attempts: 8,
        base_delay_ms: 100,
        max_delay_ms: 500,
    };
    assert_eq!(backoff_delay(&config, 0), Duration::from_millis(100));
    assert_eq!(backoff_delay(&config, 1), Duration::from_millis(200));
    assert_eq!(backoff_delay(&config, 2), Duration::from_millis(400));
    assert_eq!(backoff_delay(&config, 3), Duration::from_millis(500));
    assert_eq!(backoff_delay(&config, 30), Duration::from_millis(500));
}

#[test]
fn success_returns_after_one_call() {
    let mut calls = 0u32;
    let out = with_backoff(&instant(4), "op", || {
        calls += 1;
        Ok(42)
    });
    assert_eq!(out.unwrap(), 42);
    assert_eq!(calls, 1);
}

#[test]
fn rate_limits_are_retried_until_success() {
    let mut calls = 0u32;
    let out = with_backoff(&instant(4), "op", || {
        calls += 1;
        if calls < 3 {
            Err(ReelError::rate_limited("429"))
        } else {
            Ok("done")
        }
    });
    assert_eq!(out.unwrap(), "done");
    assert_eq!(calls, 3);
}

#[test]
fn non_retryable_errors_propagate_immediately() {
    let mut calls = 0u32;
    let out: ReelResult<()> = with_backoff(&instant(4), "op", || {
        calls += 1;
        Err(ReelError::service("500"))
    });
    assert!(matches!(out, Err(ReelError::Service(_))));
    assert_eq!(calls, 1);
}

#[test]
fn exhausted_budget_surfaces_the_last_rate_limit_error() {
    let mut calls = 0u32;
    let out: ReelResult<()> = with_backoff(&instant(3), "op", || {
        calls += 1;
        Err(ReelError::rate_limited(format!("attempt {calls}")))
    });
    match out {
        Err(ReelError::RateLimited(msg)) => assert_eq!(msg, "attempt 3"),
        other => panic!("expected rate limit error, got {other:?}"),
    }
    assert_eq!(calls, 3);
}

#[test]
fn a_zero_attempt_budget_still_calls_once() {
    let mut calls = 0u32;
    let out = with_backoff(&instant(0), "op", || {
        calls += 1;
        Ok(())
    });
    assert!(out.is_ok());
    assert_eq!(calls, 1);
}
