//! End-to-end chains across the sync/async boundary

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use undertow::{AsyncOutcome, Outcome, combine_async, err, ok, ok_async};

fn lookup(key: &str) -> Outcome<&'static str, String> {
    match key {
        "port" => ok("8080"),
        _ => err(format!("unknown key `{key}`")),
    }
}

async fn resolve(port: u16) -> Result<String, &'static str> {
    if port == 0 {
        Err("port out of range")
    } else {
        Ok(format!("0.0.0.0:{port}"))
    }
}

#[tokio::test]
async fn test_sync_chain_lifts_into_async_chain() {
    let addr = lookup("port")
        .and_then(|raw| match raw.parse::<u16>() {
            Ok(p) => ok(p),
            Err(e) => err(format!("bad port: {e}")),
        })
        .async_and_then(|port| AsyncOutcome::from_try_future(resolve(port), |e| e.to_string()))
        .await;

    assert_eq!(addr, ok("0.0.0.0:8080".to_string()));
}

#[tokio::test]
async fn test_err_bypasses_every_success_stage() {
    let touched = Arc::new(Mutex::new(false));
    let flag = touched.clone();

    let settled = lookup("missing")
        .async_and_then(move |_| {
            *flag.lock().unwrap() = true;
            ok_async::<u16, String>(0)
        })
        .map(|p| p + 1)
        .await;

    assert_eq!(settled, err("unknown key `missing`".to_string()));
    assert!(!*touched.lock().unwrap());
}

#[tokio::test]
async fn test_recovery_across_the_async_boundary() {
    let fallback = lookup("missing")
        .async_and_then(|_| ok_async::<u16, String>(0))
        .or_else(|_| ok_async::<u16, String>(8080))
        .await;

    assert_eq!(fallback, ok(8080));
}

#[tokio::test]
async fn test_aggregate_order_is_list_order_not_settle_order() {
    let settled_order = Arc::new(Mutex::new(Vec::new()));

    let make = |label: &'static str, delay_ms: u64, log: Arc<Mutex<Vec<&'static str>>>| {
        AsyncOutcome::<_, String>::from_future(async move {
            sleep(Duration::from_millis(delay_ms)).await;
            log.lock().unwrap().push(label);
            label
        })
    };

    let combined = combine_async(vec![
        make("first", 40, settled_order.clone()),
        make("second", 5, settled_order.clone()),
        make("third", 20, settled_order.clone()),
    ])
    .await;

    // Aggregate keeps list order even though settling ran in reverse.
    assert_eq!(combined, ok(vec!["first", "second", "third"]));
    assert_eq!(
        *settled_order.lock().unwrap(),
        vec!["second", "third", "first"]
    );
}

#[tokio::test]
async fn test_match_with_terminates_a_mixed_chain() {
    let report = ok_async::<i32, String>(2)
        .and_then(|n| ok::<i32, String>(n * 10))
        .map_err(|e| format!("failed: {e}"))
        .match_with(|v| format!("got {v}"), |e| e)
        .await;

    assert_eq!(report, "got 20");
}

#[test]
fn test_catching_boundary_feeds_a_sync_chain() {
    let parsed: Outcome<i64, String> = Outcome::catching_map(
        || "12x".parse::<i64>().unwrap(),
        |_| "parse panicked".to_string(),
    )
    .or_else(|_| ok(0));

    assert_eq!(parsed, ok(0));
}
