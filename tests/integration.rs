//! Integration tests for composed stages and stewards

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use stageward::prelude::*;
use tokio_stream::StreamExt;

fn silent_ward(starts: Arc<AtomicUsize>) -> impl Ward {
    ward_fn(move |token: CancellationToken, _pulse: Duration| {
        starts.fetch_add(1, Ordering::SeqCst);
        let (tx, hb) = heartbeat();
        tokio::spawn(async move {
            token.cancelled().await;
            drop(tx);
        });
        hb
    })
}

#[tokio::test]
async fn test_generator_pipeline() {
    let token = CancellationToken::new();
    let values = collect(generator(token, vec![1, 2, 3, 4, 5])).await;
    assert_eq!(values, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_take_of_repeat() {
    let token = CancellationToken::new();
    let xs = take(token.clone(), repeat(token.clone(), vec!["x"]), 5);
    assert_eq!(collect(xs).await, vec!["x", "x", "x", "x", "x"]);
    token.cancel();
}

#[tokio::test]
async fn test_take_of_repeat_with_cancelled_token() {
    // A fired token may cut the stream short, but never past five values.
    let token = CancellationToken::new();
    token.cancel();
    let xs = take(token.clone(), repeat(token.clone(), vec!["x"]), 5);
    let values = collect(xs).await;
    assert!(values.len() <= 5);
    assert!(values.iter().all(|v| *v == "x"));
}

#[tokio::test]
async fn test_tee_of_generator() {
    let token = CancellationToken::new();
    let (a, b) = tee(token.clone(), generator(token, vec![1, 2, 3]));
    let (a, b) = tokio::join!(collect(a), collect(b));
    assert_eq!(a, vec![1, 2, 3]);
    assert_eq!(b, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_apply_function_add() {
    let token = CancellationToken::new();
    let numbers = generator(token.clone(), vec![1, 2, 3]);
    let values = collect(apply_function(token, numbers, 10, |x, y| x + y)).await;
    assert_eq!(values, vec![11, 12, 13]);
}

#[tokio::test]
async fn test_full_pipeline() {
    let token = CancellationToken::new();

    let mut counter = 0u64;
    let naturals = repeat_func(token.clone(), move || {
        counter += 1;
        counter
    });
    let squares = apply_function(token.clone(), naturals, 0, |x, _| x * x);
    let (evens, all) = tee(token.clone(), take(token.clone(), squares, 6));

    let evens = evens.filter(|x| x % 2 == 0);
    let (evens, all) = tokio::join!(collect(evens), collect(all));
    assert_eq!(all, vec![1, 4, 9, 16, 25, 36]);
    assert_eq!(evens, vec![4, 16, 36]);

    token.cancel();
}

#[tokio::test]
async fn test_to_channel_pipeline_recovers_from_mismatch() {
    let token = CancellationToken::new();
    let elements: Vec<Element> = vec![
        Box::new(String::from("a")),
        Box::new(2u8),
        Box::new(String::from("c")),
    ];
    let projected = to_channel::<String>(token.clone(), generator(token, elements));

    let (ok, failed): (Vec<_>, Vec<_>) = collect(projected).await.into_iter().partition(|r| r.is_ok());
    let ok: Vec<String> = ok.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(ok, vec!["a", "c"]);
    assert_eq!(failed.len(), 1);

    let err: Error = failed.into_iter().next().unwrap().unwrap_err().into();
    assert_eq!(err.as_label(), "type_mismatch");
}

#[tokio::test]
async fn test_random_values_through_pipeline() {
    let token = CancellationToken::new();
    let values = collect(random_take(token.clone(), 20, 100)).await;
    token.cancel();
    assert_eq!(values.len(), 20);
    assert!(values.iter().all(|v| *v < 100));
}

#[tokio::test]
async fn test_cancel_closes_every_stage() {
    let token = CancellationToken::new();

    let source = repeat(token.clone(), vec![1u32, 2, 3]);
    let mapped = apply_function(token.clone(), source, 1, |x, y| x + y);
    let guarded = or_done(token.clone(), mapped);
    let (mut a, b) = tee(token.clone(), guarded);
    let bounded = take(token.clone(), b, usize::MAX);

    assert!(a.next().await.is_some());
    token.cancel();

    let drained = tokio::time::timeout(Duration::from_secs(1), async {
        tokio::join!(collect(a), collect(bounded))
    })
    .await;
    assert!(drained.is_ok(), "a stage kept its output open after cancel");
}

#[tokio::test(start_paused = true)]
async fn test_steward_restarts_silent_ward() {
    let starts = Arc::new(AtomicUsize::new(0));
    let steward = new_steward(Duration::from_millis(50), silent_ward(starts.clone())).unwrap();
    let token = CancellationToken::new();
    let hb = steward.start(token.clone(), Duration::from_millis(10));

    tokio::time::sleep(Duration::from_millis(525)).await;
    let restarts = steward.restarts();
    assert!((9..=11).contains(&restarts), "restarts = {restarts}");
    assert_eq!(starts.load(Ordering::SeqCst) as u64, restarts + 1);

    token.cancel();
    let closed = tokio::time::timeout(Duration::from_millis(1), collect(hb)).await;
    assert!(closed.is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_steward_of_steward() {
    let inner_starts = Arc::new(AtomicUsize::new(0));
    let inner = Steward::new(Duration::from_millis(20), silent_ward(inner_starts.clone())).unwrap();
    let outer = Steward::new(Duration::from_millis(100), inner.clone()).unwrap();

    let token = CancellationToken::new();
    let mut hb = outer.start(token.clone(), Duration::from_millis(10));

    // The inner steward keeps pulsing at half the outer timeout while its own
    // ward is being restarted, so the outer steward sees a healthy ward.
    let pulses = collect_n(&mut hb, 20).await;
    assert_eq!(pulses.len(), 20);
    assert_eq!(outer.restarts(), 0);
    assert!(inner.restarts() >= 5);

    token.cancel();
    let closed = tokio::time::timeout(Duration::from_millis(1), collect(hb)).await;
    assert!(closed.is_ok());
}
