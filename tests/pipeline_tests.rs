//! Pipeline tests: executor wiring, stage semantics, gate serialization, end-to-end results.

use crossbeam_channel::{Receiver, Sender, bounded};
use signer::engine::{FastDigest, Signers, SlowDigest};
use signer::pipeline::{MultiHash, SingleHash, send_item, signing_stages};
use signer::{
    Combine, FnStage, Item, Opts, PipelineError, SignOpts, SignerError, Stage, execute_pipeline,
    run_pipeline, sign, sign_with,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

fn identity(s: &str) -> Result<String, SignerError> {
    Ok(s.to_string())
}

fn tag_fast(s: &str) -> Result<String, SignerError> {
    Ok(format!("f({})", s))
}

fn tag_slow(s: &str) -> Result<String, SignerError> {
    Ok(format!("s({})", s))
}

/// Finishes slot 5 first and slot 0 last: sleeps longer the smaller the leading digit.
fn reverse_jitter(s: &str) -> Result<String, SignerError> {
    let slot = s[..1].parse::<u64>().unwrap_or(0);
    thread::sleep(Duration::from_millis((6 - slot.min(5)) * 3));
    Ok(s.to_string())
}

fn failing(s: &str) -> Result<String, SignerError> {
    Err(SignerError::Failed {
        digest: "test".to_string(),
        reason: format!("refused {}", s),
    })
}

fn signers(fast: Arc<dyn FastDigest>, slow: Arc<dyn SlowDigest>) -> Signers {
    Signers::new(fast, slow)
}

fn identity_signers() -> Signers {
    signers(Arc::new(identity), Arc::new(identity))
}

fn forward(input: Receiver<Item>, output: Sender<Item>) -> Result<(), PipelineError> {
    for item in input.iter() {
        send_item(&output, item, "identity")?;
    }
    Ok(())
}

fn texts(items: Vec<Item>) -> Vec<String> {
    items.into_iter().map(Item::into_text).collect()
}

fn no_latency() -> SignOpts {
    SignOpts {
        fast_latency: Duration::ZERO,
        slow_latency: Duration::ZERO,
        ..SignOpts::default()
    }
}

/// Fast digest that sleeps `delay` and records the highest number of concurrent calls.
fn counting_fast(delay: Duration, max_seen: Arc<AtomicUsize>) -> impl FastDigest {
    let active = Arc::new(AtomicUsize::new(0));
    move |s: &str| -> Result<String, SignerError> {
        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
        max_seen.fetch_max(now, Ordering::SeqCst);
        thread::sleep(delay);
        active.fetch_sub(1, Ordering::SeqCst);
        Ok(s.to_string())
    }
}

// --- executor ---

#[test]
fn test_identity_stage_closes_after_three_items() {
    let (tx, rx) = bounded::<Item>(100);
    for n in [1, 2, 3] {
        tx.send(Item::Number(n)).unwrap();
    }
    drop(tx);
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(FnStage::new("identity", forward))];
    let drained = execute_pipeline(rx, &stages, 100).unwrap();
    assert_eq!(
        drained,
        vec![Item::Number(1), Item::Number(2), Item::Number(3)]
    );
}

#[test]
fn test_no_stages_drains_source() {
    let (tx, rx) = bounded::<Item>(4);
    tx.send(Item::from("a")).unwrap();
    drop(tx);
    let drained = execute_pipeline(rx, &[], 4).unwrap();
    assert_eq!(texts(drained), vec!["a"]);
}

#[test]
fn test_chained_stages_with_backpressure() {
    let add_one = FnStage::new("add_one", |input: Receiver<Item>, output: Sender<Item>| {
        for item in input.iter() {
            let n: i64 = item.into_text().parse().unwrap();
            send_item(&output, Item::Number(n + 1), "add_one")?;
        }
        Ok(())
    });
    let double = FnStage::new("double", |input: Receiver<Item>, output: Sender<Item>| {
        for item in input.iter() {
            let n: i64 = item.into_text().parse().unwrap();
            send_item(&output, Item::Number(n * 2), "double")?;
        }
        Ok(())
    });
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(add_one), Box::new(double)];
    let items: Vec<Item> = (0..50).map(Item::Number).collect();
    let drained = run_pipeline(items, &stages, 1).unwrap();
    let expected: Vec<Item> = (0..50).map(|n| Item::Number((n + 1) * 2)).collect();
    assert_eq!(drained, expected);
}

#[test]
fn test_failing_stage_surfaces_root_cause() {
    let refuse = FnStage::new("refuse", |input: Receiver<Item>, _output: Sender<Item>| {
        let first = input.recv().map(Item::into_text).unwrap_or_default();
        Err(PipelineError::from(failing(&first).unwrap_err()))
    });
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(FnStage::new("identity", forward)),
        Box::new(refuse),
        Box::new(FnStage::new("tail", forward)),
    ];
    let items: Vec<Item> = (0..500).map(Item::Number).collect();
    let err = run_pipeline(items, &stages, 1).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Signer(SignerError::Failed { .. })
    ));
}

#[test]
fn test_panicking_stage_reported() {
    let boom = FnStage::new("boom", |_input: Receiver<Item>, _output: Sender<Item>| {
        panic!("stage exploded")
    });
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(boom)];
    let err = run_pipeline(vec![Item::Number(1)], &stages, 1).unwrap_err();
    assert!(matches!(err, PipelineError::StagePanicked { ref stage } if stage == "boom"));
}

// --- single hash ---

#[test]
fn test_single_hash_formula() {
    let stage = SingleHash::new(&signers(Arc::new(tag_fast), Arc::new(tag_slow)));
    assert_eq!(stage.hash_one("7").unwrap(), "f(7)~f(s(7))");
}

#[test]
fn test_single_hash_real_primitives() {
    let opts = Opts::from(&no_latency());
    let stage = SingleHash::new(&Signers::from_opts(&opts));
    assert_eq!(stage.hash_one("0").unwrap(), "4108050209~502633748");
}

#[test]
fn test_single_hash_stage_reproducible() {
    let signers = signers(Arc::new(tag_fast), Arc::new(tag_slow));
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(SingleHash::new(&signers))];
    for _ in 0..5 {
        let items: Vec<Item> = (0..20).map(Item::Number).collect();
        let mut out = texts(run_pipeline(items, &stages, 4).unwrap());
        out.sort();
        let mut expected: Vec<String> = (0..20).map(|n| format!("f({n})~f(s({n}))")).collect();
        expected.sort();
        assert_eq!(out, expected);
    }
}

#[test]
fn test_slow_digest_calls_never_overlap() {
    let active = Arc::new(AtomicUsize::new(0));
    let max_seen = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));
    let slow = {
        let active = Arc::clone(&active);
        let max_seen = Arc::clone(&max_seen);
        let calls = Arc::clone(&calls);
        move |s: &str| -> Result<String, SignerError> {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            max_seen.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            calls.fetch_add(1, Ordering::SeqCst);
            active.fetch_sub(1, Ordering::SeqCst);
            Ok(s.to_string())
        }
    };
    let signers = signers(Arc::new(identity), Arc::new(slow));
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(SingleHash::new(&signers))];
    let items: Vec<Item> = (0..30).map(Item::Number).collect();
    let out = run_pipeline(items, &stages, 100).unwrap();
    assert_eq!(out.len(), 30);
    assert_eq!(calls.load(Ordering::SeqCst), 30);
    assert_eq!(max_seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fast_digests_run_in_parallel_across_items() {
    let slow_fast = |s: &str| -> Result<String, SignerError> {
        thread::sleep(Duration::from_millis(100));
        Ok(s.to_string())
    };
    let signers = signers(Arc::new(slow_fast), Arc::new(identity));
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(SingleHash::new(&signers))];
    let items: Vec<Item> = (0..10).map(Item::Number).collect();
    let start = std::time::Instant::now();
    let out = run_pipeline(items, &stages, 100).unwrap();
    assert_eq!(out.len(), 10);
    // Serial would be 10 items x 2 fast calls x 100ms.
    assert!(start.elapsed() < Duration::from_millis(1000));
}

#[test]
fn test_single_hash_in_flight_items_bounded_by_workers() {
    let max_seen = Arc::new(AtomicUsize::new(0));
    let fast = counting_fast(Duration::from_millis(1), Arc::clone(&max_seen));
    let signers = signers(Arc::new(fast), Arc::new(identity));
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(SingleHash::new(&signers).with_workers(4))];
    let items: Vec<Item> = (0..300).map(Item::Number).collect();
    let out = run_pipeline(items, &stages, 100).unwrap();
    assert_eq!(out.len(), 300);
    // Each in-flight item makes at most two fast calls at once.
    assert!(max_seen.load(Ordering::SeqCst) <= 4 * 2);
}

// --- multi hash ---

#[test]
fn test_multi_hash_slot_order_under_jitter() {
    let stage = MultiHash::new(&signers(Arc::new(reverse_jitter), Arc::new(identity)), 6);
    let expected = "0s1s2s3s4s5s";
    for _ in 0..5 {
        assert_eq!(stage.hash_one("s").unwrap(), expected);
    }
}

#[test]
fn test_multi_hash_formula_with_tagged_fast() {
    let stage = MultiHash::new(&signers(Arc::new(tag_fast), Arc::new(identity)), 6);
    assert_eq!(
        stage.hash_one("x").unwrap(),
        "f(0x)f(1x)f(2x)f(3x)f(4x)f(5x)"
    );
}

#[test]
fn test_multi_hash_custom_fan_out() {
    let stage = MultiHash::new(&identity_signers(), 3);
    assert_eq!(stage.fan_out(), 3);
    assert_eq!(stage.hash_one("a").unwrap(), "0a1a2a");
}

#[test]
fn test_multi_hash_real_primitives() {
    let opts = Opts::from(&no_latency());
    let stage = MultiHash::new(&Signers::from_opts(&opts), 6);
    assert_eq!(
        stage.hash_one("4108050209~502633748").unwrap(),
        "29568666068035183841425683795340791879727309630931025356555"
    );
}

#[test]
fn test_multi_hash_failure_propagates() {
    let stage = MultiHash::new(&signers(Arc::new(failing), Arc::new(identity)), 6);
    assert!(matches!(
        stage.hash_one("x"),
        Err(SignerError::Failed { .. })
    ));
}

#[test]
fn test_multi_hash_in_flight_items_bounded_by_workers() {
    let max_seen = Arc::new(AtomicUsize::new(0));
    let fast = counting_fast(Duration::from_millis(1), Arc::clone(&max_seen));
    let signers = signers(Arc::new(fast), Arc::new(identity));
    let stages: Vec<Box<dyn Stage>> =
        vec![Box::new(MultiHash::new(&signers, 6).with_workers(3))];
    let items: Vec<Item> = (0..300).map(Item::Number).collect();
    let out = run_pipeline(items, &stages, 100).unwrap();
    assert_eq!(out.len(), 300);
    assert!(max_seen.load(Ordering::SeqCst) <= 3 * 6);
}

// --- combine / end-to-end ---

#[test]
fn test_combine_stage_emits_one_item() {
    let progress = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&progress);
    let combine = Combine::new().with_progress(Box::new(move |n| {
        seen.fetch_add(n, Ordering::SeqCst);
    }));
    let stages: Vec<Box<dyn Stage>> = vec![Box::new(combine)];
    let items = vec![Item::from("b"), Item::from("a"), Item::from("c")];
    let out = texts(run_pipeline(items, &stages, 2).unwrap());
    assert_eq!(out, vec!["a_b_c"]);
    assert_eq!(progress.load(Ordering::SeqCst), 3);
}

#[test]
fn test_end_to_end_identity_primitives() {
    let per_item = |n: &str| -> String {
        let single = format!("{n}~{n}");
        (0..6).map(|k| format!("{k}{single}")).collect()
    };
    let expected = format!("{}_{}", per_item("0"), per_item("1"));
    assert_eq!(
        expected,
        "00~010~020~030~040~050~0_01~111~121~131~141~151~1"
    );
    for _ in 0..5 {
        let result = sign_with(&[0, 1], &identity_signers(), &no_latency()).unwrap();
        assert_eq!(result, expected);
    }
}

#[test]
fn test_end_to_end_one_sorted_fragment_per_item() {
    let inputs: Vec<i64> = (0..40).rev().collect();
    let result = sign_with(&inputs, &identity_signers(), &no_latency()).unwrap();
    let fragments: Vec<&str> = result.split('_').collect();
    assert_eq!(fragments.len(), inputs.len());
    let mut sorted = fragments.clone();
    sorted.sort();
    assert_eq!(fragments, sorted);
}

#[test]
fn test_end_to_end_many_items_with_slow_fast_digest() {
    let max_seen = Arc::new(AtomicUsize::new(0));
    let fast = counting_fast(Duration::from_millis(1), Arc::clone(&max_seen));
    let signers = signers(Arc::new(fast), Arc::new(identity));
    let opts = SignOpts {
        workers: 64,
        ..no_latency()
    };
    let inputs: Vec<i64> = (0..20_000).collect();
    let result = sign_with(&inputs, &signers, &opts).unwrap();
    let fragments: Vec<&str> = result.split('_').collect();
    assert_eq!(fragments.len(), inputs.len());
    assert!(fragments.windows(2).all(|w| w[0] <= w[1]));
    // single_hash: two calls per in-flight item; multi_hash: fan_out calls per in-flight item.
    assert!(max_seen.load(Ordering::SeqCst) <= 64 * 2 + 64 * 6);
}

#[test]
fn test_end_to_end_empty_input_is_empty_string() {
    let result = sign_with(&[], &identity_signers(), &no_latency()).unwrap();
    assert_eq!(result, "");
}

#[test]
fn test_end_to_end_real_primitives() {
    let result = sign(&[0, 1, 1, 2, 3, 5, 8], &no_latency()).unwrap();
    assert_eq!(
        result,
        "1173136728138862632818075107442090076184424490584241521304_\
         1696913515191343735512658979631549563179965036907783101867_\
         27225454331033649287118297354036464389062965355426795162684_\
         29568666068035183841425683795340791879727309630931025356555_\
         3994492081516972096677631278379039212655368881548151736_\
         4958044192186797981418233587017209679042592862002427381542_\
         4958044192186797981418233587017209679042592862002427381542"
    );
}

#[test]
fn test_end_to_end_failing_primitive_aborts_run() {
    let signers = signers(Arc::new(identity), Arc::new(failing));
    let err = sign_with(&[1, 2, 3, 4, 5], &signers, &no_latency()).unwrap_err();
    let pipeline_err = err.downcast_ref::<PipelineError>().unwrap();
    assert!(matches!(
        pipeline_err,
        PipelineError::Signer(SignerError::Failed { .. })
    ));
}

#[test]
fn test_invalid_fan_out_rejected() {
    let opts = SignOpts {
        fan_out: 0,
        ..no_latency()
    };
    let err = sign_with(&[1], &identity_signers(), &opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidConfig(_))
    ));
}

#[test]
fn test_zero_workers_rejected() {
    let opts = SignOpts {
        workers: 0,
        ..no_latency()
    };
    let err = sign_with(&[1], &identity_signers(), &opts).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::InvalidConfig(_))
    ));
}

#[test]
fn test_signing_stages_order() {
    let opts = Opts::from(&no_latency());
    let stages = signing_stages(&identity_signers(), &opts, Combine::new());
    let names: Vec<&str> = stages.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["single_hash", "multi_hash", "combine"]);
}
