//! Failure isolation, disposal and cancellation against scripted doubles.

mod common;

use kembench_core::{BenchError, Ciphertext, OperationKind, PublicKey, SecretKey, TOY_KEM_NAME};
use kembench_engine::{
    BenchmarkOrchestrator, FailureStage, PrimitiveAdapter, ProgressCallback, RunState, StopHandle,
    VariantStatus,
};

use common::{register_scripted, toy_registry, Counters, Script};

#[test]
fn test_wrong_length_performs_no_native_call() {
    let mut registry = toy_registry();
    let counters = register_scripted(&mut registry, "Scripted", Script::default());

    let adapter = PrimitiveAdapter::construct(&registry, "Scripted").unwrap();
    let err = adapter.encapsulate(&PublicKey::new(vec![0; 7])).unwrap_err();
    assert!(matches!(
        err,
        BenchError::InvalidArgument { expected: 8, actual: 7, .. }
    ));

    let err = adapter
        .decapsulate(&Ciphertext::new(vec![0; 9]), &SecretKey::new(vec![0; 8]))
        .unwrap_err();
    assert!(err.is_caller_error());

    assert_eq!(Counters::get(&counters.encapsulations), 0);
    assert_eq!(Counters::get(&counters.decapsulations), 0);
}

#[test]
fn test_dispose_twice_releases_once() {
    let mut registry = toy_registry();
    let counters = register_scripted(&mut registry, "Scripted", Script::default());

    let mut adapter = PrimitiveAdapter::construct(&registry, "Scripted").unwrap();
    adapter.dispose();
    adapter.dispose();
    drop(adapter);

    assert_eq!(Counters::get(&counters.releases), 1);
}

#[test]
fn test_verification_mismatch_aborts_only_that_variant() {
    let mut registry = toy_registry();
    let script = Script {
        corrupt_decaps: true,
        ..Script::default()
    };
    let counters = register_scripted(&mut registry, "Corrupt", script);

    let report = BenchmarkOrchestrator::new(&registry).run_benchmark(&["Corrupt", TOY_KEM_NAME], 3);

    let corrupt = &report.outcomes[0];
    assert!(corrupt.results.is_empty());
    assert!(matches!(
        corrupt.failure(),
        Some((FailureStage::Verify, BenchError::VerificationMismatch { .. }))
    ));
    let record = corrupt.verification.as_ref().unwrap();
    assert!(!record.passed);

    // One gate attempt, never retried, and the adapter was released
    assert_eq!(Counters::get(&counters.decapsulations), 1);
    assert_eq!(Counters::get(&counters.releases), 1);

    assert!(report.outcomes[1].is_success());
}

#[test]
fn test_mid_run_failure_keeps_partial_samples() {
    let mut registry = toy_registry();
    // Decapsulation #1 is the gate; timed decapsulations are #2..=#6
    let script = Script {
        fail_decaps_at: Some(4),
        ..Script::default()
    };
    let counters = register_scripted(&mut registry, "Flaky", script);

    let report = BenchmarkOrchestrator::new(&registry).run_benchmark(&["Flaky", TOY_KEM_NAME], 5);
    let flaky = &report.outcomes[0];
    assert!(matches!(flaky.status, VariantStatus::Completed));
    assert_eq!(flaky.results.len(), 3);

    let keygen = &flaky.results[0];
    let encaps = &flaky.results[1];
    let decaps = &flaky.results[2];
    assert!(keygen.is_complete());
    assert!(encaps.is_complete());

    assert_eq!(decaps.operation, OperationKind::Decapsulate);
    assert_eq!(decaps.samples.len(), 2);
    assert_eq!(decaps.summary.unwrap().count, 2);
    assert!(decaps.aborted.as_deref().unwrap().contains("scripted failure"));
    assert!(!flaky.is_success());

    assert_eq!(Counters::get(&counters.releases), 1);
    assert!(report.outcomes[1].is_success());
}

#[test]
fn test_keygen_failure_aborts_only_keygen_run() {
    let mut registry = toy_registry();
    // #1 is the gate, the timed keygen run starts at #2
    let script = Script {
        fail_keygen_at: Some(3),
        ..Script::default()
    };
    register_scripted(&mut registry, "Scripted", script);

    let report = BenchmarkOrchestrator::new(&registry).run_benchmark(&["Scripted"], 4);
    let results = &report.outcomes[0].results;
    assert_eq!(results[0].samples.len(), 1);
    assert!(results[0].aborted.is_some());
    assert!(results[1].is_complete());
    assert!(results[2].is_complete());
}

#[test]
fn test_pool_failure_reports_dependent_runs_as_aborted() {
    let mut registry = toy_registry();
    // #1 gate, #2..=#4 timed keygen, the pool starts at #5
    let script = Script {
        fail_keygen_at: Some(6),
        ..Script::default()
    };
    let counters = register_scripted(&mut registry, "Scripted", script);

    let report = BenchmarkOrchestrator::new(&registry).run_benchmark(&["Scripted"], 3);
    let results = &report.outcomes[0].results;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_complete());

    for result in &results[1..] {
        assert!(result.samples.is_empty());
        assert!(result.summary.is_none());
        assert!(result.aborted.as_deref().unwrap().contains("input pool"));
    }
    assert_eq!(Counters::get(&counters.releases), 1);
}

#[test]
fn test_every_constructed_adapter_is_released() {
    let mut registry = toy_registry();
    let ok = register_scripted(&mut registry, "Ok", Script::default());
    let bad = register_scripted(
        &mut registry,
        "Bad",
        Script {
            corrupt_decaps: true,
            ..Script::default()
        },
    );

    BenchmarkOrchestrator::new(&registry).run_benchmark(&["Ok", "Bad", "Missing", "Ok"], 2);

    assert_eq!(Counters::get(&ok.constructions), 2);
    assert_eq!(Counters::get(&ok.releases), 2);
    assert_eq!(Counters::get(&bad.constructions), 1);
    assert_eq!(Counters::get(&bad.releases), 1);
}

#[test]
fn test_stop_before_run_skips_everything() {
    let registry = toy_registry();
    let stop = StopHandle::new();
    stop.stop();

    let report = BenchmarkOrchestrator::new(&registry)
        .with_stop_handle(stop)
        .run_benchmark(&[TOY_KEM_NAME, "Kyber512"], 2);

    assert!(report.outcomes.iter().all(|o| matches!(o.status, VariantStatus::Skipped)));
    assert_eq!(report.results().count(), 0);
}

#[test]
fn test_stop_between_variants() {
    let registry = toy_registry();
    let stop = StopHandle::new();
    let trigger = stop.clone();
    let callback: ProgressCallback = Box::new(move |progress| {
        if progress.state == RunState::Report {
            trigger.stop();
        }
    });

    let mut orchestrator = BenchmarkOrchestrator::new(&registry)
        .with_progress(callback)
        .with_stop_handle(stop);
    let report = orchestrator.run_benchmark(&[TOY_KEM_NAME, TOY_KEM_NAME], 2);

    assert!(report.outcomes[0].is_success());
    assert!(matches!(report.outcomes[1].status, VariantStatus::Skipped));
    assert!(orchestrator.stop_handle().is_stopped());
}
