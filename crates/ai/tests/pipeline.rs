//! End-to-end: catalog provider → session → ordered results.

use std::sync::Arc;
use std::thread;

use stockwise_ai::{
    AiError, BufferTracker, CancellationToken, PipelineConfig, PredictionSession,
    ReorderRule, RunPhase, TrainingConfig, aggregate, build_dataset, derive_label, derive_metric,
    feature_row, predict, train,
};
use stockwise_catalog::{CatalogProvider, InMemoryCatalog};
use stockwise_core::ProductRecord;

fn store_catalog() -> Vec<ProductRecord> {
    let mut records = vec![
        ProductRecord::new("Widget", 10.0, 7.0, 2.0),
        ProductRecord::new("Gadget", 21.0, 7.0, 5.0),
        ProductRecord::partial("Sprocket", Some(5.0), None, Some(10.0)),
    ];
    for i in 0..45 {
        let sales = 3.0 + (i % 9) as f64;
        let lead = 1.0 + (i % 6) as f64;
        let point = sales * lead;
        let stock = if i % 3 == 0 { point * 0.25 } else { point * 4.0 };
        records.push(ProductRecord::new(format!("SKU-{i:03}"), stock, sales, lead));
    }
    records
}

fn config(rule: ReorderRule) -> PipelineConfig {
    PipelineConfig::new(rule).with_training(
        TrainingConfig::default()
            .with_epochs(200)
            .with_batch_size(16)
            .with_learning_rate(0.01),
    )
}

#[test]
fn widget_and_gadget_worked_examples() {
    let widget = ProductRecord::new("Widget", 10.0, 7.0, 2.0);
    let metric = derive_metric(ReorderRule::ReorderPoint, Some(10.0), Some(7.0), Some(2.0));
    assert_eq!(metric, 14.0);
    assert!(derive_label(ReorderRule::ReorderPoint, &widget, metric).is_reorder());
    assert_eq!(feature_row(&widget), [10.0, 7.0, 2.0]);

    let gadget = ProductRecord::new("Gadget", 21.0, 7.0, 5.0);
    let metric = derive_metric(ReorderRule::DaysToReplenish, Some(21.0), Some(7.0), Some(5.0));
    assert_eq!(metric, 21.0);
    assert!(!derive_label(ReorderRule::DaysToReplenish, &gadget, metric).is_reorder());
}

#[test]
fn full_run_preserves_order_and_learns_the_rule() {
    let provider = InMemoryCatalog::new(store_catalog());
    let session = PredictionSession::new(config(ReorderRule::ReorderPoint));
    session.load_catalog(&provider).unwrap();

    let report = session.run(&CancellationToken::new()).unwrap();
    let catalog = provider.fetch().unwrap();

    assert_eq!(report.results.len(), catalog.len());
    for (result, record) in report.results.iter().zip(&catalog) {
        assert_eq!(result.name, record.name);
        assert_eq!(result.derived_metric, ReorderRule::ReorderPoint.metric(record));
    }

    let dataset = build_dataset(ReorderRule::ReorderPoint, &catalog);
    let agreeing = report
        .results
        .iter()
        .zip(dataset.labels.iter())
        .filter(|(r, y)| r.decision.is_reorder() == (**y == 1.0))
        .count();
    assert!(
        agreeing as f64 / catalog.len() as f64 >= 0.85,
        "model agrees with the rule on only {agreeing}/{} products",
        catalog.len()
    );

    assert_eq!(session.phase(), RunPhase::Idle);
    assert_eq!(session.live_buffers(), 0);
}

#[test]
fn days_to_replenish_deployment_reports_days_left() {
    let session = PredictionSession::new(config(ReorderRule::DaysToReplenish));
    session
        .load_catalog(&InMemoryCatalog::new(store_catalog()))
        .unwrap();

    let report = session.run(&CancellationToken::new()).unwrap();
    assert_eq!(report.rule, ReorderRule::DaysToReplenish);
    assert_eq!(report.results[1].name, "Gadget");
    assert_eq!(report.results[1].derived_metric, 21.0);
    // No sales recorded -> unbounded runway
    assert_eq!(report.results[2].derived_metric, 999.0);
}

#[test]
fn pipeline_functions_compose_without_a_session() {
    let catalog = vec![
        ProductRecord::new("A", 1.0, 10.0, 10.0),
        ProductRecord::new("B", 500.0, 1.0, 1.0),
        ProductRecord::new("C", 2.0, 5.0, 5.0),
    ];
    let buffers = BufferTracker::new();
    let cancel = CancellationToken::new();
    let rule = ReorderRule::ReorderPoint;

    let dataset = build_dataset(rule, &catalog);
    let (model, _) = train(&dataset, &TrainingConfig::default().with_epochs(10), &buffers, &cancel).unwrap();
    let results = aggregate(rule, &catalog, &model, &buffers, &cancel).unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);

    // Re-running inference on an unchanged model is deterministic.
    for (record, result) in catalog.iter().zip(&results) {
        let again = predict(&model, record, &buffers);
        assert_eq!(again.probability, result.probability);
        assert_eq!(again.decision, result.decision);
    }
    assert_eq!(buffers.live(), 0);
}

#[test]
fn unreachable_catalog_prevents_any_run() {
    let session = PredictionSession::new(config(ReorderRule::ReorderPoint));
    let err = session
        .load_catalog(&InMemoryCatalog::failing("connection refused"))
        .unwrap_err();
    assert!(matches!(err, AiError::CatalogUnavailable(_)));

    let report = session.run(&CancellationToken::new()).unwrap();
    assert!(report.is_empty());
    assert!(report.history.is_none());
}

#[test]
fn concurrent_callers_get_one_run_at_a_time() {
    let session = Arc::new(PredictionSession::new(config(ReorderRule::ReorderPoint)));
    session
        .load_catalog(&InMemoryCatalog::new(store_catalog()))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || session.run(&CancellationToken::new()))
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
    assert!(succeeded >= 1);
    for outcome in outcomes.iter().filter_map(|o| o.as_ref().err()) {
        assert!(matches!(outcome, AiError::RunInProgress(_)));
    }

    assert_eq!(session.phase(), RunPhase::Idle);
    assert_eq!(session.live_buffers(), 0);
    assert_eq!(session.results().len(), store_catalog().len());
}

#[test]
fn cancellation_from_another_thread_is_honoured() {
    let session = Arc::new(PredictionSession::new(
        PipelineConfig::default().with_training(TrainingConfig::default().with_epochs(1_000_000)),
    ));
    session
        .load_catalog(&InMemoryCatalog::new(store_catalog()))
        .unwrap();

    let cancel = CancellationToken::new();
    let runner = {
        let session = Arc::clone(&session);
        let cancel = cancel.clone();
        thread::spawn(move || session.run(&cancel))
    };

    thread::sleep(std::time::Duration::from_millis(50));
    cancel.cancel();

    let outcome = runner.join().unwrap();
    assert_eq!(outcome.unwrap_err(), AiError::Cancelled);
    assert_eq!(session.phase(), RunPhase::Idle);
    assert_eq!(session.live_buffers(), 0);
    assert!(!session.has_model());
}
