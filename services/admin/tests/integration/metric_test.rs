use std::str::FromStr;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use backoffice_admin::domain::types::MetricQuery;
use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::alert_rule::{
    CreateAlertRuleInput, CreateAlertRuleUseCase, ListAlertRulesUseCase, UpdateAlertRuleInput,
    UpdateAlertRuleUseCase,
};
use backoffice_admin::usecase::metric::{
    IngestMetricsUseCase, MAX_BATCH, MetricInput, QueryMetricsUseCase,
};
use backoffice_domain::alert::{AlertOperator, Severity};
use backoffice_domain::kind::MetricType;
use backoffice_domain::pagination::PageRequest;

use crate::helpers::MemoryStore;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn observation(name: &str, value: &str) -> MetricInput {
    MetricInput {
        metric_type: MetricType::System,
        metric_name: name.to_owned(),
        value: dec(value),
        unit: Some("%".to_owned()),
        tags: serde_json::Map::new(),
    }
}

fn ingest(store: &MemoryStore) -> IngestMetricsUseCase<MemoryStore, MemoryStore> {
    IngestMetricsUseCase {
        metrics: store.clone(),
        rules: store.clone(),
    }
}

async fn cpu_rule(store: &MemoryStore, enabled: bool) {
    CreateAlertRuleUseCase { repo: store.clone() }
        .execute(CreateAlertRuleInput {
            name: "cpu high".to_owned(),
            metric_type: MetricType::System,
            metric_name: "cpu_usage".to_owned(),
            operator: AlertOperator::Gt,
            threshold: dec("90"),
            severity: Some(Severity::Critical),
            enabled: Some(enabled),
        })
        .await
        .unwrap();
}

// ── IngestMetricsUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_fire_matching_alert_rules_on_ingest() {
    let store = MemoryStore::new();
    cpu_rule(&store, true).await;

    let output = ingest(&store)
        .execute(vec![
            observation("cpu_usage", "95.5"),
            observation("cpu_usage", "40"),
            observation("mem_usage", "99"),
        ])
        .await
        .unwrap();

    assert_eq!(output.metrics.len(), 3);
    assert_eq!(output.alerts.len(), 1);
    assert_eq!(output.alerts[0].value, dec("95.5"));
    assert_eq!(output.alerts[0].severity, Severity::Critical);
    assert_eq!(output.alerts[0].metric_id, output.metrics[0].id);
}

#[tokio::test]
async fn should_skip_disabled_alert_rules() {
    let store = MemoryStore::new();
    cpu_rule(&store, false).await;

    let output = ingest(&store)
        .execute(vec![observation("cpu_usage", "99")])
        .await
        .unwrap();

    assert!(output.alerts.is_empty());
    assert_eq!(store.metric_count(), 1);
}

#[tokio::test]
async fn should_round_values_to_two_decimal_places() {
    let store = MemoryStore::new();

    let output = ingest(&store)
        .execute(vec![observation("latency_ms", "12.3456")])
        .await
        .unwrap();

    assert_eq!(output.metrics[0].value, dec("12.35"));
}

#[tokio::test]
async fn should_reject_bad_batches_without_storing_anything() {
    let store = MemoryStore::new();
    let usecase = ingest(&store);

    let empty = usecase.execute(Vec::new()).await;
    let oversized = usecase
        .execute(
            (0..=MAX_BATCH)
                .map(|_| observation("cpu_usage", "1"))
                .collect(),
        )
        .await;
    let out_of_range = usecase
        .execute(vec![
            observation("cpu_usage", "1"),
            observation("cpu_usage", "100000000"),
        ])
        .await;
    let blank_name = usecase.execute(vec![observation("  ", "1")]).await;
    let mut long_unit = observation("cpu_usage", "1");
    long_unit.unit = Some("u".repeat(33));
    let long_unit = usecase.execute(vec![long_unit]).await;

    for result in [empty, oversized, out_of_range, blank_name, long_unit] {
        assert!(
            matches!(result, Err(AdminServiceError::Invalid(_))),
            "expected Invalid, got {:?}",
            result.map(|o| o.metrics.len())
        );
    }
    assert_eq!(store.metric_count(), 0);
}

// ── QueryMetricsUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_query_by_name_newest_first() {
    let store = MemoryStore::new();
    let usecase = ingest(&store);
    usecase
        .execute(vec![observation("cpu_usage", "10")])
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    usecase
        .execute(vec![
            observation("cpu_usage", "20"),
            observation("mem_usage", "30"),
        ])
        .await
        .unwrap();

    let page = QueryMetricsUseCase { repo: store.clone() }
        .execute(
            MetricQuery {
                metric_type: Some(MetricType::System),
                metric_name: Some("cpu_usage".to_owned()),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    let values: Vec<Decimal> = page.items.iter().map(|m| m.value).collect();
    assert_eq!(values, vec![dec("20"), dec("10")]);
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn should_return_nothing_outside_time_range() {
    let store = MemoryStore::new();
    ingest(&store)
        .execute(vec![observation("cpu_usage", "10")])
        .await
        .unwrap();
    let later = Utc::now() + Duration::hours(1);

    let page = QueryMetricsUseCase { repo: store.clone() }
        .execute(
            MetricQuery {
                from: Some(later),
                to: Some(later + Duration::hours(1)),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert!(page.items.is_empty());
}

#[tokio::test]
async fn should_reject_inverted_time_range() {
    let now = Utc::now();

    let result = QueryMetricsUseCase {
        repo: MemoryStore::new(),
    }
    .execute(
        MetricQuery {
            from: Some(now),
            to: Some(now - Duration::minutes(5)),
            ..Default::default()
        },
        PageRequest::default(),
    )
    .await;

    assert!(matches!(result, Err(AdminServiceError::Invalid(_))));
}

// ── Alert rule thresholds ────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_threshold_beyond_column_range_on_create() {
    let store = MemoryStore::new();

    let result = CreateAlertRuleUseCase { repo: store.clone() }
        .execute(CreateAlertRuleInput {
            name: "disk huge".to_owned(),
            metric_type: MetricType::System,
            metric_name: "disk_bytes".to_owned(),
            operator: AlertOperator::Gt,
            threshold: dec("1000000000000"),
            severity: None,
            enabled: None,
        })
        .await;

    assert!(matches!(result, Err(AdminServiceError::Invalid("threshold"))));
    let rules = ListAlertRulesUseCase { repo: store.clone() }.execute().await.unwrap();
    assert!(rules.is_empty());
}

#[tokio::test]
async fn should_reject_threshold_beyond_column_range_on_update() {
    let store = MemoryStore::new();
    cpu_rule(&store, true).await;
    let list = ListAlertRulesUseCase { repo: store.clone() };
    let id = list.execute().await.unwrap()[0].id;

    let result = UpdateAlertRuleUseCase { repo: store.clone() }
        .execute(
            id,
            UpdateAlertRuleInput {
                threshold: Some(dec("-1000000000000")),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AdminServiceError::Invalid("threshold"))));
    assert_eq!(list.execute().await.unwrap()[0].threshold, dec("90"));
}
