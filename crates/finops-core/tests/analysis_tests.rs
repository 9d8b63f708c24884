//! Integration tests for the analysis orchestrator

use finops_core::demo::demo_dataset;
use finops_core::engine::{Forecaster, GovernanceChecker, Optimizer, WasteDetector};
use finops_core::{
    AnalysisConfig, AnalysisError, AnalysisRequest, Analyzer, ComputeInstance, CostDataset, Engine,
    ResourceState, Tags, ValidationError,
};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::default()).expect("metrics registry")
}

#[test]
fn test_full_analysis_of_demo_dataset() {
    let dataset = demo_dataset("us-east-1");
    let result = analyzer()
        .run(&dataset, &AnalysisRequest::full().with_forecast(12))
        .unwrap();

    assert_eq!(result.metadata.account_id, "DEMO-123456789");
    assert_eq!(result.metadata.region, "us-east-1");

    let waste = result.waste.as_ref().unwrap();
    assert_eq!(waste.total_items, 10);

    let optimization = result.optimization.as_ref().unwrap();
    assert_eq!(optimization.quick_wins.len(), 3);
    assert_eq!(optimization.long_term.len(), 1);

    let forecast = result.forecast.as_ref().unwrap();
    assert_eq!(forecast.scenarios.len(), 3);
    assert_eq!(forecast.current_monthly, 45234.50);

    let governance = result.governance.as_ref().unwrap();
    assert_eq!(governance.untagged_resources, 10);

    assert!(result.visibility.is_some());
}

#[test]
fn test_request_selects_engines() {
    let dataset = demo_dataset("us-east-1");
    let request = AnalysisRequest {
        governance: true,
        ..AnalysisRequest::default()
    };
    let result = analyzer().run(&dataset, &request).unwrap();

    assert!(result.governance.is_some());
    assert!(result.waste.is_none());
    assert!(result.optimization.is_none());
    assert!(result.forecast.is_none());
    assert!(result.visibility.is_none());
}

#[test]
fn test_optimization_implies_waste() {
    let dataset = demo_dataset("us-east-1");
    let request = AnalysisRequest {
        optimization: true,
        ..AnalysisRequest::default()
    };
    let result = analyzer().run(&dataset, &request).unwrap();
    assert!(result.waste.is_some());
    assert!(result.optimization.is_some());
}

#[test]
fn test_invalid_dataset_rejected_before_engines() {
    let mut dataset = demo_dataset("us-east-1");
    dataset.total_monthly_cost = -10.0;

    let analyzer = analyzer();
    let err = analyzer
        .run(&dataset, &AnalysisRequest::full())
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Validation(ValidationError::NegativeCost { .. })
    ));
    assert_eq!(analyzer.metrics().analyses_total(), 0);
}

#[test]
fn test_zero_horizon_names_forecast_engine() {
    let dataset = demo_dataset("us-east-1");
    let err = analyzer()
        .run(&dataset, &AnalysisRequest::default().with_forecast(0))
        .unwrap_err();
    assert_eq!(err.engine(), Some(Engine::Forecast));
}

#[test]
fn test_engines_are_idempotent() {
    let config = AnalysisConfig::default();
    let dataset = demo_dataset("us-east-1");

    let detector = WasteDetector::new(&config);
    let first = serde_json::to_string(&detector.detect(&dataset)).unwrap();
    let second = serde_json::to_string(&detector.detect(&dataset)).unwrap();
    assert_eq!(first, second);

    let waste = detector.detect(&dataset);
    let optimizer = Optimizer::new(&config);
    assert_eq!(
        serde_json::to_string(&optimizer.optimize(&dataset, &waste)).unwrap(),
        serde_json::to_string(&optimizer.optimize(&dataset, &waste)).unwrap()
    );

    let forecaster = Forecaster::new(&config.forecast);
    assert_eq!(
        serde_json::to_string(&forecaster.forecast(1234.56, 12).unwrap()).unwrap(),
        serde_json::to_string(&forecaster.forecast(1234.56, 12).unwrap()).unwrap()
    );

    let checker = GovernanceChecker::new(&config.governance);
    assert_eq!(
        serde_json::to_string(&checker.check(&dataset)).unwrap(),
        serde_json::to_string(&checker.check(&dataset)).unwrap()
    );
}

#[test]
fn test_waste_total_equals_finding_sum_for_generated_inventories() {
    let config = AnalysisConfig::default();
    let types = ["t3.micro", "m5.large", "unknown.type", "r5.xlarge"];

    for n in 0..20usize {
        let mut dataset = CostDataset::new("acct", "us-east-1", chrono::Utc::now());
        dataset.instances = (0..n)
            .map(|i| ComputeInstance {
                id: format!("i-{}", i),
                instance_type: types[i % types.len()].to_string(),
                state: if i % 3 == 0 {
                    ResourceState::Stopped
                } else {
                    ResourceState::Running
                },
                cpu_avg: if i % 4 == 0 { None } else { Some((i * 7 % 10) as f64) },
                tags: Tags::new(),
            })
            .collect();

        let report = WasteDetector::new(&config).detect(&dataset);
        let mut sum = 0.0;
        for finding in report.categories.findings() {
            sum += finding.monthly_cost;
        }
        assert_eq!(report.total_monthly_savings, sum);
        assert!(report
            .categories
            .idle_compute
            .iter()
            .all(|f| dataset.instances.iter().any(|i| i.id == f.resource_id && i.cpu_avg.is_some())));
    }
}

#[test]
fn test_bottom_line_and_action_plan() {
    let dataset = demo_dataset("us-east-1");
    let result = analyzer().run(&dataset, &AnalysisRequest::full()).unwrap();

    let bottom = result.bottom_line(dataset.total_monthly_cost);
    let waste = result.waste.as_ref().unwrap().total_monthly_savings;
    let optimization = result.optimization.as_ref().unwrap().total_potential_savings;
    assert!((bottom.total_monthly_savings - (waste + optimization)).abs() < 1e-9);
    assert!((bottom.optimized_monthly_spend - (45234.50 - waste - optimization)).abs() < 1e-6);
    assert!(bottom.reduction_percent > 0.0 && bottom.reduction_percent < 100.0);

    assert_eq!(result.action_plan().len(), 5);
}

#[test]
fn test_bottom_line_zero_spend() {
    let dataset = CostDataset::new("acct", "us-east-1", chrono::Utc::now());
    let result = analyzer().run(&dataset, &AnalysisRequest::full()).unwrap();
    let bottom = result.bottom_line(0.0);
    assert_eq!(bottom.reduction_percent, 0.0);
    assert_eq!(result.governance.unwrap().tag_compliance, 100.0);
}

#[test]
fn test_metrics_recorded_per_run() {
    let analyzer = analyzer();
    let dataset = demo_dataset("us-east-1");
    analyzer.run(&dataset, &AnalysisRequest::full()).unwrap();
    analyzer.run(&dataset, &AnalysisRequest::full()).unwrap();

    assert_eq!(analyzer.metrics().analyses_total(), 2);
    let text = analyzer.metrics().encode_text().unwrap();
    assert!(text.contains("finops_waste_findings{category=\"aged_snapshots\"} 3"));
    assert!(text.contains("engine=\"governance\""));
}

#[test]
fn test_dataset_json_round_trip_through_analysis() {
    let json = r#"{
        "account_id": "111122223333",
        "region": "us-west-2",
        "collection_time": "2024-05-01T12:00:00Z",
        "ec2_instances": [
            {"id": "i-a", "type": "t3.small", "state": "running", "cpu_avg": 1.0,
             "tags": {"Environment": "dev", "Team": "web", "CostCenter": "cc-1"}},
            {"id": "i-b", "type": "t3.small", "state": "running", "cpu_avg": null}
        ],
        "ebs_volumes": [
            {"id": "vol-a", "size_gb": 100, "type": "gp2", "state": "available", "attached": false}
        ],
        "total_monthly_cost": 1000.0,
        "costs_by_service": {"EC2": 18450.00, "RDS": 12300.00}
    }"#;
    let dataset: CostDataset = serde_json::from_str(json).unwrap();
    let result = analyzer()
        .run(&dataset, &AnalysisRequest::full().with_forecast(2))
        .unwrap();

    let waste = result.waste.unwrap();
    assert_eq!(waste.categories.idle_compute.len(), 1);
    assert!((waste.categories.orphaned_volumes[0].monthly_cost - 10.0).abs() < 1e-9);

    let visibility = result.visibility.unwrap();
    assert!((visibility.by_service[0].percentage - 60.0).abs() < 1e-9);
    assert!((visibility.by_service[1].percentage - 40.0).abs() < 1e-9);

    let conservative = &result.forecast.unwrap().scenarios[1];
    assert_eq!(conservative.projections[0].cost, 840.00);
    assert_eq!(conservative.projections[1].cost, 882.00);

    let governance = result.governance.unwrap();
    assert_eq!(governance.compliant_resources, 1);
    assert_eq!(governance.untagged_resources, 2);
    assert_eq!(governance.tag_compliance, 33.3);
}
