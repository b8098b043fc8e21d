use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crowdfund_simulation::catalog;
use crowdfund_simulation::estimator::estimate_from_history;
use crowdfund_simulation::strategy::CustomStrategy;
use crowdfund_simulation::{
    simulate_campaign, BaseParameters, CampaignConfig, CampaignSimulator, CampaignValidator,
    ExperimentRunner, ModelParameters, SimError, StrategyContext, StrategyKind,
};

fn noiseless() -> BaseParameters {
    BaseParameters {
        sigma: 0.0,
        ..BaseParameters::default()
    }
}

#[test]
fn test_reference_campaign() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = simulate_campaign(&noiseless(), false, &mut rng).unwrap();

    let daily = 1000.0 * 5f64.sqrt();
    assert_eq!(outcome.history.len(), 30);
    for day in &outcome.history {
        assert!((day.demand - daily).abs() < 1e-6);
        assert_eq!(day.price, 1.0);
        assert_eq!(day.effort, 5.0);
    }
    assert!((outcome.total_raised - 67_082.039).abs() < 1e-2);
    assert!(!outcome.success);
    assert!((outcome.final_percent_complete() - 67.082).abs() < 1e-2);

    let raised: Vec<f64> = outcome.history.iter().map(|d| d.cumulative_raised).collect();
    assert!(raised.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn test_constant_campaign_pattern() {
    let base = noiseless();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = simulate_campaign(&base, false, &mut rng).unwrap();
    let report = CampaignValidator::new()
        .generate_report(&outcome, &base.model().unwrap(), &base.campaign().unwrap())
        .unwrap();

    // Cut points land after day 7 and day 24 of 30.
    let shares = report.funding_pattern.shares;
    assert!((shares.first - 7.0 / 30.0).abs() < 1e-9);
    assert!((shares.middle - 17.0 / 30.0).abs() < 1e-9);
    assert!((shares.last - 6.0 / 30.0).abs() < 1e-9);
    assert!(report.parameters.is_valid);
}

#[test]
fn test_estimator_recovers_simulated_law() {
    let campaign = CampaignConfig::new(36, 1e12, 1.0).unwrap();
    let mut sim =
        CampaignSimulator::new(ModelParameters::new(1000.0, 0.5, 1.2, 0.0).unwrap(), campaign)
            .unwrap()
            .with_noise(false);
    // Every (price, effort) pair appears equally often, so the regressors are
    // uncorrelated and the fit is exact.
    let strategy = CustomStrategy::new(
        "grid",
        |ctx: &StrategyContext| 1.0 + 0.25 * ((ctx.day - 1) % 3) as f64,
        |ctx: &StrategyContext| 2.0 + 1.5 * (((ctx.day - 1) / 3) % 4) as f64,
    );
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let outcome = sim.simulate(&strategy, &mut rng).unwrap();

    let est = estimate_from_history(&outcome.history).unwrap();
    assert!((est.alpha - 1000.0).abs() < 1e-6);
    assert!((est.beta - 0.5).abs() < 1e-9);
    assert!((est.gamma - 1.2).abs() < 1e-9);
    assert!(est.regressor_correlation.abs() < 1e-9);
}

#[test]
fn test_seeded_sweep_is_reproducible_across_threads() {
    let spec = catalog::lookup("price-elasticity").unwrap();
    let base = BaseParameters::default();
    let parallel = spec.run(&base, &ExperimentRunner::new(6).with_seed(42)).unwrap();
    let sequential = spec
        .run(&base, &ExperimentRunner::new(6).with_seed(42).sequential())
        .unwrap();

    assert_eq!(parallel.sweep.seed, 42);
    assert_eq!(parallel.sweep.optimal, sequential.sweep.optimal);
    for (a, b) in parallel.sweep.results.iter().zip(&sequential.sweep.results) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.success_rate, b.success_rate);
        assert_eq!(a.mean("total_raised"), b.mean("total_raised"));
        assert_eq!(a.completed, 6);
    }
}

#[test]
fn test_unit_price_makes_gamma_irrelevant() {
    let spec = catalog::lookup("price-elasticity").unwrap();
    let report = spec
        .run(&noiseless(), &ExperimentRunner::new(1).with_seed(0))
        .unwrap();
    let raised: Vec<f64> = report
        .sweep
        .results
        .iter()
        .map(|r| r.mean("total_raised").unwrap())
        .collect();
    // At a unit price γ has no effect on demand.
    assert!(raised.windows(2).all(|w| (w[0] - w[1]).abs() < 1e-6));
}

#[test]
fn test_multi_round_setup_reports_rounds() {
    let grid = catalog::lookup("multi-round")
        .unwrap()
        .scenarios(&BaseParameters::default());
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let three = grid
        .iter()
        .find(|s| s.name == "Three Equal Rounds")
        .unwrap();
    let outcome = three.config.simulate(&mut rng).unwrap();
    assert_eq!(outcome.metric("rounds_completed"), Some(3.0));
    assert_eq!(outcome.history.len(), 30);
}

#[test]
fn test_unknown_experiment() {
    let err = catalog::lookup("time-travel").err().unwrap();
    assert!(matches!(err, SimError::UnknownExperiment { .. }));
    assert!(err.to_string().contains("time-travel"));
}

#[test]
fn test_json_parameters_fill_defaults() {
    let base = BaseParameters::from_json_str(r#"{ "duration": 45, "strategy": "dynamic" }"#)
        .unwrap();
    assert_eq!(base.duration, 45);
    assert_eq!(base.strategy, StrategyKind::Dynamic);
    assert_eq!(base.alpha, 1000.0);

    assert!(matches!(
        BaseParameters::from_json_str("{ not json"),
        Err(SimError::Config(_))
    ));
    assert!(BaseParameters::from_json_str(r#"{ "alpha": -1.0 }"#).is_err());
}
