use serde::{Deserialize, Serialize};

use crate::config::CampaignConfig;
use crate::simulator::{Augmentation, DayRecord, Metrics};

/// Quadratic effort cost `C(E) = c1·E + c2·E²`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostFunction {
    pub c1: f64,
    pub c2: f64,
}

impl CostFunction {
    pub fn new(c1: f64, c2: f64) -> Self {
        Self { c1, c2 }
    }

    pub fn cost(&self, effort: f64) -> f64 {
        self.c1 * effort + self.c2 * effort.powi(2)
    }

    pub fn marginal(&self, effort: f64) -> f64 {
        self.c1 + 2.0 * self.c2 * effort
    }
}

impl Default for CostFunction {
    fn default() -> Self {
        Self::new(10.0, 0.5)
    }
}

/// Charges the cost of each day's effort against revenue.
#[derive(Clone, Debug, Default)]
pub struct EffortCosts {
    function: CostFunction,
    total_cost: f64,
}

impl EffortCosts {
    pub fn new(function: CostFunction) -> Self {
        Self {
            function,
            total_cost: 0.0,
        }
    }
}

impl Augmentation for EffortCosts {
    fn name(&self) -> &'static str {
        "costs"
    }

    fn reset(&mut self) {
        self.total_cost = 0.0;
    }

    fn settle(&mut self, _campaign: &CampaignConfig, record: &mut DayRecord) {
        let daily = self.function.cost(record.effort);
        self.total_cost += daily;
        record.extras.insert("daily_cost", daily);
        record.extras.insert("net_revenue", record.revenue - daily);
        record
            .extras
            .insert("cumulative_profit", record.cumulative_raised - self.total_cost);
    }

    fn finish(&self, _campaign: &CampaignConfig, history: &[DayRecord], metrics: &mut Metrics) {
        let raised = history.last().map_or(0.0, |d| d.cumulative_raised);
        let net = raised - self.total_cost;
        metrics.insert("total_cost", self.total_cost);
        metrics.insert("net_profit", net);
        // ROI is undefined without spend.
        if self.total_cost > 0.0 {
            metrics.insert("roi", net / self.total_cost * 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelParameters;
    use crate::simulator::CampaignSimulator;
    use crate::strategy::Strategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_quadratic_cost() {
        let f = CostFunction::default();
        assert_eq!(f.cost(0.0), 0.0);
        assert_eq!(f.cost(4.0), 48.0);
        assert_eq!(f.marginal(4.0), 14.0);
    }

    #[test]
    fn test_costs_and_roi() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with_noise(false)
            .with(EffortCosts::default());
        let outcome = sim.simulate(&Strategy::fixed(1.0, 4.0), &mut rng).unwrap();

        assert_eq!(outcome.metric("total_cost"), Some(30.0 * 48.0));
        let net = outcome.metric("net_profit").unwrap();
        assert!((net - (outcome.total_raised - 1440.0)).abs() < 1e-6);
        assert!((outcome.metric("roi").unwrap() - net / 1440.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_absent_without_spend() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut sim = CampaignSimulator::new(ModelParameters::default(), Default::default())
            .unwrap()
            .with(EffortCosts::default());
        let outcome = sim.simulate(&Strategy::fixed(1.0, 0.0), &mut rng).unwrap();
        assert_eq!(outcome.metric("total_cost"), Some(0.0));
        assert!(outcome.metric("roi").is_none());
    }
}
