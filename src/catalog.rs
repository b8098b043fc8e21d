//! Registered experiments.
//!
//! Every experiment is a row in [`EXPERIMENTS`]: an id, a trial count, an
//! objective and a function that expands the caller's base parameters into
//! a grid of [`Setup`] scenarios. One generic sweep executes all of them.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::warn;

use crate::config::{BaseParameters, StrategyKind};
use crate::demand::{MarketRegime, Shock};
use crate::error::{Result, SimError};
use crate::experiment::{ExperimentRunner, Objective, Scenario, SweepReport};
use crate::extensions::{
    CostFunction, EffortCosts, EntrepreneurType, FeeScheme, FundingThresholds, Governance,
    IncentiveMechanism, MarketConditions, NetworkEffects, PlatformFeature, PlatformFees,
    PlatformKind, PlatformOffer, PrincipalAgent, SuccessMetrics,
};
use crate::multi_round::{MultiRoundCampaign, RoundPlan};
use crate::simulator::{CampaignOutcome, CampaignSimulator};
use crate::strategy::{
    CurveShape, CustomStrategy, EffortShape, PriceStep, PricingStrategy, Strategy,
    StrategyContext, DEFAULT_EFFORT, DEFAULT_EFFORT_BUDGET,
};
use crate::validator::{CampaignValidator, ValidationReport};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NetworkSetup {
    pub viral_coefficient: f64,
    pub platform: PlatformKind,
    pub initial_engagement: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AgentSetup {
    pub entrepreneur: EntrepreneurType,
    pub information_asymmetry: f64,
    pub mechanism: IncentiveMechanism,
    pub governance: Governance,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoundSetup {
    /// Fraction of the base target raised in this round.
    pub target_share: f64,
    pub duration: u32,
    pub strategy: StrategyKind,
}

/// Everything needed to build and run one trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Setup {
    pub base: BaseParameters,
    /// Overrides the selector strategy of `base`.
    pub strategy: Option<Strategy>,
    /// Multiplies whatever effort the strategy chooses.
    pub effort_scale: Option<f64>,
    pub fees: Option<FeeScheme>,
    pub market: Option<MarketConditions>,
    pub network: Option<NetworkSetup>,
    pub agent: Option<AgentSetup>,
    pub costs: Option<CostFunction>,
    /// Funding thresholds, scored together with community, brand and network growth.
    pub thresholds: Option<FundingThresholds>,
    pub platform: Option<PlatformOffer>,
    pub rounds: Vec<RoundSetup>,
}

impl Setup {
    pub fn new(base: BaseParameters) -> Self {
        Self {
            base,
            strategy: None,
            effort_scale: None,
            fees: None,
            market: None,
            network: None,
            agent: None,
            costs: None,
            thresholds: None,
            platform: None,
            rounds: Vec::new(),
        }
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn fees(mut self, scheme: FeeScheme) -> Self {
        self.fees = Some(scheme);
        self
    }

    pub fn market(mut self, market: MarketConditions) -> Self {
        self.market = Some(market);
        self
    }

    pub fn network(mut self, viral_coefficient: f64, platform: PlatformKind) -> Self {
        self.network = Some(NetworkSetup {
            viral_coefficient,
            platform,
            initial_engagement: 0.0,
        });
        self
    }

    pub fn agent(
        mut self,
        entrepreneur: EntrepreneurType,
        information_asymmetry: f64,
        mechanism: IncentiveMechanism,
        governance: Governance,
    ) -> Self {
        self.agent = Some(AgentSetup {
            entrepreneur,
            information_asymmetry,
            mechanism,
            governance,
        });
        self
    }

    fn selected_strategy(&self) -> Strategy {
        self.strategy.clone().unwrap_or_else(|| {
            Strategy::from_kind(self.base.strategy, self.base.initial_price, self.base.duration)
        })
    }

    pub fn simulate<R: RngCore>(&self, rng: &mut R) -> Result<CampaignOutcome> {
        let base = &self.base;
        if !self.rounds.is_empty() {
            let plans = self
                .rounds
                .iter()
                .map(|r| {
                    RoundPlan::new(
                        base.target * r.target_share,
                        r.duration,
                        base.initial_price,
                        Strategy::from_kind(r.strategy, base.initial_price, r.duration),
                    )
                })
                .collect();
            let outcome = MultiRoundCampaign::new(base.model()?, plans)?.simulate(rng)?;
            return Ok(outcome.into_outcome());
        }

        let mut sim = CampaignSimulator::from_base(base)?;
        if let Some(market) = &self.market {
            market.validate()?;
        }
        if let Some(scheme) = self.fees {
            sim = sim.with(PlatformFees::new(scheme));
        }
        if let Some(market) = &self.market {
            sim = sim.with(market.clone());
        }
        if let Some(n) = self.network {
            sim = sim.with(
                NetworkEffects::new(n.viral_coefficient, n.platform)
                    .with_initial_engagement(n.initial_engagement),
            );
        }
        if let Some(a) = self.agent {
            sim = sim.with(
                PrincipalAgent::new(a.entrepreneur, a.information_asymmetry)
                    .with_mechanism(a.mechanism)
                    .with_governance(a.governance),
            );
        }
        if let Some(costs) = self.costs {
            sim = sim.with(EffortCosts::new(costs));
        }
        if let Some(thresholds) = self.thresholds {
            sim = sim.with(SuccessMetrics::new(thresholds));
        }
        if let Some(offer) = &self.platform {
            sim = sim.with(offer.clone());
        }

        let strategy = self.selected_strategy();
        let mut outcome = match self.effort_scale {
            Some(scale) => {
                let scaled = CustomStrategy::new(
                    strategy.name(),
                    |ctx: &StrategyContext| strategy.price(ctx),
                    |ctx: &StrategyContext| strategy.effort(ctx) * scale,
                );
                sim.simulate(&scaled, rng)?
            }
            None => sim.simulate(&strategy, rng)?,
        };

        let total_effort: f64 = outcome.history.iter().map(|d| d.effort).sum();
        if total_effort > 0.0 {
            outcome
                .metrics
                .insert("effort_efficiency", outcome.total_raised / total_effort);
        }
        Ok(outcome)
    }
}

pub struct ExperimentSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub trials: usize,
    pub objective: Objective,
    grid: fn(&BaseParameters) -> Vec<Scenario<Setup>>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExperimentReport {
    pub id: &'static str,
    pub name: &'static str,
    pub objective: String,
    pub sweep: SweepReport<Setup>,
    /// Plausibility of one seeded run of the optimal scenario.
    pub validation: Option<ValidationReport>,
}

impl ExperimentReport {
    pub fn print(&self) {
        println!("{} ({})", self.name, self.id);
        println!("  Objective: {}   Seed: {}", self.objective, self.sweep.seed);
        self.sweep.print();
        if let Some(best) = self.sweep.optimal() {
            println!("  Optimum: {} ({:.1}% success)", best.name, best.success_rate);
        }
        if let Some(validation) = &self.validation {
            validation.print();
        }
    }
}

impl ExperimentSpec {
    pub fn scenarios(&self, base: &BaseParameters) -> Vec<Scenario<Setup>> {
        (self.grid)(base)
    }

    pub fn runner(&self) -> ExperimentRunner {
        ExperimentRunner::new(self.trials)
    }

    pub fn run(&self, base: &BaseParameters, runner: &ExperimentRunner) -> Result<ExperimentReport> {
        base.validate()?;
        let sweep = runner.run(
            self.scenarios(base),
            |setup: &Setup, rng: &mut ChaCha8Rng| setup.simulate(rng),
            self.objective,
        );

        let validation = match sweep.optimal() {
            Some(best) => match validate_optimum(&best.config, sweep.seed) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(experiment = self.id, error = %e, "optimum validation failed");
                    None
                }
            },
            None => None,
        };

        Ok(ExperimentReport {
            id: self.id,
            name: self.name,
            objective: self.objective.describe(),
            sweep,
            validation,
        })
    }
}

fn validate_optimum(setup: &Setup, seed: u64) -> Result<ValidationReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let outcome = setup.simulate(&mut rng)?;
    let base = &setup.base;
    CampaignValidator::new().generate_report(&outcome, &base.model()?, &base.campaign()?)
}

pub fn lookup(id: &str) -> Result<&'static ExperimentSpec> {
    EXPERIMENTS
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| SimError::UnknownExperiment { id: id.to_string() })
}

pub fn ids() -> impl Iterator<Item = &'static str> {
    EXPERIMENTS.iter().map(|e| e.id)
}

fn with_base(b: &BaseParameters, edit: impl FnOnce(&mut BaseParameters)) -> Setup {
    let mut base = b.clone();
    edit(&mut base);
    Setup::new(base)
}

fn duration_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [7, 14, 30, 60, 90]
        .into_iter()
        .map(|d| Scenario::new(format!("{d} days"), with_base(b, |p| p.duration = d)))
        .collect()
}

fn price_elasticity_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [0.5, 0.8, 1.0, 1.2, 1.5, 1.8, 2.0]
        .into_iter()
        .map(|g| Scenario::new(format!("γ = {g}"), with_base(b, |p| p.gamma = g)))
        .collect()
}

fn effort_elasticity_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9]
        .into_iter()
        .map(|beta| {
            let mut setup = with_base(b, |p| p.beta = beta);
            setup.costs = Some(CostFunction::default());
            Scenario::new(format!("β = {beta}"), setup)
        })
        .collect()
}

fn cross_elasticity_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    let mut grid = Vec::new();
    for beta in [0.3, 0.5, 0.7] {
        for gamma in [0.8, 1.2, 1.6] {
            grid.push(Scenario::new(
                format!("β = {beta}, γ = {gamma}"),
                with_base(b, |p| {
                    p.beta = beta;
                    p.gamma = gamma;
                }),
            ));
        }
    }
    grid
}

fn static_pricing_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    let p = b.initial_price;
    let t = b.duration;
    let steps = vec![
        PriceStep { day: 1, price: p },
        PriceStep { day: 10, price: p * 0.8 },
        PriceStep { day: 20, price: p * 0.6 },
    ];
    vec![
        ("Fixed Price", Strategy::fixed(p, DEFAULT_EFFORT)),
        (
            "Linear Decay (50% reduction)",
            Strategy::linear_path(p, p * 0.5, t, DEFAULT_EFFORT),
        ),
        (
            "Linear Increase (50% increase)",
            Strategy::linear_path(p, p * 1.5, t, DEFAULT_EFFORT),
        ),
        (
            "Step Function (3 steps)",
            Strategy::step_function(p, steps, DEFAULT_EFFORT),
        ),
    ]
    .into_iter()
    .map(|(name, s)| Scenario::new(name, Setup::new(b.clone()).strategy(s)))
    .collect()
}

fn dynamic_pricing_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    let p = b.initial_price;
    let t = b.duration;
    let budget = DEFAULT_EFFORT_BUDGET;
    vec![
        ("Basic Dynamic", Strategy::dynamic(p, budget, t)),
        ("Adaptive (Low Sensitivity)", Strategy::adaptive(p, budget, t, 0.05)),
        ("Adaptive (Medium Sensitivity)", Strategy::adaptive(p, budget, t, 0.1)),
        ("Adaptive (High Sensitivity)", Strategy::adaptive(p, budget, t, 0.2)),
    ]
    .into_iter()
    .map(|(name, s)| Scenario::new(name, Setup::new(b.clone()).strategy(s)))
    .collect()
}

fn bonding_curve_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        (CurveShape::Linear, 0.5),
        (CurveShape::Linear, 1.0),
        (CurveShape::Exponential, 0.3),
        (CurveShape::Exponential, 0.5),
        (CurveShape::Logarithmic, 0.5),
        (CurveShape::Sigmoid, 1.0),
    ]
    .into_iter()
    .map(|(shape, k)| {
        Scenario::new(
            format!("{} ({k})", shape.name()),
            Setup::new(b.clone()).strategy(Strategy::bonding(b.initial_price, shape, k)),
        )
    })
    .collect()
}

fn effort_pattern_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    EffortShape::all()
        .into_iter()
        .map(|shape| {
            let s = Strategy::effort_pattern(
                b.initial_price,
                shape,
                DEFAULT_EFFORT_BUDGET,
                b.duration,
            );
            Scenario::new(shape.name(), Setup::new(b.clone()).strategy(s))
        })
        .collect()
}

fn effort_allocation_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    let base_effort = DEFAULT_EFFORT_BUDGET / b.duration as f64;
    [
        (0.6, 0.2, 0.2, "Marketing-Heavy (60/20/20)"),
        (0.4, 0.4, 0.2, "Balanced (40/40/20)"),
        (0.33, 0.33, 0.34, "Equal Split (33/33/34)"),
        (0.2, 0.6, 0.2, "Development-Heavy (20/60/20)"),
        (0.3, 0.2, 0.5, "Community-Heavy (30/20/50)"),
    ]
    .into_iter()
    .map(|(marketing, development, community, name)| {
        // Marketing acts directly, development with delay, community via momentum.
        let effectiveness = marketing * 1.2 + development * 0.8 + community * 1.1;
        let mut setup =
            Setup::new(b.clone()).strategy(Strategy::fixed(b.initial_price, base_effort));
        setup.effort_scale = Some(effectiveness);
        Scenario::new(name, setup)
    })
    .collect()
}

fn platform_effort_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        (8.0, 0.0, "Entrepreneur Only (8+0)"),
        (6.0, 2.0, "Entrepreneur Heavy (6+2)"),
        (5.0, 3.0, "Entrepreneur Majority (5+3)"),
        (4.0, 4.0, "Equal Split (4+4)"),
        (3.0, 5.0, "Platform Majority (3+5)"),
        (2.0, 6.0, "Platform Heavy (2+6)"),
        (0.0, 8.0, "Platform Only (0+8)"),
    ]
    .into_iter()
    .map(|(e, p, name)| {
        let s = Strategy::dual_party(b.initial_price, e, p, 1.5);
        Scenario::new(name, Setup::new(b.clone()).strategy(s))
    })
    .collect()
}

fn fixed_fee_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [0.02, 0.03, 0.05, 0.07, 0.10, 0.15]
        .into_iter()
        .map(|rate| {
            Scenario::new(
                format!("Fixed {:.1}%", rate * 100.0),
                Setup::new(b.clone()).fees(FeeScheme::Fixed { rate }),
            )
        })
        .collect()
}

fn fee_structure_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        ("Fixed 5%", FeeScheme::Fixed { rate: 0.05 }),
        ("Success-based 8%", FeeScheme::SuccessOnly { rate: 0.08 }),
        ("Progressive 4-8%", FeeScheme::Progressive { rate: 0.04 }),
        ("Performance-based 3-6%", FeeScheme::PerformanceBased { rate: 0.06 }),
    ]
    .into_iter()
    .map(|(name, scheme)| Scenario::new(name, Setup::new(b.clone()).fees(scheme)))
    .collect()
}

fn hybrid_fee_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [(0.02, 0.02), (0.03, 0.03), (0.04, 0.02), (0.02, 0.04), (0.05, 0.0)]
        .into_iter()
        .map(|(base, bonus)| {
            Scenario::new(
                format!("{:.0}% Base + {:.0}% Success", base * 100.0, bonus * 100.0),
                Setup::new(b.clone()).fees(FeeScheme::Hybrid { base, bonus }),
            )
        })
        .collect()
}

fn market_cycle_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    MarketRegime::all()
        .into_iter()
        .map(|regime| {
            Scenario::new(
                regime.name(),
                Setup::new(b.clone()).market(MarketConditions::new(regime)),
            )
        })
        .collect()
}

fn competition_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [0, 1, 2, 3, 5, 8, 12]
        .into_iter()
        .map(|n| {
            Scenario::new(
                format!("{n} competitors"),
                Setup::new(b.clone()).market(MarketConditions::default().with_competitors(n)),
            )
        })
        .collect()
}

fn external_shock_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    // (start day, end day, impact); checked when the setup runs.
    let scenarios: Vec<(&str, Vec<(u32, u32, f64)>)> = vec![
        ("No Shocks (Control)", vec![]),
        ("Early Positive Shock", vec![(5, 10, 1.5)]),
        ("Early Negative Shock", vec![(5, 10, 0.6)]),
        ("Mid-Campaign Crisis", vec![(15, 20, 0.4)]),
        ("Late Rally", vec![(25, 30, 1.8)]),
        ("Multiple Shocks", vec![(8, 10, 0.7), (18, 22, 1.4)]),
    ];
    scenarios
        .into_iter()
        .map(|(name, windows)| {
            let shocks = windows
                .into_iter()
                .map(|(start_day, end_day, impact)| Shock {
                    start_day,
                    end_day,
                    impact,
                })
                .collect();
            let market = MarketConditions {
                shocks,
                ..MarketConditions::default()
            };
            Scenario::new(name, Setup::new(b.clone()).market(market))
        })
        .collect()
}

fn multi_round_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    use StrategyKind::{Bonding, Dynamic, Fixed};
    let configs: Vec<(&str, Vec<(f64, u32, StrategyKind)>)> = vec![
        ("Single Round (Control)", vec![(1.0, b.duration, Fixed)]),
        ("Two Equal Rounds", vec![(0.5, 15, Fixed), (0.5, 15, Fixed)]),
        ("Small-Large Rounds", vec![(0.3, 10, Fixed), (0.7, 20, Dynamic)]),
        (
            "Three Equal Rounds",
            vec![(0.33, 10, Fixed), (0.33, 10, Dynamic), (0.34, 10, Bonding)],
        ),
        (
            "Escalating Rounds",
            vec![(0.2, 8, Fixed), (0.3, 10, Dynamic), (0.5, 12, Bonding)],
        ),
        (
            "De-escalating Rounds",
            vec![(0.5, 12, Bonding), (0.3, 10, Dynamic), (0.2, 8, Fixed)],
        ),
    ];
    configs
        .into_iter()
        .map(|(name, rounds)| {
            let mut setup = Setup::new(b.clone());
            setup.rounds = rounds
                .into_iter()
                .map(|(target_share, duration, strategy)| RoundSetup {
                    target_share,
                    duration,
                    strategy,
                })
                .collect();
            Scenario::new(name, setup)
        })
        .collect()
}

fn information_asymmetry_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    use EntrepreneurType::{Deceptive, Honest, Optimistic};
    [
        (0.0, Honest, "Perfect Information (Honest)"),
        (0.2, Honest, "Low Asymmetry (Honest)"),
        (0.4, Honest, "Medium Asymmetry (Honest)"),
        (0.2, Optimistic, "Low Asymmetry (Optimistic)"),
        (0.4, Optimistic, "Medium Asymmetry (Optimistic)"),
        (0.6, Optimistic, "High Asymmetry (Optimistic)"),
        (0.3, Deceptive, "Medium Asymmetry (Deceptive)"),
        (0.5, Deceptive, "High Asymmetry (Deceptive)"),
    ]
    .into_iter()
    .map(|(level, kind, name)| {
        let setup = Setup::new(b.clone())
            .strategy(Strategy::trust_aware(b.initial_price))
            .agent(kind, level, IncentiveMechanism::FixedFee, Governance::Centralized);
        Scenario::new(name, setup)
    })
    .collect()
}

fn incentive_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    IncentiveMechanism::all()
        .into_iter()
        .map(|mechanism| {
            let setup = Setup::new(b.clone())
                .strategy(Strategy::trust_aware(b.initial_price))
                .agent(EntrepreneurType::Honest, 0.3, mechanism, Governance::Centralized);
            Scenario::new(mechanism.name(), setup)
        })
        .collect()
}

fn governance_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    Governance::all()
        .into_iter()
        .map(|governance| {
            let setup = Setup::new(b.clone())
                .strategy(Strategy::trust_aware(b.initial_price))
                .agent(
                    EntrepreneurType::Honest,
                    0.2,
                    IncentiveMechanism::SuccessSharing,
                    governance,
                );
            Scenario::new(governance.name(), setup)
        })
        .collect()
}

fn viral_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        (0.0, "No Viral Effects"),
        (0.05, "Low Virality (5%)"),
        (0.1, "Medium Virality (10%)"),
        (0.2, "High Virality (20%)"),
        (0.3, "Super Viral (30%)"),
    ]
    .into_iter()
    .map(|(k, name)| {
        Scenario::new(name, Setup::new(b.clone()).network(k, PlatformKind::Web3))
    })
    .collect()
}

fn platform_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    // (platform, network strength on α, platform fee)
    [
        (PlatformKind::Traditional, 0.8, 0.05),
        (PlatformKind::Web3, 1.3, 0.03),
        (PlatformKind::Hybrid, 1.1, 0.04),
    ]
    .into_iter()
    .map(|(platform, strength, fee)| {
        let viral = if platform == PlatformKind::Web3 { 0.15 } else { 0.08 };
        let setup = with_base(b, |p| p.alpha *= strength)
            .network(viral, platform)
            .fees(FeeScheme::Fixed { rate: fee });
        Scenario::new(platform.name(), setup)
    })
    .collect()
}

fn funding_threshold_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        (0.4, 1.2, "Conservative (40%/120%)"),
        (0.5, 1.5, "Moderate (50%/150%)"),
        (0.6, 1.8, "Standard (60%/180%)"),
        (0.7, 2.0, "Ambitious (70%/200%)"),
        (0.8, 2.5, "Aggressive (80%/250%)"),
    ]
    .into_iter()
    .map(|(soft, hard, name)| {
        let mut setup = Setup::new(b.clone());
        setup.thresholds = Some(FundingThresholds::new(soft, hard));
        Scenario::new(name, setup)
    })
    .collect()
}

fn success_metrics_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    let base_effort = DEFAULT_EFFORT_BUDGET / b.duration as f64;
    // (funding, community, brand) focus
    [
        (0.8, 0.1, 0.1, "Funding-Focused"),
        (0.4, 0.4, 0.2, "Community-Focused"),
        (0.4, 0.2, 0.4, "Brand-Focused"),
        (0.5, 0.25, 0.25, "Balanced"),
        (0.3, 0.35, 0.35, "Long-term"),
    ]
    .into_iter()
    .map(|(funding, community, brand, name)| {
        let effort = base_effort * (funding + community * 0.8 + brand * 0.9);
        let mut setup =
            Setup::new(b.clone()).strategy(Strategy::fixed(b.initial_price, effort));
        setup.thresholds = Some(FundingThresholds::default());
        Scenario::new(name, setup)
    })
    .collect()
}

fn community_building_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    [
        (0.0, 0.05, "No Community Focus"),
        (20.0, 0.08, "Light Community"),
        (40.0, 0.12, "Moderate Community"),
        (60.0, 0.15, "Heavy Community"),
        (80.0, 0.20, "Community-First"),
    ]
    .into_iter()
    .map(|(engagement, viral_coefficient, name)| {
        let mut setup = Setup::new(b.clone());
        setup.network = Some(NetworkSetup {
            viral_coefficient,
            platform: PlatformKind::Web3,
            initial_engagement: engagement,
        });
        Scenario::new(name, setup)
    })
    .collect()
}

fn platform_comparison_grid(b: &BaseParameters) -> Vec<Scenario<Setup>> {
    use PlatformFeature::*;
    vec![
        (
            "EquiCurve",
            PlatformOffer::new(0.03, vec![DynamicPricing, BondingCurves, Governance], 1.2),
        ),
        (
            "Traditional High-Fee",
            PlatformOffer::new(0.08, vec![FixedPricing], 0.9),
        ),
        (
            "Traditional Low-Fee",
            PlatformOffer::new(0.04, vec![FixedPricing, BasicAnalytics], 1.0),
        ),
        (
            "Competitor Web3",
            PlatformOffer::new(0.025, vec![BondingCurves, Dao], 1.1),
        ),
        (
            "Premium Platform",
            PlatformOffer::new(0.06, vec![DynamicPricing, AdvancedAnalytics, Marketing], 1.3),
        ),
    ]
    .into_iter()
    .map(|(name, offer)| {
        let mut setup = with_base(b, |p| p.alpha *= offer.network_strength)
            .strategy(offer.strategy(b.initial_price, b.duration))
            .network(0.1, PlatformKind::Web3)
            .fees(FeeScheme::Fixed {
                rate: offer.fee_rate,
            });
        setup.platform = Some(offer);
        Scenario::new(name, setup)
    })
    .collect()
}

pub static EXPERIMENTS: [ExperimentSpec; 26] = [
    ExperimentSpec {
        id: "duration-optimization",
        name: "Duration Optimization",
        category: "Campaign design",
        trials: 20,
        objective: Objective::SuccessRate,
        grid: duration_grid,
    },
    ExperimentSpec {
        id: "price-elasticity",
        name: "Price Elasticity (γ) Variations",
        category: "Elasticity",
        trials: 5,
        objective: Objective::SuccessRate,
        grid: price_elasticity_grid,
    },
    ExperimentSpec {
        id: "effort-elasticity",
        name: "Effort Elasticity (β) Variations",
        category: "Elasticity",
        trials: 5,
        objective: Objective::SuccessRate,
        grid: effort_elasticity_grid,
    },
    ExperimentSpec {
        id: "cross-elasticity",
        name: "Cross-Elasticity Effects",
        category: "Elasticity",
        trials: 3,
        objective: Objective::SuccessRate,
        grid: cross_elasticity_grid,
    },
    ExperimentSpec {
        id: "static-pricing",
        name: "Static Pricing Strategies",
        category: "Pricing",
        trials: 5,
        objective: Objective::SuccessRate,
        grid: static_pricing_grid,
    },
    ExperimentSpec {
        id: "dynamic-pricing",
        name: "Dynamic Pricing Rules",
        category: "Pricing",
        trials: 5,
        objective: Objective::SuccessRate,
        grid: dynamic_pricing_grid,
    },
    ExperimentSpec {
        id: "bonding-curves",
        name: "Bonding Curve Experiments",
        category: "Pricing",
        trials: 5,
        objective: Objective::SuccessRate,
        grid: bonding_curve_grid,
    },
    ExperimentSpec {
        id: "effort-patterns",
        name: "Constant vs Variable Effort",
        category: "Effort",
        trials: 20,
        objective: Objective::SuccessRate,
        grid: effort_pattern_grid,
    },
    ExperimentSpec {
        id: "effort-allocation",
        name: "Effort Allocation Strategies",
        category: "Effort",
        trials: 20,
        objective: Objective::SuccessRate,
        grid: effort_allocation_grid,
    },
    ExperimentSpec {
        id: "platform-effort",
        name: "Platform vs Entrepreneur Effort",
        category: "Effort",
        trials: 20,
        objective: Objective::SuccessRate,
        grid: platform_effort_grid,
    },
    ExperimentSpec {
        id: "fixed-fees",
        name: "Fixed Fee Models",
        category: "Fees",
        trials: 20,
        objective: Objective::MetricTimesSuccess("platform_revenue"),
        grid: fixed_fee_grid,
    },
    ExperimentSpec {
        id: "fee-structures",
        name: "Dynamic Fee Models",
        category: "Fees",
        trials: 20,
        objective: Objective::MetricTimesSuccess("platform_revenue"),
        grid: fee_structure_grid,
    },
    ExperimentSpec {
        id: "hybrid-fees",
        name: "Hybrid Fee Models",
        category: "Fees",
        trials: 20,
        objective: Objective::MetricTimesSuccess("platform_revenue"),
        grid: hybrid_fee_grid,
    },
    ExperimentSpec {
        id: "market-cycles",
        name: "Bull vs Bear Markets",
        category: "Market",
        trials: 100,
        objective: Objective::SuccessRate,
        grid: market_cycle_grid,
    },
    ExperimentSpec {
        id: "competition",
        name: "Competition Effects",
        category: "Market",
        trials: 100,
        objective: Objective::SuccessRate,
        grid: competition_grid,
    },
    ExperimentSpec {
        id: "external-shocks",
        name: "External Shocks",
        category: "Market",
        trials: 100,
        objective: Objective::Maximize("total_raised"),
        grid: external_shock_grid,
    },
    ExperimentSpec {
        id: "multi-round",
        name: "Multi-Round Strategies",
        category: "Multi-round",
        trials: 100,
        objective: Objective::SuccessRate,
        grid: multi_round_grid,
    },
    ExperimentSpec {
        id: "information-asymmetry",
        name: "Information Asymmetry",
        category: "Principal-agent",
        trials: 100,
        objective: Objective::Maximize("alignment_score"),
        grid: information_asymmetry_grid,
    },
    ExperimentSpec {
        id: "incentive-mechanisms",
        name: "Incentive Mechanisms",
        category: "Principal-agent",
        trials: 100,
        objective: Objective::Maximize("alignment_score"),
        grid: incentive_grid,
    },
    ExperimentSpec {
        id: "governance-models",
        name: "Governance Models",
        category: "Principal-agent",
        trials: 100,
        objective: Objective::Maximize("alignment_score"),
        grid: governance_grid,
    },
    ExperimentSpec {
        id: "viral-mechanics",
        name: "Viral Mechanics",
        category: "Network",
        trials: 100,
        objective: Objective::Maximize("virality_score"),
        grid: viral_grid,
    },
    ExperimentSpec {
        id: "traditional-vs-web3",
        name: "Traditional vs Web3",
        category: "Network",
        trials: 100,
        objective: Objective::Maximize("entrepreneur_revenue"),
        grid: platform_grid,
    },
    ExperimentSpec {
        id: "funding-thresholds",
        name: "Funding Thresholds",
        category: "Success metrics",
        trials: 100,
        objective: Objective::Maximize("overall_success_score"),
        grid: funding_threshold_grid,
    },
    ExperimentSpec {
        id: "success-metrics",
        name: "Success Metrics",
        category: "Success metrics",
        trials: 100,
        objective: Objective::Maximize("overall_success_score"),
        grid: success_metrics_grid,
    },
    ExperimentSpec {
        id: "community-building",
        name: "Community Building",
        category: "Network",
        trials: 100,
        objective: Objective::Maximize("long_term_value"),
        grid: community_building_grid,
    },
    ExperimentSpec {
        id: "platform-comparison",
        name: "Platform Comparison",
        category: "Network",
        trials: 100,
        objective: Objective::Maximize("value_proposition"),
        grid: platform_comparison_grid,
    },
];
