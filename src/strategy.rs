//! Pricing and effort strategies.
//!
//! A strategy maps the campaign state at the start of a day to the price
//! charged and the promotional effort spent that day. Strategies are pure:
//! randomness only enters through the demand model.
//!
//! The built-in family is the [`Strategy`] enum; closures can be wrapped in
//! [`CustomStrategy`]. Both implement [`PricingStrategy`].

use serde::{Deserialize, Serialize};

use crate::config::StrategyKind;

pub const DEFAULT_EFFORT: f64 = 5.0;
pub const DEFAULT_EFFORT_BUDGET: f64 = 150.0;
const DYNAMIC_ADJUSTMENT_RATE: f64 = 0.05;
const ADAPTIVE_PRICE_FLOOR: f64 = 0.5;

/// Campaign state visible to a strategy when it sets the day's terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrategyContext {
    pub day: u32,
    pub cumulative_raised: f64,
    pub target: f64,
    /// Progress as reported by the agent, when it differs from the truth.
    pub perceived_progress: Option<f64>,
    /// Current principal/agent trust level in `[0, 1]`.
    pub trust: Option<f64>,
}

impl StrategyContext {
    pub fn new(day: u32, cumulative_raised: f64, target: f64) -> Self {
        Self {
            day,
            cumulative_raised,
            target,
            perceived_progress: None,
            trust: None,
        }
    }

    pub fn progress(&self) -> f64 {
        self.cumulative_raised / self.target
    }
}

pub trait PricingStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn price(&self, ctx: &StrategyContext) -> f64;
    fn effort(&self, ctx: &StrategyContext) -> f64;
}

/// Bonding-curve shape as a function of progress `x = raised / target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveShape {
    Linear,
    Exponential,
    Logarithmic,
    Sigmoid,
}

impl CurveShape {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Linear,
            Self::Exponential,
            Self::Logarithmic,
            Self::Sigmoid,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::Exponential => "Exponential",
            Self::Logarithmic => "Logarithmic",
            Self::Sigmoid => "Sigmoid",
        }
    }

    /// Price multiple over the initial price.
    pub fn multiple(&self, steepness: f64, progress: f64) -> f64 {
        match self {
            Self::Linear => 1.0 + steepness * progress,
            Self::Exponential => (steepness * progress).exp(),
            Self::Logarithmic => 1.0 + steepness * (1.0 + progress).ln(),
            Self::Sigmoid => {
                let s = 1.0 / (1.0 + (-10.0 * (progress - 0.5)).exp());
                1.0 + steepness * s
            }
        }
    }
}

/// Temporal shape of an effort budget over the horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffortShape {
    Constant,
    FrontLoaded,
    BackLoaded,
    MiddlePeak,
    UShape,
    Exponential,
}

impl EffortShape {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Constant,
            Self::FrontLoaded,
            Self::BackLoaded,
            Self::MiddlePeak,
            Self::UShape,
            Self::Exponential,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant => "Constant Effort",
            Self::FrontLoaded => "Front-loaded (Early Push)",
            Self::BackLoaded => "Back-loaded (Final Push)",
            Self::MiddlePeak => "Middle Peak",
            Self::UShape => "U-shape (Start & End)",
            Self::Exponential => "Exponential Growth",
        }
    }

    /// Unnormalised weight at progress `p = day / duration`.
    pub fn weight(&self, p: f64) -> f64 {
        let w = match self {
            Self::Constant => 1.0,
            Self::FrontLoaded => 2.0 * (1.0 - p),
            Self::BackLoaded => 2.0 * p,
            Self::MiddlePeak => 4.0 * p * (1.0 - p),
            Self::UShape => 1.0 + 2.0 * (p - 0.5).abs(),
            Self::Exponential => (2.0 * p - 1.0).exp(),
        };
        w.max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceStep {
    pub day: u32,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Strategy {
    Fixed {
        price: f64,
        effort: f64,
    },
    /// Linear interpolation from `initial` on day 1 to `final_price` on the last day.
    LinearPath {
        initial: f64,
        final_price: f64,
        duration: u32,
        effort: f64,
    },
    StepFunction {
        initial: f64,
        steps: Vec<PriceStep>,
        effort: f64,
    },
    DynamicFeedback {
        initial: f64,
        effort_budget: f64,
        duration: u32,
        adjustment_rate: f64,
    },
    BondingCurve {
        initial: f64,
        shape: CurveShape,
        steepness: f64,
        base_effort: f64,
    },
    Adaptive {
        initial: f64,
        effort_budget: f64,
        duration: u32,
        sensitivity: f64,
    },
    EffortPattern {
        price: f64,
        shape: EffortShape,
        budget: f64,
        duration: u32,
        /// `budget / Σ weight(day)`, fixed at construction.
        scale: f64,
    },
    DualParty {
        price: f64,
        entrepreneur: f64,
        platform: f64,
        platform_multiplier: f64,
    },
    AdaptiveEffort {
        price: f64,
        budget: f64,
        duration: u32,
        adaptation_rate: f64,
    },
    TrustAware {
        initial: f64,
        base_effort: f64,
    },
}

impl Strategy {
    pub fn fixed(price: f64, effort: f64) -> Self {
        Self::Fixed { price, effort }
    }

    pub fn linear_path(initial: f64, final_price: f64, duration: u32, effort: f64) -> Self {
        Self::LinearPath {
            initial,
            final_price,
            duration,
            effort,
        }
    }

    pub fn step_function(initial: f64, steps: Vec<PriceStep>, effort: f64) -> Self {
        Self::StepFunction {
            initial,
            steps,
            effort,
        }
    }

    pub fn dynamic(initial: f64, effort_budget: f64, duration: u32) -> Self {
        Self::DynamicFeedback {
            initial,
            effort_budget,
            duration,
            adjustment_rate: DYNAMIC_ADJUSTMENT_RATE,
        }
    }

    pub fn bonding(initial: f64, shape: CurveShape, steepness: f64) -> Self {
        Self::BondingCurve {
            initial,
            shape,
            steepness,
            base_effort: DEFAULT_EFFORT,
        }
    }

    pub fn adaptive(initial: f64, effort_budget: f64, duration: u32, sensitivity: f64) -> Self {
        Self::Adaptive {
            initial,
            effort_budget,
            duration,
            sensitivity,
        }
    }

    pub fn effort_pattern(price: f64, shape: EffortShape, budget: f64, duration: u32) -> Self {
        let total: f64 = (1..=duration)
            .map(|day| shape.weight(day as f64 / duration as f64))
            .sum();
        // Degenerate shapes (all-zero weights) fall back to an even spread.
        let scale = if total > 0.0 {
            budget / total
        } else {
            budget / duration.max(1) as f64
        };
        Self::EffortPattern {
            price,
            shape,
            budget,
            duration,
            scale,
        }
    }

    pub fn dual_party(price: f64, entrepreneur: f64, platform: f64, platform_multiplier: f64) -> Self {
        Self::DualParty {
            price,
            entrepreneur,
            platform,
            platform_multiplier,
        }
    }

    pub fn adaptive_effort(price: f64, budget: f64, duration: u32, adaptation_rate: f64) -> Self {
        Self::AdaptiveEffort {
            price,
            budget,
            duration,
            adaptation_rate,
        }
    }

    pub fn trust_aware(initial: f64) -> Self {
        Self::TrustAware {
            initial,
            base_effort: DEFAULT_EFFORT,
        }
    }

    /// Strategy behind the UI selector.
    pub fn from_kind(kind: StrategyKind, initial_price: f64, duration: u32) -> Self {
        match kind {
            StrategyKind::Fixed => Self::fixed(initial_price, DEFAULT_EFFORT),
            StrategyKind::Dynamic => Self::dynamic(initial_price, DEFAULT_EFFORT_BUDGET, duration),
            StrategyKind::Bonding => Self::bonding(initial_price, CurveShape::Linear, 0.5),
        }
    }

    /// Entrepreneur and platform shares of a dual-party effort.
    pub fn effort_split(&self) -> Option<(f64, f64)> {
        match self {
            Self::DualParty {
                entrepreneur,
                platform,
                platform_multiplier,
                ..
            } => Some((*entrepreneur, platform * platform_multiplier)),
            _ => None,
        }
    }
}

/// Budget spread evenly over the days left, doubled when behind a linear pace.
fn paced_effort(budget: f64, duration: u32, ctx: &StrategyContext) -> f64 {
    let duration = duration.max(1) as f64;
    let day = ctx.day as f64;
    let remaining_days = (duration - day + 1.0).max(1.0);
    let remaining_budget = (budget * (1.0 - day / duration)).max(0.0);
    let urgency = if ctx.progress() < day / duration { 2.0 } else { 1.0 };
    remaining_budget / remaining_days * urgency
}

impl PricingStrategy for Strategy {
    fn name(&self) -> &str {
        match self {
            Self::Fixed { .. } => "Fixed Price",
            Self::LinearPath { .. } => "Linear Path",
            Self::StepFunction { .. } => "Step Function",
            Self::DynamicFeedback { .. } => "Dynamic Feedback",
            Self::BondingCurve { .. } => "Bonding Curve",
            Self::Adaptive { .. } => "Adaptive Pricing",
            Self::EffortPattern { .. } => "Effort Pattern",
            Self::DualParty { .. } => "Dual Party Effort",
            Self::AdaptiveEffort { .. } => "Adaptive Effort",
            Self::TrustAware { .. } => "Trust-Aware",
        }
    }

    fn price(&self, ctx: &StrategyContext) -> f64 {
        match self {
            Self::Fixed { price, .. }
            | Self::EffortPattern { price, .. }
            | Self::DualParty { price, .. }
            | Self::AdaptiveEffort { price, .. } => *price,

            Self::LinearPath {
                initial,
                final_price,
                duration,
                ..
            } => {
                if *duration <= 1 {
                    return *initial;
                }
                let t = (ctx.day.saturating_sub(1)) as f64 / (*duration - 1) as f64;
                initial + (final_price - initial) * t
            }

            Self::StepFunction { initial, steps, .. } => steps
                .iter()
                .rev()
                .find(|s| ctx.day >= s.day)
                .map(|s| s.price)
                .unwrap_or(*initial),

            Self::DynamicFeedback {
                initial,
                duration,
                adjustment_rate,
                ..
            } => {
                let expected = ctx.day as f64 / (*duration).max(1) as f64;
                initial * (1.0 + (ctx.progress() - expected) * adjustment_rate)
            }

            Self::BondingCurve {
                initial,
                shape,
                steepness,
                ..
            } => initial * shape.multiple(*steepness, ctx.progress()),

            Self::Adaptive {
                initial,
                duration,
                sensitivity,
                ..
            } => {
                let expected = ctx.day as f64 / (*duration).max(1) as f64;
                let performance = ctx.progress() / expected;
                let adjustment = if performance > 1.2 {
                    sensitivity * 2.0
                } else if performance > 1.0 {
                    *sensitivity
                } else if performance < 0.8 {
                    -sensitivity * 2.0
                } else if performance < 1.0 {
                    -sensitivity
                } else {
                    0.0
                };
                (initial * (1.0 + adjustment)).max(initial * ADAPTIVE_PRICE_FLOOR)
            }

            Self::TrustAware { initial, .. } => {
                let actual = ctx.progress();
                let perceived = ctx.perceived_progress.unwrap_or(actual);
                initial * (1.0 + (perceived - actual) * 0.1)
            }
        }
    }

    fn effort(&self, ctx: &StrategyContext) -> f64 {
        match self {
            Self::Fixed { effort, .. }
            | Self::LinearPath { effort, .. }
            | Self::StepFunction { effort, .. } => *effort,

            Self::DynamicFeedback {
                effort_budget,
                duration,
                ..
            }
            | Self::Adaptive {
                effort_budget,
                duration,
                ..
            } => paced_effort(*effort_budget, *duration, ctx),

            Self::BondingCurve {
                initial,
                base_effort,
                ..
            } => base_effort * (self.price(ctx) / initial).sqrt(),

            Self::EffortPattern {
                shape,
                duration,
                scale,
                ..
            } => scale * shape.weight(ctx.day as f64 / (*duration).max(1) as f64),

            Self::DualParty {
                entrepreneur,
                platform,
                platform_multiplier,
                ..
            } => entrepreneur + platform * platform_multiplier,

            Self::AdaptiveEffort {
                budget,
                duration,
                adaptation_rate,
                ..
            } => {
                let expected = ctx.day as f64 / (*duration).max(1) as f64;
                let base = budget / (*duration).max(1) as f64;
                let gap = ctx.progress() - expected;
                (base + base * adaptation_rate * -gap).min(base * 3.0).max(1.0)
            }

            Self::TrustAware { base_effort, .. } => {
                let trust = ctx.trust.unwrap_or(0.5);
                (base_effort + (trust - 0.5) * 4.0).clamp(1.0, 10.0)
            }
        }
    }
}

/// Strategy assembled from two closures.
pub struct CustomStrategy<P, E> {
    name: String,
    price_fn: P,
    effort_fn: E,
}

impl<P, E> CustomStrategy<P, E>
where
    P: Fn(&StrategyContext) -> f64 + Send + Sync,
    E: Fn(&StrategyContext) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, price_fn: P, effort_fn: E) -> Self {
        Self {
            name: name.into(),
            price_fn,
            effort_fn,
        }
    }
}

impl<P, E> PricingStrategy for CustomStrategy<P, E>
where
    P: Fn(&StrategyContext) -> f64 + Send + Sync,
    E: Fn(&StrategyContext) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn price(&self, ctx: &StrategyContext) -> f64 {
        (self.price_fn)(ctx)
    }

    fn effort(&self, ctx: &StrategyContext) -> f64 {
        (self.effort_fn)(ctx)
    }
}
