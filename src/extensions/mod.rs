//! Augmentations that extend the base campaign loop.
//!
//! Each type here implements [`crate::simulator::Augmentation`] and can be
//! stacked on a [`crate::simulator::CampaignSimulator`] in any combination.

pub mod costs;
pub mod fees;
pub mod market;
pub mod network;
pub mod platform;
pub mod principal_agent;
pub mod thresholds;

pub use costs::{CostFunction, EffortCosts};
pub use fees::{FeeScheme, PlatformFees};
pub use market::MarketConditions;
pub use network::{NetworkEffects, PlatformKind};
pub use platform::{PlatformFeature, PlatformOffer};
pub use principal_agent::{EntrepreneurType, Governance, IncentiveMechanism, PrincipalAgent};
pub use thresholds::{overall_success_score, FundingLevel, FundingThresholds, SuccessMetrics};
