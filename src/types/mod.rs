//! Type definitions for Safe recovery and redeployment

mod params;
mod status;
mod variant;

pub use params::DeploymentParameters;
pub use status::{ChainDeploymentStatus, DeployMethod};
pub use variant::{ImplementationVariant, VARIANT_FINGERPRINTS};
