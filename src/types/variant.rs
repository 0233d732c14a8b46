//! Safe implementation variants and their calldata fingerprints

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::chain::ChainAddresses;
use crate::error::Error;

/// Known Safe releases, each with its own initializer layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ImplementationVariant {
    /// v1.3.0 with the L1 singleton. Not cloned across chains.
    #[serde(rename = "1.3.0")]
    V1_3_0,
    /// SafeL2 v1.3.0, legacy layout (no setup delegate call)
    #[serde(rename = "1.3.0+L2")]
    V1_3_0L2,
    /// v1.4.1 initialised through SafeToL2Setup
    #[default]
    #[serde(rename = "1.4.1+L2")]
    V1_4_1L2,
}

/// Ordered (lower-case hex fragment, variant) pairs tested against raw calldata.
/// The first fragment found wins.
pub const VARIANT_FINGERPRINTS: [(&str, ImplementationVariant); 3] = [
    (
        "29fcb43b46531bca003ddc8fcb67ffe91900c762",
        ImplementationVariant::V1_4_1L2,
    ),
    (
        "3e5c63644e683549055b9be8653de26e0b4cd36e",
        ImplementationVariant::V1_3_0L2,
    ),
    (
        "d9db270c1b5e3bd161e8c8503c55ceabee709552",
        ImplementationVariant::V1_3_0,
    ),
];

impl ImplementationVariant {
    /// Classifies calldata by fingerprint, falling back to the default variant.
    ///
    /// This is a substring match on the hex text, not a structural parse.
    pub fn from_calldata(calldata_hex: &str) -> Self {
        let lowered = calldata_hex.to_ascii_lowercase();
        VARIANT_FINGERPRINTS
            .iter()
            .find(|(fragment, _)| lowered.contains(fragment))
            .map(|(_, variant)| *variant)
            .unwrap_or_default()
    }

    /// Canonical contracts for this variant
    pub fn addresses(&self) -> ChainAddresses {
        match self {
            ImplementationVariant::V1_3_0 => ChainAddresses::v1_3_0(),
            ImplementationVariant::V1_3_0L2 => ChainAddresses::v1_3_0_l2(),
            ImplementationVariant::V1_4_1L2 => ChainAddresses::v1_4_1_l2(),
        }
    }

    /// Whether the factory path can reproduce this variant on another chain
    pub fn is_cloneable(&self) -> bool {
        !matches!(self, ImplementationVariant::V1_3_0)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImplementationVariant::V1_3_0 => "1.3.0",
            ImplementationVariant::V1_3_0L2 => "1.3.0+L2",
            ImplementationVariant::V1_4_1L2 => "1.4.1+L2",
        }
    }
}

impl fmt::Display for ImplementationVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImplementationVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1.3.0" => Ok(ImplementationVariant::V1_3_0),
            "1.3.0+l2" | "1.3.0-l2" => Ok(ImplementationVariant::V1_3_0L2),
            "1.4.1+l2" | "1.4.1-l2" | "1.4.1" => Ok(ImplementationVariant::V1_4_1L2),
            other => Err(Error::InvalidParameters(format!(
                "unknown implementation variant '{}'",
                other
            ))),
        }
    }
}
