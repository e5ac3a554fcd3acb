//! Standard cloud storage region codes.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Region code used when creating buckets.
///
/// Serialized, displayed and parsed as the plain region code, e.g. `us-west-1`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr
)]
pub enum Region {
    #[serde(rename = "us-east-1")]
    #[strum(serialize = "us-east-1")]
    UsEast1,
    #[serde(rename = "us-east-2")]
    #[strum(serialize = "us-east-2")]
    UsEast2,
    #[default]
    #[serde(rename = "us-west-1")]
    #[strum(serialize = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    #[strum(serialize = "us-west-2")]
    UsWest2,
    #[serde(rename = "ca-central-1")]
    #[strum(serialize = "ca-central-1")]
    CaCentral1,
    #[serde(rename = "eu-west-1")]
    #[strum(serialize = "eu-west-1")]
    EuWest1,
    #[serde(rename = "eu-west-2")]
    #[strum(serialize = "eu-west-2")]
    EuWest2,
    #[serde(rename = "eu-west-3")]
    #[strum(serialize = "eu-west-3")]
    EuWest3,
    #[serde(rename = "eu-central-1")]
    #[strum(serialize = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-north-1")]
    #[strum(serialize = "eu-north-1")]
    EuNorth1,
    #[serde(rename = "ap-east-1")]
    #[strum(serialize = "ap-east-1")]
    ApEast1,
    #[serde(rename = "ap-south-1")]
    #[strum(serialize = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-southeast-1")]
    #[strum(serialize = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    #[strum(serialize = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "ap-northeast-1")]
    #[strum(serialize = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-northeast-2")]
    #[strum(serialize = "ap-northeast-2")]
    ApNortheast2,
    #[serde(rename = "ap-northeast-3")]
    #[strum(serialize = "ap-northeast-3")]
    ApNortheast3,
    #[serde(rename = "me-south-1")]
    #[strum(serialize = "me-south-1")]
    MeSouth1,
    #[serde(rename = "sa-east-1")]
    #[strum(serialize = "sa-east-1")]
    SaEast1,
    #[serde(rename = "us-gov-west-1")]
    #[strum(serialize = "us-gov-west-1")]
    UsGovWest1,
    #[serde(rename = "us-gov-east-1")]
    #[strum(serialize = "us-gov-east-1")]
    UsGovEast1,
    #[serde(rename = "cn-north-1")]
    #[strum(serialize = "cn-north-1")]
    CnNorth1,
    #[serde(rename = "cn-northwest-1")]
    #[strum(serialize = "cn-northwest-1")]
    CnNorthwest1,
}

impl Region {
    /// Returns the region code.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_default_region() {
        assert_eq!(Region::default(), Region::UsWest1);
        assert_eq!(Region::default().as_str(), "us-west-1");
    }

    #[test]
    fn test_region_parsing() {
        assert_eq!(Region::from_str("eu-central-1").unwrap(), Region::EuCentral1);
        assert_eq!(Region::from_str("cn-northwest-1").unwrap(), Region::CnNorthwest1);
        assert!(Region::from_str("mars-north-1").is_err());
    }

    #[test]
    fn test_region_codes_are_consistent() {
        let all: Vec<Region> = Region::iter().collect();
        assert_eq!(all.len(), 23);

        for region in all {
            assert_eq!(region.to_string(), region.as_str());
            assert_eq!(Region::from_str(region.as_str()).unwrap(), region);

            let json = serde_json::to_string(&region).unwrap();
            assert_eq!(json, format!("\"{}\"", region.as_str()));
        }
    }
}
