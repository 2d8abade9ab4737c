//! Stack configuration.
//!
//! Every field defaults to the values of the reference deployment: a single
//! `t3.small.elasticsearch` data node with a 30 GiB `gp2` volume, running
//! Elasticsearch 7.10 behind the `cdk-elk` hosted UI.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::{PartialSchema, ToSchema};

use crate::error::StackError;
use crate::types::{EngineVersion, VolumeType, validate_domain_prefix};

static ACCOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{12}$").unwrap());
static REGION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d$").unwrap());
static DOMAIN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9-]{2,27}$").unwrap());

pub const MIN_VOLUME_SIZE: u32 = 10;
pub const MAX_VOLUME_SIZE: u32 = 1024;

/// Where the stack is deployed. Unset parts resolve at deploy time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Environment {
    /// Twelve-digit account id
    pub account: Option<String>,
    /// Region, e.g. `eu-west-1`
    pub region: Option<String>,
}

impl Environment {
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
            region: Some(region.into()),
        }
    }

    /// No account or region; both become pseudo parameters.
    pub fn agnostic() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), StackError> {
        if let Some(account) = &self.account {
            if !ACCOUNT.is_match(account) {
                return Err(StackError::InvalidConfig(format!(
                    "account '{account}' must be a 12-digit account id"
                )));
            }
        }
        if let Some(region) = &self.region {
            if !REGION.is_match(region) {
                return Err(StackError::InvalidConfig(format!(
                    "region '{region}' is not a valid region name"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CapacityConfig {
    pub data_node_instance_type: String,
    pub data_nodes: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            data_node_instance_type: "t3.small.elasticsearch".to_string(),
            data_nodes: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EbsConfig {
    pub enabled: bool,
    /// Size in GiB
    pub volume_size: u32,
    pub volume_type: VolumeType,
    /// Provisioned IOPS; required for `io1`, also accepted for `gp3`
    pub iops: Option<u32>,
}

impl Default for EbsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume_size: 30,
            volume_type: VolumeType::Gp2,
            iops: None,
        }
    }
}

/// Everything that can be tuned about the search stack.
///
/// Anonymous identity access is deliberately absent: unknown fields such as
/// `allowUnauthenticatedIdentities` are rejected when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StackProps {
    /// Hosted-UI prefix, must be globally unique per region
    pub domain_prefix: String,
    pub domain_name: String,
    pub engine_version: EngineVersion,
    pub enable_version_upgrade: bool,
    pub auto_verify_email: bool,
    pub capacity: CapacityConfig,
    pub ebs: EbsConfig,
    pub description: Option<String>,
}

impl Default for StackProps {
    fn default() -> Self {
        Self {
            domain_prefix: "cdk-elk".to_string(),
            domain_name: "cdk-elk".to_string(),
            engine_version: EngineVersion::V7_10,
            enable_version_upgrade: true,
            auto_verify_email: true,
            capacity: CapacityConfig::default(),
            ebs: EbsConfig::default(),
            description: None,
        }
    }
}

impl StackProps {
    /// Parse props from JSON and validate them. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, StackError> {
        let props: StackProps = serde_json::from_str(text)?;
        props.validate()?;
        debug!(
            event = "Config",
            phase = "Parsed",
            domain_name = props.domain_name,
            domain_prefix = props.domain_prefix
        );
        Ok(props)
    }

    pub fn validate(&self) -> Result<(), StackError> {
        if !DOMAIN_NAME.is_match(&self.domain_name) {
            return Err(StackError::InvalidConfig(format!(
                "domain name '{}' must be 3-28 characters, start with a lowercase letter and \
                 contain only lowercase letters, digits and hyphens",
                self.domain_name
            )));
        }
        validate_domain_prefix(&self.domain_prefix)?;

        if self.capacity.data_nodes == 0 {
            return Err(StackError::InvalidConfig(
                "at least one data node is required".to_string(),
            ));
        }
        let instance_type = &self.capacity.data_node_instance_type;
        if !instance_type.ends_with(".elasticsearch") {
            return Err(StackError::InvalidConfig(format!(
                "instance type '{instance_type}' must end with '.elasticsearch'"
            )));
        }
        // t2/t3 nodes have no instance storage
        let burstable = instance_type.starts_with("t2.") || instance_type.starts_with("t3.");
        if burstable && !self.ebs.enabled {
            return Err(StackError::InvalidConfig(format!(
                "instance type '{instance_type}' requires an EBS volume"
            )));
        }
        if self.ebs.enabled
            && !(MIN_VOLUME_SIZE..=MAX_VOLUME_SIZE).contains(&self.ebs.volume_size)
        {
            return Err(StackError::InvalidConfig(format!(
                "EBS volume size {} GiB must be between {MIN_VOLUME_SIZE} and {MAX_VOLUME_SIZE}",
                self.ebs.volume_size
            )));
        }
        if self.ebs.enabled {
            match (self.ebs.volume_type, self.ebs.iops) {
                (VolumeType::Io1, None) => {
                    return Err(StackError::InvalidConfig(
                        "EBS volume type 'io1' requires 'iops'".to_string(),
                    ));
                }
                (VolumeType::Io1 | VolumeType::Gp3, Some(_)) | (_, None) => {}
                (volume_type, Some(_)) => {
                    return Err(StackError::InvalidConfig(format!(
                        "EBS volume type '{volume_type}' does not take 'iops'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// JSON schema of the accepted props document.
    pub fn schema() -> Result<Value, StackError> {
        serde_json::to_value(<StackProps as PartialSchema>::schema())
            .map_err(|e| StackError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let props = StackProps::default();
        assert_eq!(props.domain_prefix, "cdk-elk");
        assert_eq!(props.domain_name, "cdk-elk");
        assert_eq!(props.engine_version, EngineVersion::V7_10);
        assert!(props.enable_version_upgrade);
        assert!(props.auto_verify_email);
        assert_eq!(props.capacity.data_node_instance_type, "t3.small.elasticsearch");
        assert_eq!(props.capacity.data_nodes, 1);
        assert_eq!(
            props.ebs,
            EbsConfig {
                enabled: true,
                volume_size: 30,
                volume_type: VolumeType::Gp2,
                iops: None
            }
        );
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let props = StackProps::from_json(
            r#"{ "domainName": "logs", "capacity": { "dataNodes": 3 }, "engineVersion": "7.9" }"#,
        )
        .unwrap();
        assert_eq!(props.domain_name, "logs");
        assert_eq!(props.capacity.data_nodes, 3);
        assert_eq!(props.capacity.data_node_instance_type, "t3.small.elasticsearch");
        assert_eq!(props.engine_version, EngineVersion::V7_9);
        assert_eq!(props.domain_prefix, "cdk-elk");
    }

    #[test]
    fn test_from_json_empty_object_is_default() {
        assert_eq!(StackProps::from_json("{}").unwrap(), StackProps::default());
    }

    #[test]
    fn test_unauthenticated_access_cannot_be_configured() {
        let err = StackProps::from_json(r#"{ "allowUnauthenticatedIdentities": true }"#)
            .unwrap_err();
        assert!(matches!(err, StackError::ConfigParseError(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            StackProps::from_json(r#"{ "capacity": { "dataNodes": "many" } }"#),
            Err(StackError::ConfigParseError(_))
        ));
        assert!(matches!(
            StackProps::from_json(r#"{ "engineVersion": "1.0" }"#),
            Err(StackError::ConfigParseError(_))
        ));
    }

    #[parameterized(
        short_domain_name = { r#"{ "domainName": "ab" }"# },
        upper_domain_name = { r#"{ "domainName": "Logs" }"# },
        bad_prefix = { r#"{ "domainPrefix": "amazon-search" }"# },
        no_nodes = { r#"{ "capacity": { "dataNodes": 0 } }"# },
        bad_instance_type = { r#"{ "capacity": { "dataNodeInstanceType": "t3.small.search" } }"# },
        burstable_without_ebs = { r#"{ "ebs": { "enabled": false } }"# },
        volume_too_small = { r#"{ "ebs": { "volumeSize": 5 } }"# },
        volume_too_large = { r#"{ "ebs": { "volumeSize": 4096 } }"# },
        io1_without_iops = { r#"{ "ebs": { "volumeType": "io1" } }"# },
        gp2_with_iops = { r#"{ "ebs": { "iops": 3000 } }"# },
    )]
    fn test_invalid_props(json: &str) {
        assert!(matches!(
            StackProps::from_json(json),
            Err(StackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_io1_with_iops_is_accepted() {
        let props =
            StackProps::from_json(r#"{ "ebs": { "volumeType": "io1", "iops": 3000 } }"#).unwrap();
        assert_eq!(props.ebs.volume_type, VolumeType::Io1);
        assert_eq!(props.ebs.iops, Some(3000));
    }

    #[test]
    fn test_instance_storage_node_without_ebs() {
        let props = StackProps::from_json(
            r#"{ "capacity": { "dataNodeInstanceType": "i3.large.elasticsearch" }, "ebs": { "enabled": false, "volumeSize": 0 } }"#,
        )
        .unwrap();
        assert!(!props.ebs.enabled);
    }

    #[parameterized(
        concrete = { Some("123456789012"), Some("eu-west-1"), true },
        gov = { Some("123456789012"), Some("us-gov-west-1"), true },
        agnostic = { None, None, true },
        short_account = { Some("1234"), None, false },
        bad_region = { None, Some("Europe"), false },
    )]
    fn test_environment_validation(account: Option<&str>, region: Option<&str>, ok: bool) {
        let env = Environment {
            account: account.map(str::to_string),
            region: region.map(str::to_string),
        };
        assert_eq!(env.validate().is_ok(), ok);
    }

    #[test]
    fn test_schema_lists_props() {
        let schema = StackProps::schema().unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["domainPrefix", "domainName", "engineVersion", "capacity", "ebs"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
        assert!(!properties.contains_key("allowUnauthenticatedIdentities"));
    }
}
