//! The managed Elasticsearch domain.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::traits::CfnResource;

use super::policy::{PolicyDocument, PolicyStatement};
use super::resource::RemovalPolicy;
use super::resource_type::ResourceType;
use super::token::Token;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
    ToSchema,
)]
pub enum EngineVersion {
    #[strum(serialize = "6.8")]
    #[serde(rename = "6.8")]
    V6_8,
    #[strum(serialize = "7.1")]
    #[serde(rename = "7.1")]
    V7_1,
    #[strum(serialize = "7.4")]
    #[serde(rename = "7.4")]
    V7_4,
    #[strum(serialize = "7.7")]
    #[serde(rename = "7.7")]
    V7_7,
    #[strum(serialize = "7.9")]
    #[serde(rename = "7.9")]
    V7_9,
    #[default]
    #[strum(serialize = "7.10")]
    #[serde(rename = "7.10")]
    V7_10,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Standard,
    #[default]
    Gp2,
    Gp3,
    Io1,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCapacity {
    pub data_node_instance_type: String,
    pub data_nodes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EbsOptions {
    pub enabled: bool,
    pub volume_size: u32,
    pub volume_type: VolumeType,
    /// Provisioned IOPS, required for `io1`
    pub iops: Option<u32>,
}

/// Wires the domain's Kibana console to a user pool and identity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoOptions {
    pub user_pool_id: Token,
    pub identity_pool_id: Token,
    /// Role the search service assumes to configure Cognito.
    pub role_arn: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchDomain {
    domain_name: String,
    version: EngineVersion,
    enable_version_upgrade: bool,
    capacity: ClusterCapacity,
    ebs: EbsOptions,
    access_policies: PolicyDocument,
    cognito: Option<CognitoOptions>,
}

impl SearchDomain {
    pub fn new(
        domain_name: impl Into<String>,
        version: EngineVersion,
        capacity: ClusterCapacity,
        ebs: EbsOptions,
    ) -> Self {
        Self {
            domain_name: domain_name.into(),
            version,
            enable_version_upgrade: false,
            capacity,
            ebs,
            access_policies: PolicyDocument::default(),
            cognito: None,
        }
    }

    /// Upgrade the engine in place when the version changes instead of replacing the domain.
    pub fn with_version_upgrade(mut self, enabled: bool) -> Self {
        self.enable_version_upgrade = enabled;
        self
    }

    pub fn with_access_policy(mut self, statement: PolicyStatement) -> Self {
        self.access_policies.add_statement(statement);
        self
    }

    pub fn with_cognito(mut self, cognito: CognitoOptions) -> Self {
        self.cognito = Some(cognito);
        self
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn version(&self) -> EngineVersion {
        self.version
    }

    pub fn capacity(&self) -> &ClusterCapacity {
        &self.capacity
    }

    pub fn ebs(&self) -> &EbsOptions {
        &self.ebs
    }

    pub fn access_policies(&self) -> &PolicyDocument {
        &self.access_policies
    }

    pub fn cognito(&self) -> Option<&CognitoOptions> {
        self.cognito.as_ref()
    }

    /// `arn:<partition>:es:<region>:<account>:domain/<name>/*`, covering every index path.
    pub fn data_plane_arn(
        domain_name: &str,
        partition: Token,
        region: Token,
        account: Token,
    ) -> Token {
        Token::concat([
            Token::literal("arn:"),
            partition,
            Token::literal(":es:"),
            region,
            Token::literal(":"),
            account,
            Token::literal(format!(":domain/{domain_name}/*")),
        ])
    }
}

impl CfnResource for SearchDomain {
    fn resource_type(&self) -> ResourceType {
        ResourceType::ElasticsearchDomain
    }

    fn properties(&self) -> Value {
        let ebs = if self.ebs.enabled {
            let mut ebs = json!({
                "EBSEnabled": true,
                "VolumeSize": self.ebs.volume_size,
                "VolumeType": self.ebs.volume_type.as_ref()
            });
            if let Some(iops) = self.ebs.iops {
                ebs["Iops"] = json!(iops);
            }
            ebs
        } else {
            json!({ "EBSEnabled": false })
        };
        let cognito = match &self.cognito {
            Some(c) => json!({
                "Enabled": true,
                "IdentityPoolId": c.identity_pool_id,
                "RoleArn": c.role_arn,
                "UserPoolId": c.user_pool_id
            }),
            None => json!({ "Enabled": false }),
        };

        let mut props = json!({
            "CognitoOptions": cognito,
            "DomainName": self.domain_name,
            "EBSOptions": ebs,
            "ElasticsearchClusterConfig": {
                "DedicatedMasterEnabled": false,
                "InstanceCount": self.capacity.data_nodes,
                "InstanceType": self.capacity.data_node_instance_type,
                "ZoneAwarenessEnabled": false
            },
            "ElasticsearchVersion": self.version.as_ref(),
            "EncryptionAtRestOptions": { "Enabled": false },
            "LogPublishingOptions": {},
            "NodeToNodeEncryptionOptions": { "Enabled": false }
        });
        if !self.access_policies.is_empty() {
            props["AccessPolicies"] = self.access_policies.to_value();
        }
        props
    }

    fn tokens(&self) -> Vec<&Token> {
        let mut tokens = self.access_policies.tokens();
        if let Some(c) = &self.cognito {
            tokens.extend([&c.user_pool_id, &c.identity_pool_id, &c.role_arn]);
        }
        tokens
    }

    fn removal_policy(&self) -> RemovalPolicy {
        RemovalPolicy::Retain
    }

    fn update_policy(&self) -> Option<Value> {
        self.enable_version_upgrade
            .then(|| json!({ "EnableVersionUpgrade": true }))
    }
}
