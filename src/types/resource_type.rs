//! CloudFormation resource type names.
//!
//! Centralizes the `AWS::Service::Resource` strings so the rest of the crate
//! never spells them out by hand.

use serde::{Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The resource types this crate knows how to emit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumString, EnumIter,
)]
pub enum ResourceType {
    #[strum(serialize = "AWS::Cognito::UserPool")]
    UserPool,
    #[strum(serialize = "AWS::Cognito::UserPoolDomain")]
    UserPoolDomain,
    #[strum(serialize = "AWS::Cognito::IdentityPool")]
    IdentityPool,
    #[strum(serialize = "AWS::Cognito::IdentityPoolRoleAttachment")]
    IdentityPoolRoleAttachment,
    #[strum(serialize = "AWS::IAM::Role")]
    Role,
    #[strum(serialize = "AWS::Elasticsearch::Domain")]
    ElasticsearchDomain,
}

impl Serialize for ResourceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}
