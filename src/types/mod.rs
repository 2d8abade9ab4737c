//! Resource descriptors and the values they are built from.
//!
//! Cross-references between resources are always [`Token`]s:
//! - `Ref`: `{"Ref": "UserPool"}`, the resource's primary id
//! - `GetAtt`: `{"Fn::GetAtt": ["AuthenticatedRole", "Arn"]}`
//! - `Pseudo`: `{"Ref": "AWS::Region"}` and friends
//!
//! Nothing else creates an edge in the dependency graph.

mod directory;
mod domain;
mod identity;
mod logical_id;
mod policy;
mod resource;
mod resource_type;
mod role;
mod token;

pub use directory::{
    AttributeSpec, StandardAttribute, UserPool, UserPoolDomain, VerifiableAttribute,
    validate_domain_prefix,
};
pub use domain::{
    ClusterCapacity, CognitoOptions, EbsOptions, EngineVersion, SearchDomain, VolumeType,
};
pub use identity::{IdentityPool, IdentityPoolRoleAttachment, PrincipalCategory};
pub use logical_id::LogicalId;
pub use policy::{ConditionOperator, Effect, POLICY_VERSION, PolicyDocument, PolicyStatement, Principal};
pub use resource::{RemovalPolicy, Resource};
pub use resource_type::ResourceType;
pub use role::{ASSUME_ROLE, ASSUME_ROLE_WITH_WEB_IDENTITY, Role};
pub use token::{Pseudo, Token};
