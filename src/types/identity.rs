//! The Cognito identity pool and its role binding.

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};
use strum_macros::{AsRefStr, Display};

use crate::traits::CfnResource;

use super::resource_type::ResourceType;
use super::token::Token;

/// Exchanges a verified directory session for temporary credentials.
///
/// There is no switch for unauthenticated identities: the pool always
/// renders `AllowUnauthenticatedIdentities: false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPool {
    name: String,
}

impl IdentityPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn allows_unauthenticated_identities(&self) -> bool {
        false
    }
}

impl CfnResource for IdentityPool {
    fn resource_type(&self) -> ResourceType {
        ResourceType::IdentityPool
    }

    fn properties(&self) -> Value {
        json!({
            "AllowUnauthenticatedIdentities": self.allows_unauthenticated_identities(),
            "IdentityPoolName": self.name,
        })
    }

    fn tokens(&self) -> Vec<&Token> {
        Vec::new()
    }
}

/// The principal categories an identity pool hands out roles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrincipalCategory {
    Authenticated,
}

/// Binds default roles to an identity pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPoolRoleAttachment {
    identity_pool_id: Token,
    roles: BTreeMap<PrincipalCategory, Token>,
}

impl IdentityPoolRoleAttachment {
    pub fn new(identity_pool_id: Token) -> Self {
        Self {
            identity_pool_id,
            roles: BTreeMap::new(),
        }
    }

    pub fn with_authenticated_role(mut self, role_arn: Token) -> Self {
        self.roles.insert(PrincipalCategory::Authenticated, role_arn);
        self
    }

    pub fn identity_pool_id(&self) -> &Token {
        &self.identity_pool_id
    }

    pub fn role(&self, category: PrincipalCategory) -> Option<&Token> {
        self.roles.get(&category)
    }
}

impl CfnResource for IdentityPoolRoleAttachment {
    fn resource_type(&self) -> ResourceType {
        ResourceType::IdentityPoolRoleAttachment
    }

    fn properties(&self) -> Value {
        let roles: Map<String, Value> = self
            .roles
            .iter()
            .map(|(category, arn)| (category.to_string(), arn.to_value()))
            .collect();
        json!({
            "IdentityPoolId": self.identity_pool_id,
            "Roles": roles,
        })
    }

    fn tokens(&self) -> Vec<&Token> {
        std::iter::once(&self.identity_pool_id)
            .chain(self.roles.values())
            .collect()
    }
}
