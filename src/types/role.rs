//! IAM roles and their trust policies.

use serde_json::{Value, json};

use crate::traits::CfnResource;

use super::logical_id::LogicalId;
use super::policy::{PolicyDocument, PolicyStatement, Principal};
use super::resource_type::ResourceType;
use super::token::Token;

pub const ASSUME_ROLE: &str = "sts:AssumeRole";
pub const ASSUME_ROLE_WITH_WEB_IDENTITY: &str = "sts:AssumeRoleWithWebIdentity";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    trust_policy: PolicyDocument,
    managed_policy_arns: Vec<String>,
}

impl Role {
    /// A role assumable by whoever `trust` allows.
    pub fn new(trust: PolicyStatement) -> Self {
        Self {
            trust_policy: PolicyDocument::new(vec![trust]),
            managed_policy_arns: Vec::new(),
        }
    }

    /// Trust statement for an AWS service principal such as `es.amazonaws.com`.
    pub fn service_trust(service: impl Into<String>) -> PolicyStatement {
        PolicyStatement::allow()
            .with_principal(Principal::Service(service.into()))
            .with_action(ASSUME_ROLE)
    }

    /// Trust statement for identities vouched for by a web-identity broker.
    /// Callers narrow it down with conditions.
    pub fn web_identity_trust(provider: impl Into<String>) -> PolicyStatement {
        PolicyStatement::allow()
            .with_principal(Principal::Federated(provider.into()))
            .with_action(ASSUME_ROLE_WITH_WEB_IDENTITY)
    }

    /// The ARN of the role registered under `id`, resolved at deploy time.
    pub fn arn(id: &LogicalId) -> Token {
        Token::get_att(id, "Arn")
    }

    pub fn with_managed_policy(mut self, arn: impl Into<String>) -> Self {
        self.managed_policy_arns.push(arn.into());
        self
    }

    pub fn trust_policy(&self) -> &PolicyDocument {
        &self.trust_policy
    }

    pub fn managed_policy_arns(&self) -> &[String] {
        &self.managed_policy_arns
    }
}

impl CfnResource for Role {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Role
    }

    fn properties(&self) -> Value {
        let mut props = json!({ "AssumeRolePolicyDocument": self.trust_policy.to_value() });
        if !self.managed_policy_arns.is_empty() {
            props["ManagedPolicyArns"] = json!(self.managed_policy_arns);
        }
        props
    }

    fn tokens(&self) -> Vec<&Token> {
        self.trust_policy.tokens()
    }
}
