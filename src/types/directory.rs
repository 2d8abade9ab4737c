//! The Cognito user pool and its hosted-UI domain.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::StackError;
use crate::traits::CfnResource;

use super::resource::RemovalPolicy;
use super::resource_type::ResourceType;
use super::token::Token;

const VERIFICATION_MESSAGE: &str = "The verification code to your new account is {####}";
const VERIFICATION_SUBJECT: &str = "Verify your new account";

static DOMAIN_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").unwrap());

/// Words Cognito refuses inside a hosted-UI prefix.
const RESERVED_PREFIX_WORDS: [&str; 3] = ["aws", "amazon", "cognito"];

/// Check a hosted-UI domain prefix. Global uniqueness can only be checked by the provider.
pub fn validate_domain_prefix(prefix: &str) -> Result<(), StackError> {
    if !DOMAIN_PREFIX.is_match(prefix) {
        return Err(StackError::InvalidConfig(format!(
            "domain prefix '{prefix}' must be 1-63 lowercase letters, digits or hyphens, \
             and may not start or end with a hyphen"
        )));
    }
    if let Some(word) = RESERVED_PREFIX_WORDS.iter().find(|w| prefix.contains(*w)) {
        return Err(StackError::InvalidConfig(format!(
            "domain prefix '{prefix}' may not contain the reserved word '{word}'"
        )));
    }
    Ok(())
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StandardAttribute {
    Email,
    PhoneNumber,
    GivenName,
    FamilyName,
    PreferredUsername,
}

/// Attributes Cognito can verify automatically on sign up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum VerifiableAttribute {
    Email,
    PhoneNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttributeSpec {
    pub required: bool,
    pub mutable: bool,
}

/// A hosted user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
    name: String,
    auto_verify: BTreeSet<VerifiableAttribute>,
    standard_attributes: BTreeMap<StandardAttribute, AttributeSpec>,
}

impl UserPool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auto_verify: BTreeSet::new(),
            standard_attributes: BTreeMap::new(),
        }
    }

    pub fn with_auto_verify(mut self, attribute: VerifiableAttribute) -> Self {
        self.auto_verify.insert(attribute);
        self
    }

    pub fn with_standard_attribute(
        mut self,
        attribute: StandardAttribute,
        spec: AttributeSpec,
    ) -> Self {
        self.standard_attributes.insert(attribute, spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn auto_verified(&self) -> &BTreeSet<VerifiableAttribute> {
        &self.auto_verify
    }

    pub fn standard_attribute(&self, attribute: StandardAttribute) -> Option<&AttributeSpec> {
        self.standard_attributes.get(&attribute)
    }
}

impl CfnResource for UserPool {
    fn resource_type(&self) -> ResourceType {
        ResourceType::UserPool
    }

    fn properties(&self) -> Value {
        let mut props = json!({
            "AccountRecoverySetting": {
                "RecoveryMechanisms": [
                    { "Name": "verified_phone_number", "Priority": 1 },
                    { "Name": "verified_email", "Priority": 2 }
                ]
            },
            "AdminCreateUserConfig": { "AllowAdminCreateUserOnly": true },
            "EmailVerificationMessage": VERIFICATION_MESSAGE,
            "EmailVerificationSubject": VERIFICATION_SUBJECT,
            "SmsVerificationMessage": VERIFICATION_MESSAGE,
            "UserPoolName": self.name,
            "VerificationMessageTemplate": {
                "DefaultEmailOption": "CONFIRM_WITH_CODE",
                "EmailMessage": VERIFICATION_MESSAGE,
                "EmailSubject": VERIFICATION_SUBJECT,
                "SmsMessage": VERIFICATION_MESSAGE
            }
        });

        if !self.auto_verify.is_empty() {
            let attrs: Vec<&str> = self.auto_verify.iter().map(|a| a.as_ref()).collect();
            props["AutoVerifiedAttributes"] = json!(attrs);
        }
        if !self.standard_attributes.is_empty() {
            let schema: Vec<Value> = self
                .standard_attributes
                .iter()
                .map(|(attr, spec)| {
                    json!({
                        "Mutable": spec.mutable,
                        "Name": attr.as_ref(),
                        "Required": spec.required,
                    })
                })
                .collect();
            props["Schema"] = Value::Array(schema);
        }
        props
    }

    fn tokens(&self) -> Vec<&Token> {
        Vec::new()
    }

    fn removal_policy(&self) -> RemovalPolicy {
        RemovalPolicy::Retain
    }
}

/// The hosted-UI endpoint `https://<prefix>.auth.<region>.amazoncognito.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolDomain {
    domain_prefix: String,
    user_pool_id: Token,
}

impl UserPoolDomain {
    pub fn new(domain_prefix: impl Into<String>, user_pool_id: Token) -> Self {
        Self {
            domain_prefix: domain_prefix.into(),
            user_pool_id,
        }
    }

    pub fn domain_prefix(&self) -> &str {
        &self.domain_prefix
    }

    pub fn user_pool_id(&self) -> &Token {
        &self.user_pool_id
    }

    /// Sign-in base URL; `domain` resolves to the prefix at deploy time.
    pub fn base_url(domain: Token, region: Token) -> Token {
        Token::concat([
            Token::literal("https://"),
            domain,
            Token::literal(".auth."),
            region,
            Token::literal(".amazoncognito.com"),
        ])
    }
}

impl CfnResource for UserPoolDomain {
    fn resource_type(&self) -> ResourceType {
        ResourceType::UserPoolDomain
    }

    fn properties(&self) -> Value {
        json!({
            "Domain": self.domain_prefix,
            "UserPoolId": self.user_pool_id,
        })
    }

    fn tokens(&self) -> Vec<&Token> {
        vec![&self.user_pool_id]
    }
}
