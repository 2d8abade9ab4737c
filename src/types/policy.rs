//! IAM policy documents: trust policies for roles and the domain access policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumString};

use super::token::Token;

pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, Serialize, Deserialize,
)]
pub enum Effect {
    Allow,
    Deny,
}

/// Who a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Principal {
    /// An IAM identity by ARN, rendered under `AWS`.
    Arn(Token),
    /// An AWS service, e.g. `es.amazonaws.com`.
    Service(String),
    /// A federated identity broker, e.g. `cognito-identity.amazonaws.com`.
    Federated(String),
}

impl Principal {
    fn key(&self) -> &'static str {
        match self {
            Principal::Arn(_) => "AWS",
            Principal::Service(_) => "Service",
            Principal::Federated(_) => "Federated",
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Principal::Arn(arn) => arn.to_value(),
            Principal::Service(s) | Principal::Federated(s) => Value::String(s.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumString)]
pub enum ConditionOperator {
    #[strum(serialize = "ForAnyValue:StringEquals")]
    ForAnyValueStringEquals,
    /// Holds when any element of a multi-valued claim matches.
    #[strum(serialize = "ForAnyValue:StringLike")]
    ForAnyValueStringLike,
    StringEquals,
    StringLike,
}

/// A single IAM statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    effect: Effect,
    principals: Vec<Principal>,
    actions: Vec<String>,
    resources: Vec<Token>,
    conditions: BTreeMap<ConditionOperator, BTreeMap<String, Token>>,
}

impl PolicyStatement {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            principals: Vec::new(),
            actions: Vec::new(),
            resources: Vec::new(),
            conditions: BTreeMap::new(),
        }
    }

    pub fn allow() -> Self {
        Self::new(Effect::Allow)
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals.push(principal);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<Token>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Add `key` under `operator`. A second value for the same key replaces the first.
    pub fn with_condition(
        mut self,
        operator: ConditionOperator,
        key: impl Into<String>,
        value: impl Into<Token>,
    ) -> Self {
        self.conditions
            .entry(operator)
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn principals(&self) -> &[Principal] {
        &self.principals
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn resources(&self) -> &[Token] {
        &self.resources
    }

    pub fn condition(&self, operator: ConditionOperator, key: &str) -> Option<&Token> {
        self.conditions.get(&operator).and_then(|c| c.get(key))
    }

    pub fn tokens(&self) -> Vec<&Token> {
        let principals = self.principals.iter().filter_map(|p| match p {
            Principal::Arn(t) => Some(t),
            _ => None,
        });
        let conditions = self.conditions.values().flat_map(|c| c.values());
        principals
            .chain(self.resources.iter())
            .chain(conditions)
            .collect()
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        if !self.actions.is_empty() {
            let actions: Vec<Value> = self.actions.iter().cloned().map(Value::String).collect();
            out.insert("Action".to_string(), collapse(actions));
        }
        if !self.conditions.is_empty() {
            let conditions: Map<String, Value> = self
                .conditions
                .iter()
                .map(|(op, entries)| {
                    let entries: Map<String, Value> = entries
                        .iter()
                        .map(|(k, v)| (k.clone(), v.to_value()))
                        .collect();
                    (op.to_string(), Value::Object(entries))
                })
                .collect();
            out.insert("Condition".to_string(), Value::Object(conditions));
        }
        out.insert(
            "Effect".to_string(),
            Value::String(self.effect.to_string()),
        );
        if !self.principals.is_empty() {
            let mut grouped: BTreeMap<&str, Vec<Value>> = BTreeMap::new();
            for p in &self.principals {
                grouped.entry(p.key()).or_default().push(p.to_value());
            }
            let principals: Map<String, Value> = grouped
                .into_iter()
                .map(|(k, v)| (k.to_string(), collapse(v)))
                .collect();
            out.insert("Principal".to_string(), Value::Object(principals));
        }
        if !self.resources.is_empty() {
            let resources: Vec<Value> = self.resources.iter().map(Token::to_value).collect();
            out.insert("Resource".to_string(), collapse(resources));
        }
        Value::Object(out)
    }
}

/// Single-element lists render as the bare element.
fn collapse(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyDocument {
    statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        Self { statements }
    }

    pub fn add_statement(&mut self, statement: PolicyStatement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn tokens(&self) -> Vec<&Token> {
        self.statements.iter().flat_map(|s| s.tokens()).collect()
    }

    pub fn to_value(&self) -> Value {
        let statements: Vec<Value> = self.statements.iter().map(|s| s.to_value()).collect();
        serde_json::json!({
            "Statement": statements,
            "Version": POLICY_VERSION,
        })
    }
}
