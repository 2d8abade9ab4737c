//! The rendered CloudFormation template handed to the provisioning engine.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::StackError;
use crate::types::{LogicalId, RemovalPolicy, ResourceType, Token};

/// One entry under `Resources`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: ResourceType,
    pub properties: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<RemovalPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<RemovalPolicy>,
}

impl TemplateResource {
    pub fn new(resource_type: ResourceType, properties: Value) -> Self {
        Self {
            resource_type,
            properties,
            update_policy: None,
            update_replace_policy: None,
            deletion_policy: None,
        }
    }

    /// Only a retained resource carries explicit policies; deletion is the engine default.
    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        if policy == RemovalPolicy::Retain {
            self.update_replace_policy = Some(policy);
            self.deletion_policy = Some(policy);
        }
        self
    }

    pub fn with_update_policy(mut self, policy: Option<Value>) -> Self {
        self.update_policy = policy;
        self
    }
}

/// One entry under `Outputs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Token,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resources: BTreeMap<LogicalId, TemplateResource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
        self.resources.iter().find(|(k, _)| k.as_str() == id).map(|(_, v)| v)
    }

    pub fn to_value(&self) -> Result<Value, StackError> {
        serde_json::to_value(self).map_err(|e| StackError::SerializationError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, StackError> {
        serde_json::to_string(self).map_err(|e| StackError::SerializationError(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, StackError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StackError::SerializationError(e.to_string()))
    }
}
