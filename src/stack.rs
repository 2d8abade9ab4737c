use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Environment;
use crate::error::StackError;
use crate::template::{Output, Template, TemplateResource};
use crate::traits::CfnResource;
use crate::types::{LogicalId, Pseudo, Resource, Token};

static STACK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]{0,127}$").unwrap());

/// Region prefixes outside the commercial `aws` partition; longest prefix first.
const PARTITIONS: [(&str, &str); 4] = [
    ("us-isob-", "aws-iso-b"),
    ("us-iso-", "aws-iso"),
    ("us-gov-", "aws-us-gov"),
    ("cn-", "aws-cn"),
];

/// A named graph of resources deployed together into one account and region.
///
/// Edges are never declared: a resource depends on every logical id its
/// tokens reference. The graph is plain data, so building the same stack twice
/// yields equal values and byte-identical templates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    name: String,
    env: Environment,
    description: Option<String>,
    resources: BTreeMap<LogicalId, Resource>,
    outputs: BTreeMap<String, Output>,
}

impl Stack {
    pub fn new(name: impl Into<String>, env: Environment) -> Result<Self, StackError> {
        let name = name.into();
        if !STACK_NAME.is_match(&name) {
            return Err(StackError::InvalidName(format!(
                "stack name '{name}' must start with a letter and contain only letters, digits \
                 and hyphens (max 128 characters)"
            )));
        }
        env.validate()?;

        Ok(Stack {
            name,
            env,
            description: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The target region, or `AWS::Region` for an environment-agnostic stack.
    pub fn region(&self) -> Token {
        match &self.env.region {
            Some(region) => Token::literal(region.as_str()),
            None => Token::Pseudo(Pseudo::Region),
        }
    }

    /// The partition of the target region, or `AWS::Partition` when the region is unset.
    pub fn partition(&self) -> Token {
        let Some(region) = &self.env.region else {
            return Token::Pseudo(Pseudo::Partition);
        };
        let partition = PARTITIONS
            .iter()
            .find(|(prefix, _)| region.starts_with(prefix))
            .map_or("aws", |(_, partition)| *partition);
        Token::literal(partition)
    }

    /// The target account, or `AWS::AccountId` for an environment-agnostic stack.
    pub fn account(&self) -> Token {
        match &self.env.account {
            Some(account) => Token::literal(account.as_str()),
            None => Token::Pseudo(Pseudo::AccountId),
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn add_resource(
        &mut self,
        id: &str,
        resource: impl Into<Resource>,
    ) -> Result<LogicalId, StackError> {
        let id = LogicalId::new(id)?;
        if self.resources.contains_key(&id) {
            return Err(StackError::DuplicateLogicalId(id.to_string()));
        }
        let resource = resource.into();

        debug!(
            event = "Stack",
            phase = "AddResource",
            stack = self.name,
            id = id.as_str(),
            resource_type = resource.resource_type().as_ref()
        );

        self.resources.insert(id.clone(), resource);
        Ok(id)
    }

    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        value: Token,
        description: Option<&str>,
    ) -> Result<(), StackError> {
        let name = name.into();
        let id = LogicalId::new(name.as_str())?;
        if self.outputs.contains_key(id.as_str()) {
            return Err(StackError::DuplicateLogicalId(name));
        }
        self.outputs.insert(
            name,
            Output {
                value,
                description: description.map(str::to_string),
            },
        );
        Ok(())
    }

    pub fn resource(&self, id: &LogicalId) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&LogicalId, &Resource)> {
        self.resources.iter()
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    /// Direct dependencies of `id`; empty if `id` is not in the stack.
    pub fn dependencies(&self, id: &LogicalId) -> BTreeSet<LogicalId> {
        self.resources
            .get(id)
            .map(|r| r.references())
            .unwrap_or_default()
    }

    /// Check every reference resolves inside this stack and the graph is acyclic.
    pub fn validate(&self) -> Result<(), StackError> {
        self.check_references()?;
        self.deployment_waves().map(|_| ())
    }

    fn check_references(&self) -> Result<(), StackError> {
        let from_resources = self
            .resources
            .iter()
            .flat_map(|(id, r)| r.references().into_iter().map(move |to| (id.to_string(), to)));
        let from_outputs = self.outputs.iter().flat_map(|(name, output)| {
            output
                .value
                .references()
                .into_iter()
                .map(move |to| (name.clone(), to.clone()))
        });

        for (from, to) in from_resources.chain(from_outputs) {
            if !self.resources.contains_key(&to) {
                warn!(
                    event = "Stack",
                    phase = "Validate",
                    stack = self.name,
                    from = from,
                    to = to.as_str()
                );
                return Err(StackError::DanglingReference {
                    from,
                    to: to.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Group resources into waves: every resource depends only on resources
    /// in earlier waves, so each wave may be realized in parallel.
    pub fn deployment_waves(&self) -> Result<Vec<Vec<LogicalId>>, StackError> {
        self.check_references()?;

        let mut remaining: BTreeMap<&LogicalId, BTreeSet<LogicalId>> = self
            .resources
            .iter()
            .map(|(id, r)| (id, r.references()))
            .collect();
        let mut waves = Vec::new();

        while !remaining.is_empty() {
            let ready: Vec<LogicalId> = remaining
                .iter()
                .filter(|(_, deps)| deps.is_empty())
                .map(|(id, _)| (*id).clone())
                .collect();

            if ready.is_empty() {
                return Err(StackError::CyclicDependency(
                    cycle_members(&remaining).into_iter().join(", "),
                ));
            }

            for id in &ready {
                remaining.remove(id);
            }
            for deps in remaining.values_mut() {
                for id in &ready {
                    deps.remove(id);
                }
            }
            waves.push(ready);
        }

        Ok(waves)
    }

    /// A creation order honouring every dependency.
    pub fn deployment_order(&self) -> Result<Vec<LogicalId>, StackError> {
        Ok(self.deployment_waves()?.into_iter().flatten().collect())
    }

    /// Render the desired state. Fails if the graph is not valid.
    pub fn synthesize(&self) -> Result<Template, StackError> {
        self.validate()?;

        let resources: BTreeMap<LogicalId, TemplateResource> = self
            .resources
            .iter()
            .map(|(id, r)| {
                let rendered = TemplateResource::new(r.resource_type(), r.properties())
                    .with_removal_policy(r.removal_policy())
                    .with_update_policy(r.update_policy());
                (id.clone(), rendered)
            })
            .collect();

        info!(
            event = "Stack",
            phase = "Synthesize",
            stack = self.name,
            resources = resources.len(),
            outputs = self.outputs.len()
        );

        Ok(Template {
            description: self.description.clone(),
            resources,
            outputs: self.outputs.clone(),
        })
    }
}

/// Resources that can reach themselves; leaves out those merely downstream of a cycle.
fn cycle_members<'a>(
    remaining: &BTreeMap<&'a LogicalId, BTreeSet<LogicalId>>,
) -> Vec<&'a LogicalId> {
    remaining
        .iter()
        .filter(|(start, deps)| {
            let mut seen: BTreeSet<&LogicalId> = BTreeSet::new();
            let mut pending: Vec<&LogicalId> = deps.iter().collect();
            while let Some(next) = pending.pop() {
                if next == **start {
                    return true;
                }
                if seen.insert(next) {
                    if let Some(more) = remaining.get(next) {
                        pending.extend(more.iter());
                    }
                }
            }
            false
        })
        .map(|(id, _)| *id)
        .collect()
}

#[cfg(test)]
mod tests;
