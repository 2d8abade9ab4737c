use std::collections::BTreeSet;

use serde_json::Value;

use crate::types::{LogicalId, RemovalPolicy, ResourceType, Token};

/// Anything that can be emitted as one entry of a template's `Resources`
/// section, e.g. a user pool, an IAM role or a search domain.
pub trait CfnResource {
    /// The CloudFormation type (`AWS::IAM::Role`, ...)
    fn resource_type(&self) -> ResourceType;

    /// The `Properties` block, with every token already rendered
    fn properties(&self) -> Value;

    /// Every token embedded in the properties
    fn tokens(&self) -> Vec<&Token>;

    /// Logical ids this resource points at; these are its dependencies
    fn references(&self) -> BTreeSet<LogicalId> {
        self.tokens()
            .into_iter()
            .flat_map(Token::references)
            .cloned()
            .collect()
    }

    /// What happens to the physical resource when it leaves the template
    fn removal_policy(&self) -> RemovalPolicy {
        RemovalPolicy::Destroy
    }

    /// The `UpdatePolicy` block, none by default
    fn update_policy(&self) -> Option<Value> {
        None
    }
}
