//! Logical identifiers for resources inside one template.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::StackError;

/// CloudFormation only accepts alphanumeric logical ids, up to 255 characters.
static LOGICAL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{1,255}$").unwrap());

/// The template-local name of a resource, e.g. `UserPool` or `AuthenticatedRole`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalId(String);

impl LogicalId {
    pub fn new(id: impl Into<String>) -> Result<Self, StackError> {
        let id = id.into();
        if !LOGICAL_ID.is_match(&id) {
            return Err(StackError::InvalidName(format!(
                "logical id '{id}' must be 1-255 alphanumeric characters"
            )));
        }
        Ok(LogicalId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LogicalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LogicalId {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogicalId::new(s)
    }
}

impl TryFrom<String> for LogicalId {
    type Error = StackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LogicalId::new(value)
    }
}

impl From<LogicalId> for String {
    fn from(id: LogicalId) -> Self {
        id.0
    }
}
