//! The closed set of resources a stack can hold.

use serde::{Serialize, Serializer};
use serde_json::Value;
use strum_macros::{AsRefStr, Display};

use crate::traits::CfnResource;

use super::directory::{UserPool, UserPoolDomain};
use super::domain::SearchDomain;
use super::identity::{IdentityPool, IdentityPoolRoleAttachment};
use super::resource_type::ResourceType;
use super::role::Role;
use super::token::Token;

/// Whether the physical resource survives removal from the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum RemovalPolicy {
    #[strum(serialize = "Delete")]
    Destroy,
    Retain,
}

impl Serialize for RemovalPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    UserPool(UserPool),
    UserPoolDomain(UserPoolDomain),
    IdentityPool(IdentityPool),
    IdentityPoolRoleAttachment(IdentityPoolRoleAttachment),
    Role(Role),
    SearchDomain(SearchDomain),
}

impl Resource {
    fn inner(&self) -> &dyn CfnResource {
        match self {
            Resource::UserPool(r) => r,
            Resource::UserPoolDomain(r) => r,
            Resource::IdentityPool(r) => r,
            Resource::IdentityPoolRoleAttachment(r) => r,
            Resource::Role(r) => r,
            Resource::SearchDomain(r) => r,
        }
    }
}

/// Dispatch the CfnResource trait to the wrapped resource.
impl CfnResource for Resource {
    fn resource_type(&self) -> ResourceType {
        self.inner().resource_type()
    }

    fn properties(&self) -> Value {
        self.inner().properties()
    }

    fn tokens(&self) -> Vec<&Token> {
        self.inner().tokens()
    }

    fn removal_policy(&self) -> RemovalPolicy {
        self.inner().removal_policy()
    }

    fn update_policy(&self) -> Option<Value> {
        self.inner().update_policy()
    }
}

macro_rules! impl_from_resource {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Resource {
                fn from(r: $variant) -> Self {
                    Resource::$variant(r)
                }
            }
        )*
    };
}

impl_from_resource!(
    UserPool,
    UserPoolDomain,
    IdentityPool,
    IdentityPoolRoleAttachment,
    Role,
    SearchDomain,
);
