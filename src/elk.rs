//! The search stack: an Elasticsearch domain whose Kibana console and data
//! plane are only reachable through Cognito-authenticated identities.

use tracing::{debug, info};

use crate::config::{Environment, StackProps};
use crate::error::StackError;
use crate::stack::Stack;
use crate::template::Template;
use crate::types::{
    AttributeSpec, ClusterCapacity, CognitoOptions, ConditionOperator, EbsOptions,
    IdentityPool, IdentityPoolRoleAttachment, LogicalId, PolicyStatement, Principal, Role,
    SearchDomain, StandardAttribute, Token, UserPool, UserPoolDomain, VerifiableAttribute,
};

pub const COGNITO_IDENTITY_PROVIDER: &str = "cognito-identity.amazonaws.com";
pub const AUDIENCE_CLAIM: &str = "cognito-identity.amazonaws.com:aud";
pub const AUTH_METHOD_CLAIM: &str = "cognito-identity.amazonaws.com:amr";
pub const AUTHENTICATED: &str = "authenticated";
pub const SEARCH_SERVICE_PRINCIPAL: &str = "es.amazonaws.com";
pub const COGNITO_ACCESS_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonESCognitoAccess";
pub const DATA_PLANE_ACTIONS: &str = "es:ESHttp*";

const USER_POOL_SUFFIX: &str = "UserPool";
const IDENTITY_POOL_SUFFIX: &str = "IdentityPool";
/// Cognito caps user pool and identity pool names at 128 characters.
const COGNITO_NAME_LIMIT: usize = 128;
/// Longest stack name whose derived pool names still fit.
pub const MAX_STACK_NAME_LEN: usize = COGNITO_NAME_LIMIT - IDENTITY_POOL_SUFFIX.len();

/// Logical ids of the resources in an [`ElkStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElkResourceIds {
    pub user_pool: LogicalId,
    pub user_pool_domain: LogicalId,
    pub identity_pool: LogicalId,
    pub authenticated_role: LogicalId,
    pub role_attachment: LogicalId,
    pub service_role: LogicalId,
    pub domain: LogicalId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElkStack {
    stack: Stack,
    ids: ElkResourceIds,
}

impl ElkStack {
    /// Assemble the full graph. Pure: equal inputs give equal stacks.
    pub fn build(
        name: impl Into<String>,
        env: Environment,
        props: &StackProps,
    ) -> Result<Self, StackError> {
        props.validate()?;
        let name: String = name.into();
        if name.len() > MAX_STACK_NAME_LEN {
            return Err(StackError::InvalidName(format!(
                "stack name '{name}' is {} characters; pool names derived from it need it to be \
                 at most {MAX_STACK_NAME_LEN}",
                name.len()
            )));
        }
        let mut stack = Stack::new(name, env)?;
        if let Some(description) = &props.description {
            stack.set_description(description.as_str());
        }

        debug!(
            event = "ElkStack",
            phase = "Build",
            stack = stack.name(),
            domain_name = props.domain_name
        );

        // Directory
        let mut pool = UserPool::new(format!("{}{USER_POOL_SUFFIX}", stack.name()))
            .with_standard_attribute(
                StandardAttribute::Email,
                AttributeSpec {
                    required: true,
                    mutable: true,
                },
            );
        if props.auto_verify_email {
            pool = pool.with_auto_verify(VerifiableAttribute::Email);
        }
        let user_pool = stack.add_resource("UserPool", pool)?;
        let user_pool_domain = stack.add_resource(
            "UserPoolDomain",
            UserPoolDomain::new(props.domain_prefix.as_str(), Token::reference(&user_pool)),
        )?;

        // Identity exchange and the role it hands to signed-in users
        let identity_pool = stack.add_resource(
            "IdentityPool",
            IdentityPool::new(format!("{}{IDENTITY_POOL_SUFFIX}", stack.name())),
        )?;
        let authenticated_role = stack.add_resource(
            "AuthenticatedRole",
            Role::new(
                Role::web_identity_trust(COGNITO_IDENTITY_PROVIDER)
                    .with_condition(
                        ConditionOperator::StringEquals,
                        AUDIENCE_CLAIM,
                        Token::reference(&identity_pool),
                    )
                    .with_condition(
                        ConditionOperator::ForAnyValueStringLike,
                        AUTH_METHOD_CLAIM,
                        AUTHENTICATED,
                    ),
            ),
        )?;
        let role_attachment = stack.add_resource(
            "IdentityPoolRoleAttachment",
            IdentityPoolRoleAttachment::new(Token::reference(&identity_pool))
                .with_authenticated_role(Role::arn(&authenticated_role)),
        )?;

        // Lets the search service configure Cognito for Kibana
        let service_role = stack.add_resource(
            "EsRole",
            Role::new(Role::service_trust(SEARCH_SERVICE_PRINCIPAL))
                .with_managed_policy(COGNITO_ACCESS_POLICY_ARN),
        )?;

        let search_domain = SearchDomain::new(
            props.domain_name.as_str(),
            props.engine_version,
            ClusterCapacity {
                data_node_instance_type: props.capacity.data_node_instance_type.clone(),
                data_nodes: props.capacity.data_nodes,
            },
            EbsOptions {
                enabled: props.ebs.enabled,
                volume_size: props.ebs.volume_size,
                volume_type: props.ebs.volume_type,
                iops: props.ebs.iops,
            },
        )
        .with_version_upgrade(props.enable_version_upgrade)
        .with_access_policy(
            PolicyStatement::allow()
                .with_principal(Principal::Arn(Role::arn(&authenticated_role)))
                .with_action(DATA_PLANE_ACTIONS)
                .with_resource(SearchDomain::data_plane_arn(
                    &props.domain_name,
                    stack.partition(),
                    stack.region(),
                    stack.account(),
                )),
        )
        .with_cognito(CognitoOptions {
            user_pool_id: Token::reference(&user_pool),
            identity_pool_id: Token::reference(&identity_pool),
            role_arn: Role::arn(&service_role),
        });
        let domain = stack.add_resource("Elasticsearch", search_domain)?;

        let endpoint = Token::get_att(&domain, "DomainEndpoint");
        stack.add_output(
            "DomainEndpoint",
            endpoint.clone(),
            Some("HTTPS data-plane endpoint of the search domain"),
        )?;
        stack.add_output(
            "KibanaUrl",
            Token::concat([
                Token::literal("https://"),
                endpoint,
                Token::literal("/_plugin/kibana/"),
            ]),
            Some("Kibana console, signs in through the hosted UI"),
        )?;
        stack.add_output("UserPoolId", Token::reference(&user_pool), None)?;
        stack.add_output("IdentityPoolId", Token::reference(&identity_pool), None)?;
        stack.add_output(
            "HostedUiUrl",
            UserPoolDomain::base_url(Token::reference(&user_pool_domain), stack.region()),
            None,
        )?;

        stack.validate()?;
        info!(
            event = "ElkStack",
            phase = "Built",
            stack = stack.name(),
            resources = stack.resources().count()
        );

        Ok(ElkStack {
            stack,
            ids: ElkResourceIds {
                user_pool,
                user_pool_domain,
                identity_pool,
                authenticated_role,
                role_attachment,
                service_role,
                domain,
            },
        })
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn ids(&self) -> &ElkResourceIds {
        &self.ids
    }

    pub fn synthesize(&self) -> Result<Template, StackError> {
        self.stack.synthesize()
    }
}
