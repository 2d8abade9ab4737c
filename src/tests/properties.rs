//! Structural guarantees of the synthesized search stack.

use serde_json::{Value, json};
use yare::parameterized;

use crate::elk::{AUDIENCE_CLAIM, AUTH_METHOD_CLAIM, AUTHENTICATED};
use crate::{
    CfnResource, ConditionOperator, ElkStack, Environment, Principal, Resource, ResourceType,
    Role, StackProps, Token,
};

fn env(account: Option<&str>, region: Option<&str>) -> Environment {
    Environment {
        account: account.map(str::to_string),
        region: region.map(str::to_string),
    }
}

fn template_value(elk: &ElkStack) -> Value {
    elk.synthesize().unwrap().to_value().unwrap()
}

#[parameterized(
    agnostic = { "Test", None, None },
    concrete = { "Search", Some("123456789012"), Some("eu-west-1") },
    region_only = { "Logs-Prod", None, Some("us-east-2") },
    account_only = { "a", Some("210987654321"), None },
)]
fn test_access_policy_principal_is_authenticated_role(
    name: &str,
    account: Option<&str>,
    region: Option<&str>,
) {
    let elk = ElkStack::build(name, env(account, region), &StackProps::default()).unwrap();
    let ids = elk.ids();

    let Some(Resource::SearchDomain(domain)) = elk.stack().resource(&ids.domain) else {
        panic!("search domain missing");
    };
    let statements = domain.access_policies().statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].principals(),
        [Principal::Arn(Role::arn(&ids.authenticated_role))]
    );
    assert!(matches!(
        elk.stack().resource(&ids.authenticated_role),
        Some(Resource::Role(_))
    ));

    let template = template_value(&elk);
    let policy = &template["Resources"]["Elasticsearch"]["Properties"]["AccessPolicies"];
    assert_eq!(
        policy["Statement"][0]["Principal"]["AWS"],
        json!({ "Fn::GetAtt": ["AuthenticatedRole", "Arn"] })
    );
    assert_eq!(policy["Statement"][0]["Action"], "es:ESHttp*");

    let resource = &statements[0].resources()[0];
    match (account, region) {
        (Some(account), Some(region)) => assert_eq!(
            resource.as_literal(),
            Some(format!("arn:aws:es:{region}:{account}:domain/cdk-elk/*").as_str())
        ),
        _ => assert!(resource.as_literal().is_none()),
    }
}

#[test]
fn test_concrete_environment_access_policy() {
    let elk = ElkStack::build(
        "Test",
        Environment::new("123456789012", "eu-west-1"),
        &StackProps::default(),
    )
    .unwrap();
    let template = template_value(&elk);

    insta::assert_json_snapshot!(
        template["Resources"]["Elasticsearch"]["Properties"]["AccessPolicies"],
        @r#"
    {
      "Statement": [
        {
          "Action": "es:ESHttp*",
          "Effect": "Allow",
          "Principal": {
            "AWS": {
              "Fn::GetAtt": [
                "AuthenticatedRole",
                "Arn"
              ]
            }
          },
          "Resource": "arn:aws:es:eu-west-1:123456789012:domain/cdk-elk/*"
        }
      ],
      "Version": "2012-10-17"
    }
    "#
    );
}

#[test]
fn test_gov_cloud_access_policy_uses_gov_partition() {
    let elk = ElkStack::build(
        "Test",
        Environment::new("123456789012", "us-gov-west-1"),
        &StackProps::default(),
    )
    .unwrap();
    let template = template_value(&elk);
    assert_eq!(
        template["Resources"]["Elasticsearch"]["Properties"]["AccessPolicies"]["Statement"][0]
            ["Resource"],
        "arn:aws-us-gov:es:us-gov-west-1:123456789012:domain/cdk-elk/*"
    );
}

#[parameterized(
    defaults = { "{}" },
    tuned = { r#"{ "capacity": { "dataNodes": 4 }, "autoVerifyEmail": false }"# },
)]
fn test_identity_pool_never_allows_unauthenticated(props: &str) {
    let props = StackProps::from_json(props).unwrap();
    let elk = ElkStack::build("Test", Environment::agnostic(), &props).unwrap();

    let Some(Resource::IdentityPool(pool)) = elk.stack().resource(&elk.ids().identity_pool)
    else {
        panic!("identity pool missing");
    };
    assert!(!pool.allows_unauthenticated_identities());

    let template = template_value(&elk);
    assert_eq!(
        template["Resources"]["IdentityPool"]["Properties"]["AllowUnauthenticatedIdentities"],
        false
    );
}

#[test]
fn test_trust_condition_binds_to_own_identity_pool() {
    let elk = ElkStack::build("Test", Environment::agnostic(), &StackProps::default()).unwrap();
    let ids = elk.ids();

    let Some(Resource::Role(role)) = elk.stack().resource(&ids.authenticated_role) else {
        panic!("authenticated role missing");
    };
    let trust = &role.trust_policy().statements()[0];
    assert_eq!(
        trust.condition(ConditionOperator::StringEquals, AUDIENCE_CLAIM),
        Some(&Token::reference(&ids.identity_pool))
    );
    assert_eq!(
        trust.condition(ConditionOperator::ForAnyValueStringLike, AUTH_METHOD_CLAIM),
        Some(&Token::literal(AUTHENTICATED))
    );
    assert_eq!(
        elk.stack()
            .resource(&ids.identity_pool)
            .map(|r| r.resource_type()),
        Some(ResourceType::IdentityPool)
    );

    let Some(Resource::IdentityPoolRoleAttachment(attachment)) =
        elk.stack().resource(&ids.role_attachment)
    else {
        panic!("role attachment missing");
    };
    assert_eq!(
        attachment.identity_pool_id(),
        &Token::reference(&ids.identity_pool)
    );
    assert_eq!(
        attachment.role(crate::PrincipalCategory::Authenticated),
        Some(&Role::arn(&ids.authenticated_role))
    );
}

#[test]
fn test_cognito_options_match_graph() {
    let elk = ElkStack::build("Test", Environment::agnostic(), &StackProps::default()).unwrap();
    let ids = elk.ids();

    let Some(Resource::SearchDomain(domain)) = elk.stack().resource(&ids.domain) else {
        panic!("search domain missing");
    };
    let cognito = domain.cognito().unwrap();
    assert_eq!(cognito.user_pool_id, Token::reference(&ids.user_pool));
    assert_eq!(cognito.identity_pool_id, Token::reference(&ids.identity_pool));
    assert_eq!(cognito.role_arn, Role::arn(&ids.service_role));

    let Some(Resource::UserPoolDomain(hosted)) = elk.stack().resource(&ids.user_pool_domain)
    else {
        panic!("user pool domain missing");
    };
    assert_eq!(hosted.user_pool_id(), &cognito.user_pool_id);

    // Every reference in the graph resolves.
    assert!(elk.stack().validate().is_ok());
}

#[test]
fn test_names_derive_from_stack_name() {
    let elk = ElkStack::build("Test", Environment::agnostic(), &StackProps::default()).unwrap();
    let template = template_value(&elk);

    assert_eq!(
        template["Resources"]["UserPool"]["Properties"]["UserPoolName"],
        "TestUserPool"
    );
    assert_eq!(
        template["Resources"]["IdentityPool"]["Properties"]["IdentityPoolName"],
        "TestIdentityPool"
    );
}

#[parameterized(
    agnostic = { None, None },
    concrete = { Some("123456789012"), Some("ap-southeast-2") },
)]
fn test_synthesis_is_deterministic(account: Option<&str>, region: Option<&str>) {
    let props = StackProps::default();
    let first = ElkStack::build("Test", env(account, region), &props).unwrap();
    let second = ElkStack::build("Test", env(account, region), &props).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.synthesize().unwrap().to_json().unwrap(),
        second.synthesize().unwrap().to_json().unwrap()
    );
    assert_eq!(
        first.synthesize().unwrap().to_json_pretty().unwrap(),
        first.synthesize().unwrap().to_json_pretty().unwrap()
    );
}
