use super::*;
use crate::types::{
    IdentityPool, IdentityPoolRoleAttachment, PolicyStatement, Principal, RemovalPolicy,
    ResourceType, Role, UserPool, UserPoolDomain,
};
use yare::parameterized;


fn stack() -> Stack {
    Stack::new("Test", Environment::agnostic()).unwrap()
}

fn id(s: &str) -> LogicalId {
    LogicalId::new(s).unwrap()
}

/// A role that trusts whatever role is registered under `other`.
fn role_trusting(other: &str) -> Role {
    Role::new(
        PolicyStatement::allow()
            .with_principal(Principal::Arn(Role::arn(&id(other))))
            .with_action(crate::types::ASSUME_ROLE),
    )
}

#[test]
fn test_stack_name_validation() {
    assert!(Stack::new("Test", Environment::agnostic()).is_ok());
    assert!(Stack::new("my-search-stack", Environment::agnostic()).is_ok());
    for bad in ["", "1stack", "my_stack", "my stack"] {
        assert!(matches!(
            Stack::new(bad, Environment::agnostic()),
            Err(StackError::InvalidName(_))
        ));
    }
    assert!(Stack::new("x".repeat(129), Environment::agnostic()).is_err());
}

#[test]
fn test_stack_rejects_invalid_environment() {
    let env = Environment::new("not-an-account", "eu-west-1");
    assert!(matches!(
        Stack::new("Test", env),
        Err(StackError::InvalidConfig(_))
    ));
}

#[test]
fn test_region_and_account_tokens() {
    let agnostic = stack();
    assert_eq!(agnostic.region(), Token::Pseudo(Pseudo::Region));
    assert_eq!(agnostic.account(), Token::Pseudo(Pseudo::AccountId));

    let concrete = Stack::new("Test", Environment::new("123456789012", "eu-north-1")).unwrap();
    assert_eq!(concrete.region(), Token::literal("eu-north-1"));
    assert_eq!(concrete.account(), Token::literal("123456789012"));
    assert_eq!(concrete.environment().region.as_deref(), Some("eu-north-1"));
}

#[parameterized(
    commercial = { "eu-west-1", "aws" },
    gov_cloud = { "us-gov-west-1", "aws-us-gov" },
    china = { "cn-north-1", "aws-cn" },
    iso = { "us-iso-east-1", "aws-iso" },
    iso_b = { "us-isob-east-1", "aws-iso-b" },
)]
fn test_partition_follows_region(region: &str, partition: &str) {
    let stack = Stack::new("Test", Environment::new("123456789012", region)).unwrap();
    assert_eq!(stack.partition(), Token::literal(partition));
}

#[test]
fn test_partition_is_pseudo_without_region() {
    assert_eq!(stack().partition(), Token::Pseudo(Pseudo::Partition));
    let account_only = Stack::new(
        "Test",
        Environment {
            account: Some("123456789012".to_string()),
            region: None,
        },
    )
    .unwrap();
    assert_eq!(account_only.partition(), Token::Pseudo(Pseudo::Partition));
}

#[test]
fn test_add_resource_rejects_duplicates_and_bad_ids() {
    let mut stack = stack();
    stack.add_resource("IdentityPool", IdentityPool::new("a")).unwrap();
    assert_eq!(
        stack.add_resource("IdentityPool", IdentityPool::new("b")),
        Err(StackError::DuplicateLogicalId("IdentityPool".to_string()))
    );
    assert!(matches!(
        stack.add_resource("Identity-Pool", IdentityPool::new("c")),
        Err(StackError::InvalidName(_))
    ));
    assert_eq!(stack.resources().count(), 1);
}

#[test]
fn test_add_output_rejects_duplicates() {
    let mut stack = stack();
    let pool = stack.add_resource("UserPool", UserPool::new("p")).unwrap();
    stack
        .add_output("UserPoolId", Token::reference(&pool), None)
        .unwrap();
    assert!(matches!(
        stack.add_output("UserPoolId", Token::reference(&pool), None),
        Err(StackError::DuplicateLogicalId(_))
    ));
    assert!(stack.add_output("user-pool", Token::literal("x"), None).is_err());
    assert_eq!(stack.outputs().len(), 1);
}

#[test]
fn test_synthesize_renders_every_resource() {
    let mut stack = stack();
    stack.set_description("identity only");
    let pool = stack.add_resource("UserPool", UserPool::new("TestUserPool")).unwrap();
    stack
        .add_resource(
            "UserPoolDomain",
            UserPoolDomain::new("cdk-elk", Token::reference(&pool)),
        )
        .unwrap();

    let template = stack.synthesize().unwrap();
    assert_eq!(template.description.as_deref(), Some("identity only"));
    assert_eq!(template.resources.len(), 2);

    let user_pool = template.resource("UserPool").unwrap();
    assert_eq!(user_pool.resource_type, ResourceType::UserPool);
    assert_eq!(user_pool.deletion_policy, Some(RemovalPolicy::Retain));
    let domain = template.resource("UserPoolDomain").unwrap();
    assert_eq!(domain.deletion_policy, None);
    assert_eq!(domain.properties["UserPoolId"], serde_json::json!({ "Ref": "UserPool" }));
}

#[test]
fn test_synthesize_fails_on_dangling_reference() {
    let mut stack = stack();
    stack
        .add_resource(
            "IdentityPoolRoleAttachment",
            IdentityPoolRoleAttachment::new(Token::reference(&id("IdentityPool"))),
        )
        .unwrap();

    assert_eq!(
        stack.synthesize(),
        Err(StackError::DanglingReference {
            from: "IdentityPoolRoleAttachment".to_string(),
            to: "IdentityPool".to_string(),
        })
    );
}

#[test]
fn test_dangling_output_reference() {
    let mut stack = stack();
    stack
        .add_output("Endpoint", Token::get_att(&id("Elasticsearch"), "DomainEndpoint"), None)
        .unwrap();
    assert_eq!(
        stack.validate(),
        Err(StackError::DanglingReference {
            from: "Endpoint".to_string(),
            to: "Elasticsearch".to_string(),
        })
    );
}
