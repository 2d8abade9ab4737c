//! Print the CloudFormation template for the search stack.
//!
//! Run with: cargo run --example synth -- [STACK_NAME] [PROPS_JSON_PATH]
//!
//! Set `CDK_DEFAULT_ACCOUNT` and `CDK_DEFAULT_REGION` to pin the environment;
//! otherwise the template resolves both at deploy time.

use std::error::Error;

use elk_stack_core::{ElkStack, Environment, StackProps};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "CdkElkStack".to_string());
    let props = match args.next() {
        Some(path) => StackProps::from_json(&std::fs::read_to_string(path)?)?,
        None => StackProps::default(),
    };
    let env = Environment {
        account: std::env::var("CDK_DEFAULT_ACCOUNT").ok(),
        region: std::env::var("CDK_DEFAULT_REGION").ok(),
    };

    let elk = ElkStack::build(name, env, &props)?;
    for (wave, ids) in elk.stack().deployment_waves()?.iter().enumerate() {
        let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        eprintln!("wave {}: {}", wave + 1, ids.join(", "));
    }
    println!("{}", elk.synthesize()?.to_json_pretty()?);
    Ok(())
}
