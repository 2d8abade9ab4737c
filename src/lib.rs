// src/lib.rs
pub use config::{CapacityConfig, EbsConfig, Environment, StackProps};
pub use elk::{ElkResourceIds, ElkStack};
pub use error::StackError;
pub use stack::Stack;
pub use template::{Output, Template, TemplateResource};
pub use traits::CfnResource;
pub use types::*;

pub mod config;
pub mod elk;
mod error;
mod stack;
mod template;
mod traits;
mod types;

#[cfg(test)]
mod tests;
