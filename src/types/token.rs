//! Values that may only be known once the provisioning engine resolves them.
//!
//! A [`Token`] renders to either a plain JSON string or one of the
//! CloudFormation intrinsics `Ref`, `Fn::GetAtt` and `Fn::Join`. Tokens are the
//! only way one resource points at another, so walking them yields the
//! dependency edges of the graph.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use strum_macros::{AsRefStr, Display as StrumDisplay};

use super::logical_id::LogicalId;

/// Pseudo parameters supplied by the engine for every stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, StrumDisplay)]
pub enum Pseudo {
    #[strum(serialize = "AWS::AccountId")]
    AccountId,
    #[strum(serialize = "AWS::Region")]
    Region,
    #[strum(serialize = "AWS::Partition")]
    Partition,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Literal(String),
    Ref(LogicalId),
    GetAtt(LogicalId, String),
    Pseudo(Pseudo),
    /// Parts joined with an empty delimiter.
    Concat(Vec<Token>),
}

impl Token {
    pub fn literal(value: impl Into<String>) -> Self {
        Token::Literal(value.into())
    }

    pub fn reference(id: &LogicalId) -> Self {
        Token::Ref(id.clone())
    }

    pub fn get_att(id: &LogicalId, attribute: impl Into<String>) -> Self {
        Token::GetAtt(id.clone(), attribute.into())
    }

    /// Concatenate parts, merging adjacent literals. A result made only of
    /// literals collapses into a single [`Token::Literal`].
    pub fn concat(parts: impl IntoIterator<Item = Token>) -> Self {
        let mut merged: Vec<Token> = Vec::new();
        for part in parts {
            let flattened = match part {
                Token::Concat(inner) => inner,
                other => vec![other],
            };
            for piece in flattened {
                if let Token::Literal(s) = &piece {
                    if s.is_empty() {
                        continue;
                    }
                    if let Some(Token::Literal(prev)) = merged.last_mut() {
                        prev.push_str(s);
                        continue;
                    }
                }
                merged.push(piece);
            }
        }

        match merged.len() {
            0 => Token::Literal(String::new()),
            1 if matches!(merged[0], Token::Literal(_)) => merged.remove(0),
            _ => Token::Concat(merged),
        }
    }

    /// The literal value, if this token needs no resolution.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Token::Literal(s) => Some(s),
            _ => None,
        }
    }

    /// Logical ids this token points at, in order of appearance.
    pub fn references(&self) -> Vec<&LogicalId> {
        match self {
            Token::Ref(id) | Token::GetAtt(id, _) => vec![id],
            Token::Concat(parts) => parts.iter().flat_map(Token::references).collect(),
            Token::Literal(_) | Token::Pseudo(_) => Vec::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Token::Literal(s) => Value::String(s.clone()),
            Token::Ref(id) => json!({ "Ref": id.as_str() }),
            Token::GetAtt(id, attr) => json!({ "Fn::GetAtt": [id.as_str(), attr] }),
            Token::Pseudo(p) => json!({ "Ref": p.as_ref() }),
            Token::Concat(parts) => {
                let parts: Vec<Value> = parts.iter().map(Token::to_value).collect();
                json!({ "Fn::Join": ["", parts] })
            }
        }
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Literal(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Literal(value)
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Token::Literal(s) => write!(f, "{s}"),
            Token::Ref(id) => write!(f, "${{{id}}}"),
            Token::GetAtt(id, attr) => write!(f, "${{{id}.{attr}}}"),
            Token::Pseudo(p) => write!(f, "${{{p}}}"),
            Token::Concat(parts) => parts.iter().try_for_each(|p| write!(f, "{p}")),
        }
    }
}
