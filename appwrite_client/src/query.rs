use serde_json::Value;

use std::fmt::{Display, Formatter};

/// A database query in the Appwrite 1.4 string dialect, e.g. `equal("creator", ["42"])`.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal(String, Vec<Value>),
    Search(String, String),
    OrderDesc(String),
    Limit(u32),
}

impl Query {
    pub fn equal(attribute: &str, value: impl Into<Value>) -> Query {
        Query::Equal(attribute.to_string(), vec![value.into()])
    }

    pub fn search(attribute: &str, text: &str) -> Query {
        Query::Search(attribute.to_string(), text.to_string())
    }

    pub fn order_desc(attribute: &str) -> Query {
        Query::OrderDesc(attribute.to_string())
    }

    pub fn limit(limit: u32) -> Query {
        Query::Limit(limit)
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let values = |values: &[Value]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        match self {
            Query::Equal(attr, vals) => write!(f, "equal({}, [{}])", quote(attr), values(vals.as_slice())),
            Query::Search(attr, text) => write!(f, "search({}, [{}])", quote(attr), quote(text)),
            Query::OrderDesc(attr) => write!(f, "orderDesc({})", quote(attr)),
            Query::Limit(limit) => write!(f, "limit({})", limit),
        }
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Document, account or file ID. `ID::unique()` asks the server to generate one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ID(String);

impl ID {
    pub fn unique() -> ID {
        ID("unique()".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
