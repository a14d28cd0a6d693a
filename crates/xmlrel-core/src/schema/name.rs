use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualified XML name: optional namespace URI plus local name.
///
/// The textual form is Clark notation, `{uri}local`, or just `local` for
/// names in no namespace.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct XmlName {
    pub namespace: Option<String>,
    pub local: String,
}

impl XmlName {
    pub fn new(src: &str) -> Self {
        if let Some(rest) = src.strip_prefix('{') {
            if let Some((namespace, local)) = rest.split_once('}') {
                return Self::qualified(namespace, local);
            }
        }

        Self {
            namespace: None,
            local: src.to_string(),
        }
    }

    pub fn qualified(namespace: &str, local: &str) -> Self {
        Self {
            namespace: (!namespace.is_empty()).then(|| namespace.to_string()),
            local: local.to_string(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for XmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.local),
            None => f.write_str(&self.local),
        }
    }
}

impl From<&str> for XmlName {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<String> for XmlName {
    fn from(src: String) -> Self {
        Self::new(&src)
    }
}

impl From<&XmlName> for XmlName {
    fn from(src: &XmlName) -> Self {
        src.clone()
    }
}

impl From<XmlName> for String {
    fn from(name: XmlName) -> Self {
        name.to_string()
    }
}
