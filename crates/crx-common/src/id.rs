use serde::{Deserialize, Serialize};
use std::fmt;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identifier of a tab or other execution context taking part in a
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub u32);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// Identifier of a single port connection. Must be unique across the
/// transport, since channel names are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(String);

impl PortId {
    pub fn new() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for PortId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PortId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn port_id_is_unique() {
        assert_ne!(PortId::new(), PortId::new());
    }

    #[test]
    fn port_id_from_str_keeps_value() {
        let id = PortId::from("port-7");
        assert_eq!(id.as_str(), "port-7");
        assert_eq!(id.to_string(), "port-7");
    }

    #[test]
    fn port_id_serializes_as_plain_string() {
        let id = PortId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn context_id_display() {
        assert_eq!(ContextId(12).to_string(), "ctx-12");
    }

    #[test]
    fn context_id_hash() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ContextId(1));
        set.insert(ContextId(1));
        set.insert(ContextId(2));
        assert_eq!(set.len(), 2);
    }
}
