//! Deployment outputs.
//!
//! An [`OutputSet`] is an insertion-ordered name/value map emitted after a
//! successful construction pass. Names are unique; declaring the same
//! output twice is a construction error, not a silent overwrite.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GraphError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    entries: Vec<(String, String)>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), GraphError> {
        let name = name.into();
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(GraphError::DuplicateOutput(name));
        }
        self.entries.push((name, value.into()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OutputSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OutputSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OutputSetVisitor;

        impl<'de> Visitor<'de> for OutputSetVisitor {
            type Value = OutputSet;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of output names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut outputs = OutputSet::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    outputs
                        .declare(name, value)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(outputs)
            }
        }

        deserializer.deserialize_map(OutputSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_rejects_duplicate_names() {
        let mut outputs = OutputSet::new();
        outputs.declare("ApiGatewayId", "abc123").unwrap();
        let error = outputs.declare("ApiGatewayId", "def456").unwrap_err();
        assert_eq!(
            error,
            GraphError::DuplicateOutput("ApiGatewayId".to_string())
        );
        assert_eq!(outputs.get("ApiGatewayId"), Some("abc123"));
    }

    #[test]
    fn serializes_as_ordered_json_map() {
        let mut outputs = OutputSet::new();
        outputs.declare("CustomDomain", "sub.example.io").unwrap();
        outputs.declare("ApiGatewayId", "abc123").unwrap();

        let json = serde_json::to_string(&outputs).expect("outputs should serialize");
        assert_eq!(
            json,
            "{\"CustomDomain\":\"sub.example.io\",\"ApiGatewayId\":\"abc123\"}"
        );

        let decoded: OutputSet = serde_json::from_str(&json).expect("outputs should parse");
        assert_eq!(decoded, outputs);
    }
}
