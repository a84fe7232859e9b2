//! Tool trait: the abstraction over assistant capabilities.
//!
//! Capabilities are what let the assistant act in the world: look up the
//! weather, do arithmetic, search an encyclopedia. The engine treats every
//! capability as an opaque, uniformly-shaped collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConfigurationError, ToolError};
use crate::provider::ToolDefinition;

/// Named arguments passed to a capability.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// A request from the oracle to run a capability.
///
/// Untrusted: nothing about `name` or `args` is validated until it is
/// matched against the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    pub name: String,
    #[serde(default)]
    pub args: ToolArgs,
}

impl ToolInvocationRequest {
    pub fn new(name: impl Into<String>, args: ToolArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// The raw value a capability produced plus its normalized display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocationResult {
    pub name: String,
    pub raw: serde_json::Value,
    pub display: String,
}

/// Name and description of a capability, as embedded in oracle prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySummary {
    pub name: String,
    pub description: String,
}

/// The core Tool trait.
///
/// Each capability implements this trait and is registered once in the
/// [`CapabilityRegistry`] at startup.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique, stable name of this capability (e.g., "get_weather").
    fn name(&self) -> &str;

    /// What this capability does (sent to the oracle).
    fn description(&self) -> &str;

    /// JSON Schema describing this capability's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Run the capability. The value may be a scalar, a record or a sequence.
    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError>;

    /// Convert this capability into a ToolDefinition for binding to the oracle.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// Immutable catalog of invocable capabilities.
///
/// Built once with [`CapabilityRegistry::build`]; there is no way to add or
/// remove entries afterwards, so shared references can be read concurrently.
pub struct CapabilityRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    /// Build the catalog, preserving the given order.
    ///
    /// Fails if two capabilities share a name.
    pub fn build(
        capabilities: impl IntoIterator<Item = Box<dyn Tool>>,
    ) -> Result<Self, ConfigurationError> {
        let mut tools: Vec<Box<dyn Tool>> = Vec::new();
        let mut index = HashMap::new();

        for tool in capabilities {
            let name = tool.name().to_string();
            if index.contains_key(&name) {
                return Err(ConfigurationError::DuplicateCapability(name));
            }
            index.insert(name, tools.len());
            tools.push(tool);
        }

        Ok(Self { tools, index })
    }

    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Exact-name lookup.
    pub fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.index.get(name).map(|&i| self.tools[i].as_ref())
    }

    /// Ordered `{name, description}` pairs for prompt embedding.
    pub fn listing(&self) -> Vec<CapabilitySummary> {
        self.tools
            .iter()
            .map(|t| CapabilitySummary {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Ordered tool definitions (for binding to the oracle).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
            Ok(args.get("text").cloned().unwrap_or_default())
        }
    }

    fn echo(name: &'static str) -> Box<dyn Tool> {
        Box::new(EchoTool { name })
    }

    #[test]
    fn registry_build_and_lookup() {
        let registry = CapabilityRegistry::build(vec![echo("echo")]).unwrap();
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[test]
    fn lookup_is_exact_match() {
        let registry = CapabilityRegistry::build(vec![echo("echo")]).unwrap();
        assert!(registry.lookup("Echo").is_none());
        assert!(registry.lookup("echo ").is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = CapabilityRegistry::build(vec![echo("echo"), echo("other"), echo("echo")])
            .unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateCapability("echo".into()));
    }

    #[test]
    fn listing_preserves_registration_order() {
        let registry =
            CapabilityRegistry::build(vec![echo("zeta"), echo("alpha"), echo("mid")]).unwrap();
        let names: Vec<_> = registry.listing().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(registry.names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn registry_definitions() {
        let registry = CapabilityRegistry::build(vec![echo("echo")]).unwrap();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(defs[0].parameters["required"][0], "text");
    }

    #[test]
    fn empty_registry() {
        let registry = CapabilityRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.listing().is_empty());
    }

    #[tokio::test]
    async fn looked_up_tool_executes() {
        let registry = CapabilityRegistry::build(vec![echo("echo")]).unwrap();
        let mut args = ToolArgs::new();
        args.insert("text".into(), "hello world".into());
        let value = registry.lookup("echo").unwrap().execute(args).await.unwrap();
        assert_eq!(value, serde_json::json!("hello world"));
    }

    #[test]
    fn request_args_default_to_empty() {
        let req: ToolInvocationRequest = serde_json::from_str(r#"{"name":"echo"}"#).unwrap();
        assert!(req.args.is_empty());
    }
}
