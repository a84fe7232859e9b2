//! Built-in tool implementations for Syra.
//!
//! Tools give the assistant the ability to act: do math, tell the time,
//! check the weather, and look things up on Wikipedia.

pub mod calculator;
pub mod datetime;
pub mod weather;
pub mod wikipedia;

use syra_config::ToolsConfig;
use syra_core::error::ConfigurationError;
use syra_core::tool::{CapabilityRegistry, Tool};

pub use calculator::CalculatorTool;
pub use datetime::DateTimeTool;
pub use weather::WeatherTool;
pub use wikipedia::WikipediaTool;

/// Create the registry of all built-in tools, in a fixed order.
pub fn default_registry(config: &ToolsConfig) -> Result<CapabilityRegistry, ConfigurationError> {
    let tools: Vec<Box<dyn Tool>> = vec![
        Box::new(DateTimeTool),
        Box::new(CalculatorTool),
        Box::new(WeatherTool::new(
            config.openweathermap_api_key.as_ref().map(|key| key.expose().to_string()),
        )),
        Box::new(WikipediaTool::new(config.wikipedia_sentences)),
    ];
    CapabilityRegistry::build(tools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_order() {
        let registry = default_registry(&ToolsConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "get_current_datetime",
                "calculator",
                "get_weather",
                "search_wikipedia"
            ]
        );
    }

    #[test]
    fn every_definition_is_an_object_schema() {
        let registry = default_registry(&ToolsConfig::default()).unwrap();
        for def in registry.definitions() {
            assert_eq!(def.parameters["type"], "object", "{}", def.name);
            assert!(!def.description.is_empty());
        }
    }
}
