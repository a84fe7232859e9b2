//! `syra tools`: List the built-in capabilities.

use anyhow::Context;
use syra_config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;
    let registry =
        syra_tools::default_registry(&config.tools).context("Failed to build tool registry")?;

    println!("Built-in tools");
    println!("==============");
    println!();
    for summary in registry.listing() {
        println!("  {:<22} {}", summary.name, summary.description);
    }
    println!();

    if config.tools.openweathermap_api_key.is_none() {
        println!("  Note: get_weather needs OPENWEATHERMAP_API_KEY.");
    }

    Ok(())
}
