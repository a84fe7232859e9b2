//! Weather tool: current conditions from OpenWeatherMap.
//!
//! Uses the `data/2.5/weather` endpoint in metric units. The key comes from
//! `[tools] openweathermap_api_key` or `OPENWEATHERMAP_API_KEY`.

use async_trait::async_trait;
use std::time::Duration;
use syra_core::error::ToolError;
use syra_core::tool::{Tool, ToolArgs};
use tracing::debug;

const NAME: &str = "get_weather";
const ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

pub struct WeatherTool {
    api_key: Option<String>,
}

impl WeatherTool {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get the current weather for a city: conditions, temperature, humidity and wind speed."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "City name, e.g. 'Delhi' or 'London'"
                }
            },
            "required": ["city"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let city = args
            .get("city")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'city' argument".into()))?;

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ToolError::failed(NAME, "Weather API not configured. Set OPENWEATHERMAP_API_KEY.")
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ToolError::failed(NAME, e.to_string()))?;

        debug!(city, "Fetching current weather");

        let response = client
            .get(ENDPOINT)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ToolError::failed(NAME, format!("Weather request failed: {e}")))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ToolError::failed(
                NAME,
                format!(
                    "Could not fetch weather for {city} (status {status}). Check the city name."
                ),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToolError::failed(NAME, format!("Invalid weather response: {e}")))?;

        weather_record(city, &body)
    }
}

/// Shape an OpenWeatherMap body into the tool's record.
fn weather_record(city: &str, body: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
    let missing =
        |field: &str| ToolError::failed(NAME, format!("Weather response missing '{field}'"));

    let description = body["weather"][0]["description"]
        .as_str()
        .map(capitalize)
        .ok_or_else(|| missing("weather.description"))?;
    let temperature = body["main"]["temp"].as_f64().ok_or_else(|| missing("main.temp"))?;
    let humidity = body["main"]["humidity"].as_f64().ok_or_else(|| missing("main.humidity"))?;
    let wind_speed = body["wind"]["speed"].as_f64().unwrap_or(0.0);

    Ok(serde_json::json!({
        "text": format!(
            "Weather in {city}: {description}, Temperature: {temperature}°C, Humidity: {humidity}%, Wind: {wind_speed} m/s"
        ),
        "city": city,
        "description": description,
        "temperature_c": temperature,
        "humidity": humidity,
        "wind_speed": wind_speed,
    }))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
