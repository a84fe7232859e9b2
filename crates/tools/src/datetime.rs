//! Current date and time on the host clock.

use async_trait::async_trait;
use chrono::Local;
use syra_core::error::ToolError;
use syra_core::tool::{Tool, ToolArgs};

pub struct DateTimeTool;

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "get_current_datetime"
    }

    fn description(&self) -> &str {
        "Get the current local date and time. Takes no arguments."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let now = Local::now();
        let date = now.format("%Y-%m-%d").to_string();
        let time = now.format("%H:%M:%S").to_string();

        Ok(serde_json::json!({
            "text": format!("Date: {date}, Time: {time}"),
            "date": date,
            "time": time,
            "timezone": now.format("%:z").to_string(),
            "signature": format!("clock:{}", now.timestamp()),
        }))
    }
}
