//! Calculator tool: one binary arithmetic operation per call.
//!
//! Operations: add, subtract, multiply, divide, power (case-insensitive).
//! The result reads like `5 add 3 = 8`; integral values print without decimals.

use async_trait::async_trait;
use syra_core::error::ToolError;
use syra_core::tool::{Tool, ToolArgs};

pub struct CalculatorTool;

const NAME: &str = "calculator";

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Perform arithmetic on two numbers. Operations: 'add', 'subtract', 'multiply', 'divide', 'power'. \
         Example: operation='add', num1=5, num2=3 gives 8."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide", "power"],
                    "description": "The arithmetic operation to perform"
                },
                "num1": { "type": "number", "description": "The first operand" },
                "num2": { "type": "number", "description": "The second operand" }
            },
            "required": ["operation", "num1", "num2"]
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<serde_json::Value, ToolError> {
        let operation = args
            .get("operation")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'operation' argument".into()))?
            .trim()
            .to_lowercase();
        let num1 = number_arg(&args, "num1")?;
        let num2 = number_arg(&args, "num2")?;

        let result = apply(&operation, num1, num2)?;
        Ok(serde_json::Value::String(format!(
            "{} {} {} = {}",
            format_number(num1),
            operation,
            format_number(num2),
            format_number(result)
        )))
    }
}

/// Read a numeric argument. Numeric strings are accepted.
fn number_arg(args: &ToolArgs, key: &str) -> Result<f64, ToolError> {
    let value = args
        .get(key)
        .ok_or_else(|| ToolError::InvalidArguments(format!("Missing '{key}' argument")))?;

    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| {
            ToolError::InvalidArguments(format!("'{key}' must be a number, got {value}"))
        })
}

/// Apply one operation.
pub fn apply(operation: &str, num1: f64, num2: f64) -> Result<f64, ToolError> {
    let result = match operation {
        "add" => num1 + num2,
        "subtract" => num1 - num2,
        "multiply" => num1 * num2,
        "divide" => {
            if num2 == 0.0 {
                return Err(ToolError::failed(NAME, "Cannot divide by zero"));
            }
            num1 / num2
        }
        "power" => num1.powf(num2),
        other => {
            return Err(ToolError::failed(
                NAME,
                format!(
                    "Unknown operation '{other}'. Supported: add, subtract, multiply, divide, power"
                ),
            ));
        }
    };

    if !result.is_finite() {
        return Err(ToolError::failed(NAME, "Result is not a finite number"));
    }
    Ok(result)
}

/// Remove trailing .0 for integers.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: serde_json::Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn adds_integers() {
        let result = CalculatorTool
            .execute(args(json!({"operation": "add", "num1": 5, "num2": 3})))
            .await
            .unwrap();
        assert_eq!(result, json!("5 add 3 = 8"));
    }

    #[tokio::test]
    async fn operation_is_case_insensitive() {
        let result = CalculatorTool
            .execute(args(json!({"operation": " Multiply ", "num1": 2.5, "num2": 4})))
            .await
            .unwrap();
        assert_eq!(result, json!("2.5 multiply 4 = 10"));
    }

    #[tokio::test]
    async fn accepts_numeric_strings() {
        let result = CalculatorTool
            .execute(args(json!({"operation": "power", "num1": "2", "num2": "10"})))
            .await
            .unwrap();
        assert_eq!(result, json!("2 power 10 = 1024"));
    }

    #[tokio::test]
    async fn decimals_keep_fraction() {
        let result = CalculatorTool
            .execute(args(json!({"operation": "divide", "num1": 10, "num2": 4})))
            .await
            .unwrap();
        assert_eq!(result, json!("10 divide 4 = 2.5"));
    }

    #[tokio::test]
    async fn division_by_zero_fails() {
        let err = CalculatorTool
            .execute(args(json!({"operation": "divide", "num1": 1, "num2": 0})))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::failed("calculator", "Cannot divide by zero"));
    }

    #[tokio::test]
    async fn unknown_operation_fails() {
        let err = CalculatorTool
            .execute(args(json!({"operation": "modulo", "num1": 7, "num2": 2})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
        assert!(err.to_string().contains("modulo"));
    }

    #[tokio::test]
    async fn missing_argument_is_invalid() {
        let err = CalculatorTool
            .execute(args(json!({"operation": "add", "num1": 7})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn non_numeric_argument_is_invalid() {
        let err = CalculatorTool
            .execute(args(json!({"operation": "add", "num1": "seven", "num2": 1})))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn tool_definition() {
        let def = CalculatorTool.to_definition();
        assert_eq!(def.name, "calculator");
        assert_eq!(def.parameters["required"][2], "num2");
    }
}
