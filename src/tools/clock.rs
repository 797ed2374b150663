use super::{Tool, ToolError};
use async_trait::async_trait;
use chrono::{Local, Utc};
use chrono_tz::Tz;

const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local time, or the time in a named IANA zone.
pub struct TimeTool;

impl TimeTool {
    pub fn now(zone: Option<&str>) -> Result<String, ToolError> {
        let Some(zone) = zone.map(str::trim).filter(|z| !z.is_empty()) else {
            return Ok(Local::now().format(&format!("{FORMAT} (local)")).to_string());
        };

        let tz: Tz = zone.parse().map_err(|_| {
            ToolError::Usage(format!(
                "Time error: unknown time zone '{zone}'. Try e.g. 'time Asia/Kolkata'."
            ))
        })?;

        let now = Utc::now().with_timezone(&tz);
        Ok(format!("{} (tz='{}')", now.format(&format!("{FORMAT} %Z")), zone))
    }
}

#[async_trait]
impl Tool for TimeTool {
    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "Current time, optionally in a time zone"
    }

    async fn execute(&self, args: &str) -> Result<String, ToolError> {
        Self::now(Some(args))
    }
}
