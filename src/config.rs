use std::env;
use std::net::SocketAddr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::domain::window::TimeWindow;
use crate::error::{AppError, AppResult};

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 500;
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SUBJECT: &str = "CEO Assistant Report";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Everything the process needs, resolved once at startup and handed to the
/// pipeline explicitly. Nothing below reads the environment after this.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: String,
    pub window: TimeWindow,
    pub openai_api_key: String,
    pub openai_model: String,
    pub max_completion_tokens: u32,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub webhook_secret: Option<String>,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let window = TimeWindow::new(
            parse_boundary(&required("REPORT_WINDOW_START")?)?,
            parse_boundary(&required("REPORT_WINDOW_END")?)?,
        )?;

        let smtp_username = required("SMTP_USERNAME")?;
        let sender = optional("REPORT_SENDER").unwrap_or_else(|| smtp_username.clone());

        let bind_raw = optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|err| AppError::Configuration(format!("invalid BIND_ADDR '{bind_raw}': {err}")))?;

        let max_completion_tokens = match optional("OPENAI_MAX_TOKENS") {
            Some(raw) => raw.parse::<u32>().map_err(|err| {
                AppError::Configuration(format!("invalid OPENAI_MAX_TOKENS '{raw}': {err}"))
            })?,
            None => DEFAULT_MAX_COMPLETION_TOKENS,
        };

        Ok(Self {
            github_token: required("GITHUB_TOKEN")?,
            window,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: optional("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            max_completion_tokens,
            smtp_host: optional("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_password: required("SMTP_PASSWORD")?,
            smtp_username,
            sender,
            recipient: required("REPORT_RECIPIENT")?,
            subject: optional("REPORT_SUBJECT").unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            webhook_secret: optional("WEBHOOK_SECRET"),
            bind_addr,
        })
    }
}

fn required(name: &str) -> AppResult<String> {
    optional(name).ok_or_else(|| AppError::Configuration(format!("{name} is not set")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Window boundaries accept a bare date (midnight UTC) or a full RFC 3339
/// timestamp.
fn parse_boundary(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| AppError::Configuration(format!("invalid window boundary '{raw}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let parsed = parse_boundary("2024-01-21").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_full_rfc3339_timestamp() {
        let parsed = parse_boundary("2024-01-23T18:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 23, 18, 30, 0).unwrap());
    }

    #[test]
    fn rejects_unparseable_boundary() {
        assert!(parse_boundary("january 21st").is_err());
    }
}
