//! Shared output formatting for tf CLI commands.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

pub const SCHEMA_VERSION: &str = "taskflow.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text rendering of a command result: a header line followed by
/// optional summary, details, warnings and next-steps sections.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;

        if !self.summary.is_empty() {
            f.write_str("\n\nSummary:")?;
            for (key, value) in &self.summary {
                if value.is_empty() {
                    write!(f, "\n- {key}")?;
                } else {
                    write!(f, "\n- {key}: {value}")?;
                }
            }
        }

        let sections = [
            ("Details", &self.details),
            ("Warnings", &self.warnings),
            ("Next steps", &self.next_steps),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            write!(f, "\n\n{title}:")?;
            for item in items {
                write!(f, "\n- {item}")?;
            }
        }
        Ok(())
    }
}

pub fn format_human(output: &HumanOutput) -> String {
    output.to_string()
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// Either the command's payload or its failure, keyed `data` / `error`.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Body<'a, T: Serialize> {
    Data(&'a T),
    Error(ErrorBody),
}

/// Every `--json` response has this shape.
#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(flatten)]
    body: Body<'a, T>,
    #[serde(skip_serializing_if = "no_items")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    next_steps: &'a [String],
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

impl<T: Serialize> Envelope<'_, T> {
    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let (warnings, next_steps) = match human {
            Some(human) => (human.warnings.as_slice(), human.next_steps.as_slice()),
            None => (&[][..], &[][..]),
        };
        return Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            body: Body::Data(data),
            warnings,
            next_steps,
        }
        .print();
    }

    match human {
        Some(human) if !options.quiet => println!("{human}"),
        _ => {}
    }
    Ok(())
}

/// Report a failed command. `command` is the parsed command's name, never
/// raw argv, so flag values cannot leak into the envelope.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);

    if json {
        return Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            body: Body::Error(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            }),
            warnings: &[],
            next_steps: &next_steps,
        }
        .print();
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Human-friendly age of a timestamp relative to `now`.
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 30 {
        plural(days, "day")
    } else {
        at.format("%b %-d, %Y").to_string()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "auth_failed",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::AccountNotFound => {
            vec!["tf register --username <name> --password <pass> --email <email>".to_string()]
        }
        Error::NotSignedIn => {
            vec!["pass --username and --password (or TF_USERNAME/TF_PASSWORD)".to_string()]
        }
        Error::NoCategories => vec!["tf category add <name>".to_string()],
        Error::ConfirmationRequired(_) => vec!["re-run with --yes".to_string()],
        Error::InvalidConfig(_) => vec!["fix taskflow.toml then retry".to_string()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert_eq!(time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(59), now), "59 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(time_ago(now - Duration::days(2), now), "2 days ago");
        assert_eq!(time_ago(now - Duration::days(45), now), "May 1, 2024");
    }

    #[test]
    fn human_layout_sections() {
        let mut human = HumanOutput::new("Tasks");
        human.push_summary("Total", "2");
        human.push_detail("[pending] a");
        human.push_warning("careful");
        let text = format_human(&human);
        assert!(text.starts_with("Tasks\n\nSummary:\n- Total: 2"));
        assert!(text.contains("Details:\n- [pending] a"));
        assert!(text.contains("Warnings:\n- careful"));
        assert!(!text.contains("Next steps"));
    }

    #[test]
    fn envelopes_carry_either_data_or_error() {
        let steps = vec!["re-run with --yes".to_string()];
        let success = serde_json::to_value(Envelope {
            schema_version: SCHEMA_VERSION,
            command: "task add",
            status: Status::Success,
            body: Body::Data(&serde_json::json!({ "id": "t1" })),
            warnings: &[],
            next_steps: &steps,
        })
        .unwrap();
        assert_eq!(success["status"], "success");
        assert_eq!(success["data"]["id"], "t1");
        assert!(success.get("error").is_none());
        assert!(success.get("warnings").is_none());
        assert_eq!(success["next_steps"][0], "re-run with --yes");

        let err = Error::ConfirmationRequired("clear all data".to_string());
        let failure = serde_json::to_value(Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command: "clear",
            status: Status::Error,
            body: Body::Error(ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(&err),
                details: None,
            }),
            warnings: &[],
            next_steps: &[],
        })
        .unwrap();
        assert_eq!(failure["command"], "clear");
        assert_eq!(failure["error"]["kind"], "user_error");
        assert_eq!(failure["error"]["code"], 2);
        assert!(failure.get("data").is_none());
    }
}
