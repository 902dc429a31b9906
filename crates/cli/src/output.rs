//! Terminal output for `ship`.
//!
//! Progress and results go to stdout; errors and warnings go to stderr so that
//! `ship plan -o json` stays parseable.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{AnsiColors, OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Kind of status line, which picks its symbol, color and stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Success,
  Error,
  Warning,
  Info,
  Step,
  Skip,
}

impl Status {
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Success => "✓",
      Self::Error => "✗",
      Self::Warning => "⚠",
      Self::Info => "•",
      Self::Step => "→",
      Self::Skip => "-",
    }
  }

  fn color(self) -> AnsiColors {
    match self {
      Self::Success => AnsiColors::Green,
      Self::Error => AnsiColors::Red,
      Self::Warning => AnsiColors::Yellow,
      Self::Info => AnsiColors::Blue,
      Self::Step => AnsiColors::Cyan,
      Self::Skip => AnsiColors::BrightBlack,
    }
  }

  fn to_stderr(self) -> bool {
    matches!(self, Self::Error | Self::Warning)
  }
}

/// Print `message` prefixed with the status symbol.
///
/// Errors, warnings and skips color the whole line; other statuses only the symbol.
pub fn status(kind: Status, message: &str) {
  let stream = if kind.to_stderr() { Stream::Stderr } else { Stream::Stdout };
  let color = kind.color();
  let symbol = kind.symbol();
  let symbol = symbol.if_supports_color(stream, |s| s.color(color));

  let line = match kind {
    Status::Error | Status::Warning | Status::Skip => {
      format!("{} {}", symbol, message.if_supports_color(stream, |s| s.color(color)))
    }
    _ => format!("{} {}", symbol, message),
  };

  if kind.to_stderr() {
    eprintln!("{}", line);
  } else {
    println!("{}", line);
  }
}

pub fn print_success(message: &str) {
  status(Status::Success, message);
}

pub fn print_error(message: &str) {
  status(Status::Error, message);
}

pub fn print_warning(message: &str) {
  status(Status::Warning, message);
}

pub fn print_info(message: &str) {
  status(Status::Info, message);
}

/// Indented `label: value` line under a heading.
pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// First 12 hex characters of a digest.
pub fn short_digest(digest: &str) -> &str {
  &digest[..digest.len().min(12)]
}

/// Elapsed time rounded down to milliseconds, e.g. `1s 500ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
  let millis = Duration::from_millis(elapsed.as_millis() as u64);
  humantime::format_duration(millis).to_string()
}
