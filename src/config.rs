//! Configuration and CLI argument handling

use anyhow::{bail, Result};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "tomato-timer")]
#[command(about = "A pomodoro countdown server with suspend-safe session persistence")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20555")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Focus interval length in minutes
    #[arg(short, long, default_value = "25")]
    pub focus: u64,

    /// Break interval length in minutes
    #[arg(short = 'b', long = "break", default_value = "5")]
    pub break_minutes: u64,

    /// Tick period in seconds; elapsed time advances by this much per tick
    #[arg(short, long, default_value = "1.0")]
    pub tick: f64,

    /// File holding the persisted session (defaults to the user data directory)
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Keep the session in memory only
    #[arg(long, conflicts_with = "state_file")]
    pub ephemeral: bool,

    /// Command run when an interval is due to end
    #[arg(long, default_value = "notify-send")]
    pub notify_command: String,

    /// Do not run any notification command
    #[arg(long)]
    pub no_notify: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject values the countdown engine cannot run with
    pub fn validate(&self) -> Result<()> {
        self.tick_period()?;
        if self.focus == 0 || self.break_minutes == 0 {
            bail!("focus and break lengths must be at least one minute");
        }
        if self.focus.checked_mul(60).is_none() || self.break_minutes.checked_mul(60).is_none() {
            bail!("focus and break lengths are out of range");
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn focus_duration(&self) -> Duration {
        Duration::from_secs(self.focus.saturating_mul(60))
    }

    pub fn break_duration(&self) -> Duration {
        Duration::from_secs(self.break_minutes.saturating_mul(60))
    }

    /// Tick as a timer period; must be finite, positive and at least a nanosecond
    pub fn tick_period(&self) -> Result<Duration> {
        match Duration::try_from_secs_f64(self.tick) {
            Ok(period) if !period.is_zero() => Ok(period),
            _ => bail!("tick must be a positive number of seconds, got {}", self.tick),
        }
    }

    /// Where the session is persisted, unless running ephemeral
    pub fn state_path(&self) -> Option<PathBuf> {
        if self.ephemeral {
            return None;
        }
        self.state_file.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("tomato-timer").join("session.json"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("tomato-timer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]);
        assert_eq!(config.focus_duration(), Duration::from_secs(1500));
        assert_eq!(config.break_duration(), Duration::from_secs(300));
        assert_eq!(config.tick_period().unwrap(), Duration::from_secs(1));
        assert_eq!(config.address(), "127.0.0.1:20555");
        assert_eq!(config.log_level(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_tick() {
        assert!(parse(&["--tick", "0"]).validate().is_err());
        assert!(parse(&["--tick=-1"]).validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_tick_and_lengths() {
        assert!(parse(&["--tick", "1e-10"]).validate().is_err());
        assert!(parse(&["--tick", "1e20"]).validate().is_err());
        assert!(parse(&["--tick", "NaN"]).validate().is_err());
        assert!(parse(&["--focus", "18446744073709551615"]).validate().is_err());
        assert!(parse(&["--break", "18446744073709551615"]).validate().is_err());

        let config = parse(&["--focus", "18446744073709551615"]);
        assert_eq!(config.focus_duration(), Duration::from_secs(u64::MAX));
        assert!(parse(&["--tick", "0.5", "--focus", "1"]).validate().is_ok());
    }

    #[test]
    fn test_ephemeral_has_no_state_path() {
        assert!(parse(&["--ephemeral"]).state_path().is_none());
        assert_eq!(
            parse(&["--state-file", "/tmp/s.json"]).state_path(),
            Some(PathBuf::from("/tmp/s.json"))
        );
    }

    #[test]
    fn test_ephemeral_conflicts_with_state_file() {
        let result = Config::try_parse_from(["tomato-timer", "--ephemeral", "--state-file", "x"]);
        assert!(result.is_err());
    }
}
