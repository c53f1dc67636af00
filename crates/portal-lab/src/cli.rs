#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args by hand and applies `PORTAL_LAB_*` environment overrides
//! before the flags, so an explicit flag always wins.

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Portal Lab: drag characters between dimensions

USAGE:
    portal-lab [OPTIONS]

OPTIONS:
    --api-url=URL        Character service base URL (default: http://localhost:8000)
    --offline            Use the built-in seeded roster instead of the service
    --seed=N             Seed for the offline roster and steals (default: 137)
    --debounce-ms=N      Quiet period before a move is sent (default: 300)
    --no-mouse           Disable mouse event capture
    --log-file=PATH      Write logs to PATH, or 'off' (default: portal-lab.log)
    --log-json           Write logs as JSON lines
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    drag a card          Move a character to another dimension
    s                    Let Rick Prime steal a character
    Left / Right         Focus the previous / next column
    Up / Down            Scroll the focused column by one card
    PgUp / PgDn          Scroll the focused column by a page
    Home / End           Jump to the top / bottom of the focused column
    Esc                  Cancel the current drag
    r                    Retry after a failed load
    q / Ctrl+C           Quit

ENVIRONMENT VARIABLES:
    PORTAL_LAB_API_URL       Override --api-url
    PORTAL_LAB_OFFLINE       Set to 1 for --offline
    PORTAL_LAB_SEED          Override --seed
    PORTAL_LAB_DEBOUNCE_MS   Override --debounce-ms
    PORTAL_LAB_LOG_FILE      Override --log-file
    PORTAL_LAB_LOG           Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Base URL of the character service.
    pub api_url: String,
    /// Run against the in-process gateway.
    pub offline: bool,
    /// Seed for the offline gateway.
    pub seed: u64,
    /// Debounce window for moves, in milliseconds.
    pub debounce_ms: u64,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Log destination; `None` disables logging.
    pub log_file: Option<PathBuf>,
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            offline: false,
            seed: 137,
            debounce_ms: 300,
            mouse: true,
            log_file: Some(PathBuf::from("portal-lab.log")),
            log_json: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits when asked; exits with status 1 on
    /// an invalid argument.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Invocation::Run(opts)) => opts,
            Ok(Invocation::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Invocation::Version) => {
                println!("portal-lab {VERSION}");
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with environment lookups going through `env`.
    ///
    /// Environment values that fail to parse are ignored; flag values that
    /// fail to parse are an error.
    pub fn parse_from<I, S, F>(args: I, env: F) -> Result<Invocation, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = env("PORTAL_LAB_API_URL") {
            opts.api_url = val;
        }
        if let Some(val) = env("PORTAL_LAB_OFFLINE") {
            opts.offline = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Some(val) = env("PORTAL_LAB_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = n;
        }
        if let Some(val) = env("PORTAL_LAB_DEBOUNCE_MS")
            && let Ok(n) = val.parse()
        {
            opts.debounce_ms = n;
        }
        if let Some(val) = env("PORTAL_LAB_LOG_FILE") {
            opts.log_file = log_target(&val);
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--version" | "-V" => return Ok(Invocation::Version),
                "--offline" => opts.offline = true,
                "--no-mouse" => opts.mouse = false,
                "--log-json" => opts.log_json = true,
                other => {
                    if let Some(val) = other.strip_prefix("--api-url=") {
                        if val.is_empty() {
                            return Err("Invalid --api-url value: empty".to_string());
                        }
                        opts.api_url = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = val
                            .parse()
                            .map_err(|_| format!("Invalid --seed value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--debounce-ms=") {
                        opts.debounce_ms = val
                            .parse()
                            .map_err(|_| format!("Invalid --debounce-ms value: {val}"))?;
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = log_target(val);
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Invocation::Run(opts))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn log_target(val: &str) -> Option<PathBuf> {
    match val {
        "" | "off" | "none" => None,
        path => Some(PathBuf::from(path)),
    }
}
