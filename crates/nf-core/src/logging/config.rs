//! Resolution of the log level, format and filter directives.
//!
//! Sources, lowest to highest priority:
//! 1. built-in default (`info`, human format)
//! 2. `RUST_LOG` filter directives, passed through to the subscriber untouched
//! 3. `NF_LOG` (a plain level name) and `NF_LOG_FORMAT`
//! 4. command-line verbosity (`-q`, `-v`, `-vv`) and the output format

/// Where log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per line.
    Jsonl,
}

impl LogFormat {
    /// Machine-readable stdout gets machine-readable stderr.
    pub fn for_output(machine: bool) -> Self {
        if machine {
            LogFormat::Jsonl
        } else {
            LogFormat::Human
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Human => "human",
            LogFormat::Jsonl => "jsonl",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Level requested by the verbosity flags, if any. Quiet wins over `-v`.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        match (quiet, verbose) {
            (true, _) => Some(LogLevel::Error),
            (false, 0) => None,
            (false, 1) => Some(LogLevel::Debug),
            (false, _) => Some(LogLevel::Trace),
        }
    }

    fn name(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        [
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
        .into_iter()
        .find(|level| level.name() == wanted)
        .ok_or_else(|| format!("unknown log level '{}'", wanted))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved logging setup for one process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives; used instead of `level` when present.
    pub directives: Option<String>,
}

impl LogConfig {
    /// Resolve from the process environment plus command-line choices.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(|name| std::env::var(name).ok(), cli_level, cli_format)
    }

    /// Resolve against an arbitrary variable lookup.
    ///
    /// An unparseable `NF_LOG` or `NF_LOG_FORMAT` is ignored. An explicit
    /// level from `NF_LOG` or the command line drops any `RUST_LOG` directives.
    pub fn resolve<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_level = lookup("NF_LOG").and_then(|v| v.parse::<LogLevel>().ok());
        let env_format = lookup("NF_LOG_FORMAT").and_then(|v| v.parse::<LogFormat>().ok());

        let explicit_level = cli_level.or(env_level);
        let directives = match explicit_level {
            Some(_) => None,
            None => lookup("RUST_LOG").filter(|v| !v.trim().is_empty()),
        };

        LogConfig {
            format: cli_format.or(env_format).unwrap_or_default(),
            level: explicit_level.unwrap_or_default(),
            directives,
        }
    }

    /// Filter string handed to `EnvFilter`.
    pub fn filter_directives(&self) -> String {
        match &self.directives {
            Some(raw) => raw.clone(),
            None => format!("nf_core={}", self.level),
        }
    }
}
