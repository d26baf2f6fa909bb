// RestKit
// Copyright 2024 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The `LogLevel` and `LogSettings` data types.

use restkit_core::env::{Value, get_optional_var};
use restkit_core::model::{ModelError, ModelResult};
use std::fmt;
use std::str::FromStr;

/// Verbosity levels understood by the persistence log.
///
/// Levels are ordered from the least to the most verbose, so a threshold of `Info` lets through
/// messages at `Severe`, `Warning` and `Info`.  `Off` and `All` are only meaningful as thresholds.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LogLevel {
    /// Nothing is logged.
    Off,

    /// Serious failures.
    Severe,

    /// Potential problems.
    Warning,

    /// Informational messages.
    Info,

    /// Static configuration messages.
    Config,

    /// Tracing information, including SQL statements.
    Fine,

    /// Fairly detailed tracing information.
    Finer,

    /// Highly detailed tracing information.
    Finest,

    /// Everything is logged.
    All,
}

impl LogLevel {
    /// All valid levels, in order of increasing verbosity.
    pub const VALUES: [LogLevel; 9] = [
        LogLevel::Off,
        LogLevel::Severe,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Config,
        LogLevel::Fine,
        LogLevel::Finer,
        LogLevel::Finest,
        LogLevel::All,
    ];

    /// Returns the canonical name of the level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "OFF",
            LogLevel::Severe => "SEVERE",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Config => "CONFIG",
            LogLevel::Fine => "FINE",
            LogLevel::Finer => "FINER",
            LogLevel::Finest => "FINEST",
            LogLevel::All => "ALL",
        }
    }

    /// Returns true if a message at `level` should be emitted when `self` is the threshold.
    pub fn allows(self, level: LogLevel) -> bool {
        level != LogLevel::Off && level <= self
    }

    /// Maps the level onto the `log` crate's levels.  `Off` has no counterpart.
    pub fn as_log_level(self) -> Option<log::Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Severe => Some(log::Level::Error),
            LogLevel::Warning => Some(log::Level::Warn),
            LogLevel::Info | LogLevel::Config => Some(log::Level::Info),
            LogLevel::Fine | LogLevel::Finer => Some(log::Level::Debug),
            LogLevel::Finest | LogLevel::All => Some(log::Level::Trace),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        for level in LogLevel::VALUES {
            if level.as_str().eq_ignore_ascii_case(s) {
                return Ok(level);
            }
        }

        let names = LogLevel::VALUES.iter().map(|l| l.as_str()).collect::<Vec<_>>();
        Err(ModelError(format!(
            "Invalid Log level provided. Valid log levels are: {}",
            names.join(" ")
        )))
    }
}

impl TryFrom<Value> for LogLevel {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        String::try_from(value)?.parse::<LogLevel>().map_err(|e| e.to_string())
    }
}

/// Default threshold for persistence events.
const DEFAULT_LEVEL: LogLevel = LogLevel::Info;

/// Default threshold for SQL statements.
const DEFAULT_SQL_LEVEL: LogLevel = LogLevel::Info;

/// Runtime-adjustable settings of the persistence log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogSettings {
    /// Threshold for persistence events.
    pub level: LogLevel,

    /// Threshold for SQL statements.
    pub sql_level: LogLevel,

    /// Whether the values bound to SQL statements are logged along the statements.
    pub log_parameters: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: DEFAULT_LEVEL, sql_level: DEFAULT_SQL_LEVEL, log_parameters: false }
    }
}

impl LogSettings {
    /// Creates a new set of settings from environment variables whose name is prefixed with
    /// the given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PERSISTENCE_LOG_LEVEL`,
    /// `<prefix>_PERSISTENCE_SQL_LOG_LEVEL` and `<prefix>_PERSISTENCE_LOG_PARAMETERS`, all of
    /// which are optional.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            level: get_optional_var::<LogLevel>(prefix, "PERSISTENCE_LOG_LEVEL")?
                .unwrap_or(DEFAULT_LEVEL),
            sql_level: get_optional_var::<LogLevel>(prefix, "PERSISTENCE_SQL_LOG_LEVEL")?
                .unwrap_or(DEFAULT_SQL_LEVEL),
            log_parameters: get_optional_var::<bool>(prefix, "PERSISTENCE_LOG_PARAMETERS")?
                .unwrap_or(false),
        })
    }
}
