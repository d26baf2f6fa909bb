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

//! Runtime-adjustable logging for the persistence layer.

use crate::model::{LogLevel, LogSettings};
use futures::lock::Mutex;
use log::log;
use std::fmt;
use std::sync::Arc;

/// Log target for persistence events.
const EVENTS_TARGET: &str = "restkit::persistence";

/// Log target for SQL statements.
const SQL_TARGET: &str = "restkit::sql";

/// Level at which SQL statements are reported.
const SQL_STATEMENT_LEVEL: LogLevel = LogLevel::Fine;

/// Formats the message to emit for `query` under `settings`, or returns `None` if the statement
/// must not be logged.
fn format_sql<P: fmt::Debug>(settings: &LogSettings, query: &str, params: &P) -> Option<String> {
    if !settings.sql_level.allows(SQL_STATEMENT_LEVEL) {
        return None;
    }

    let query = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if settings.log_parameters {
        Some(format!("{} bind => {:?}", query, params))
    } else {
        Some(query)
    }
}

/// Log of the persistence layer whose thresholds can be changed while the service runs.
///
/// Adapters report their activity here instead of logging directly so that operators can raise
/// the verbosity of the persistence layer on a live service.  Copies of this type share the same
/// settings.
#[derive(Clone, Default)]
pub struct PersistenceLog {
    /// Current settings, shared by all copies.
    settings: Arc<Mutex<LogSettings>>,
}

impl PersistenceLog {
    /// Creates a new log with the given initial `settings`.
    pub fn new(settings: LogSettings) -> Self {
        Self { settings: Arc::from(Mutex::from(settings)) }
    }

    /// Returns a snapshot of the current settings.
    pub async fn settings(&self) -> LogSettings {
        *self.settings.lock().await
    }

    /// Sets the threshold for persistence events.
    pub async fn set_level(&self, level: LogLevel) {
        let mut settings = self.settings.lock().await;
        settings.level = level;
    }

    /// Sets the threshold for SQL statements and, if given, whether bound values are logged.
    pub async fn set_sql_level(&self, level: LogLevel, log_parameters: Option<bool>) {
        let mut settings = self.settings.lock().await;
        settings.sql_level = level;
        if let Some(log_parameters) = log_parameters {
            settings.log_parameters = log_parameters;
        }
    }

    /// Reports the execution of `query` with the bound `params`.
    pub async fn sql<P: fmt::Debug + Send>(&self, query: &str, params: P) {
        let settings = self.settings().await;
        if let Some(message) = format_sql(&settings, query, &params) {
            if let Some(level) = SQL_STATEMENT_LEVEL.as_log_level() {
                log!(target: SQL_TARGET, level, "{}", message);
            }
        }
    }

    /// Reports a persistence event at `level`.
    pub async fn event(&self, level: LogLevel, message: &str) {
        let settings = self.settings().await;
        if settings.level.allows(level) {
            if let Some(level) = level.as_log_level() {
                log!(target: EVENTS_TARGET, level, "{}", message);
            }
        }
    }
}
