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

//! API to set the verbosity of persistence events.

use crate::db::PersistenceLog;
use crate::model::LogLevel;
use axum::extract::{Path, State};
use log::info;
use restkit_core::rest::{EmptyBody, RestResult};

/// PUT handler for this API.
pub(super) async fn handler(
    State(log): State<PersistenceLog>,
    Path(level): Path<String>,
    _: EmptyBody,
) -> RestResult<()> {
    let level = level.parse::<LogLevel>()?;
    log.set_level(level).await;
    info!("Persistence log level set to {}", level);
    Ok(())
}
