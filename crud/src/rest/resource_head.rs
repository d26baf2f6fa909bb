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

//! API to check if an entity exists.

use crate::db::PersistenceAdapter;
use crate::rest::{ResourceId, ResourceState};
use axum::extract::State;
use restkit_core::rest::{EmptyBody, RestError, RestResult};

/// HEAD handler for this API.
pub(super) async fn handler<A: PersistenceAdapter>(
    State(state): State<ResourceState<A>>,
    ResourceId(id): ResourceId,
    _: EmptyBody,
) -> RestResult<()> {
    if state.controller.exists(&id).await? {
        Ok(())
    } else {
        Err(RestError::NotFound(format!("Could not find entity with id: {}", id)))
    }
}
