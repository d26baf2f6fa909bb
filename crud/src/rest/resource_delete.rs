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

//! API to delete an entity.

use crate::db::PersistenceAdapter;
use crate::rest::{ResourceId, ResourceState};
use axum::extract::State;
use http::StatusCode;
use restkit_core::rest::{EmptyBody, RestResult};

/// DELETE handler for this API.
pub(super) async fn handler<A: PersistenceAdapter>(
    State(state): State<ResourceState<A>>,
    ResourceId(id): ResourceId,
    _: EmptyBody,
) -> RestResult<StatusCode> {
    state.controller.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
