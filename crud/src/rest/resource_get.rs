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

//! API to get an entity.

use crate::db::PersistenceAdapter;
use crate::rest::{ResourceId, ResourceState};
use axum::Json;
use axum::extract::State;
use restkit_core::rest::{EmptyBody, RestResult};

/// GET handler for this API.
pub(super) async fn handler<A: PersistenceAdapter>(
    State(state): State<ResourceState<A>>,
    ResourceId(id): ResourceId,
    _: EmptyBody,
) -> RestResult<Json<A::Object>> {
    let object = state.controller.fetch(&id).await?;
    Ok(Json(object))
}
