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

//! REST interface for generic CRUD resources.

use crate::db::{PersistenceAdapter, PersistenceLog};
use crate::driver::Controller;
use async_trait::async_trait;
use axum::Router;
use axum::extract::{FromRequestParts, Path};
use derivative::Derivative;
use http::request::Parts;
use restkit_core::rest::{BaseUrls, RestError};
use std::sync::Arc;

mod log_level_put;
mod resource_delete;
mod resource_get;
mod resource_head;
mod resource_post;
mod resource_put;
mod resources_get;
mod sql_log_level_put;
#[cfg(test)]
mod testutils;

pub use sql_log_level_put::SqlLogLevelQuery;

/// State shared by the handlers of a resource.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
struct ResourceState<A: PersistenceAdapter> {
    /// Business logic for the resource.
    controller: Controller<A>,

    /// Base URLs of the running service.
    base_urls: Arc<BaseUrls>,

    /// Path of the collection relative to the backend base URL, without slashes at either end.
    path: &'static str,
}

/// Extractor for the identifier of an entity in the URI.
///
/// Identifiers may only contain ASCII letters and digits.  Anything else cannot name an entity
/// and is rejected as not found.
struct ResourceId(String);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw_id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::InvalidRequest(e.body_text()))?;
        if !raw_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RestError::NotFound(format!("Could not find entity with id: {}", raw_id)));
        }
        Ok(ResourceId(raw_id))
    }
}

/// Creates the router for the collection of entities handled by `controller`.
///
/// The collection is served under `path`, which must be relative and not end in a slash, such
/// as `api/v1/users`.  The `base_urls` are used to compute the location of new entities.
pub fn app<A: PersistenceAdapter>(
    controller: Controller<A>,
    base_urls: Arc<BaseUrls>,
    path: &'static str,
) -> Router {
    use axum::routing::get;

    assert!(!path.starts_with('/') && !path.ends_with('/'), "Invalid resource path {}", path);
    let state = ResourceState { controller, base_urls, path };

    Router::new()
        .route(
            &format!("/{}", path),
            get(resources_get::handler::<A>).post(resource_post::handler::<A>),
        )
        .route(
            &format!("/{}/:id", path),
            get(resource_get::handler::<A>)
                .head(resource_head::handler::<A>)
                .put(resource_put::handler::<A>)
                .delete(resource_delete::handler::<A>),
        )
        .with_state(state)
}

/// Creates the router to adjust the verbosity of `log` at runtime, served under `path`.
pub fn logger_app(log: PersistenceLog, path: &'static str) -> Router {
    use axum::routing::put;

    assert!(!path.starts_with('/') && !path.ends_with('/'), "Invalid logger path {}", path);

    Router::new()
        .route(&format!("/{}/sql/:level", path), put(sql_log_level_put::handler))
        .route(&format!("/{}/:level", path), put(log_level_put::handler))
        .with_state(log)
}
