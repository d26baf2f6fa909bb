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

//! Validation rules shared by the controller operations.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use log::info;
use restkit_core::db::Executor;
use restkit_core::driver::{DriverError, DriverResult};

/// Constructs the error returned when the entity named by `raw_id` does not exist.
pub(super) fn not_found(raw_id: &str) -> DriverError {
    DriverError::NotFound(format!("Could not find entity with id: {}", raw_id))
}

impl<A: PersistenceAdapter> Controller<A> {
    /// Looks up the entity named by `raw_id`.
    pub(super) async fn find_existing(
        &self,
        ex: &mut Executor,
        raw_id: &str,
    ) -> DriverResult<A::Entity> {
        let key = match self.adapter.parse_key(raw_id) {
            Some(key) => key,
            None => return Err(not_found(raw_id)),
        };
        match self.adapter.find(ex, &key).await? {
            Some(entity) => Ok(entity),
            None => Err(not_found(raw_id)),
        }
    }

    /// Ensures that the unique fields of `object` don't collide with any entity other than
    /// `exclude`.
    ///
    /// All violations are reported at once.
    pub(super) async fn validate_unique(
        &self,
        ex: &mut Executor,
        object: &A::Object,
        exclude: Option<&A::Entity>,
    ) -> DriverResult<()> {
        let violations = self.adapter.unique_violations(ex, object, exclude).await?;
        if violations.is_empty() {
            return Ok(());
        }

        info!("Rejecting request due to unavailable values: {}", violations);
        Err(DriverError::InvalidInput(format!(
            "The following values are not available and must be changed: {}",
            violations
        )))
    }

    /// Ensures that `object` carries the same identifier as `raw_id` and returns the key they
    /// share.
    pub(super) fn validate_id_match(
        &self,
        raw_id: &str,
        object: &A::Object,
    ) -> DriverResult<A::Key> {
        let uri_key = self.adapter.parse_key(raw_id);
        let object_key = self.adapter.primary_key(&self.adapter.to_entity(object));
        match (uri_key, object_key) {
            (Some(uri_key), Some(object_key)) if uri_key == object_key => Ok(uri_key),
            (_, object_key) => {
                let object_id = match object_key {
                    Some(key) => key.to_string(),
                    None => "missing".to_owned(),
                };
                info!("Rejecting request due to id mismatch: {} vs. {}", object_id, raw_id);
                Err(DriverError::InvalidInput(format!(
                    "Object id {} does not match URI id '{}'",
                    object_id, raw_id
                )))
            }
        }
    }
}
