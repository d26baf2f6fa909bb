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

//! Extends the controller with the `exists` method.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use restkit_core::db::DbError;
use restkit_core::driver::DriverResult;

impl<A: PersistenceAdapter> Controller<A> {
    /// Checks if the entity identified by `raw_id` exists without loading it.
    pub async fn exists(self, raw_id: &str) -> DriverResult<bool> {
        let key = match self.adapter.parse_key(raw_id) {
            Some(key) => key,
            None => return Ok(false),
        };

        let mut ex = self.db.ex().await?;
        match self.adapter.reference(&mut ex, &key).await {
            Ok(()) => Ok(true),
            Err(DbError::NotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
