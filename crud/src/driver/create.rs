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

//! Extends the controller with the `create` method.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use log::debug;
use restkit_core::driver::DriverResult;

impl<A: PersistenceAdapter> Controller<A> {
    /// Creates a new entity from `object` and returns its primary key.
    ///
    /// Fails if any of the unique fields of `object` are already in use.
    pub async fn create(self, object: A::Object) -> DriverResult<A::Key> {
        let mut tx = self.db.begin().await?;

        self.validate_unique(tx.ex(), &object, None).await?;

        let entity = self.adapter.to_entity(&object);
        let key = self.adapter.create(tx.ex(), entity).await?;

        tx.commit().await?;
        debug!("Created entity with id {}", key);
        Ok(key)
    }
}
