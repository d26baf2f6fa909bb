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

//! Extends the controller with the `list` method.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use restkit_core::driver::DriverResult;

impl<A: PersistenceAdapter> Controller<A> {
    /// Gets all entities.  To-many relationships are not loaded.
    pub async fn list(self) -> DriverResult<Vec<A::Object>> {
        let mut tx = self.db.begin().await?;

        let entities = self.adapter.find_all(tx.ex()).await?;
        let mut objects = Vec::with_capacity(entities.len());
        for entity in entities {
            objects.push(self.adapter.to_object(tx.ex(), entity, false).await?);
        }

        tx.commit().await?;
        Ok(objects)
    }
}
