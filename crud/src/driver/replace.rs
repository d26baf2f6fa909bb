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

//! Extends the controller with the `replace` method.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use crate::driver::validation::not_found;
use log::debug;
use restkit_core::driver::DriverResult;

impl<A: PersistenceAdapter> Controller<A> {
    /// Replaces the contents of the entity identified by `raw_id` with `object`.
    ///
    /// `object` must carry the same identifier as `raw_id`, and its unique fields must not collide
    /// with those of any other entity.
    pub async fn replace(self, raw_id: &str, object: A::Object) -> DriverResult<()> {
        let key = self.validate_id_match(raw_id, &object)?;

        let mut tx = self.db.begin().await?;

        let mut entity = match self.adapter.find(tx.ex(), &key).await? {
            Some(entity) => entity,
            None => return Err(not_found(raw_id)),
        };
        self.validate_unique(tx.ex(), &object, Some(&entity)).await?;

        self.adapter.merge(object, &mut entity);
        self.adapter.update(tx.ex(), &entity).await?;

        tx.commit().await?;
        debug!("Replaced entity with id {}", key);
        Ok(())
    }
}
