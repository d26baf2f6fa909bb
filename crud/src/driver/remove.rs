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

//! Extends the controller with the `remove` method.

use crate::db::PersistenceAdapter;
use crate::driver::Controller;
use log::debug;
use restkit_core::driver::DriverResult;

impl<A: PersistenceAdapter> Controller<A> {
    /// Deletes the entity identified by `raw_id`.
    pub async fn remove(self, raw_id: &str) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;

        let entity = self.find_existing(tx.ex(), raw_id).await?;
        self.adapter.delete(tx.ex(), entity).await?;

        tx.commit().await?;
        debug!("Removed entity with id {}", raw_id);
        Ok(())
    }
}
