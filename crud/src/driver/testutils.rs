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

//! Test utilities for the controller.

use crate::db::testutils::{Widget, WidgetEntity, WidgetsAdapter};
use crate::db::{PersistenceAdapter, PersistenceLog};
use crate::driver::Controller;
use restkit_core::db::{Db, Executor};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the controller.
    db: Arc<dyn Db + Send + Sync>,

    /// Adapter to inspect and modify the database directly.
    adapter: WidgetsAdapter,

    /// Persistence log shared by the adapters.
    log: PersistenceLog,

    /// The controller under test.
    controller: Controller<WidgetsAdapter>,
}

impl TestContext {
    /// Initializes a controller for widgets backed by an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(restkit_core::db::sqlite::testutils::setup().await);
        WidgetsAdapter::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let log = PersistenceLog::default();
        let adapter = WidgetsAdapter::new(log.clone());
        let controller = Controller::new(db.clone(), WidgetsAdapter::new(log.clone()));
        Self { db, adapter, log, controller }
    }

    /// Gets a copy of the controller in this test context.
    pub(crate) fn controller(&self) -> Controller<WidgetsAdapter> {
        self.controller.clone()
    }

    /// Gets a copy of the persistence log used by the adapters.
    pub(crate) fn log(&self) -> PersistenceLog {
        self.log.clone()
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Stores `widget` by directly modifying the database and returns its identifier.
    pub(crate) async fn insert(&self, widget: Widget) -> i64 {
        let entity = self.adapter.to_entity(&widget);
        self.adapter.create(&mut self.ex().await, entity).await.unwrap()
    }

    /// Loads the widget `id` by directly querying the database.
    pub(crate) async fn get(&self, id: i64) -> Option<WidgetEntity> {
        self.adapter.find(&mut self.ex().await, &id).await.unwrap()
    }
}
