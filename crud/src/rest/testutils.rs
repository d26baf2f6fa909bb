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

//! Test utilities for the REST interface.

use crate::db::PersistenceLog;
use crate::db::testutils::{Widget, WidgetEntity};
use crate::rest::{app, logger_app};
use axum::Router;
use restkit_core::rest::BaseUrls;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// Context of the controller backing the app.
    driver: crate::driver::testutils::TestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the widgets and logger routers on top of an in-memory database.
    pub(crate) async fn setup() -> Self {
        let driver = crate::driver::testutils::TestContext::setup().await;
        let base_urls = Arc::from(BaseUrls::from_static("http://localhost:1234/"));

        let app = Router::new()
            .merge(app(driver.controller(), base_urls, "api/test/widgets"))
            .merge(logger_app(driver.log(), "api/test/persistence-logger"));

        Self { driver, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Gets a copy of the persistence log tuned by the logger router.
    pub(crate) fn log(&self) -> PersistenceLog {
        self.driver.log()
    }

    /// Stores `widget` by directly modifying the database and returns its identifier.
    pub(crate) async fn insert(&self, widget: Widget) -> i64 {
        self.driver.insert(widget).await
    }

    /// Loads the widget `id` by directly querying the database.
    pub(crate) async fn get(&self, id: i64) -> Option<WidgetEntity> {
        self.driver.get(id).await
    }
}
