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

//! Test utilities for the REST API.

use crate::db;
use crate::model::{EmailAddress, User, UserEntity, UserId, Username};
use crate::rest::app;
use axum::Router;
use restkit_core::db::Db;
use restkit_core::rest::BaseUrls;
use restkit_crud::db::{PersistenceAdapter, PersistenceLog};
use restkit_crud::model::LogSettings;
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// Database backing the app.
    db: Arc<dyn Db + Send + Sync>,

    /// Persistence log shared with the app.
    log: PersistenceLog,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the users service on top of an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(restkit_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();

        let log = PersistenceLog::new(LogSettings::default());
        let base_urls = Arc::from(BaseUrls::from_static("http://localhost:1234/"));
        let app = app(db.clone(), base_urls, log.clone());
        Self { db, log, app }
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
        self.log.clone()
    }

    /// Stores a new user by directly modifying the database and returns its identifier.
    pub(crate) async fn create(
        &self,
        username: &str,
        email: Option<&str>,
        roles: &[&str],
    ) -> UserId {
        let user = UserEntity::new(
            None,
            Username::new(username).unwrap(),
            email.map(|e| EmailAddress::new(e).unwrap()),
            Some(roles.iter().map(|r| (*r).to_owned()).collect()),
        );
        db::create_user(&mut self.db.ex().await.unwrap(), &self.log, &user).await.unwrap()
    }

    /// Loads the user `id` and its roles by directly querying the database.
    pub(crate) async fn get(&self, id: UserId) -> User {
        let adapter = db::UsersAdapter::new(self.log.clone());
        let mut ex = self.db.ex().await.unwrap();
        let entity = db::get_user(&mut ex, &self.log, id).await.unwrap();
        adapter.to_object(&mut ex, entity, true).await.unwrap()
    }
}
