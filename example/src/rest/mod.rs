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

//! Entry point to the REST server.

use crate::db::UsersAdapter;
use axum::Router;
use restkit_core::db::Db;
use restkit_core::rest::BaseUrls;
use restkit_crud::db::PersistenceLog;
use restkit_crud::driver::Controller;
use restkit_crud::rest::{app as resource_app, logger_app};
use std::sync::Arc;

#[cfg(test)]
mod testutils;

/// Path under which the users collection is served.
const USERS_PATH: &str = "api/v1/users";

/// Path under which the persistence logger is served.
const LOGGER_PATH: &str = "api/v1/persistence-logger";

/// Creates the router for the application.
pub(crate) fn app(
    db: Arc<dyn Db + Send + Sync>,
    base_urls: Arc<BaseUrls>,
    log: PersistenceLog,
) -> Router {
    let controller = Controller::new(db, UsersAdapter::new(log.clone()));
    Router::new()
        .merge(resource_app(controller, base_urls, USERS_PATH))
        .merge(logger_app(log, LOGGER_PATH))
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use crate::model::{EmailAddress, User, UserId, Username};
    use http::{Method, StatusCode};
    use restkit_core::rest::testutils::*;
    use restkit_crud::model::LogLevel;
    use restkit_crud::rest::SqlLogLevelQuery;
    use serde_json::json;

    #[tokio::test]
    async fn test_alice_lifecycle() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (Method::POST, "/api/v1/users"))
            .send_json(json!({"username": "alice"}))
            .await
            .expect_status(StatusCode::CREATED)
            .take_response()
            .await;
        let location = response.headers().get(http::header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!("http://localhost:1234/api/v1/users/1", location);

        OneShotBuilder::new(context.app(), (Method::POST, "/api/v1/users"))
            .send_json(json!({"username": "alice"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error(
                "^The following values are not available and must be changed: username: alice$",
            )
            .await;

        OneShotBuilder::new(context.app(), (Method::PUT, "/api/v1/users/1"))
            .send_json(json!({"id": 2, "username": "alice"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("^Object id 2 does not match URI id '1'$")
            .await;

        OneShotBuilder::new(context.app(), (Method::PUT, "/api/v1/users/1"))
            .send_json(json!({"id": 1, "username": "alice2"}))
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let user = OneShotBuilder::new(context.app(), (Method::GET, "/api/v1/users/1"))
            .send_empty()
            .await
            .expect_json::<User>()
            .await;
        assert_eq!(
            User {
                id: Some(UserId::new(1)),
                username: Username::new("alice2").unwrap(),
                email: None,
                roles: Some(vec![]),
            },
            user
        );

        OneShotBuilder::new(context.app(), (Method::DELETE, "/api/v1/users/1"))
            .send_empty()
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        OneShotBuilder::new(context.app(), (Method::GET, "/api/v1/users/1"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .expect_error("^Could not find entity with id: 1$")
            .await;
    }

    #[tokio::test]
    async fn test_all_violations_are_reported() {
        let context = TestContext::setup().await;
        context.create("bob", Some("bob@example.com"), &[]).await;

        OneShotBuilder::new(context.app(), (Method::POST, "/api/v1/users"))
            .send_json(json!({"username": "bob", "email": "bob@example.com"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("must be changed: username: bob, email: bob@example.com$")
            .await;
    }

    #[tokio::test]
    async fn test_replace_keeps_own_values_and_roles() {
        let context = TestContext::setup().await;
        let id = context.create("carol", Some("carol@example.com"), &["admin"]).await;

        OneShotBuilder::new(context.app(), (Method::PUT, format!("/api/v1/users/{}", id)))
            .send_json(json!({"id": id, "username": "carol", "email": "carol@example.com"}))
            .await
            .expect_status(StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let user = context.get(id).await;
        assert_eq!(Some(EmailAddress::new("carol@example.com").unwrap()), user.email);
        assert_eq!(Some(vec!["admin".to_owned()]), user.roles);
    }

    #[tokio::test]
    async fn test_replace_requires_body_id() {
        let context = TestContext::setup().await;
        let id = context.create("frank", None, &["admin"]).await;

        OneShotBuilder::new(context.app(), (Method::PUT, format!("/api/v1/users/{}", id)))
            .send_json(json!({"username": "frank2"}))
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error(&format!("Object id missing does not match URI id '{}'", id))
            .await;

        let user = context.get(id).await;
        assert_eq!("frank", user.username.as_str());
    }

    #[tokio::test]
    async fn test_invalid_username() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), (Method::POST, "/api/v1/users"))
            .send_json(json!({"username": "not valid"}))
            .await
            .expect_status(StatusCode::UNPROCESSABLE_ENTITY)
            .expect_text("Unsupported character ' ' in username")
            .await;
    }

    #[tokio::test]
    async fn test_list_and_head() {
        let context = TestContext::setup().await;
        let id1 = context.create("dave", None, &["reader"]).await;
        let id2 = context.create("erin", Some("erin@example.com"), &[]).await;

        let users = OneShotBuilder::new(context.app(), (Method::GET, "/api/v1/users"))
            .send_empty()
            .await
            .expect_json::<Vec<User>>()
            .await;
        assert_eq!(2, users.len());
        assert_eq!((Some(id1), None), (users[0].id, users[0].roles.clone()));
        assert_eq!((Some(id2), None), (users[1].id, users[1].roles.clone()));

        OneShotBuilder::new(context.app(), (Method::HEAD, format!("/api/v1/users/{}", id2)))
            .send_empty()
            .await
            .expect_status(StatusCode::OK)
            .verify();

        OneShotBuilder::new(context.app(), (Method::HEAD, "/api/v1/users/99"))
            .send_empty()
            .await
            .expect_status(StatusCode::NOT_FOUND)
            .verify();
    }

    #[tokio::test]
    async fn test_persistence_logger_is_shared() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (Method::PUT, "/api/v1/persistence-logger/finest"))
            .send_empty()
            .await
            .expect_empty()
            .await;
        OneShotBuilder::new(context.app(), (Method::PUT, "/api/v1/persistence-logger/sql/FINE"))
            .with_query(SqlLogLevelQuery { log_parameters: Some(true) })
            .send_empty()
            .await
            .expect_empty()
            .await;

        let settings = context.log().settings().await;
        assert_eq!(LogLevel::Finest, settings.level);
        assert_eq!(LogLevel::Fine, settings.sql_level);
        assert!(settings.log_parameters);

        OneShotBuilder::new(context.app(), (Method::PUT, "/api/v1/persistence-logger/verbose"))
            .send_empty()
            .await
            .expect_status(StatusCode::BAD_REQUEST)
            .expect_error("Invalid Log level provided")
            .await;
    }
}
