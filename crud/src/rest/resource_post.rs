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

//! API to create a new entity.

use crate::db::PersistenceAdapter;
use crate::rest::ResourceState;
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::{StatusCode, header};
use restkit_core::rest::RestResult;

/// POST handler for this API.
pub(super) async fn handler<A: PersistenceAdapter>(
    State(state): State<ResourceState<A>>,
    Json(object): Json<A::Object>,
) -> RestResult<impl IntoResponse> {
    let key = state.controller.create(object).await?;

    let location = state.base_urls.make_backend_url(&format!("{}/{}", state.path, key));
    Ok((StatusCode::CREATED, [(header::LOCATION, location.to_string())]))
}

#[cfg(test)]
mod tests {
    use crate::db::testutils::Widget;
    use crate::rest::testutils::*;
    use axum::http;
    use restkit_core::rest::testutils::OneShotBuilder;
    use restkit_core::test_payload_must_be_json;
    use serde_json::json;

    fn route() -> (http::Method, String) {
        (http::Method::POST, "/api/test/widgets".to_owned())
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;
        let previous = context.insert(Widget::new("first", "S1")).await;

        let response = OneShotBuilder::new(context.app(), route())
            .send_json(Widget::new("second", "S2").with_tags(&["x"]))
            .await
            .expect_status(http::StatusCode::CREATED)
            .take_response()
            .await;

        let id = previous + 1;
        assert_eq!(
            format!("http://localhost:1234/api/test/widgets/{}", id),
            response.headers().get(http::header::LOCATION).unwrap().to_str().unwrap()
        );
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());

        let entity = context.get(id).await.unwrap();
        assert_eq!("second", entity.name);
        assert_eq!(vec!["x".to_owned()], entity.tags);
    }

    #[tokio::test]
    async fn test_unique_violations() {
        let context = TestContext::setup().await;
        context.insert(Widget::new("first", "S1")).await;

        OneShotBuilder::new(context.app(), route())
            .send_json(Widget::new("first", "S1"))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error(
                "^The following values are not available and must be changed: \
                name: first, serial: S1$",
            )
            .await;

        assert!(context.get(2).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_object() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.into_app(), route())
            .send_json(json!({"name": "no serial"}))
            .await
            .expect_status(http::StatusCode::UNPROCESSABLE_ENTITY)
            .expect_text("missing field `serial`")
            .await;
    }

    test_payload_must_be_json!(TestContext::setup().await.into_app(), route());
}
