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

//! Shared pieces of the HTTP layer.
//!
//! Every API lives in its own file named after the resource and the method it serves, such as
//! `resource_put.rs`, and exposes a `handler` function.  Its tests define a `route` function that
//! returns the method and path under test so that every test in the file exercises the same API.

use crate::driver::DriverError;
use crate::model::ModelError;
use async_trait::async_trait;
use axum::Json;
use axum::body::HttpBody;
use axum::extract::{FromRequest, Request};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

mod base_urls;
pub use base_urls::BaseUrls;

/// Errors returned to clients.  Each variant maps to one HTTP status code.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Unexpected server-side failure (500).
    #[error("{0}")]
    InternalError(String),

    /// The request was understood but cannot be honored as is (400).
    #[error("{0}")]
    InvalidRequest(String),

    /// The requested entity does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// The request carried a body where none is accepted (413).
    #[error("Content should be empty")]
    PayloadNotEmpty,
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(msg) | DriverError::InvalidInput(msg) => {
                RestError::InvalidRequest(msg)
            }
            DriverError::BackendError(msg) => RestError::InternalError(msg),
            DriverError::NotFound(msg) => RestError::NotFound(msg),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            RestError::InternalError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => http::StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => http::StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => http::StatusCode::PAYLOAD_TOO_LARGE,
        };

        (status, Json(ErrorResponse { message: self.to_string() })).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// JSON body of every error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    pub message: String,
}

/// Extractor for APIs that take no body.  Rejects requests that carry one.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Common test code for the REST server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http::{self, HeaderName, HeaderValue};
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt;

    /// Largest response body that tests read.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builds one request and sends it to a router.
    #[must_use]
    pub struct OneShotBuilder {
        /// Router under test.
        app: Router,

        /// Request being built.
        builder: axum::http::request::Builder,
    }

    impl OneShotBuilder {
        /// Starts a request for `method` and `uri` against `app`.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = http::Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Appends `query`, serialized as a URL-encoded form, to the URI.
        pub fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
            let uri = self.builder.uri_ref().unwrap().to_string();
            assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
            self.builder = self.builder.uri(format!(
                "{}?{}",
                uri,
                serde_urlencoded::to_string(query).unwrap()
            ));
            self
        }

        /// Adds the header `name` with `value`.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Sends the request with `body` and returns a checker for the response.
        async fn send(self, body: axum::body::Body) -> ResponseChecker {
            let request = self.builder.body(body).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Sends the request without a body.
        pub async fn send_empty(self) -> ResponseChecker {
            self.send(axum::body::Body::empty()).await
        }

        /// Sends the request with a plain `text` body.
        pub async fn send_text<T: Into<String>>(mut self, text: T) -> ResponseChecker {
            let content_type = mime::TEXT_PLAIN.as_ref();
            self.builder = self.builder.header(http::header::CONTENT_TYPE, content_type);
            self.send(axum::body::Body::from(text.into())).await
        }

        /// Sends the request with `object` serialized as its JSON body.
        pub async fn send_json<T: Serialize>(mut self, object: T) -> ResponseChecker {
            let content_type = mime::APPLICATION_JSON.as_ref();
            self.builder = self.builder.header(http::header::CONTENT_TYPE, content_type);
            self.send(axum::body::Body::from(serde_json::to_vec(&object).unwrap())).await
        }
    }

    /// Checks the response to a request sent by a `OneShotBuilder`.
    ///
    /// The expected status defaults to 200 and is verified by every `expect_*` method.
    #[must_use]
    pub struct ResponseChecker {
        /// Response returned by the app.
        response: Response,

        /// Status that `response` must carry.
        exp_status: http::StatusCode,
    }

    impl From<Response> for ResponseChecker {
        fn from(response: Response) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Expects the response to carry `status` instead of 200.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Checks the status of the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Checks the status and consumes the body of the response.
        async fn body(self) -> Vec<u8> {
            self.verify();
            axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap().to_vec()
        }

        /// Expects an empty body.
        pub async fn expect_empty(self) {
            let body = String::from_utf8(self.body().await).unwrap();
            assert!(body.is_empty(), "Body not empty; got {}", body);
        }

        /// Expects an `ErrorResponse` whose message matches `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            let body = self.body().await;
            let response: ErrorResponse = serde_json::from_slice(&body).unwrap_or_else(|e| {
                panic!("Not an ErrorResponse ({}): {}", e, String::from_utf8_lossy(&body))
            });
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                re.is_match(&response.message),
                "Error message '{}' does not match re '{}'",
                response.message,
                exp_re
            );
        }

        /// Expects a JSON body that deserializes into `T` and returns it.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            serde_json::from_slice::<T>(&self.body().await).unwrap()
        }

        /// Expects a plain text body that matches `exp_re`.  Errors wrapped in an
        /// `ErrorResponse` must be checked with `expect_error` instead.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            let body = String::from_utf8(self.body().await).unwrap();
            assert!(!body.contains("\"message\":"), "Use expect_error on {}", body);
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body '{}' does not match re '{}'", body, exp_re);
        }

        /// Checks the status and hands out the response for further checks.
        pub async fn take_response(self) -> Response {
            self.verify();
            self.response
        }
    }

    /// Generates a test that checks that an API rejects bodies that are not JSON.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr $(, $query:expr)? ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_query($query) )?
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE)
                    .expect_text("Content-Type")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_query($query) )?
                    .with_header(axum::http::header::CONTENT_TYPE, "application/json")
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_text("expected ident")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test that checks that an API rejects any body.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr $(, $query:expr)? ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_query($query) )?
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;
}
