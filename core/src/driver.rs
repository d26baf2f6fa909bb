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

//! Errors of the business logic layer.
//!
//! Drivers hold an `Arc<dyn Db + Send + Sync>` plus whatever state their operations need, and
//! every operation consumes the driver and runs inside its own transaction.  Callers clone the
//! driver once per request, which keeps one request mapped to one transaction.

use crate::db::DbError;
use crate::model::ModelError;

/// Errors raised by drivers.  The message of each variant is shown to clients as is.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// The entity to create collides with an existing one.
    #[error("{0}")]
    AlreadyExists(String),

    /// Unexpected failure in a lower layer.
    #[error("{0}")]
    BackendError(String),

    /// The request is well-formed but its contents are not acceptable.
    #[error("{0}")]
    InvalidInput(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists => DriverError::AlreadyExists(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::BackendError(_) | DbError::DataIntegrityError(_) | DbError::Unavailable => {
                DriverError::BackendError(e.to_string())
            }
        }
    }
}

impl From<ModelError> for DriverError {
    fn from(e: ModelError) -> Self {
        DriverError::InvalidInput(e.to_string())
    }
}

/// Result type for this module.
pub type DriverResult<T> = Result<T, DriverError>;
