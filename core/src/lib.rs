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

//! Building blocks shared by RestKit services.
//!
//! A service is split in layers, each in its own module and each with its own error and result
//! types that convert into the next layer's with `?`:
//!
//! 1.  `model`: domain types.  Values coming from clients or from the database are validated when
//!     these types are constructed, which is where `ModelError` comes from.
//!
//! 1.  `db`: persistence.  Free functions take an `Executor` obtained from a `Db` and issue the
//!     query that matches the backend in use: PostgreSQL in production, SQLite in tests.
//!
//! 1.  `driver`: business logic.  Operations consume the driver and run in one transaction.
//!
//! 1.  `rest`: the HTTP surface, built with `axum`.  `RestError` turns every lower-level error into
//!     a status code and a JSON body.
//!
//! 1.  `main`: reads the configuration from the environment (see `env`) and calls `serve`.
//!
//! The generic CRUD layer in `restkit-crud` implements `driver` and `rest` once for any resource
//! that provides a persistence adapter.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod db;
pub mod driver;
pub mod env;
pub mod model;
pub mod rest;
