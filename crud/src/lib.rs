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

//! Generic CRUD resources backed by a relational database.
//!
//! A service plugs in a `db::PersistenceAdapter` for every kind of resource it wants to expose.
//! The adapter knows how to convert between the object that clients exchange with the service
//! and the entity that is persisted, and how to issue the queries for that entity.  Everything
//! else is generic:
//!
//! 1.  `driver::Controller` implements the lifecycle of the entities (create, fetch, replace,
//!     remove) and validates that unique fields stay unique and that updates target the entity
//!     they claim to target.
//!
//! 1.  `rest::app` maps the HTTP verbs of a collection onto the controller.
//!
//! 1.  `rest::logger_app` exposes `db::PersistenceLog`, which allows tuning the verbosity of the
//!     persistence layer while the service runs.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod db;
pub mod driver;
pub mod model;
pub mod rest;
