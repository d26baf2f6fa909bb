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

//! Generic business logic for CRUD resources.

use crate::db::PersistenceAdapter;
use derivative::Derivative;
use restkit_core::db::Db;
use std::sync::Arc;

mod create;
mod exists;
mod fetch;
mod list;
mod remove;
mod replace;
#[cfg(test)]
pub(crate) mod testutils;
mod validation;

/// Business logic for one kind of resource described by the adapter `A`.
///
/// The public operations exposed by the controller are all "one shot": they start and commit a
/// transaction, so it's incorrect for the caller to use two separate calls.  For this reason,
/// these operations consume the controller in an attempt to minimize the possibility of executing
/// two operations.
///
/// Identifiers are received in their raw form, as they appear in URIs, and are converted to
/// primary keys by the adapter.  A raw identifier that cannot be converted never names an
/// existing entity.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct Controller<A: PersistenceAdapter> {
    /// The database that the controller uses for persistence.
    db: Arc<dyn Db + Send + Sync>,

    /// Conversions and queries for the resource.
    adapter: Arc<A>,
}

impl<A: PersistenceAdapter> Controller<A> {
    /// Creates a new controller backed by `db` that manipulates entities via `adapter`.
    pub fn new(db: Arc<dyn Db + Send + Sync>, adapter: A) -> Self {
        Self { db, adapter: Arc::from(adapter) }
    }

    /// Returns the adapter used by this controller.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}
