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

//! Persistence seam of the generic CRUD layer.
//!
//! The generic layer never issues queries itself.  Instead, every kind of resource provides a
//! `PersistenceAdapter` that converts between objects and entities and that talks to the
//! database through the `Executor` handed to it by the controller.  The controller always hands
//! out the executor of an open transaction, so all the calls an adapter receives during a single
//! operation are atomic.

use crate::model::UniqueViolations;
use async_trait::async_trait;
use restkit_core::db::{DbResult, Executor};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

mod logging;
pub use logging::PersistenceLog;
#[cfg(test)]
pub(crate) mod testutils;

/// Conversions and queries for one kind of resource.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync + 'static {
    /// Representation of the resource exchanged with clients.
    type Object: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Representation of the resource in the database.
    type Entity: Send + Sync + 'static;

    /// Type of the primary key of `Entity`.
    type Key: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;

    /// Converts `object` into a new entity.
    fn to_entity(&self, object: &Self::Object) -> Self::Entity;

    /// Merges the contents of `object` into the existing `entity`.
    ///
    /// The primary key of `entity` must not change.
    fn merge(&self, object: Self::Object, entity: &mut Self::Entity);

    /// Converts `entity` into its client representation.
    ///
    /// Loading to-many relationships may need extra queries, which is why this takes an executor,
    /// and they are only loaded if `with_relationships` is true.
    async fn to_object(
        &self,
        ex: &mut Executor,
        entity: Self::Entity,
        with_relationships: bool,
    ) -> DbResult<Self::Object>;

    /// Returns the primary key of `entity`, if it has one.
    fn primary_key(&self, entity: &Self::Entity) -> Option<Self::Key>;

    /// Converts a raw identifier, as received in a URI, to a primary key.  Returns `None` if the
    /// raw value cannot represent a key.
    fn parse_key(&self, raw: &str) -> Option<Self::Key>;

    /// Persists a new `entity` and returns its assigned primary key.
    async fn create(&self, ex: &mut Executor, entity: Self::Entity) -> DbResult<Self::Key>;

    /// Looks up the entity identified by `key`.
    async fn find(&self, ex: &mut Executor, key: &Self::Key) -> DbResult<Option<Self::Entity>>;

    /// Loads all entities.
    async fn find_all(&self, ex: &mut Executor) -> DbResult<Vec<Self::Entity>>;

    /// Persists the contents of an existing `entity`.
    async fn update(&self, ex: &mut Executor, entity: &Self::Entity) -> DbResult<()>;

    /// Deletes an existing `entity`.
    async fn delete(&self, ex: &mut Executor, entity: Self::Entity) -> DbResult<()>;

    /// Checks that the entity identified by `key` exists without loading it.
    ///
    /// Fails with `DbError::NotFound` if it does not.
    async fn reference(&self, ex: &mut Executor, key: &Self::Key) -> DbResult<()>;

    /// Looks for values in the unique fields of `object` that are already used by an entity
    /// other than `exclude`.
    async fn unique_violations(
        &self,
        ex: &mut Executor,
        object: &Self::Object,
        exclude: Option<&Self::Entity>,
    ) -> DbResult<UniqueViolations>;
}
