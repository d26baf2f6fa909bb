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

//! Persistence adapter that exposes users to the generic CRUD layer.

use crate::db;
use crate::model::{User, UserEntity, UserId};
use async_trait::async_trait;
use restkit_core::db::{DbError, DbResult, Executor};
use restkit_crud::db::{PersistenceAdapter, PersistenceLog};
use restkit_crud::model::{LogLevel, UniqueViolations};

/// Adapter for users and their roles.
pub(crate) struct UsersAdapter {
    /// Log where to report SQL statements and persistence events.
    log: PersistenceLog,
}

impl UsersAdapter {
    /// Creates a new adapter that reports to `log`.
    pub(crate) fn new(log: PersistenceLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl PersistenceAdapter for UsersAdapter {
    type Object = User;
    type Entity = UserEntity;
    type Key = UserId;

    fn to_entity(&self, object: &User) -> UserEntity {
        UserEntity::from(object)
    }

    fn merge(&self, object: User, entity: &mut UserEntity) {
        entity.merge(object);
    }

    async fn to_object(
        &self,
        ex: &mut Executor,
        entity: UserEntity,
        with_relationships: bool,
    ) -> DbResult<User> {
        if !with_relationships {
            return Ok(entity.into_user(None));
        }

        let roles = match (entity.id(), entity.roles()) {
            (_, Some(roles)) => roles.clone(),
            (Some(id), None) => db::get_user_roles(ex, &self.log, *id).await?,
            (None, None) => vec![],
        };
        Ok(entity.into_user(Some(roles)))
    }

    fn primary_key(&self, entity: &UserEntity) -> Option<UserId> {
        *entity.id()
    }

    fn parse_key(&self, raw: &str) -> Option<UserId> {
        raw.parse::<i64>().ok().map(UserId::new)
    }

    async fn create(&self, ex: &mut Executor, entity: UserEntity) -> DbResult<UserId> {
        let id = db::create_user(ex, &self.log, &entity).await?;
        let message = format!("Created user {} with id {}", entity.username(), id);
        self.log.event(LogLevel::Fine, &message).await;
        Ok(id)
    }

    async fn find(&self, ex: &mut Executor, key: &UserId) -> DbResult<Option<UserEntity>> {
        match db::get_user(ex, &self.log, *key).await {
            Ok(user) => Ok(Some(user)),
            Err(DbError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_all(&self, ex: &mut Executor) -> DbResult<Vec<UserEntity>> {
        db::get_users(ex, &self.log).await
    }

    async fn update(&self, ex: &mut Executor, entity: &UserEntity) -> DbResult<()> {
        db::update_user(ex, &self.log, entity).await
    }

    async fn delete(&self, ex: &mut Executor, entity: UserEntity) -> DbResult<()> {
        let id = (*entity.id()).ok_or(DbError::NotFound)?;
        db::delete_user(ex, &self.log, id).await?;
        self.log.event(LogLevel::Fine, &format!("Deleted user {}", id)).await;
        Ok(())
    }

    async fn reference(&self, ex: &mut Executor, key: &UserId) -> DbResult<()> {
        db::get_user_reference(ex, &self.log, *key).await
    }

    async fn unique_violations(
        &self,
        ex: &mut Executor,
        object: &User,
        exclude: Option<&UserEntity>,
    ) -> DbResult<UniqueViolations> {
        let exclude_id = exclude.and_then(|e| *e.id());

        let mut violations = UniqueViolations::default();
        if let Some(id) = db::find_user_by_username(ex, &self.log, &object.username).await? {
            if Some(id) != exclude_id {
                violations.add("username", &object.username);
            }
        }
        if let Some(email) = &object.email {
            if let Some(id) = db::find_user_by_email(ex, &self.log, email).await? {
                if Some(id) != exclude_id {
                    violations.add("email", email);
                }
            }
        }
        Ok(violations)
    }
}
