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

//! Database abstraction to manipulate users and their roles.

use crate::model::{EmailAddress, UserEntity, UserId, Username};
use restkit_core::db::{DbError, DbResult, Executor};
#[cfg(feature = "postgres")]
use restkit_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use restkit_core::db::sqlite;
use restkit_crud::db::PersistenceLog;
use sqlx::Row;
#[cfg(feature = "postgres")]
use sqlx::postgres::PgRow;
#[cfg(any(feature = "sqlite", test))]
use sqlx::sqlite::SqliteRow;

mod adapter;
pub(crate) use adapter::UsersAdapter;

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Builds a user entity out of the raw values of a `users` row.  Roles are left unloaded.
fn build_user(id: i64, username: String, email: Option<String>) -> DbResult<UserEntity> {
    let email = match email {
        Some(email) => Some(EmailAddress::new(email)?),
        None => None,
    };
    Ok(UserEntity::new(Some(UserId::new(id)), Username::new(username)?, email, None))
}

#[cfg(feature = "postgres")]
impl TryFrom<PgRow> for UserEntity {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(postgres::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        build_user(id, username, email)
    }
}

#[cfg(any(feature = "sqlite", test))]
impl TryFrom<SqliteRow> for UserEntity {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let username: String = row.try_get("username").map_err(sqlite::map_sqlx_error)?;
        let email: Option<String> = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        build_user(id, username, email)
    }
}

/// Creates a new user from the contents of `user` and returns its assigned identifier.
///
/// The roles of `user` are stored too, if present.
pub(crate) async fn create_user(
    ex: &mut Executor,
    log: &PersistenceLog,
    user: &UserEntity,
) -> DbResult<UserId> {
    let username = user.username().as_str();
    let email = user.email().as_ref().map(EmailAddress::as_str);

    let id = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id";
            log.sql(query_str, (username, email)).await;
            let row = sqlx::query(query_str)
                .bind(username)
                .bind(email)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get::<i64, _>("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO users (username, email) VALUES (?, ?)";
            log.sql(query_str, (username, email)).await;
            let done = sqlx::query(query_str)
                .bind(username)
                .bind(email)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.last_insert_rowid()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    let id = UserId::new(id);

    if let Some(roles) = user.roles() {
        set_user_roles(ex, log, id, roles).await?;
    }
    Ok(id)
}

/// Gets the user identified by `id`, without its roles.
pub(crate) async fn get_user(
    ex: &mut Executor,
    log: &PersistenceLog,
    id: UserId,
) -> DbResult<UserEntity> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT id, username, email FROM users WHERE id = $1";
            log.sql(query_str, (id,)).await;
            let raw_user = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            UserEntity::try_from(raw_user)
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id, username, email FROM users WHERE id = ?";
            log.sql(query_str, (id,)).await;
            let raw_user = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            UserEntity::try_from(raw_user)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all users sorted by their identifier, without their roles.
pub(crate) async fn get_users(
    ex: &mut Executor,
    log: &PersistenceLog,
) -> DbResult<Vec<UserEntity>> {
    let query_str = "SELECT id, username, email FROM users ORDER BY id";
    log.sql(query_str, ()).await;

    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(UserEntity::try_from).collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows =
                sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(UserEntity::try_from).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Updates the existing user `user` with its new contents.
///
/// The roles of the user are only replaced if `user` has them loaded.
pub(crate) async fn update_user(
    ex: &mut Executor,
    log: &PersistenceLog,
    user: &UserEntity,
) -> DbResult<()> {
    let id = (*user.id()).ok_or(DbError::NotFound)?;
    let username = user.username().as_str();
    let email = user.email().as_ref().map(EmailAddress::as_str);

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE users SET username = $1, email = $2 WHERE id = $3";
            log.sql(query_str, (username, email, id)).await;
            let done = sqlx::query(query_str)
                .bind(username)
                .bind(email)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE users SET username = ?, email = ? WHERE id = ?";
            log.sql(query_str, (username, email, id)).await;
            let done = sqlx::query(query_str)
                .bind(username)
                .bind(email)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => return Err(DbError::NotFound),
        1 => (),
        _ => return Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }

    if let Some(roles) = user.roles() {
        set_user_roles(ex, log, id, roles).await?;
    }
    Ok(())
}

/// Deletes the user identified by `id` along with its roles.
pub(crate) async fn delete_user(
    ex: &mut Executor,
    log: &PersistenceLog,
    id: UserId,
) -> DbResult<()> {
    set_user_roles(ex, log, id, &[]).await?;

    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM users WHERE id = $1";
            log.sql(query_str, (id,)).await;
            let done = sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            done.rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM users WHERE id = ?";
            log.sql(query_str, (id,)).await;
            let done = sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            done.rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };

    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Deletion affected more than one row".to_owned())),
    }
}

/// Checks that the user identified by `id` exists.
pub(crate) async fn get_user_reference(
    ex: &mut Executor,
    log: &PersistenceLog,
    id: UserId,
) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT id FROM users WHERE id = $1";
            log.sql(query_str, (id,)).await;
            sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT id FROM users WHERE id = ?";
            log.sql(query_str, (id,)).await;
            sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Gets the roles granted to user `id` in alphabetical order.
pub(crate) async fn get_user_roles(
    ex: &mut Executor,
    log: &PersistenceLog,
    id: UserId,
) -> DbResult<Vec<String>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role";
            log.sql(query_str, (id,)).await;
            let rows = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            rows.iter()
                .map(|row| row.try_get("role").map_err(postgres::map_sqlx_error))
                .collect()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT role FROM user_roles WHERE user_id = ? ORDER BY role";
            log.sql(query_str, (id,)).await;
            let rows = sqlx::query(query_str)
                .bind(id.as_i64())
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            rows.iter().map(|row| row.try_get("role").map_err(sqlite::map_sqlx_error)).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces the roles granted to user `id` with `roles`.
pub(crate) async fn set_user_roles(
    ex: &mut Executor,
    log: &PersistenceLog,
    id: UserId,
    roles: &[String],
) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM user_roles WHERE user_id = $1";
            log.sql(query_str, (id,)).await;
            sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;

            let query_str = "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)";
            for role in roles {
                log.sql(query_str, (id, role)).await;
                sqlx::query(query_str)
                    .bind(id.as_i64())
                    .bind(role)
                    .execute(ex.conn())
                    .await
                    .map_err(postgres::map_sqlx_error)?;
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM user_roles WHERE user_id = ?";
            log.sql(query_str, (id,)).await;
            sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;

            let query_str = "INSERT INTO user_roles (user_id, role) VALUES (?, ?)";
            for role in roles {
                log.sql(query_str, (id, role)).await;
                sqlx::query(query_str)
                    .bind(id.as_i64())
                    .bind(role)
                    .execute(ex.conn())
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(())
}

/// Looks for the user that holds a unique `value` in `column`.
async fn find_user_by(
    ex: &mut Executor,
    log: &PersistenceLog,
    column: &'static str,
    value: &str,
) -> DbResult<Option<UserId>> {
    let id: Option<i64> = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = format!("SELECT id FROM users WHERE {} = $1", column);
            log.sql(&query_str, (value,)).await;
            let row = sqlx::query(&query_str)
                .bind(value)
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("id").map_err(postgres::map_sqlx_error)?),
                None => None,
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = format!("SELECT id FROM users WHERE {} = ?", column);
            log.sql(&query_str, (value,)).await;
            let row = sqlx::query(&query_str)
                .bind(value)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match row {
                Some(row) => Some(row.try_get("id").map_err(sqlite::map_sqlx_error)?),
                None => None,
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(id.map(UserId::new))
}

/// Gets the identifier of the user named `username`, if any.
pub(crate) async fn find_user_by_username(
    ex: &mut Executor,
    log: &PersistenceLog,
    username: &Username,
) -> DbResult<Option<UserId>> {
    find_user_by(ex, log, "username", username.as_str()).await
}

/// Gets the identifier of the user that owns `email`, if any.
pub(crate) async fn find_user_by_email(
    ex: &mut Executor,
    log: &PersistenceLog,
    email: &EmailAddress,
) -> DbResult<Option<UserId>> {
    find_user_by(ex, log, "email", email.as_str()).await
}
