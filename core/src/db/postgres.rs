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

//! PostgreSQL backend for the `Db` abstraction.

use crate::db::{Db, DbError, DbResult, Executor, TxExecutor};
use crate::env::{get_optional_var, get_required_var};
use async_trait::async_trait;
use derivative::Derivative;
use futures::Future;
use log::warn;
use sqlx::Transaction;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{
    PgConnectOptions, PgConnection, PgDatabaseError, PgPool, PgPoolOptions, Postgres,
};
use std::time::Duration;

/// Default number of times to retry acquiring a connection while the server is unavailable.
const DEFAULT_MAX_RETRIES: u16 = 60;

/// Maximum time to wait for a connection from the pool before considering the server unavailable.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Upper bound for the delay between two connection attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Converts a raw sqlx error `e` into our own error type.
pub fn map_sqlx_error(e: sqlx::Error) -> DbError {
    match e {
        sqlx::Error::ColumnDecode { source, .. } => DbError::DataIntegrityError(source.to_string()),
        sqlx::Error::Database(e) => match e.try_downcast_ref::<PgDatabaseError>() {
            Some(pg) => match pg.code() {
                "23503" => DbError::NotFound,
                "23505" => DbError::AlreadyExists,
                "53300" => DbError::Unavailable,
                code => DbError::BackendError(format!("PostgreSQL error {}: {}", code, pg)),
            },
            None => DbError::BackendError(e.to_string()),
        },
        sqlx::Error::PoolTimedOut => DbError::Unavailable,
        sqlx::Error::RowNotFound => DbError::NotFound,
        e => DbError::BackendError(e.to_string()),
    }
}

/// Connection settings for a PostgreSQL server.
#[derive(Derivative)]
#[derivative(Debug, Default)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct PostgresOptions {
    /// Host name of the server.
    pub host: String,

    /// Port of the server, typically 5432.
    pub port: u16,

    /// Name of the database to use.
    pub database: String,

    /// User to log in as.
    pub username: String,

    /// Password of `username`.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Lower bound of the connection pool size.
    pub min_connections: Option<u32>,

    /// Upper bound of the connection pool size.
    pub max_connections: Option<u32>,

    /// Number of times to retry acquiring a connection while the server is unavailable.
    pub max_retries: u16,
}

impl PostgresOptions {
    /// Reads the options from the `<prefix>_HOST`, `<prefix>_PORT`, `<prefix>_DATABASE`,
    /// `<prefix>_USERNAME` and `<prefix>_PASSWORD` environment variables, plus the optional
    /// `<prefix>_MIN_CONNECTIONS`, `<prefix>_MAX_CONNECTIONS` and `<prefix>_MAX_RETRIES`.
    pub fn from_env(prefix: &str) -> Result<PostgresOptions, String> {
        Ok(PostgresOptions {
            host: get_required_var::<String>(prefix, "HOST")?,
            port: get_required_var::<u16>(prefix, "PORT")?,
            database: get_required_var::<String>(prefix, "DATABASE")?,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            min_connections: get_optional_var::<u32>(prefix, "MIN_CONNECTIONS")?,
            max_connections: get_optional_var::<u32>(prefix, "MAX_CONNECTIONS")?,
            max_retries: get_optional_var::<u16>(prefix, "MAX_RETRIES")?
                .unwrap_or(DEFAULT_MAX_RETRIES),
        })
    }
}

/// Executor for PostgreSQL queries, backed either by a pooled connection or by a transaction.
#[derive(Debug)]
pub enum PostgresExecutor {
    /// Direct access to a pooled connection.  Every statement commits on its own.
    PoolExec(PoolConnection<Postgres>),

    /// Access to an open transaction.
    TxExec(Transaction<'static, Postgres>),
}

impl PostgresExecutor {
    /// Returns the connection to pass to `sqlx` queries.
    pub fn conn(&mut self) -> &mut PgConnection {
        match self {
            PostgresExecutor::PoolExec(conn) => &mut **conn,
            PostgresExecutor::TxExec(tx) => &mut **tx,
        }
    }

    /// Commits the transaction behind this executor.  Panics if there is none.
    pub(super) async fn commit(self) -> DbResult<()> {
        match self {
            PostgresExecutor::PoolExec(_) => {
                unreachable!("Pooled executors have nothing to commit")
            }
            PostgresExecutor::TxExec(tx) => tx.commit().await.map_err(map_sqlx_error),
        }
    }
}

/// Runs `op` until it succeeds, fails with an error other than `DbError::Unavailable`, or
/// `retries` attempts have been exhausted.  Attempts are spaced by a growing, jittered delay.
async fn retry<Op, OpFut, T>(op: Op, mut retries: u16) -> DbResult<T>
where
    Op: Fn() -> OpFut,
    OpFut: Future<Output = Result<T, sqlx::Error>>,
{
    let jitter = |max: u16| Duration::from_millis(u64::from(rand::random::<u16>() % max));

    let mut delay = Duration::from_millis(100) + jitter(900);
    loop {
        match op().await.map_err(map_sqlx_error) {
            Err(DbError::Unavailable) if retries > 0 => {
                retries -= 1;
                warn!(
                    "PostgreSQL unavailable; retrying in {}ms ({} attempts left)",
                    delay.as_millis(),
                    retries
                );
                tokio::time::sleep(delay).await;
                if delay < MAX_RETRY_DELAY {
                    delay += jitter(1000);
                }
            }
            result => return result,
        }
    }
}

/// Database backed by a PostgreSQL connection pool.
pub struct PostgresDb {
    /// Pool shared by all executors handed out by this database.
    pool: PgPool,

    /// Number of times to retry acquiring a connection while the server is unavailable.
    max_retries: u16,
}

impl PostgresDb {
    /// Sets up a lazy connection pool configured by `opts`.  No connections are opened until the
    /// first executor is requested.
    pub fn connect(opts: PostgresOptions) -> DbResult<Self> {
        let mut pool_options = PgPoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
        if let Some(n) = opts.min_connections {
            pool_options = pool_options.min_connections(n);
        }
        if let Some(n) = opts.max_connections {
            pool_options = pool_options.max_connections(n);
        }

        let connect_options = PgConnectOptions::new()
            .host(&opts.host)
            .port(opts.port)
            .database(&opts.database)
            .username(&opts.username)
            .password(&opts.password);

        let pool = pool_options.connect_lazy_with(connect_options);
        Ok(Self { pool, max_retries: opts.max_retries })
    }

    /// Returns a pooled executor of the concrete PostgreSQL type.
    pub async fn typed_ex(&self) -> DbResult<PostgresExecutor> {
        let conn = retry(|| self.pool.acquire(), self.max_retries).await?;
        Ok(PostgresExecutor::PoolExec(conn))
    }
}

impl Drop for PostgresDb {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            warn!("PostgreSQL pool dropped without calling close()");
        }
    }
}

#[async_trait]
impl Db for PostgresDb {
    async fn ex(&self) -> DbResult<Executor> {
        Ok(Executor::Postgres(self.typed_ex().await?))
    }

    async fn begin(&self) -> DbResult<TxExecutor> {
        let tx = retry(|| self.pool.begin(), self.max_retries).await?;
        Ok(TxExecutor(Executor::Postgres(PostgresExecutor::TxExec(tx))))
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Runs all statements in `schema` on `ex`, one at a time.
///
/// Statements are split on semicolons once `--` comments are removed, so the schema must not
/// contain semicolons in literals.
pub async fn run_schema(ex: &mut PostgresExecutor, schema: &str) -> DbResult<()> {
    let comments = regex::RegexBuilder::new("--.*$")
        .multi_line(true)
        .build()
        .map_err(|e| DbError::BackendError(e.to_string()))?;
    let schema = comments.replace_all(schema, "");

    for query_str in schema.split(';').filter(|q| !q.trim().is_empty()) {
        sqlx::query(query_str).execute(ex.conn()).await.map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// Test utilities for the PostgreSQL backend.
#[cfg(any(feature = "testutils", test))]
pub mod testutils {
    use super::*;

    /// Connects to the database configured by the `PGSQL_TEST_*` variables.  Panics on failure.
    ///
    /// The pool is limited to one connection whose search path points at `pg_temp`, so all
    /// tables created by a test vanish when the test disconnects.
    pub async fn setup() -> PostgresDb {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let mut opts = PostgresOptions::from_env("PGSQL_TEST").unwrap();
        opts.min_connections = Some(1);
        opts.max_connections = Some(1);
        let db = PostgresDb::connect(opts).unwrap();

        let mut ex = db.typed_ex().await.unwrap();
        sqlx::query("SET search_path TO pg_temp").execute(ex.conn()).await.unwrap();

        db
    }
}
