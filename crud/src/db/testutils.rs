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

//! Test adapter backed by SQLite to exercise the generic layer.

use crate::db::{PersistenceAdapter, PersistenceLog};
use crate::model::{LogLevel, UniqueViolations};
use async_trait::async_trait;
use restkit_core::db::sqlite::{self, SqliteExecutor};
use restkit_core::db::{DbError, DbResult, Executor};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Schema of the test database.
const SCHEMA: &str = "
    CREATE TABLE widgets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        serial TEXT NOT NULL UNIQUE,
        color TEXT
    );

    CREATE TABLE widget_tags (
        widget_id INTEGER NOT NULL REFERENCES widgets (id),
        tag TEXT NOT NULL,
        PRIMARY KEY (widget_id, tag)
    );
";

/// Client representation of a widget.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub(crate) struct Widget {
    /// Identifier assigned by the database, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<i64>,

    /// Unique name of the widget.
    pub(crate) name: String,

    /// Unique serial number of the widget.
    pub(crate) serial: String,

    /// Optional color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) color: Option<String>,

    /// Tags attached to the widget.  Only present when relationships are loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) tags: Option<Vec<String>>,
}

impl Widget {
    /// Creates a widget without an identifier.
    pub(crate) fn new(name: &str, serial: &str) -> Self {
        Self { name: name.to_owned(), serial: serial.to_owned(), ..Default::default() }
    }

    /// Sets the identifier of the widget.
    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the tags of the widget.
    pub(crate) fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| (*t).to_owned()).collect());
        self
    }
}

/// Database representation of a widget.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WidgetEntity {
    /// Primary key, or none if the entity has not been stored yet.
    pub(crate) id: Option<i64>,

    /// Value of the `name` column.
    pub(crate) name: String,

    /// Value of the `serial` column.
    pub(crate) serial: String,

    /// Value of the `color` column.
    pub(crate) color: Option<String>,

    /// Tags stored in `widget_tags`, sorted.
    pub(crate) tags: Vec<String>,
}

/// Extracts the SQLite executor from a generic executor.
fn sqlite_ex(ex: &mut Executor) -> &mut SqliteExecutor {
    match ex {
        Executor::Sqlite(ex) => ex,

        #[allow(unused)]
        _ => unreachable!("Widgets are only supported on SQLite"),
    }
}

/// Adapter for widgets.
pub(crate) struct WidgetsAdapter {
    /// Destination of the SQL statements and events.
    log: PersistenceLog,
}

impl WidgetsAdapter {
    /// Creates a new adapter that reports to `log`.
    pub(crate) fn new(log: PersistenceLog) -> Self {
        Self { log }
    }

    /// Initializes the database schema.
    pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
        sqlite::run_schema(sqlite_ex(ex), SCHEMA).await
    }

    /// Stores the `tags` of widget `id`, replacing any previous ones.
    async fn put_tags(&self, ex: &mut SqliteExecutor, id: i64, tags: &[String]) -> DbResult<()> {
        let query_str = "DELETE FROM widget_tags WHERE widget_id = ?";
        self.log.sql(query_str, (id,)).await;
        sqlx::query(query_str).bind(id).execute(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;

        let query_str = "INSERT INTO widget_tags (widget_id, tag) VALUES (?, ?)";
        for tag in tags {
            self.log.sql(query_str, (id, tag)).await;
            sqlx::query(query_str)
                .bind(id)
                .bind(tag)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceAdapter for WidgetsAdapter {
    type Object = Widget;
    type Entity = WidgetEntity;
    type Key = i64;

    fn to_entity(&self, object: &Widget) -> WidgetEntity {
        WidgetEntity {
            id: object.id,
            name: object.name.clone(),
            serial: object.serial.clone(),
            color: object.color.clone(),
            tags: object.tags.clone().unwrap_or_default(),
        }
    }

    fn merge(&self, object: Widget, entity: &mut WidgetEntity) {
        entity.name = object.name;
        entity.serial = object.serial;
        entity.color = object.color;
        if let Some(tags) = object.tags {
            entity.tags = tags;
        }
    }

    async fn to_object(
        &self,
        _ex: &mut Executor,
        entity: WidgetEntity,
        with_relationships: bool,
    ) -> DbResult<Widget> {
        Ok(Widget {
            id: entity.id,
            name: entity.name,
            serial: entity.serial,
            color: entity.color,
            tags: if with_relationships { Some(entity.tags) } else { None },
        })
    }

    fn primary_key(&self, entity: &WidgetEntity) -> Option<i64> {
        entity.id
    }

    fn parse_key(&self, raw: &str) -> Option<i64> {
        raw.parse::<i64>().ok()
    }

    async fn create(&self, ex: &mut Executor, entity: WidgetEntity) -> DbResult<i64> {
        let ex = sqlite_ex(ex);

        let query_str = "INSERT INTO widgets (name, serial, color) VALUES (?, ?, ?)";
        self.log.sql(query_str, (&entity.name, &entity.serial, &entity.color)).await;
        let done = sqlx::query(query_str)
            .bind(&entity.name)
            .bind(&entity.serial)
            .bind(&entity.color)
            .execute(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        let id = done.last_insert_rowid();

        self.put_tags(ex, id, &entity.tags).await?;
        self.log.event(LogLevel::Fine, &format!("Inserted widget {}", id)).await;
        Ok(id)
    }

    async fn find(&self, ex: &mut Executor, key: &i64) -> DbResult<Option<WidgetEntity>> {
        let ex = sqlite_ex(ex);

        let query_str = "SELECT id, name, serial, color FROM widgets WHERE id = ?";
        self.log.sql(query_str, (key,)).await;
        let row = sqlx::query(query_str)
            .bind(key)
            .fetch_optional(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let query_str = "SELECT tag FROM widget_tags WHERE widget_id = ? ORDER BY tag";
        self.log.sql(query_str, (key,)).await;
        let tag_rows = sqlx::query(query_str)
            .bind(key)
            .fetch_all(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        let mut tags = Vec::with_capacity(tag_rows.len());
        for tag_row in tag_rows {
            tags.push(tag_row.try_get("tag").map_err(sqlite::map_sqlx_error)?);
        }

        Ok(Some(WidgetEntity {
            id: Some(row.try_get("id").map_err(sqlite::map_sqlx_error)?),
            name: row.try_get("name").map_err(sqlite::map_sqlx_error)?,
            serial: row.try_get("serial").map_err(sqlite::map_sqlx_error)?,
            color: row.try_get("color").map_err(sqlite::map_sqlx_error)?,
            tags,
        }))
    }

    async fn find_all(&self, ex: &mut Executor) -> DbResult<Vec<WidgetEntity>> {
        let ex = sqlite_ex(ex);

        let query_str = "SELECT id, name, serial, color FROM widgets ORDER BY id";
        self.log.sql(query_str, ()).await;
        let rows =
            sqlx::query(query_str).fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;

        let mut entities = Vec::with_capacity(rows.len());
        for row in rows {
            entities.push(WidgetEntity {
                id: Some(row.try_get("id").map_err(sqlite::map_sqlx_error)?),
                name: row.try_get("name").map_err(sqlite::map_sqlx_error)?,
                serial: row.try_get("serial").map_err(sqlite::map_sqlx_error)?,
                color: row.try_get("color").map_err(sqlite::map_sqlx_error)?,
                tags: vec![],
            });
        }
        Ok(entities)
    }

    async fn update(&self, ex: &mut Executor, entity: &WidgetEntity) -> DbResult<()> {
        let ex = sqlite_ex(ex);
        let id = entity.id.ok_or(DbError::NotFound)?;

        let query_str = "UPDATE widgets SET name = ?, serial = ?, color = ? WHERE id = ?";
        self.log.sql(query_str, (&entity.name, &entity.serial, &entity.color, id)).await;
        let done = sqlx::query(query_str)
            .bind(&entity.name)
            .bind(&entity.serial)
            .bind(&entity.color)
            .bind(id)
            .execute(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        if done.rows_affected() != 1 {
            return Err(DbError::NotFound);
        }

        self.put_tags(ex, id, &entity.tags).await
    }

    async fn delete(&self, ex: &mut Executor, entity: WidgetEntity) -> DbResult<()> {
        let ex = sqlite_ex(ex);
        let id = entity.id.ok_or(DbError::NotFound)?;

        self.put_tags(ex, id, &[]).await?;

        let query_str = "DELETE FROM widgets WHERE id = ?";
        self.log.sql(query_str, (id,)).await;
        let done = sqlx::query(query_str)
            .bind(id)
            .execute(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        if done.rows_affected() != 1 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn reference(&self, ex: &mut Executor, key: &i64) -> DbResult<()> {
        let ex = sqlite_ex(ex);

        let query_str = "SELECT id FROM widgets WHERE id = ?";
        self.log.sql(query_str, (key,)).await;
        sqlx::query(query_str)
            .bind(key)
            .fetch_one(ex.conn())
            .await
            .map_err(sqlite::map_sqlx_error)?;
        Ok(())
    }

    async fn unique_violations(
        &self,
        ex: &mut Executor,
        object: &Widget,
        exclude: Option<&WidgetEntity>,
    ) -> DbResult<UniqueViolations> {
        let ex = sqlite_ex(ex);
        let exclude_id = exclude.and_then(|e| e.id);

        let mut violations = UniqueViolations::default();
        for (field, value) in [("name", &object.name), ("serial", &object.serial)] {
            let query_str = format!("SELECT id FROM widgets WHERE {} = ?", field);
            self.log.sql(&query_str, (value,)).await;
            let row = sqlx::query(&query_str)
                .bind(value)
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            if let Some(row) = row {
                let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
                if Some(id) != exclude_id {
                    violations.add(field, value);
                }
            }
        }
        Ok(violations)
    }
}
