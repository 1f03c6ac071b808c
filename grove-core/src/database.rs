use crate::{
    Aggregate, Comparator, Configuration, Connection, Context, Driver, Entity, EntityDescriptor,
    ExecutionError, Limiter, Record, Relation, Result, RowLabeled, RowsAffected, Select, SqlWriter,
    Value, decode, encode, find_primary_column, is_selected, log_error, log_verbose,
    stream::TryStreamExt, truncate_long,
};
use std::collections::HashSet;
use tokio::sync::{Mutex, RwLock};

/// Entry point of every operation: driver, configuration and the schema state learned so far.
///
/// Every statement runs on its own connection, opened before and closed right after it.
pub struct Database<D: Driver> {
    driver: D,
    config: Configuration,
    pub(crate) known_tables: RwLock<HashSet<String>>,
    pub(crate) repair: Mutex<()>,
}

impl<D: Driver> Database<D> {
    pub fn new(driver: D, config: Configuration) -> Self {
        Self {
            driver,
            config,
            known_tables: Default::default(),
            repair: Default::default(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub(crate) fn sql_writer(&self) -> D::SqlWriter {
        self.driver.sql_writer()
    }

    pub async fn connect(&self) -> Result<D::Connection> {
        self.driver.connect(&self.config).await.with_context(|| {
            format!(
                "While connecting to {}:{} as `{}`",
                self.config.host, self.config.port, self.config.user
            )
        })
    }

    /// Opens and closes a connection, reporting whether it worked.
    pub async fn test_connection(&self) -> bool {
        let result: Result<()> = async { self.connect().await?.disconnect().await }.await;
        match result {
            Ok(..) => true,
            Err(e) => {
                log_error!(self.config, e);
                false
            }
        }
    }

    /// Runs a statement returning rows.
    pub async fn fetch(&self, sql: String, params: Vec<Value>) -> Result<Vec<RowLabeled>> {
        log_verbose!(self.config, "{}", truncate_long!(sql));
        let context = format!("While running the query:\n{}", truncate_long!(sql));
        let mut connection = self.connect().await?;
        let rows = connection
            .fetch(sql, params)
            .try_collect::<Vec<_>>()
            .await
            .context(context)?;
        self.disconnect(connection).await;
        Ok(rows)
    }

    /// Runs a statement returning no rows.
    pub async fn execute(&self, sql: String, params: Vec<Value>) -> Result<RowsAffected> {
        log_verbose!(self.config, "{}", truncate_long!(sql));
        let context = format!("While executing the query:\n{}", truncate_long!(sql));
        let mut connection = self.connect().await?;
        let result = connection.execute(sql, params).await.context(context)?;
        self.disconnect(connection).await;
        Ok(result)
    }

    async fn disconnect(&self, connection: D::Connection) {
        if let Err(e) = connection.disconnect().await {
            log_error!(self.config, e.context("While closing the connection"));
        }
    }

    /// Selects and decodes entities, then resolves their relations.
    ///
    /// A table that does not exist yet is created and the result is empty.
    pub async fn select<E: Entity>(&self, select: &Select<'_>) -> Result<Vec<E>> {
        self.select_unlogged(select)
            .await
            .inspect_err(|e| log_error!(self.config, e))
    }

    async fn select_unlogged<E: Entity>(&self, select: &Select<'_>) -> Result<Vec<E>> {
        let descriptor = E::descriptor()?;
        let mut sql = String::with_capacity(128);
        self.sql_writer()
            .write_select(&mut sql, &self.config.database, descriptor, select)?;
        if !self.ensure_table(descriptor).await? {
            return Ok(Vec::new());
        }
        let rows = self.fetch(sql, select.values.clone()).await?;
        let columns = select.projection.columns();
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let mut entity = decode::<E>(columns, &row)?;
            entity.resolve_related(self, columns).await?;
            result.push(entity);
        }
        Ok(result)
    }

    /// Runs a count or a sum, NULL when there is nothing to aggregate.
    pub async fn aggregate<E: Entity>(&self, aggregate: &Aggregate<'_>) -> Result<Value> {
        let result: Result<Value> = async {
            let descriptor = E::descriptor()?;
            let mut sql = String::with_capacity(128);
            self.sql_writer()
                .write_aggregate(&mut sql, &self.config.database, descriptor, aggregate)?;
            if !self.ensure_table(descriptor).await? {
                return Ok(Value::Null);
            }
            let rows = self.fetch(sql, aggregate.values.clone()).await?;
            Ok(rows
                .into_iter()
                .next()
                .and_then(RowLabeled::into_first)
                .unwrap_or_default())
        }
        .await;
        result.inspect_err(|e| log_error!(self.config, e))
    }

    /// Fetches the entities of a relation field, filtered by the parent's primary value.
    ///
    /// Called by the derived [`Entity::resolve_related`] for every relation field.
    pub async fn resolve_relation<R: Relation>(
        &self,
        relation: &mut R,
        field: &str,
        foreign_key: &str,
        parent: &Value,
        columns: Option<&[&str]>,
    ) -> Result<()> {
        if !is_selected(columns, field) {
            return Ok(());
        }
        if parent.is_null() {
            log_verbose!(
                self.config,
                "Relation `{}` not resolved, the parent has no primary value",
                field
            );
            return Ok(());
        }
        let fields = [foreign_key];
        let select = Select::new()
            .filter(&fields, vec![parent.clone()], Comparator::Equal)
            .limit(R::SINGLE.then(|| Limiter::new(1)));
        let entities = self.select_unlogged::<R::Target>(&select).await?;
        if entities.is_empty() {
            log_verbose!(
                self.config,
                "No rows for relation `{}` where `{}` = {}",
                field,
                foreign_key,
                parent
            );
            return Ok(());
        }
        relation.attach(entities);
        Ok(())
    }

    /// Inserts the entity and its embedded entities, writing generated keys back.
    pub async fn insert<E: Entity>(&self, entity: &mut E) -> Result<()> {
        let result: Result<()> = async {
            let mut records = encode(entity)?;
            for index in 0..records.len() {
                self.insert_at(&mut records, index).await?;
            }
            entity.absorb(&mut records.iter())
        }
        .await;
        result.inspect_err(|e| log_error!(self.config, e))
    }

    /// Updates the rows of the entity and its embedded entities.
    ///
    /// With `field` only the first record having a matching field is written, and only that
    /// column. Records without primary value are inserted instead.
    pub async fn update<E: Entity>(&self, entity: &mut E, field: Option<&str>) -> Result<()> {
        let result: Result<()> = async {
            let mut records = encode(entity)?;
            for index in 0..records.len() {
                if let Some(field) = field {
                    if records[index].matching_field(field).is_none() {
                        continue;
                    }
                }
                find_primary_column(records[index].descriptor())?;
                if records[index].primary_value().is_null() {
                    log_verbose!(
                        self.config,
                        "Record of `{}` has no primary value, inserting it",
                        records[index].table()
                    );
                    self.insert_at(&mut records, index).await?;
                } else {
                    self.update_record(&mut records[index], field).await?;
                }
                if field.is_some() {
                    break;
                }
            }
            entity.absorb(&mut records.iter())
        }
        .await;
        result.inspect_err(|e| log_error!(self.config, e))
    }

    /// Deletes the rows of the entity and of its embedded entities having a primary value.
    pub async fn delete<E: Entity>(&self, entity: &E) -> Result<()> {
        let result: Result<()> = async {
            for record in encode(entity)? {
                if record.primary_value().is_null() {
                    log_verbose!(
                        self.config,
                        "Record of `{}` has no primary value, it cannot be deleted",
                        record.table()
                    );
                    continue;
                }
                let mut sql = String::with_capacity(64);
                self.sql_writer()
                    .write_delete(&mut sql, &self.config.database, &record)?;
                self.execute(sql, Vec::new()).await?;
            }
            Ok(())
        }
        .await;
        result.inspect_err(|e| log_error!(self.config, e))
    }

    /// Inserts `records[index]` after giving it the primary value of its parent, if missing.
    async fn insert_at(&self, records: &mut [Record], index: usize) -> Result<()> {
        if let Some(link) = records[index].link {
            let parent = records[link.parent].primary_value();
            let missing = records[index]
                .item(link.foreign_key)
                .is_some_and(|v| v.value.is_null());
            if missing && !parent.is_null() {
                records[index].set_value(link.foreign_key, parent);
            }
        }
        let record = &mut records[index];
        let absent = record.primary_value().is_null();
        let mut sql = String::with_capacity(128);
        self.sql_writer()
            .write_insert(&mut sql, &self.config.database, record);
        let params = record
            .insert_items()
            .map(|v| v.value.clone())
            .collect::<Vec<_>>();
        record.command = Some(sql.clone());
        let affected = self.execute_healing(record, sql, params, false).await?;
        if absent && affected.rows_affected > 0 {
            if let Some(id) = affected.last_affected_id.filter(|v| *v > 0) {
                record.set_primary(Value::Int64(Some(id)));
            }
        }
        Ok(())
    }

    async fn update_record(&self, record: &mut Record, field: Option<&str>) -> Result<()> {
        let mut sql = String::with_capacity(128);
        self.sql_writer()
            .write_update(&mut sql, &self.config.database, record, field)?;
        let params = match field {
            None => record.items.iter().map(|v| v.value.clone()).collect(),
            Some(field) => record
                .matching_field(field)
                .map(|v| v.value.clone())
                .into_iter()
                .collect(),
        };
        record.command = Some(sql.clone());
        self.execute_healing(record, sql, params, true).await?;
        Ok(())
    }

    /// Executes the statement of a record, repairing the schema at most once.
    ///
    /// A missing table is created. With `add_columns`, a missing column is added.
    async fn execute_healing(
        &self,
        record: &Record,
        sql: String,
        params: Vec<Value>,
        add_columns: bool,
    ) -> Result<RowsAffected> {
        let descriptor = record.descriptor();
        let mut repaired = false;
        loop {
            let error = match self.execute(sql.clone(), params.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };
            if repaired {
                return Err(error);
            }
            let Some(code) = error.downcast_ref::<ExecutionError>().map(|e| e.code) else {
                return Err(error);
            };
            let missing = error.downcast_ref::<ExecutionError>().and_then(|e| {
                e.unknown_column(descriptor.scalar_columns().map(|v| v.name))
            });
            match (code, missing) {
                (crate::ER_NO_SUCH_TABLE, ..) => {
                    log_verbose!(
                        self.config,
                        "Table `{}` is missing, creating it",
                        descriptor.table_name()
                    );
                    self.create_table_unlogged(descriptor).await?;
                }
                (crate::ER_BAD_FIELD_ERROR, Some(column)) if add_columns => {
                    let Some(column) = descriptor.column(column) else {
                        return Err(error);
                    };
                    log_verbose!(
                        self.config,
                        "Column `{}` of `{}` is missing, adding it",
                        column.name,
                        descriptor.table_name()
                    );
                    self.add_column_unlogged(descriptor, column).await?;
                }
                _ => return Err(error),
            }
            repaired = true;
        }
    }

    /// True if the table exists, otherwise it is created and false is returned.
    pub(crate) async fn ensure_table(&self, descriptor: &EntityDescriptor) -> Result<bool> {
        if self.table_exists(descriptor.table_name()).await? {
            return Ok(true);
        }
        log_verbose!(
            self.config,
            "Table `{}` does not exist, creating it",
            descriptor.table_name()
        );
        self.create_table_unlogged(descriptor).await?;
        Ok(false)
    }
}
