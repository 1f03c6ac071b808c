use crate::{
    ColumnDescriptor, Database, Driver, EntityDescriptor, Error, Result, SqlWriter,
    ER_BAD_FIELD_ERROR, ER_DUP_FIELDNAME, ER_NO_SUCH_TABLE, ER_TABLE_EXISTS_ERROR, execution_code,
    log_error, log_verbose,
};

/// Schema probes and repairs.
impl<D: Driver> Database<D> {
    /// Whether the table exists, tables seen once are not probed again.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        let known = self.known_tables.read().await.contains(table);
        if known {
            return Ok(true);
        }
        let mut sql = String::with_capacity(64);
        self.sql_writer()
            .write_table_probe(&mut sql, &self.config().database, table);
        match self.fetch(sql, Vec::new()).await {
            Ok(..) => {
                log_verbose!(self.config(), "Table `{}` exists", table);
                self.known_tables.write().await.insert(table.to_owned());
                Ok(true)
            }
            Err(e) if execution_code(&e) == Some(ER_NO_SUCH_TABLE) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn column_exists(&self, table: &str, column: &str) -> Result<bool> {
        let mut sql = String::with_capacity(64);
        self.sql_writer()
            .write_column_probe(&mut sql, &self.config().database, table, column);
        match self.fetch(sql, Vec::new()).await {
            Ok(..) => Ok(true),
            Err(e)
                if matches!(
                    execution_code(&e),
                    Some(ER_BAD_FIELD_ERROR | ER_NO_SUCH_TABLE)
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates the table of the entity from its scalar columns.
    ///
    /// The table is probed again once the repair lock is held, a table created meanwhile
    /// by someone else counts as success.
    pub async fn create_table(&self, descriptor: &EntityDescriptor) -> Result<()> {
        self.create_table_unlogged(descriptor)
            .await
            .inspect_err(|e| log_error!(self.config(), e))
    }

    /// Adds a missing column to the table of the entity.
    pub async fn add_column(
        &self,
        descriptor: &EntityDescriptor,
        column: &ColumnDescriptor,
    ) -> Result<()> {
        self.add_column_unlogged(descriptor, column)
            .await
            .inspect_err(|e| log_error!(self.config(), e))
    }

    /// Repair steps, faults are reported by the public operation that triggered them.
    pub(crate) async fn create_table_unlogged(&self, descriptor: &EntityDescriptor) -> Result<()> {
        let table = descriptor.table_name();
        let _repair = self.repair.lock().await;
        self.known_tables.write().await.remove(table);
        if self.table_exists(table).await? {
            log_verbose!(self.config(), "Table `{}` was already created", table);
            return Ok(());
        }
        let mut sql = String::with_capacity(256);
        self.sql_writer().write_create_table(&mut sql, descriptor);
        match self.execute(sql, Vec::new()).await {
            Ok(..) => log_verbose!(self.config(), "Created table `{}`", table),
            Err(e) if execution_code(&e) == Some(ER_TABLE_EXISTS_ERROR) => {
                log_verbose!(self.config(), "Table `{}` was already created", table)
            }
            Err(e) => return Err(e),
        }
        if !self.table_exists(table).await? {
            return Err(Error::msg(format!(
                "Table `{}` is still missing after creating it",
                table
            )));
        }
        Ok(())
    }

    pub(crate) async fn add_column_unlogged(
        &self,
        descriptor: &EntityDescriptor,
        column: &ColumnDescriptor,
    ) -> Result<()> {
        let table = descriptor.table_name();
        let _repair = self.repair.lock().await;
        if self.column_exists(table, column.name).await? {
            return Ok(());
        }
        let mut sql = String::with_capacity(128);
        self.sql_writer()
            .write_add_column(&mut sql, descriptor, column);
        match self.execute(sql, Vec::new()).await {
            Ok(..) => log_verbose!(
                self.config(),
                "Added column `{}` to `{}`",
                column.name,
                table
            ),
            Err(e) if execution_code(&e) == Some(ER_DUP_FIELDNAME) => {}
            Err(e) => return Err(e),
        }
        if !self.column_exists(table, column.name).await? {
            return Err(Error::msg(format!(
                "Column `{}` of `{}` is still missing after adding it",
                column.name, table
            )));
        }
        Ok(())
    }

    /// Drops the table of the entity if it exists.
    pub async fn drop_table(&self, descriptor: &EntityDescriptor) -> Result<()> {
        let result: Result<()> = async {
            let table = descriptor.table_name();
            let _repair = self.repair.lock().await;
            let mut sql = String::with_capacity(64);
            self.sql_writer().write_drop_table(&mut sql, descriptor);
            self.execute(sql, Vec::new()).await?;
            self.known_tables.write().await.remove(table);
            log_verbose!(self.config(), "Dropped table `{}`", table);
            Ok(())
        }
        .await;
        result.inspect_err(|e| log_error!(self.config(), e))
    }
}
