use crate::{
    Aggregate, ArgumentError, ColumnDescriptor, Comparator, Database, Driver, Event, Limiter,
    NotFoundError, Record, Result, RowLabeled, SchemaError, Select, SelectEvent, Value,
    decode_value, future::BoxFuture, log_error,
};
use std::future::Future;

/// Table level metadata of an entity type, built once by the derive macro.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Name of the Rust type.
    pub entity: &'static str,
    /// Declared table, `None` when the type lacks `#[table_name]`.
    pub table: Option<&'static str>,
    /// Every mapped field in declaration order, relations included.
    pub columns: Box<[ColumnDescriptor]>,
}

impl EntityDescriptor {
    /// Returns the descriptor only if it declares a table.
    pub fn checked(&'static self) -> Result<&'static Self> {
        if self.table.is_none() {
            return Err(SchemaError::MissingTableDeclaration {
                entity: self.entity,
            }
            .into());
        }
        Ok(self)
    }

    pub fn table_name(&self) -> &'static str {
        self.table.unwrap_or_default()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|v| v.name == name)
    }

    pub fn scalar_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> + Clone {
        self.columns.iter().filter(|v| !v.is_relation())
    }

    pub fn relations(&self) -> impl Iterator<Item = &ColumnDescriptor> + Clone {
        self.columns.iter().filter(|v| v.is_relation())
    }

    pub fn primary(&self) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|v| v.primary)
    }

    /// First scalar column whose field name contains `fragment`.
    pub fn find_field(&self, fragment: &str) -> Option<&ColumnDescriptor> {
        self.scalar_columns().find(|v| v.field.contains(fragment))
    }

    /// The scalar column called `name`, anything else is rejected.
    ///
    /// Every identifier that ends up interpolated in a statement goes through here.
    pub fn require_column(&self, name: &str) -> Result<&ColumnDescriptor> {
        match self.column(name) {
            Some(column) if !column.is_relation() => Ok(column),
            Some(..) => Err(ArgumentError::new(format!(
                "`{}` is a relation of `{}`, not a column",
                name, self.entity
            ))
            .into()),
            None => Err(ArgumentError::new(format!(
                "Table `{}` does not declare a column `{}`",
                self.table_name(),
                name
            ))
            .into()),
        }
    }
}

/// A type mapped to a table.
///
/// The required methods are generated by `#[derive(Entity)]`, the provided ones form the
/// query surface: static selects and aggregates, and the instance operations `sync`,
/// `insert`, `update`, `update_field`, `delete`.
pub trait Entity: Send + Sync + Sized + 'static {
    /// Descriptor of the type, fails when the type does not declare a table.
    fn descriptor() -> Result<&'static EntityDescriptor>;

    /// Values of the scalar columns, in declaration order.
    fn row(&self) -> Vec<Value>;

    /// Value of the primary column, `Value::Null` when there is no primary or it is unset.
    fn primary_value(&self) -> Value;

    /// Assigns a stored value to the field mapped to `column`.
    fn set_column(&mut self, column: &str, value: Value) -> Result<()>;

    /// Builds the entity from a row, reading only `columns` when given.
    ///
    /// Relation fields are left at their default, see [`Entity::resolve_related`].
    fn from_row(row: &RowLabeled, columns: Option<&[&str]>) -> Result<Self>;

    /// Appends the records of every embedded entity, `parent` is the index of this
    /// entity's own record.
    fn encode_related(&self, parent: usize, out: &mut Vec<Record>) -> Result<()>;

    /// Takes back the generated keys from the records produced by [`crate::encode`],
    /// consuming them in the same order.
    fn absorb<'r>(&mut self, records: &mut dyn Iterator<Item = &'r Record>) -> Result<()>;

    /// Fetches the embedded entities of every selected relation field.
    fn resolve_related<'a, D: Driver>(
        &'a mut self,
        database: &'a Database<D>,
        columns: Option<&'a [&'a str]>,
    ) -> BoxFuture<'a, Result<()>>;

    fn on_event(&self, _event: Event) {}

    fn on_select(_event: SelectEvent) {}

    fn create_table<D: Driver>(database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move { database.create_table(Self::descriptor()?).await }
    }

    fn drop_table<D: Driver>(database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move { database.drop_table(Self::descriptor()?).await }
    }

    fn select_all<D: Driver>(
        database: &Database<D>,
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        select_notified(database, Select::new().limit(limit))
    }

    fn select_fields<D: Driver>(
        database: &Database<D>,
        columns: &[&str],
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        select_notified(database, Select::new().columns(columns).limit(limit))
    }

    fn select_by_primary<D: Driver>(
        database: &Database<D>,
        primary: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let select = Select::new().by_primary(primary.into());
        async move { Ok(select_notified(database, select).await?.into_iter().next()) }
    }

    /// Like [`Entity::select_by_primary`] but a missing row is a [`NotFoundError`].
    fn require_by_primary<D: Driver>(
        database: &Database<D>,
        primary: impl Into<Value>,
    ) -> impl Future<Output = Result<Self>> + Send {
        let primary = primary.into();
        async move {
            let descriptor = Self::descriptor()?;
            let shown = primary.to_string();
            Self::select_by_primary(database, primary)
                .await?
                .ok_or_else(|| {
                    NotFoundError::Row {
                        table: descriptor.table_name(),
                        primary: shown,
                    }
                    .into()
                })
        }
    }

    fn select_fields_by_primary<D: Driver>(
        database: &Database<D>,
        columns: &[&str],
        primary: impl Into<Value>,
    ) -> impl Future<Output = Result<Option<Self>>> + Send {
        let select = Select::new().columns(columns).by_primary(primary.into());
        async move { Ok(select_notified(database, select).await?.into_iter().next()) }
    }

    fn select_where<D: Driver>(
        database: &Database<D>,
        fields: &[&str],
        values: Vec<Value>,
        comparator: Comparator,
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        select_notified(
            database,
            Select::new().filter(fields, values, comparator).limit(limit),
        )
    }

    fn select_fields_where<D: Driver>(
        database: &Database<D>,
        columns: &[&str],
        fields: &[&str],
        values: Vec<Value>,
        comparator: Comparator,
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        async move {
            let select = Select::new()
                .columns(columns)
                .filter(fields, values, comparator)
                .limit(limit);
            select_notified(database, select).await
        }
    }

    /// Rows where the first of `fields` is NULL.
    fn select_where_null<D: Driver>(
        database: &Database<D>,
        fields: &[&str],
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        select_notified(database, Select::new().filter_null(fields).limit(limit))
    }

    fn select_fields_where_null<D: Driver>(
        database: &Database<D>,
        columns: &[&str],
        fields: &[&str],
        limit: Option<Limiter>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        async move {
            let select = Select::new()
                .columns(columns)
                .filter_null(fields)
                .limit(limit);
            select_notified(database, select).await
        }
    }

    fn count_all<D: Driver>(database: &Database<D>) -> impl Future<Output = Result<i64>> + Send {
        count::<Self, D>(database, Aggregate::count(None))
    }

    fn count_field<D: Driver>(
        database: &Database<D>,
        column: &str,
    ) -> impl Future<Output = Result<i64>> + Send {
        count::<Self, D>(database, Aggregate::count(Some(column)))
    }

    fn count_where<D: Driver>(
        database: &Database<D>,
        fields: &[&str],
        values: Vec<Value>,
        comparator: Comparator,
    ) -> impl Future<Output = Result<i64>> + Send {
        count::<Self, D>(
            database,
            Aggregate::count(None).filter(fields, values, comparator),
        )
    }

    fn count_field_where<D: Driver>(
        database: &Database<D>,
        column: &str,
        fields: &[&str],
        values: Vec<Value>,
        comparator: Comparator,
    ) -> impl Future<Output = Result<i64>> + Send {
        async move {
            let aggregate = Aggregate::count(Some(column)).filter(fields, values, comparator);
            count::<Self, D>(database, aggregate).await
        }
    }

    fn count_field_where_null<D: Driver>(
        database: &Database<D>,
        column: &str,
        fields: &[&str],
    ) -> impl Future<Output = Result<i64>> + Send {
        async move {
            count::<Self, D>(database, Aggregate::count(Some(column)).filter_null(fields)).await
        }
    }

    fn sum_field<D: Driver>(
        database: &Database<D>,
        column: &str,
    ) -> impl Future<Output = Result<f64>> + Send {
        sum::<Self, D>(database, Aggregate::sum(column))
    }

    fn sum_field_where<D: Driver>(
        database: &Database<D>,
        column: &str,
        fields: &[&str],
        values: Vec<Value>,
        comparator: Comparator,
    ) -> impl Future<Output = Result<f64>> + Send {
        async move {
            let aggregate = Aggregate::sum(column).filter(fields, values, comparator);
            sum::<Self, D>(database, aggregate).await
        }
    }

    fn sum_field_where_null<D: Driver>(
        database: &Database<D>,
        column: &str,
        fields: &[&str],
    ) -> impl Future<Output = Result<f64>> + Send {
        async move {
            sum::<Self, D>(database, Aggregate::sum(column).filter_null(fields)).await
        }
    }

    /// Inserts the entity when its primary is unset, updates it otherwise.
    fn sync<D: Driver>(&mut self, database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.on_event(Event::Syncing);
            if self.primary_value().is_null() {
                self.insert(database).await?;
            } else {
                self.update(database).await?;
            }
            self.on_event(Event::Synced);
            Ok(())
        }
    }

    fn insert<D: Driver>(&mut self, database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.on_event(Event::Inserting);
            database.insert(self).await?;
            self.on_event(Event::Inserted);
            Ok(())
        }
    }

    fn update<D: Driver>(&mut self, database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.on_event(Event::Updating);
            database.update(self, None).await?;
            self.on_event(Event::Updated);
            Ok(())
        }
    }

    /// Updates only the column whose field name contains `field`.
    fn update_field<D: Driver>(
        &mut self,
        database: &Database<D>,
        field: &str,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            let descriptor = Self::descriptor()?;
            if descriptor.find_field(field).is_none() {
                let error = ArgumentError::new(format!(
                    "Type `{}` has no field matching `{}`",
                    descriptor.entity, field
                ));
                log_error!(database.config(), error);
                return Err(error.into());
            }
            self.on_event(Event::Updating);
            database.update(self, Some(field)).await?;
            self.on_event(Event::Updated);
            Ok(())
        }
    }

    /// Deletes the row of the entity, an entity without primary value is left alone.
    fn delete<D: Driver>(&self, database: &Database<D>) -> impl Future<Output = Result<()>> + Send {
        async move {
            self.on_event(Event::Dropping);
            if self.primary_value().is_null() {
                log_error!(
                    database.config(),
                    format!(
                        "Cannot delete an instance of `{}` without primary value",
                        std::any::type_name::<Self>()
                    )
                );
                return Ok(());
            }
            database.delete(self).await?;
            self.on_event(Event::Dropped);
            Ok(())
        }
    }
}

async fn select_notified<E: Entity, D: Driver>(
    database: &Database<D>,
    select: Select<'_>,
) -> Result<Vec<E>> {
    E::on_select(SelectEvent::Selecting);
    let result = database.select::<E>(&select).await?;
    E::on_select(SelectEvent::Selected);
    Ok(result)
}

async fn count<E: Entity, D: Driver>(database: &Database<D>, aggregate: Aggregate<'_>) -> Result<i64> {
    decode_value(database.aggregate::<E>(&aggregate).await?)
}

async fn sum<E: Entity, D: Driver>(database: &Database<D>, aggregate: Aggregate<'_>) -> Result<f64> {
    decode_value(database.aggregate::<E>(&aggregate).await?)
}
