use crate::{Configuration, Connection, Result, SqlWriter};
use std::future::Future;

/// Database backend: a dialect plus a way to open connections.
pub trait Driver: Send + Sync + 'static {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    /// Name of the backend, it is also the scheme of its connection urls.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;

    /// Opens a new connection, one is opened for every statement.
    fn connect(
        &self,
        config: &Configuration,
    ) -> impl Future<Output = Result<Self::Connection>> + Send;
}
