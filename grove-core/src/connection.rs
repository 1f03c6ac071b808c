use crate::{Result, RowLabeled, RowsAffected, Value, stream::Stream};
use std::future::Future;

/// A single open session with the server.
///
/// Statements use `@paramN` placeholders, `params[N - 1]` is bound to each of them.
pub trait Connection: Send + Sized {
    /// Runs a statement and streams the rows it returns.
    fn fetch(
        &mut self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + '_;

    /// Runs a statement that returns no rows.
    fn execute(
        &mut self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Closes the session gracefully.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
