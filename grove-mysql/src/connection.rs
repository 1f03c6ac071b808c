use crate::{RowWrap, ValueWrap, bind_positional};
use async_stream::try_stream;
use grove_core::{
    Connection, Error, ExecutionError, Result, RowLabeled, RowsAffected, Value,
    stream::{Stream, StreamExt},
};
use mysql_async::{Conn, Params, prelude::Queryable};

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

/// Server faults keep their code so that the caller can repair the schema.
pub(crate) fn classify(error: mysql_async::Error) -> Error {
    match error {
        mysql_async::Error::Server(e) => ExecutionError::new(e.code, e.message).into(),
        e => e.into(),
    }
}

fn positional(sql: &str, params: Vec<Value>) -> Result<(String, Params)> {
    let (sql, params) = bind_positional(sql, params)?;
    let params = if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(
            params
                .into_iter()
                .map(|v| ValueWrap(v).try_into())
                .collect::<Result<_>>()?,
        )
    };
    Ok((sql, params))
}

impl Connection for MySQLConnection {
    fn fetch(
        &mut self,
        sql: String,
        params: Vec<Value>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send + '_ {
        try_stream! {
            let (sql, params) = positional(&sql, params)?;
            let mut stream = self
                .connection
                .exec_stream::<RowWrap, _, _>(sql, params)
                .await
                .map_err(classify)?;
            while let Some(row) = stream.next().await {
                yield row.map_err(classify)?.0;
            }
        }
    }

    async fn execute(&mut self, sql: String, params: Vec<Value>) -> Result<RowsAffected> {
        let (sql, params) = positional(&sql, params)?;
        self.connection
            .exec_drop(sql, params)
            .await
            .map_err(classify)?;
        Ok(RowsAffected {
            rows_affected: self.connection.affected_rows(),
            last_affected_id: self
                .connection
                .last_insert_id()
                .and_then(|v| i64::try_from(v).ok()),
        })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection.disconnect().await.map_err(classify)
    }
}
