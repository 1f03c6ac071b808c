use crate::{MySQLConnection, MySQLSqlWriter};
use grove_core::{Configuration, Context, Driver, Result};
use mysql_async::{Conn, Opts};
use url::Url;

#[derive(Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }

    /// Connection url understood by the client library, credentials are percent encoded.
    pub fn connection_url(config: &Configuration) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}:{}", Self::NAME, config.host, config.port))
            .with_context(|| format!("Invalid MySQL host `{}`", config.host))?;
        let _ = url.set_username(&config.user);
        if !config.password.is_empty() {
            let _ = url.set_password(Some(&config.password));
        }
        url.set_path(&config.database);
        {
            let mut query = url.query_pairs_mut();
            if config.compression {
                query.append_pair("compression", "fast");
            }
            if config.tls {
                query.append_pair("require_ssl", "true");
            }
            query.append_pair(
                "tcp_keepalive",
                &config.keep_alive.as_millis().to_string(),
            );
        }
        Ok(url)
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }

    async fn connect(&self, config: &Configuration) -> Result<MySQLConnection> {
        let url = Self::connection_url(config)?;
        let opts = Opts::from_url(url.as_str()).context("Invalid MySQL connection options")?;
        let connection = Conn::new(opts).await.map_err(crate::classify)?;
        Ok(MySQLConnection { connection })
    }
}
