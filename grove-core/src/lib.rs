mod as_value;
mod column;
mod config;
mod connection;
mod converter;
mod database;
mod driver;
mod entity;
mod error;
mod lifecycle;
mod migration;
mod query;
mod record;
mod relations;
mod row;
mod sql_writer;
mod time_span;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use config::*;
pub use connection::*;
pub use converter::*;
pub use database::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use lifecycle::*;
pub use query::*;
pub use record::*;
pub use relations::*;
pub use row::*;
pub use sql_writer::*;
pub use time_span::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
#[doc(hidden)]
pub use ::log;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
