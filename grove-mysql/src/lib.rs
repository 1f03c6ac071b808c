mod connection;
mod driver;
mod prepared;
mod row_wrap;
mod sql_writer;
mod value_wrap;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub(crate) use row_wrap::*;
pub use sql_writer::*;
pub(crate) use value_wrap::*;
