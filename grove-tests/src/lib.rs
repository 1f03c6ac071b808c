mod aggregates;
mod migration;
mod queries;
mod relations;
mod simple;

use aggregates::aggregates;
use grove::{Database, Driver};
use log::LevelFilter;
use migration::migration;
use queries::queries;
use relations::relations;
use simple::simple;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every scenario against a live server, each one starts by dropping its tables.
pub async fn execute_tests<D: Driver>(database: &Database<D>) {
    simple(database).await;
    queries(database).await;
    aggregates(database).await;
    relations(database).await;
    migration(database).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
