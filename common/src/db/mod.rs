// Database layer module
// PostgreSQL connection pool, predicate builder and repositories

pub mod pool;
pub mod predicate;
pub mod repositories;

pub use pool::DbPool;
