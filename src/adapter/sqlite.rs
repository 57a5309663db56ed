//! SQLite查询执行器
//!
//! 使用sqlx库实现真实的SQLite数据库操作

mod data_conversion;
mod executor;
mod schema;

pub use executor::SqliteExecutor;
pub use schema::create_table_sql;
