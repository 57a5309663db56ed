//! 数据库类型定义和配置
//!
//! 定义支持的数据库类型、连接配置、通用数据值和过滤条件

pub mod database_config;
pub mod data_value;
pub mod query;

pub use database_config::{DatabaseConfig, DatabaseType, ConnectionConfig};
pub use data_value::{DataValue, TransferMap};
pub use query::{EntityFilter, FilterCondition, QueryOperator};
