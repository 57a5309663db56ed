//! # 配置管理模块
//!
//! 提供统一的配置管理系统，支持构建器模式和链式配置
//! 所有配置项必须显式设置，构建器不提供默认值

pub mod builders;
pub mod convenience;
pub mod core;

pub use builders::{
    AppConfigBuilder, DatabaseConfigBuilder, GlobalConfigBuilder, LoggingConfigBuilder,
};
pub use convenience::{memory_sqlite_config, sqlite_config};
pub use core::{AppConfig, Environment, GlobalConfig, LogLevel, LoggingConfig};
