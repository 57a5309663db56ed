//! rat_entitydb - 描述符驱动的实体持久化库
//!
//! 实体类型以静态字段描述符声明持久化形态，[`Record`] 据此完成载入、保存、
//! 软删除和传输映射，[`Operator`] 在其上提供批量增删改查。
//! 附带用户/团队实体和基于会话令牌的登录流程

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

pub mod error;
pub mod i18n;
pub mod types;
pub mod config;
pub mod security;
pub mod adapter;
pub mod model;
pub mod operator;
pub mod account;
pub mod auth;
pub mod utils;

// 重新导出常用类型和函数
pub use error::{EntityDbError, EntityDbResult};
pub use types::*;
pub use adapter::{create_executor, QueryExecutor, QueryOutcome, Row};
#[cfg(feature = "sqlite-support")]
pub use adapter::SqliteExecutor;
pub use model::{
    array_field, boolean_field, float_field, integer_field, nested_field, text_field,
    AnyRecord, Entity, EntitySchema, FieldDescriptor, FieldKind, FieldValue, Record, ScalarKind,
};
pub use operator::{DestructiveOperator, Operator};
pub use account::{Team, User};
pub use auth::{
    AuthController, CredentialVerifier, Crypt, LoginOutcome, LoginRequirement,
    MemorySessionStore, SessionStore,
};
pub use config::{
    AppConfig, AppConfigBuilder, DatabaseConfigBuilder, Environment, GlobalConfig,
    GlobalConfigBuilder, LogLevel, LoggingConfig, LoggingConfigBuilder, memory_sqlite_config,
    sqlite_config,
};

/// 初始化rat_entitydb库
///
/// 注册多语言消息并按环境变量选择语言
///
/// 注意：日志系统由调用者自行初始化，见 [`LoggingConfig::init_logger`]
pub fn init() {
    i18n::ErrorMessageI18n::init();
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
