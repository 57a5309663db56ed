//! # 全局配置构建器模块
//!
//! 提供全局配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{AppConfig, GlobalConfig, LoggingConfig};
use crate::error::EntityDbResult;
use crate::types::*;
use rat_logger::info;

/// 全局配置构建器
///
/// 提供链式配置接口，支持流畅的API调用
#[derive(Debug)]
pub struct GlobalConfigBuilder {
    database: Option<DatabaseConfig>,
    app: Option<AppConfig>,
    logging: Option<LoggingConfig>,
}
impl GlobalConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            database: None,
            app: None,
            logging: None,
        }
    }

    /// 设置数据库配置
    ///
    /// # 参数
    ///
    /// * `config` - 数据库配置
    pub fn database(mut self, config: DatabaseConfig) -> Self {
        self.database = Some(config);
        self
    }

    /// 设置应用配置
    ///
    /// # 参数
    ///
    /// * `app` - 应用配置
    pub fn app(mut self, app: AppConfig) -> Self {
        self.app = Some(app);
        self
    }

    /// 设置日志配置
    ///
    /// # 参数
    ///
    /// * `logging` - 日志配置
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// 构建全局配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> EntityDbResult<GlobalConfig> {
        let database = self
            .database
            .ok_or_else(|| crate::entity_error!(config, "数据库配置必须设置"))?;

        let app = self
            .app
            .ok_or_else(|| crate::entity_error!(config, "应用配置必须设置"))?;

        let logging = self
            .logging
            .ok_or_else(|| crate::entity_error!(config, "日志配置必须设置"))?;

        info!(
            "创建全局配置: 应用={}, 数据库别名={}",
            app.name, database.alias
        );

        Ok(GlobalConfig {
            database,
            app,
            logging,
        })
    }
}
impl Default for GlobalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
