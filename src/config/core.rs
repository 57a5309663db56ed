//! # 配置管理模块 - 核心配置类型
//!
//! 提供统一的配置管理系统，支持构建器模式和链式配置
//! 所有配置项必须显式设置

use std::sync::Arc;

use rat_logger::info;
use serde::{Deserialize, Serialize};

use crate::adapter::QueryExecutor;
use crate::error::{EntityDbError, EntityDbResult};
use crate::types::*;

/// 全局配置
///
/// 包括数据库配置、应用配置和日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 应用配置
    pub app: AppConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 应用名称，同时作为会话键前缀
    pub name: String,
    /// 对外展示的品牌名
    pub brand: String,
    /// 站点根路径，生成跳转地址时作为前缀
    pub main_path: String,
    /// 登录页相对路径
    pub login_path: String,
    /// 环境类型
    pub environment: Environment,
    /// 是否启用调试模式
    pub debug: bool,
}

/// 环境类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 预发布环境
    Staging,
    /// 生产环境
    Production,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 是否输出到控制台
    pub console: bool,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 错误级别
    Error,
    /// 警告级别
    Warn,
    /// 信息级别
    Info,
    /// 调试级别
    Debug,
    /// 跟踪级别
    Trace,
}

impl LogLevel {
    /// 转换为 rat_logger 的级别过滤器
    pub fn to_level_filter(self) -> rat_logger::LevelFilter {
        match self {
            LogLevel::Error => rat_logger::LevelFilter::Error,
            LogLevel::Warn => rat_logger::LevelFilter::Warn,
            LogLevel::Info => rat_logger::LevelFilter::Info,
            LogLevel::Debug => rat_logger::LevelFilter::Debug,
            LogLevel::Trace => rat_logger::LevelFilter::Trace,
        }
    }
}

impl AppConfig {
    /// 创建应用配置构建器
    pub fn builder() -> super::builders::AppConfigBuilder {
        super::builders::AppConfigBuilder::new()
    }

    /// 会话中保存账户ID的键
    pub fn account_session_key(&self) -> String {
        format!("{}Account", self.name)
    }

    /// 会话中保存会话令牌的键
    pub fn token_session_key(&self) -> String {
        format!("{}SessionToken", self.name)
    }

    /// 会话中保存登录后跳转地址的键
    pub fn redirect_session_key(&self) -> String {
        format!("{}RedirectAfterLogin", self.name)
    }

    /// 拼接站点内地址
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.main_path.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// 登录页地址
    pub fn login_url(&self) -> String {
        self.build_url(&self.login_path)
    }

    /// 是否只允许安全Cookie（调试模式下关闭）
    pub fn secure_cookies(&self) -> bool {
        !self.debug
    }
}

impl LoggingConfig {
    /// 创建日志配置构建器
    pub fn builder() -> super::builders::LoggingConfigBuilder {
        super::builders::LoggingConfigBuilder::new()
    }

    /// 按配置初始化日志系统
    ///
    /// 未启用控制台输出时不安装任何处理器
    pub fn init_logger(&self) -> EntityDbResult<()> {
        if !self.console {
            return Ok(());
        }
        rat_logger::LoggerBuilder::new()
            .with_level(self.level.to_level_filter())
            .add_terminal_with_config(rat_logger::handler::term::TermConfig::default())
            .init_global_logger()
            .map_err(|e| {
                crate::entity_error!(config, format!("日志系统初始化失败: {}", e))
            })
    }
}

impl GlobalConfig {
    /// 创建全局配置构建器
    pub fn builder() -> super::builders::GlobalConfigBuilder {
        super::builders::GlobalConfigBuilder::new()
    }

    /// 从配置文件加载配置
    ///
    /// 扩展名为 `.toml` 时按TOML解析，否则按JSON解析
    pub fn from_file<P: AsRef<std::path::Path>>(config_path: P) -> EntityDbResult<Self> {
        let content = std::fs::read_to_string(config_path.as_ref()).map_err(EntityDbError::Io)?;

        let config: GlobalConfig = if is_toml(config_path.as_ref()) {
            toml::from_str(&content)
                .map_err(|e| crate::entity_error!(config, format!("解析TOML配置文件失败: {}", e)))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| crate::entity_error!(config, format!("解析JSON配置文件失败: {}", e)))?
        };

        info!("从文件加载配置: {:?}", config_path.as_ref());
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, config_path: P) -> EntityDbResult<()> {
        let content = if is_toml(config_path.as_ref()) {
            toml::to_string_pretty(self)
                .map_err(|e| crate::entity_error!(config, format!("序列化TOML配置失败: {}", e)))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| crate::entity_error!(config, format!("序列化JSON配置失败: {}", e)))?
        };

        std::fs::write(config_path.as_ref(), content).map_err(EntityDbError::Io)?;

        info!("保存配置到文件: {:?}", config_path.as_ref());
        Ok(())
    }

    /// 按数据库配置创建执行器
    pub async fn connect(&self) -> EntityDbResult<Arc<dyn QueryExecutor>> {
        crate::adapter::create_executor(&self.database).await
    }
}

fn is_toml(path: &std::path::Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app() -> AppConfig {
        AppConfig {
            name: "Planner".to_string(),
            brand: "Planner HQ".to_string(),
            main_path: "https://planner.example.com/".to_string(),
            login_path: "/login".to_string(),
            environment: Environment::Testing,
            debug: true,
        }
    }

    #[test]
    fn test_session_keys_and_urls() {
        let app = sample_app();
        assert_eq!(app.account_session_key(), "PlannerAccount");
        assert_eq!(app.token_session_key(), "PlannerSessionToken");
        assert_eq!(app.login_url(), "https://planner.example.com/login");
        assert!(!app.secure_cookies());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = GlobalConfig {
            database: DatabaseConfig {
                db_type: DatabaseType::SQLite,
                connection: ConnectionConfig::SQLite {
                    path: ":memory:".to_string(),
                    create_if_missing: true,
                },
                max_connections: 1,
                alias: "default".to_string(),
            },
            app: sample_app(),
            logging: LoggingConfig {
                level: LogLevel::Warn,
                console: false,
            },
        };

        let dir = tempfile::tempdir().unwrap();
        for file in ["app.toml", "app.json"] {
            let path = dir.path().join(file);
            config.save_to_file(&path).unwrap();
            let loaded = GlobalConfig::from_file(&path).unwrap();
            assert_eq!(loaded.app, config.app);
            assert_eq!(loaded.logging, config.logging);
            assert_eq!(loaded.database.alias, "default");
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = GlobalConfig::from_file("/nonexistent/rat_entitydb.toml").unwrap_err();
        assert!(matches!(err, EntityDbError::Io(_)));
    }

    #[test]
    fn test_init_logger() {
        let silent = LoggingConfig {
            level: LogLevel::Info,
            console: false,
        };
        assert!(silent.init_logger().is_ok());

        let console = LoggingConfig {
            level: LogLevel::Warn,
            console: true,
        };
        assert!(console.init_logger().is_ok());
    }
}
