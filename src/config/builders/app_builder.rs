//! # 应用配置构建器模块
//!
//! 提供应用配置的构建器实现，支持链式调用和严格验证

use crate::config::core::{AppConfig, Environment};
use crate::error::EntityDbResult;
use rat_logger::info;

/// 应用配置构建器
#[derive(Debug)]
pub struct AppConfigBuilder {
    name: Option<String>,
    brand: Option<String>,
    main_path: Option<String>,
    login_path: Option<String>,
    environment: Option<Environment>,
    debug: Option<bool>,
}
impl AppConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            name: None,
            brand: None,
            main_path: None,
            login_path: None,
            environment: None,
            debug: None,
        }
    }

    /// 设置应用名称
    ///
    /// # 参数
    ///
    /// * `name` - 应用名称，会话键以它为前缀
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置品牌名
    ///
    /// # 参数
    ///
    /// * `brand` - 登录提示等面向用户的文本中使用的名称
    pub fn brand<S: Into<String>>(mut self, brand: S) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// 设置站点根路径
    pub fn main_path<S: Into<String>>(mut self, main_path: S) -> Self {
        self.main_path = Some(main_path.into());
        self
    }

    /// 设置登录页路径
    pub fn login_path<S: Into<String>>(mut self, login_path: S) -> Self {
        self.login_path = Some(login_path.into());
        self
    }

    /// 设置环境类型
    ///
    /// # 参数
    ///
    /// * `environment` - 环境类型
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 设置调试模式
    ///
    /// # 参数
    ///
    /// * `debug` - 是否启用调试模式
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// 构建应用配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> EntityDbResult<AppConfig> {
        let name = self
            .name
            .ok_or_else(|| crate::entity_error!(config, "应用名称必须设置"))?;

        let brand = self
            .brand
            .ok_or_else(|| crate::entity_error!(config, "品牌名必须设置"))?;

        let main_path = self
            .main_path
            .ok_or_else(|| crate::entity_error!(config, "站点根路径必须设置"))?;

        let login_path = self
            .login_path
            .ok_or_else(|| crate::entity_error!(config, "登录页路径必须设置"))?;

        let environment = self
            .environment
            .ok_or_else(|| crate::entity_error!(config, "环境类型必须设置"))?;

        let debug = self
            .debug
            .ok_or_else(|| crate::entity_error!(config, "调试模式必须设置"))?;

        if name.trim().is_empty() {
            return Err(crate::entity_error!(config, "应用名称不能为空"));
        }

        info!(
            "创建应用配置: 名称={}, 品牌={}, 环境={:?}",
            name, brand, environment
        );

        Ok(AppConfig {
            name,
            brand,
            main_path,
            login_path,
            environment,
            debug,
        })
    }
}
impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
