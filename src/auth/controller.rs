//! 登录控制器
//!
//! 持有一次请求内的登录状态。会话存储按调用传入，控制器本身不保存任何全局状态

use std::sync::Arc;

use rat_logger::{debug, info, warn};

use crate::account::User;
use crate::adapter::QueryExecutor;
use crate::auth::crypt::CredentialVerifier;
use crate::auth::session::SessionStore;
use crate::config::AppConfig;
use crate::error::EntityDbResult;
use crate::model::Record;
use crate::utils::parse_unsafe_id;

/// 会话中使用的键名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    /// 账户ID
    pub account: String,
    /// 会话令牌
    pub token: String,
    /// 登录后跳转地址
    pub redirect: String,
}

impl SessionKeys {
    pub fn from_app(app: &AppConfig) -> Self {
        Self {
            account: app.account_session_key(),
            token: app.token_session_key(),
            redirect: app.redirect_session_key(),
        }
    }
}

/// 登录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 登录成功
    Authenticated { account_id: i64 },
    /// 标识（邮箱）未注册
    UnknownIdentifier,
    /// 密码错误
    WrongSecret,
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated { .. })
    }

    /// 面向用户的失败提示，成功时为 `None`
    pub fn message(&self, app: &AppConfig) -> Option<String> {
        match self {
            LoginOutcome::Authenticated { .. } => None,
            LoginOutcome::UnknownIdentifier => Some(crate::i18n::tf(
                "auth.unknown_identifier",
                &[("app", app.brand.as_str())],
            )),
            LoginOutcome::WrongSecret => Some(crate::i18n::t("auth.wrong_secret")),
        }
    }
}

/// 受保护页面的访问判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginRequirement {
    /// 会话有效
    Authenticated { account_id: i64 },
    /// 需要跳转到登录页
    Redirect { location: String },
}

/// 登录控制器
pub struct AuthController<C: CredentialVerifier> {
    executor: Arc<dyn QueryExecutor>,
    crypt: C,
    app: AppConfig,
    keys: SessionKeys,
    current: Option<Record<User>>,
}

impl<C: CredentialVerifier> AuthController<C> {
    pub fn new(executor: Arc<dyn QueryExecutor>, crypt: C, app: &AppConfig) -> Self {
        Self {
            executor,
            crypt,
            app: app.clone(),
            keys: SessionKeys::from_app(app),
            current: None,
        }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn crypt(&self) -> &C {
        &self.crypt
    }

    /// 当前已登录的用户
    pub fn current_user(&self) -> Option<&Record<User>> {
        self.current.as_ref()
    }

    /// 用邮箱和密码登录
    ///
    /// 成功时生成新的会话令牌，先写回用户记录，再写入会话。
    /// 失败时会话保持不变
    pub async fn login(
        &mut self,
        session: &dyn SessionStore,
        email: &str,
        secret: &str,
    ) -> EntityDbResult<LoginOutcome> {
        let Some(mut user) = User::get_by_email(self.executor.clone(), email).await? else {
            debug!("登录失败，邮箱未注册: {}", email);
            return Ok(LoginOutcome::UnknownIdentifier);
        };

        if !user.check_credentials(secret, &self.crypt) {
            debug!("登录失败，密码错误: 用户id={}", user.id());
            return Ok(LoginOutcome::WrongSecret);
        }

        let token = self.crypt.random_token();
        if !user.update_session_token(&token).await? {
            return Err(crate::entity_error!(
                storage,
                format!("会话令牌未能写回用户记录: id={}", user.id())
            ));
        }

        let account_id = user.id();
        session.set(&self.keys.account, account_id.to_string()).await;
        session.set(&self.keys.token, token).await;
        info!("用户登录: id={}", account_id);

        self.current = Some(user);
        Ok(LoginOutcome::Authenticated { account_id })
    }

    /// 从会话恢复登录状态
    ///
    /// 会话缺少键、用户不存在或令牌不一致时返回 `None`，不报告原因
    pub async fn restore_session(
        &mut self,
        session: &dyn SessionStore,
    ) -> EntityDbResult<Option<&Record<User>>> {
        self.current = None;

        let (Some(account), Some(token)) = (
            session.get(&self.keys.account).await,
            session.get(&self.keys.token).await,
        ) else {
            return Ok(None);
        };

        let account_id = parse_unsafe_id(&account);
        let user = match Record::<User>::find(self.executor.clone(), account_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(None),
            Err(e) if e.is_data_error() => {
                warn!("恢复会话时载入用户失败: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if token.is_empty() || user.session_token != token {
            return Ok(None);
        }

        debug!(
            "{}",
            crate::i18n::tf("auth.session_loaded", &[("name", user.full_name().as_str())])
        );
        self.current = Some(user);
        Ok(self.current.as_ref())
    }

    /// 退出登录，清除会话中的账户和令牌
    pub async fn logout(&mut self, session: &dyn SessionStore) {
        session.remove(&self.keys.account).await;
        session.remove(&self.keys.token).await;
        if let Some(user) = self.current.take() {
            info!("用户退出: id={}", user.id());
        }
    }

    /// 访问受保护页面前的检查
    ///
    /// 会话无法恢复时记下当前路径，登录后可以跳回
    pub async fn require_login(
        &mut self,
        session: &dyn SessionStore,
        current_path: &str,
    ) -> EntityDbResult<LoginRequirement> {
        if let Some(user) = self.restore_session(session).await? {
            return Ok(LoginRequirement::Authenticated { account_id: user.id() });
        }

        session.set(&self.keys.redirect, current_path.to_string()).await;
        Ok(LoginRequirement::Redirect {
            location: self.app.login_url(),
        })
    }

    /// 取出并清除登录后跳转地址
    pub async fn take_redirect_after_login(&self, session: &dyn SessionStore) -> Option<String> {
        let path = session.get(&self.keys.redirect).await?;
        session.remove(&self.keys.redirect).await;
        Some(self.app.build_url(&path))
    }
}
