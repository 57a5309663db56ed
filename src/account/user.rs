//! 用户实体

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rat_logger::info;

use crate::adapter::QueryExecutor;
use crate::auth::CredentialVerifier;
use crate::error::EntityDbResult;
use crate::model::{integer_field, text_field, Entity, EntitySchema, Record};
use crate::types::DataValue;
use crate::utils::capitalize_words;

/// 会话令牌字段名
pub const SESSION_TOKEN_FIELD: &str = "sessionToken";
/// 登录标识字段名
pub const EMAIL_FIELD: &str = "email";

/// 用户
///
/// 字段声明顺序：first、last、teamId、email、password、sessionToken
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub first: String,
    pub last: String,
    pub team_id: i64,
    pub email: String,
    /// 密码散列
    pub password: String,
    pub session_token: String,
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";

    fn schema() -> EntityDbResult<&'static EntitySchema<Self>> {
        static SCHEMA: OnceCell<EntitySchema<User>> = OnceCell::new();
        SCHEMA.get_or_try_init(|| {
            EntitySchema::builder()
                .table("users")
                .field(text_field(
                    "first",
                    |u: &User| DataValue::from(&u.first),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.first = v.into_text()?;
                        Ok(())
                    },
                ))
                .field(text_field(
                    "last",
                    |u: &User| DataValue::from(&u.last),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.last = v.into_text()?;
                        Ok(())
                    },
                ))
                .field(integer_field(
                    "teamId",
                    |u: &User| DataValue::Int(u.team_id),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.team_id = v.into_int()?;
                        Ok(())
                    },
                ))
                .field(text_field(
                    EMAIL_FIELD,
                    |u: &User| DataValue::from(&u.email),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.email = v.into_text()?;
                        Ok(())
                    },
                ))
                .field(text_field(
                    "password",
                    |u: &User| DataValue::from(&u.password),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.password = v.into_text()?;
                        Ok(())
                    },
                ))
                .field(text_field(
                    SESSION_TOKEN_FIELD,
                    |u: &User| DataValue::from(&u.session_token),
                    |u: &mut User, v: DataValue| -> EntityDbResult<()> {
                        u.session_token = v.into_text()?;
                        Ok(())
                    },
                ))
                .build()
        })
    }
}

impl User {
    /// 首字母大写的全名
    pub fn full_name(&self) -> String {
        capitalize_words(&format!("{} {}", self.first, self.last))
    }

    /// 校验明文密码
    pub fn check_credentials(&self, secret: &str, crypt: &dyn CredentialVerifier) -> bool {
        crypt.verify(&self.password, secret)
    }

    /// 按邮箱查找活跃用户
    pub async fn get_by_email(
        executor: Arc<dyn QueryExecutor>,
        email: &str,
    ) -> EntityDbResult<Option<Record<User>>> {
        Record::<User>::find_by_unique(executor, EMAIL_FIELD, email).await
    }

    /// 全部活跃用户
    pub async fn all_active(executor: Arc<dyn QueryExecutor>) -> EntityDbResult<Vec<Record<User>>> {
        let ids = Record::<User>::all_ids(executor.as_ref()).await?;
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            users.push(Record::<User>::load(executor.clone(), id).await?);
        }
        Ok(users)
    }
}

impl Record<User> {
    /// 设置会话令牌并立即写回该字段
    pub async fn update_session_token(&mut self, token: &str) -> EntityDbResult<bool> {
        self.session_token = token.to_string();
        self.update_field(SESSION_TOKEN_FIELD).await
    }

    /// 重置为随机密码并写回，返回新的明文密码
    pub async fn randomize_password(
        &mut self,
        crypt: &dyn CredentialVerifier,
    ) -> EntityDbResult<String> {
        let secret = crypt.random_password();
        self.password = crypt.hash(&secret)?;
        self.update_field("password").await?;
        info!("已重置用户密码: id={}", self.id());
        Ok(secret)
    }
}
