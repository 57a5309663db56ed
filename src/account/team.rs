//! 团队实体

use once_cell::sync::OnceCell;

use crate::auth::CredentialVerifier;
use crate::error::EntityDbResult;
use crate::model::{array_field, text_field, Entity, EntitySchema, ScalarKind};
use crate::types::DataValue;

/// 团队
///
/// `actionIds` 为整数数组，存储时以逗号连接
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub name: String,
    pub action_ids: Vec<i64>,
    /// 团队口令散列
    pub password: String,
}

impl Entity for Team {
    const TYPE_NAME: &'static str = "Team";

    fn schema() -> EntityDbResult<&'static EntitySchema<Self>> {
        static SCHEMA: OnceCell<EntitySchema<Team>> = OnceCell::new();
        SCHEMA.get_or_try_init(|| {
            EntitySchema::builder()
                .table("teams")
                .field(text_field(
                    "name",
                    |t: &Team| DataValue::from(&t.name),
                    |t: &mut Team, v: DataValue| -> EntityDbResult<()> {
                        t.name = v.into_text()?;
                        Ok(())
                    },
                ))
                .field(array_field(
                    "actionIds",
                    ScalarKind::Integer,
                    |t: &Team| DataValue::from(t.action_ids.clone()),
                    |t: &mut Team, v: DataValue| -> EntityDbResult<()> {
                        t.action_ids = v.into_int_list()?;
                        Ok(())
                    },
                ))
                .field(text_field(
                    "password",
                    |t: &Team| DataValue::from(&t.password),
                    |t: &mut Team, v: DataValue| -> EntityDbResult<()> {
                        t.password = v.into_text()?;
                        Ok(())
                    },
                ))
                .build()
        })
    }
}

impl Team {
    /// 添加一个动作ID，已存在时不重复添加
    pub fn add_action(&mut self, action_id: i64) {
        if !self.has_action(action_id) {
            self.action_ids.push(action_id);
        }
    }

    pub fn has_action(&self, action_id: i64) -> bool {
        self.action_ids.contains(&action_id)
    }

    /// 校验团队口令
    pub fn check_password(&self, secret: &str, crypt: &dyn CredentialVerifier) -> bool {
        crypt.verify(&self.password, secret)
    }
}
