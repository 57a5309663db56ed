//! 集成测试共用的内存数据库与测试实体

#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::OnceCell;
use rat_entitydb::model::DELIMITER_L2;
use rat_entitydb::*;

/// 项目：覆盖数组、浮点、布尔、嵌套字段和三种格式覆盖
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub code: String,
    pub tags: Vec<String>,
    pub budget: f64,
    pub archived: bool,
    pub owner: Option<Record<Team>>,
}

fn strip_code_prefix(raw: DataValue) -> EntityDbResult<DataValue> {
    let text = raw.into_text()?;
    Ok(DataValue::String(
        text.strip_prefix("PRJ-").unwrap_or(&text).to_string(),
    ))
}

impl Entity for Project {
    const TYPE_NAME: &'static str = "Project";

    fn schema() -> EntityDbResult<&'static EntitySchema<Self>> {
        static SCHEMA: OnceCell<EntitySchema<Project>> = OnceCell::new();
        SCHEMA.get_or_try_init(|| {
            EntitySchema::builder()
                .table("projects")
                .delimiter(DELIMITER_L2)
                .field(
                    text_field(
                        "code",
                        |p: &Project| DataValue::from(&p.code),
                        |p: &mut Project, v: DataValue| -> EntityDbResult<()> {
                            p.code = v.into_text()?;
                            Ok(())
                        },
                    )
                    .with_db_format(|p: &Project| DataValue::String(format!("PRJ-{}", p.code)))
                    .with_db_read(strip_code_prefix)
                    .with_transfer(|p: &Project| DataValue::String(format!("#{}", p.code))),
                )
                .field(array_field(
                    "tags",
                    ScalarKind::Text,
                    |p: &Project| DataValue::from(p.tags.clone()),
                    |p: &mut Project, v: DataValue| -> EntityDbResult<()> {
                        p.tags = v.into_text_list()?;
                        Ok(())
                    },
                ))
                .field(float_field(
                    "budget",
                    |p: &Project| DataValue::Float(p.budget),
                    |p: &mut Project, v: DataValue| -> EntityDbResult<()> {
                        p.budget = v.into_float()?;
                        Ok(())
                    },
                ))
                .field(boolean_field(
                    "archived",
                    |p: &Project| DataValue::Bool(p.archived),
                    |p: &mut Project, v: DataValue| -> EntityDbResult<()> {
                        p.archived = v.into_bool()?;
                        Ok(())
                    },
                ))
                .field(nested_field::<Project, Team>(
                    "owner",
                    |p| p.owner.as_ref(),
                    |p| p.owner.as_mut(),
                    |p, v| p.owner = v,
                ))
                .build()
        })
    }
}

/// 创建已建好全部测试表的内存数据库
pub async fn memory_executor() -> Arc<dyn QueryExecutor> {
    rat_entitydb::init();
    i18n::set_language("en-US");
    let executor = SqliteExecutor::memory().await.expect("创建内存数据库失败");
    executor.create_table_for::<User>().await.expect("创建users表失败");
    executor.create_table_for::<Team>().await.expect("创建teams表失败");
    executor.create_table_for::<Project>().await.expect("创建projects表失败");
    Arc::new(executor)
}

/// 测试用的低代价凭据实现
pub fn test_crypt() -> Crypt {
    Crypt::with_cost(4).expect("迭代代价无效")
}

pub fn test_app() -> AppConfig {
    AppConfig::builder()
        .name("Planner")
        .brand("Planner HQ")
        .main_path("https://planner.example.com")
        .login_path("/login")
        .environment(Environment::Testing)
        .debug(true)
        .build()
        .expect("应用配置无效")
}

/// 按场景数据创建并保存用户
pub async fn create_user(
    executor: &Arc<dyn QueryExecutor>,
    email: &str,
    secret: &str,
) -> Record<User> {
    let hash = test_crypt().hash(secret).expect("生成密码散列失败");
    let mut user = Record::<User>::blank(executor.clone());
    user.fill(vec![
        "Kenneth".into(),
        "Test-Jones".into(),
        0i64.into(),
        email.into(),
        hash.into(),
        "".into(),
    ])
    .expect("填充用户失败");
    user.save().await.expect("保存用户失败");
    user
}
