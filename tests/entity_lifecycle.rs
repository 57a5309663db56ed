//! 实体记录生命周期测试：填充、保存、载入、软删除和传输映射

mod common;

use common::{create_user, memory_executor, Project};
use rat_entitydb::*;

#[tokio::test]
async fn test_user_scenario() {
    let executor = memory_executor().await;
    let user = create_user(&executor, "k@example.com", "testpass").await;
    assert!(user.id() > 0, "保存后应分配ID");

    let map = user.as_map().expect("生成传输映射失败");
    assert_eq!(map["email"], DataValue::from("k@example.com"));
    assert_eq!(
        map.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["id", "first", "last", "teamId", "email", "password", "sessionToken", "active"]
    );

    let found = User::get_by_email(executor.clone(), "k@example.com")
        .await
        .expect("按邮箱查询失败")
        .expect("应找到用户");
    assert_eq!(found.id(), user.id());
    assert_eq!(found.full_name(), "Kenneth Test-Jones");

    assert!(user.destroy().await.expect("物理删除失败"));
    let missing = User::get_by_email(executor.clone(), "k@example.com")
        .await
        .expect("按邮箱查询失败");
    assert!(missing.is_none());

    let err = Record::<User>::load(executor.clone(), user.id()).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_load_roundtrip_with_hooks_and_nested() {
    let executor = memory_executor().await;

    let mut team = Record::<Team>::blank(executor.clone());
    team.partial_fill([
        ("name", FieldValue::from("Core")),
        ("actionIds", FieldValue::from(vec![4i64, 8, 15])),
    ])
    .expect("填充团队失败");

    let mut project = Record::<Project>::blank(executor.clone());
    project
        .fill(vec![
            "atlas".into(),
            vec!["alpha", "beta, gamma"].into(),
            2.5f64.into(),
            true.into(),
            team.into(),
        ])
        .expect("填充项目失败");
    project.save().await.expect("保存项目失败");

    // 嵌套记录先于项目保存
    let owner_id = project.owner.as_ref().map(Record::id).unwrap_or(0);
    assert!(owner_id > 0);

    let loaded = Record::<Project>::load(executor.clone(), project.id())
        .await
        .expect("载入项目失败");
    assert_eq!(loaded.code, "atlas");
    assert_eq!(loaded.tags, vec!["alpha".to_string(), "beta, gamma".to_string()]);
    assert_eq!(loaded.budget, 2.5);
    assert!(loaded.archived);
    let owner = loaded.owner.as_ref().expect("应载入嵌套团队");
    assert_eq!(owner.id(), owner_id);
    assert_eq!(owner.action_ids, vec![4, 8, 15]);

    let map = loaded.as_map().expect("生成传输映射失败");
    assert_eq!(map["code"], DataValue::from("#atlas"));
    match &map["owner"] {
        DataValue::Object(owner_map) => assert_eq!(owner_map["name"], DataValue::from("Core")),
        other => panic!("嵌套字段应展开为映射，实际为 {:?}", other),
    }
    assert_eq!(map["active"], DataValue::Bool(true));
}

#[tokio::test]
async fn test_stored_format_uses_db_format_hook() {
    let executor = memory_executor().await;
    let mut project = Record::<Project>::blank(executor.clone());
    project.set_field("code", "orion").expect("设置字段失败");
    project.save().await.expect("保存项目失败");

    let rows = executor
        .execute(&format!(
            "SELECT \"code\", \"owner\" FROM \"projects\" WHERE \"id\"='{}'",
            project.id()
        ))
        .await
        .expect("查询失败")
        .into_rows();
    assert_eq!(rows[0]["code"], DataValue::from("PRJ-orion"));
    assert_eq!(rows[0]["owner"], DataValue::Int(0));

    let loaded = Record::<Project>::load(executor.clone(), project.id()).await.unwrap();
    assert!(loaded.owner.is_none());
    assert!(loaded.tags.is_empty());
}

#[tokio::test]
async fn test_fill_rules() {
    let executor = memory_executor().await;
    let mut user = Record::<User>::blank(executor.clone());

    let err = user.fill(vec!["only".into()]).unwrap_err();
    assert!(matches!(err, EntityDbError::Arity { expected: 6, actual: 1, .. }));

    user.partial_fill([("first", FieldValue::from("Ada")), ("last", FieldValue::from("Byron"))])
        .unwrap();
    user.partial_fill([("first", FieldValue::from("Augusta"))]).unwrap();
    assert_eq!(user.first, "Augusta");
    assert_eq!(user.last, "Byron");

    // 未声明字段使整次填充失败，已有值不变
    let err = user
        .partial_fill([("last", FieldValue::from("King")), ("nickname", FieldValue::from("x"))])
        .unwrap_err();
    assert!(matches!(err, EntityDbError::FieldAccess { .. }));
    assert_eq!(user.last, "Byron");

    let err = user.set_field("teamId", "not a number").unwrap_err();
    assert!(err.is_precondition());

    let err = user.get_field("nickname").unwrap_err();
    assert!(matches!(err, EntityDbError::FieldAccess { .. }));
}

#[tokio::test]
async fn test_soft_delete_lifecycle() {
    let executor = memory_executor().await;
    let mut user = create_user(&executor, "soft@example.com", "pw").await;
    let id = user.id();

    assert!(user.deactivate().await.unwrap());
    assert!(!user.is_active());
    assert!(!Record::<User>::all_ids(executor.as_ref()).await.unwrap().contains(&id));
    assert!(Record::<User>::find(executor.clone(), id).await.unwrap().is_none());

    assert!(user.reactivate().await.unwrap());
    assert!(Record::<User>::all_ids(executor.as_ref()).await.unwrap().contains(&id));

    let mut blank = Record::<User>::blank(executor.clone());
    assert!(!blank.deactivate().await.unwrap());
    assert!(!blank.update_field("email").await.unwrap());
    assert!(!blank.destroy().await.unwrap());
}

#[tokio::test]
async fn test_update_and_update_field() {
    let executor = memory_executor().await;
    let mut user = create_user(&executor, "u@example.com", "pw").await;

    user.first = "Grace".to_string();
    assert!(user.update().await.expect("更新失败"));
    user.last = "Hopper".to_string();
    assert!(user.update_field("last").await.unwrap());

    let loaded = Record::<User>::load(executor.clone(), user.id()).await.unwrap();
    assert_eq!(loaded.first, "Grace");
    assert_eq!(loaded.last, "Hopper");

    // 未持久化的记录不写入
    let mut blank = Record::<User>::blank(executor.clone());
    blank.first = "Nobody".to_string();
    assert!(!blank.update().await.unwrap());
    assert_eq!(blank.id(), 0);
    assert_eq!(Record::<User>::all_ids(executor.as_ref()).await.unwrap(), vec![user.id()]);

    // 行已被物理删除时报告记录不存在
    assert!(user.destroy().await.unwrap());
    let err = user.update().await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_lookup_edges() {
    let executor = memory_executor().await;
    let user = create_user(&executor, "edge@example.com", "pw").await;

    let err = Record::<User>::load(executor.clone(), 0).await.unwrap_err();
    assert!(matches!(err, EntityDbError::InvalidId { .. }));

    let opened = Record::<User>::open(executor.clone(), &format!("{}abc", user.id()))
        .await
        .unwrap()
        .expect("应按前缀数字打开记录");
    assert_eq!(opened.id(), user.id());
    assert!(Record::<User>::open(executor.clone(), "abc").await.unwrap().is_none());
    assert!(Record::<User>::find(executor.clone(), 9999).await.unwrap().is_none());

    // 唯一字段重复时报告不唯一
    create_user(&executor, "edge@example.com", "pw").await;
    let err = User::get_by_email(executor.clone(), "edge@example.com").await.unwrap_err();
    assert!(matches!(err, EntityDbError::AmbiguousRecord { found: 2, .. }));
}

#[tokio::test]
async fn test_quotes_are_escaped() {
    let executor = memory_executor().await;
    let mut user = create_user(&executor, "o'brien@example.com", "pw").await;
    user.last = "O'Brien'); DROP TABLE \"users\"; --".to_string();
    user.update().await.unwrap();

    let loaded = User::get_by_email(executor.clone(), "o'brien@example.com")
        .await
        .unwrap()
        .expect("应找到用户");
    assert_eq!(loaded.last, "O'Brien'); DROP TABLE \"users\"; --");
}

#[tokio::test]
async fn test_filtered_ids() {
    let executor = memory_executor().await;
    let a = create_user(&executor, "a@example.com", "pw").await;
    let mut b = create_user(&executor, "b@example.com", "pw").await;
    b.team_id = 7;
    b.update().await.unwrap();

    let all = Record::<User>::all_ids(executor.as_ref()).await.unwrap();
    let unfiltered = Record::<User>::filtered_ids(executor.as_ref(), &EntityFilter::new())
        .await
        .unwrap();
    assert_eq!(all, unfiltered);
    assert_eq!(all, vec![a.id(), b.id()]);

    let filter = EntityFilter::new().with("teamId", ">", 3).eq("nickname", "ignored");
    let ids = Record::<User>::filtered_ids(executor.as_ref(), &filter).await.unwrap();
    assert_eq!(ids, vec![b.id()]);

    let filter = EntityFilter::new().with("email", QueryOperator::Like, "a@%");
    let ids = Record::<User>::filtered_ids(executor.as_ref(), &filter).await.unwrap();
    assert_eq!(ids, vec![a.id()]);
}
