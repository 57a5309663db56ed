//! 批量操作器测试

mod common;

use common::{create_user, memory_executor, Project};
use rat_entitydb::*;

#[tokio::test]
async fn test_operator_metadata() {
    let executor = memory_executor().await;
    let operator = Operator::<Team>::new(executor).unwrap();
    assert_eq!(operator.table_name(), "teams");
    assert_eq!(operator.fields(), vec!["name", "actionIds", "password"]);
}

#[tokio::test]
async fn test_add_and_edit() {
    let executor = memory_executor().await;
    let operator = Operator::<Team>::new(executor.clone()).unwrap();

    let team = operator
        .add(vec!["Ops".into(), vec![1i64, 2].into(), "".into()])
        .await
        .unwrap()
        .expect("新增团队失败");
    assert!(team.id() > 0);

    let edited = operator
        .edit(team.id(), vec!["Platform".into(), vec![3i64].into(), "".into()])
        .await
        .unwrap()
        .expect("编辑团队失败");
    assert_eq!(edited.name, "Platform");

    let partial = operator
        .partial_edit([("actionIds", FieldValue::from(vec![5i64, 6]))], team.id())
        .await
        .unwrap()
        .expect("部分编辑失败");
    assert_eq!(partial.name, "Platform");
    assert_eq!(partial.action_ids, vec![5, 6]);

    let reloaded = operator.get(team.id()).await.unwrap().expect("应能载入团队");
    assert_eq!(reloaded.action_ids, vec![5, 6]);

    let added = operator
        .partial_add([("name", FieldValue::from("Solo"))])
        .await
        .unwrap()
        .expect("部分新增失败");
    assert!(added.action_ids.is_empty());
}

#[tokio::test]
async fn test_edit_zero_id_writes_nothing() {
    let executor = memory_executor().await;
    let operator = Operator::<Team>::new(executor.clone()).unwrap();

    let err = operator
        .edit(0, vec!["Ghost".into(), vec![1i64].into(), "".into()])
        .await
        .unwrap_err();
    assert!(matches!(err, EntityDbError::InvalidId { id: 0, .. }));

    let err = operator
        .partial_edit([("name", FieldValue::from("Ghost"))], 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EntityDbError::InvalidId { .. }));

    assert!(operator.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_data_errors_become_none() {
    let executor = memory_executor().await;
    let operator = Operator::<Team>::new(executor.clone()).unwrap();

    let missing = operator
        .edit(404, vec!["Nobody".into(), vec![1i64].into(), "".into()])
        .await
        .unwrap();
    assert!(missing.is_none());
    assert!(!operator.remove(404).await.unwrap());

    // 参数数量错误属于前置条件错误，照常返回
    let err = operator.add(vec!["Short".into()]).await.unwrap_err();
    assert!(matches!(err, EntityDbError::Arity { .. }));
}

#[tokio::test]
async fn test_list_objects_and_remove() {
    let executor = memory_executor().await;
    let operator = Operator::<User>::new(executor.clone()).unwrap();
    let a = create_user(&executor, "a@example.com", "pw").await;
    let b = create_user(&executor, "b@example.com", "pw").await;

    assert_eq!(operator.list(None).await.unwrap(), vec![a.id(), b.id()]);

    let filter = EntityFilter::new().eq("email", "b@example.com");
    assert_eq!(operator.list(Some(&filter)).await.unwrap(), vec![b.id()]);

    let objects = operator.objects(Some(vec![a.id(), 999, b.id()])).await.unwrap();
    assert_eq!(objects.iter().map(Record::id).collect::<Vec<_>>(), vec![a.id(), b.id()]);

    let maps = operator.as_maps(None).await.unwrap();
    assert_eq!(maps.len(), 2);
    assert_eq!(maps[1]["email"], DataValue::from("b@example.com"));

    assert!(operator.remove(a.id()).await.unwrap());
    assert_eq!(operator.list(None).await.unwrap(), vec![b.id()]);
    assert!(!operator.remove(a.id()).await.unwrap());

    let err = operator.remove(0).await.unwrap_err();
    assert!(matches!(err, EntityDbError::InvalidId { .. }));
}

#[tokio::test]
async fn test_destructive_operator() {
    let executor = memory_executor().await;
    let operator = Operator::<Project>::new(executor.clone()).unwrap();
    let project = operator
        .partial_add([("code", FieldValue::from("apollo"))])
        .await
        .unwrap()
        .expect("新增项目失败");

    assert!(operator.remove(project.id()).await.unwrap());

    // 物理删除对软删除的记录同样有效
    let destructive = operator.into_destructive();
    assert!(destructive.destroy(project.id()).await.unwrap());
    assert!(!destructive.destroy(project.id()).await.unwrap());

    let err = Record::<Project>::load(executor.clone(), project.id()).await.unwrap_err();
    assert!(err.is_not_found());

    // 解引用后仍可使用普通操作
    assert!(destructive.list(None).await.unwrap().is_empty());
}
