use paywall_database::*;
use paywall_domain::store::{ArticleCatalog, UserDirectory};

async fn seeded() -> Database {
    Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .seed(true)
        .init()
        .await
        .expect("connect to mem://")
}

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    db.health().await.expect("health check");
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.database(), "test_db");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn unseeded_database_is_empty() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "empty_db")
        .init()
        .await
        .expect("connect to mem://");

    assert!(db.list_articles().await.expect("list").is_empty());
    assert!(db.find_user_by_username("zoe").await.expect("lookup").is_none());
}

#[tokio::test]
async fn users_resolve_by_username_and_id() {
    let db = seeded().await;

    let zoe = db.find_user_by_username("zoe").await.expect("lookup").expect("zoe exists");
    assert_eq!(zoe.id, 1);
    assert_eq!(zoe.username, "zoe");

    let again = db.find_user_by_id(zoe.id).await.expect("lookup").expect("id resolves");
    assert_eq!(again, zoe);

    assert!(db.find_user_by_username("nobody").await.expect("lookup").is_none());
    assert!(db.find_user_by_id(999).await.expect("lookup").is_none());
}

#[tokio::test]
async fn articles_are_listed_in_id_order() {
    let db = seeded().await;

    let articles = db.list_articles().await.expect("list");
    let ids: Vec<i64> = articles.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    let fifth = db.find_article(5).await.expect("lookup").expect("article 5 exists");
    assert_eq!(fifth, articles[4]);
    assert!(db.find_article(999).await.expect("lookup").is_none());
}
