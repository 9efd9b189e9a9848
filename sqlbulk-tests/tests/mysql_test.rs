//! Bulk insert against a real MySQL server in a testcontainer
//!
//! These tests need Docker and are ignored by default:
//!
//! ```bash
//! cargo test -p sqlbulk-tests --test mysql_test -- --ignored
//! ```

use mysql_async::prelude::*;
use serial_test::serial;
use sqlbulk::{bulk_insert, bulk_upsert, BulkConfig, BulkInsert, MySqlPool, Pool, Record};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::mysql::Mysql;

const SCHEMA: &str = "CREATE TABLE tb_user (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(64) NOT NULL,
    age INT NOT NULL DEFAULT 0,
    created_at DATETIME NULL,
    UNIQUE KEY uk_name (name)
)";

#[derive(Debug, Clone, Record)]
#[bulk(table = "tb_user")]
struct User {
    id: i64,
    #[bulk(column = "name")]
    user_name: String,
    age: i32,
    created_at: Option<chrono::NaiveDateTime>,
    #[bulk(skip)]
    #[allow(dead_code)]
    hobby: String,
}

fn user(name: &str, age: i32) -> User {
    User {
        id: 0,
        user_name: name.to_string(),
        age,
        created_at: None,
        hobby: String::new(),
    }
}

async fn start() -> anyhow::Result<(ContainerAsync<Mysql>, MySqlPool)> {
    let container = Mysql::default().start().await?;
    let port = container.get_host_port_ipv4(3306).await?;
    let pool = MySqlPool::new(&format!("mysql://root@127.0.0.1:{}/test", port))?;
    pool.execute(SCHEMA, vec![]).await?;
    Ok((container, pool))
}

async fn count_users(pool: &MySqlPool) -> anyhow::Result<u64> {
    let mut conn = pool.inner().get_conn().await?;
    let count: Option<u64> = conn.query_first("SELECT COUNT(*) FROM tb_user").await?;
    Ok(count.unwrap_or(0))
}

async fn age_of(pool: &MySqlPool, name: &str) -> anyhow::Result<Option<i32>> {
    let mut conn = pool.inner().get_conn().await?;
    let age: Option<i32> = conn
        .exec_first("SELECT age FROM tb_user WHERE name = ?", (name,))
        .await?;
    Ok(age)
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_bulk_insert_mysql() -> anyhow::Result<()> {
    let (_container, pool) = start().await?;

    let records = vec![user("sunary", 22), user("aku", 68)];
    let result = bulk_insert(&pool, &records).await?;

    assert_eq!(result.rows_affected, 2);
    assert_eq!(count_users(&pool).await?, 2);
    assert_eq!(age_of(&pool, "aku").await?, Some(68));
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_many_batches_mysql() -> anyhow::Result<()> {
    let (_container, pool) = start().await?;

    let records: Vec<User> = (1..=250).map(|i| user(&format!("user{}", i), i)).collect();
    BulkInsert::new(&records)
        .config(BulkConfig {
            max_placeholders: 100,
            ..BulkConfig::default()
        })
        .execute(&pool)
        .await?;

    assert_eq!(count_users(&pool).await?, 250);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_bulk_upsert_mysql() -> anyhow::Result<()> {
    let (_container, pool) = start().await?;

    bulk_insert(&pool, &[user("sunary", 22), user("aku", 68)]).await?;
    bulk_upsert(&pool, &[user("sunary", 30), user("newbie", 5)], &["name"]).await?;

    assert_eq!(count_users(&pool).await?, 3);
    assert_eq!(age_of(&pool, "sunary").await?, Some(30));
    assert_eq!(age_of(&pool, "newbie").await?, Some(5));
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_failed_batch_rolls_back_mysql() -> anyhow::Result<()> {
    let (_container, pool) = start().await?;

    // The duplicate name in the last batch violates uk_name
    let mut records: Vec<User> = (1..=20).map(|i| user(&format!("user{}", i), i)).collect();
    records.push(user("user1", 99));

    let result = BulkInsert::new(&records)
        .config(BulkConfig {
            max_placeholders: 10,
            ..BulkConfig::default()
        })
        .execute(&pool)
        .await;

    assert!(result.is_err());
    assert_eq!(count_users(&pool).await?, 0);
    Ok(())
}
