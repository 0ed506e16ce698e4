//! Integration tests for the infrastructure components
//!
//! These tests verify that PostgreSQL (with the booking schema applied) and
//! Redis are reachable from the application. Run them with
//! `cargo test -- --ignored` against live services.

use common::{
    cache::{RedisConfig, RedisPool},
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
};
use sqlx::Row;

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL and Redis at REDIS_URL"]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    assert!(health_check(&pool).await?, "Database health check failed");

    // Running twice must be a no-op the second time.
    run_migrations(&pool).await?;
    run_migrations(&pool).await?;

    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS tables
        FROM information_schema.tables
        WHERE table_name IN ('hotels', 'orders', 'users')
        "#,
    )
    .fetch_one(&pool)
    .await?;
    let tables: i64 = row.get("tables");
    assert_eq!(tables, 3, "booking schema is incomplete");

    let collation = sqlx::query("SELECT 1 FROM pg_collation WHERE collname = 'case_insensitive'")
        .fetch_optional(&pool)
        .await?;
    assert!(collation.is_some(), "case_insensitive collation missing");

    let redis_config = RedisConfig::from_env()?;
    let redis_pool = RedisPool::new(&redis_config).await?;
    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let test_key = "integration_test_key";
    redis_pool
        .set(test_key, "integration_test_value", Some(10))
        .await?;
    assert_eq!(
        redis_pool.get(test_key).await?,
        Some("integration_test_value".to_string()),
        "Redis SET/GET test failed"
    );
    redis_pool.delete(test_key).await?;
    assert_eq!(redis_pool.get(test_key).await?, None, "Redis delete failed");

    Ok(())
}
