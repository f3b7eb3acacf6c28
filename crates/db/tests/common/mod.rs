use sqlx::PgPool;

use kinder_db::ScriptRunner;

/// Schema and seed script shipped with the crate.
pub const INIT_SQL: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/sql/init.sql");

/// Create both tables and load the seed rows into the test database.
pub async fn seed(pool: &PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    ScriptRunner::run_file(&mut conn, INIT_SQL)
        .await
        .expect("init.sql should apply cleanly");
}
