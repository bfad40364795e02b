//! Per-test databases inside one shared PostgreSQL container.

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

const USER: &str = "catalog_test";
const PASSWORD: &str = "catalog_test_password";

/// Host the container's mapped port is reachable on.
static HOST: Lazy<String> = Lazy::new(|| {
    std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
});

static SERVER: OnceCell<Server> = OnceCell::const_new();

/// Names of databases waiting to be dropped.
static DROP_QUEUE: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::const_new();

struct Server {
    _container: ContainerAsync<PostgresImage>,
    port: u16,
}

impl Server {
    async fn start() -> Self {
        let container = PostgresImage::default()
            .with_user(USER)
            .with_password(PASSWORD)
            .with_db_name(USER)
            .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
            .start()
            .await
            .expect("postgres container should start");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("postgres port should be mapped");

        Self {
            _container: container,
            port,
        }
    }

    fn url(&self, database: &str) -> String {
        format!(
            "postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}",
            host = *HOST,
            port = self.port
        )
    }

    async fn admin(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect(&self.url("postgres")).await
    }
}

async fn server() -> &'static Server {
    SERVER.get_or_init(Server::start).await
}

async fn drop_queue() -> &'static mpsc::UnboundedSender<String> {
    DROP_QUEUE
        .get_or_init(|| async {
            let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

            tokio::spawn(async move {
                while let Some(name) = receiver.recv().await {
                    if let Err(error) = drop_database(&name).await {
                        eprintln!("could not drop test database {name}: {error}");
                    }
                }
            });

            sender
        })
        .await
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    let mut admin = server().await.admin().await?;

    sqlx::query(&format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#))
        .execute(&mut admin)
        .await?;

    admin.close().await
}

/// A freshly migrated database that only one test uses.
///
/// Services commit their own transactions, so tests are isolated by database
/// rather than by rollback. The database is dropped in the background after
/// the value goes away.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        // Generated names only hold `[a-z0-9_]`, so interpolating them is safe.
        let name = format!("catalog_{}", Uuid::new_v4().simple());
        let server = server().await;

        drop_queue().await;

        let mut admin = server
            .admin()
            .await
            .expect("admin connection should open");

        sqlx::query(&format!(r#"CREATE DATABASE "{name}""#))
            .execute(&mut admin)
            .await
            .expect("test database should be created");

        admin
            .close()
            .await
            .expect("admin connection should close");

        let pool = PgPool::connect(&server.url(&name))
            .await
            .expect("test database pool should connect");

        crate::database::migrate(&pool)
            .await
            .expect("migrations should apply");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(queue) = DROP_QUEUE.get() {
            let _queued = queue.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn new_database_has_catalog_tables() -> TestResult {
        let db = TestDb::new().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name IN ('users', 'categories', 'products') \
             ORDER BY table_name",
        )
        .fetch_all(db.pool())
        .await?;

        assert_eq!(tables, ["categories", "products", "users"]);

        Ok(())
    }

    #[tokio::test]
    async fn databases_are_isolated() -> TestResult {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        assert_ne!(first.name, second.name);

        sqlx::query("INSERT INTO categories (name, slug) VALUES ('Lighting', 'lighting')")
            .execute(first.pool())
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT count(*) FROM categories")
            .fetch_one(second.pool())
            .await?;

        assert_eq!(count, 0);

        Ok(())
    }
}
