use tempfile::TempDir;

use haat::config::Config;
use haat::db;
use haat::routes;
use haat::state::{AppState, DbPool};

/// A real server bound to an ephemeral port, backed by a throwaway database.
pub struct TestServer {
    pub base_url: String,
    pub pool: DbPool,
    _data_dir: TempDir,
}

pub async fn spawn() -> TestServer {
    let data_dir = TempDir::new().unwrap();
    let db_path = data_dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");

    let state = AppState {
        db: pool.clone(),
        config: Config::default(),
    };
    let app = routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        pool,
        _data_dir: data_dir,
    }
}
