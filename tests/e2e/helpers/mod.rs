use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;
use void_backend::controllers::void::VoidController;
use void_backend::domain::void::service::SessionSettings;
use void_backend::domain::void::{SamplingEngine, VoidService};
use void_backend::infrastructure::http::build_router;
use void_backend::infrastructure::repositories::{InMemoryContentStore, InMemoryProfileDirectory};

pub mod db_pool;

use api_client::TestClient;
use db_pool::{PooledDatabase, DB_POOL};
use fixtures::TestFixtures;

pub const TEST_PAGE_SIZE: usize = 3;
pub const TEST_MAX_PAGE_SIZE: usize = 10;

pub struct TestContext {
    pub client: TestClient,
    pub store: Arc<InMemoryContentStore>,
    pub profiles: Arc<InMemoryProfileDirectory>,
    pub service: Arc<VoidService>,
    pub fixtures: TestFixtures,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let store = Arc::new(InMemoryContentStore::new());
        let profiles = Arc::new(InMemoryProfileDirectory::new());

        let (app, service) = create_app(store.clone(), profiles.clone());

        // Start server
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = TestClient::new(&base_url);
        let fixtures = TestFixtures::new(store.clone(), profiles.clone());

        Ok(Self {
            client,
            store,
            profiles,
            service,
            fixtures,
        })
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            TestContext::new()
                .await
                .expect("Failed to create test context")
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Server task and stores are dropped with the runtime
        }
    }
}

/// Context for tests that run the Postgres repositories against a real
/// database in the shared container
pub struct DbContext {
    pub pool: Arc<PgPool>,
    #[allow(dead_code)]
    pub db: PooledDatabase,
}

impl AsyncTestContext for DbContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            Self {
                pool: Arc::new(db.pool.clone()),
                db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async move {
            self.pool.close().await;
        }
    }
}

fn create_app(
    store: Arc<InMemoryContentStore>,
    profiles: Arc<InMemoryProfileDirectory>,
) -> (Router, Arc<VoidService>) {
    let engine = Arc::new(SamplingEngine::new(store, profiles));
    let void_service = Arc::new(VoidService::new(
        engine,
        SessionSettings {
            default_page_size: TEST_PAGE_SIZE,
            max_page_size: TEST_MAX_PAGE_SIZE,
            ..SessionSettings::default()
        },
    ));
    let void_controller = Arc::new(VoidController::new(void_service.clone()));

    (build_router(void_service.clone(), void_controller), void_service)
}
