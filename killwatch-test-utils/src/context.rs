//! Test context returned by `TestBuilder`.
//!
//! One mockito server stands in for both ESI and the RedisQ feed, so the ESI
//! client and the feed URL point at the same host. The in-memory SQLite database
//! holds the killmail cache, the name cache and any static data tables a test
//! asks for.

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};

use crate::{constant::TEST_USER_AGENT, error::TestError};

/// Test environment produced by [`TestBuilder::build`](crate::TestBuilder::build).
///
/// ```ignore
/// let test = TestBuilder::new()
///     .with_cache_tables()
///     .with_character_endpoint(1, "Pilot", 1)
///     .build()
///     .await?;
///
/// let names = NameService::new(&test.db, &test.esi_client).resolve(&ids).await;
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// In-memory SQLite database
    pub db: DatabaseConnection,
    /// ESI client configured to use the mock server
    pub esi_client: eve_esi::Client,

    /// Mock HTTP server for ESI and RedisQ endpoints
    pub server: ServerGuard,
    /// Mock endpoints created by the builder, checked by `assert_mocks`
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    pub(crate) async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;
        let mock_server_url = mock_server.url();

        let esi_config = eve_esi::Config::builder()
            .esi_url(&mock_server_url)
            .build()?;

        let esi_client = eve_esi::Client::builder()
            .config(esi_config)
            .user_agent(TEST_USER_AGENT)
            .build()?;

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            db,
            esi_client,
            server: mock_server,
            mocks: Vec::new(),
        })
    }

    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Base URL to hand to the RedisQ client
    pub fn feed_url(&self) -> String {
        self.server.url()
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
