//! Declarative test builder.
//!
//! Configuration methods queue work, `build()` executes it in a fixed order:
//! tables first, then static data rows, then mock endpoints.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{
    error::TestError,
    fixtures::factory::{mock_alliance, mock_character, mock_corporation},
    TestContext,
};

enum Endpoint {
    Character(i64, String),
    Corporation(i64, String),
    Alliance(i64, String),
    EsiError(String, usize),
    Redisq(Value),
    RedisqRaw(usize, String),
}

/// Builder for declarative test initialization.
///
/// ```ignore
/// let test = TestBuilder::new()
///     .with_universe_tables()
///     .with_region(10000015, "Venal")
///     .with_system(30001000, 10000015, "Home")
///     .with_jump(30001000, 30001001)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,

    regions: Vec<(i64, String)>,
    systems: Vec<(i64, i64, String)>, // (solar_system_id, region_id, name)
    types: Vec<(i64, Option<String>)>,
    jumps: Vec<(i64, i64)>,

    endpoints: Vec<(Endpoint, usize)>, // (endpoint, expected_requests)
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            regions: Vec::new(),
            systems: Vec::new(),
            types: Vec::new(),
            jumps: Vec::new(),
            endpoints: Vec::new(),
            mock_builders: Vec::new(),
        }
    }

    /// Add an entity table to the test database.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Add the tables owned by killwatch: `zkb_killmail` and `actor_name`.
    pub fn with_cache_tables(self) -> Self {
        self.with_table(entity::prelude::ZkbKillmail)
            .with_table(entity::prelude::ActorName)
    }

    /// Add the static data tables: systems, regions, types and jumps.
    pub fn with_universe_tables(self) -> Self {
        self.with_table(entity::prelude::SdeSolarSystem)
            .with_table(entity::prelude::SdeRegion)
            .with_table(entity::prelude::SdeType)
            .with_table(entity::prelude::SdeJump)
    }

    pub fn with_region(mut self, region_id: i64, name: impl Into<String>) -> Self {
        self.regions.push((region_id, name.into()));
        self
    }

    pub fn with_system(
        mut self,
        solar_system_id: i64,
        region_id: i64,
        name: impl Into<String>,
    ) -> Self {
        self.systems.push((solar_system_id, region_id, name.into()));
        self
    }

    pub fn with_type(mut self, type_id: i64, name: impl Into<String>) -> Self {
        self.types.push((type_id, Some(name.into())));
        self
    }

    /// Add a stargate connection in both directions
    pub fn with_jump(mut self, a: i64, b: i64) -> Self {
        self.jumps.push((a, b));
        self.jumps.push((b, a));
        self
    }

    /// Add a one-way stargate connection
    pub fn with_one_way_jump(mut self, from: i64, to: i64) -> Self {
        self.jumps.push((from, to));
        self
    }

    /// Mock `/characters/{character_id}` returning a character with the provided name
    pub fn with_character_endpoint(
        mut self,
        character_id: i64,
        name: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.endpoints.push((
            Endpoint::Character(character_id, name.into()),
            expected_requests,
        ));
        self
    }

    /// Mock `/corporations/{corporation_id}` returning a corporation with the provided name
    pub fn with_corporation_endpoint(
        mut self,
        corporation_id: i64,
        name: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.endpoints.push((
            Endpoint::Corporation(corporation_id, name.into()),
            expected_requests,
        ));
        self
    }

    /// Mock `/alliances/{alliance_id}` returning an alliance with the provided name
    pub fn with_alliance_endpoint(
        mut self,
        alliance_id: i64,
        name: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.endpoints.push((
            Endpoint::Alliance(alliance_id, name.into()),
            expected_requests,
        ));
        self
    }

    /// Mock an ESI path responding with an error status
    pub fn with_esi_error_endpoint(
        mut self,
        path: impl Into<String>,
        status: usize,
        expected_requests: usize,
    ) -> Self {
        self.endpoints.push((
            Endpoint::EsiError(path.into(), status),
            expected_requests,
        ));
        self
    }

    /// Mock the RedisQ listen endpoint returning the provided JSON body
    pub fn with_redisq_endpoint(mut self, body: Value, expected_requests: usize) -> Self {
        self.endpoints
            .push((Endpoint::Redisq(body), expected_requests));
        self
    }

    /// Mock the RedisQ listen endpoint with a raw status and body
    pub fn with_redisq_raw_endpoint(
        mut self,
        status: usize,
        body: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.endpoints.push((
            Endpoint::RedisqRaw(status, body.into()),
            expected_requests,
        ));
        self
    }

    /// Add a custom mock endpoint with full control over the mock server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Create the configured tables, rows and mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Configured test environment
    /// - `Err(TestError::DbErr)` - Table creation or row insertion failed
    /// - `Err(TestError::EsiError)` - Mock ESI client initialization failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        setup.with_tables(self.tables).await?;

        for (region_id, name) in &self.regions {
            setup.insert_region(*region_id, name).await?;
        }
        for (solar_system_id, region_id, name) in &self.systems {
            setup
                .insert_system(*solar_system_id, *region_id, name)
                .await?;
        }
        for (type_id, name) in &self.types {
            setup.insert_type(*type_id, name.as_deref()).await?;
        }
        setup.insert_jumps(&self.jumps).await?;

        // Custom endpoints first so tests can stack mocks on one path in order
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (endpoint, expected) in self.endpoints {
            let mock = match endpoint {
                Endpoint::Character(id, name) => {
                    setup.create_character_endpoint(id, mock_character(&name), expected)
                }
                Endpoint::Corporation(id, name) => {
                    setup.create_corporation_endpoint(id, mock_corporation(&name), expected)
                }
                Endpoint::Alliance(id, name) => {
                    setup.create_alliance_endpoint(id, mock_alliance(&name), expected)
                }
                Endpoint::EsiError(path, status) => {
                    setup.create_esi_error_endpoint(&path, status, expected)
                }
                Endpoint::Redisq(body) => setup.create_redisq_endpoint(body, expected),
                Endpoint::RedisqRaw(status, body) => {
                    setup.create_redisq_raw_endpoint(status, &body, expected)
                }
            };
            mocks.push(mock);
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
