//! Read-only lookups against the EVE Static Data Export.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use crate::service::route::RegionGraph;

/// Name returned for IDs missing from the static data
pub const UNKNOWN_NAME: &str = "!Unknown!";

pub struct UniverseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UniverseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn system_name(&self, solar_system_id: i64) -> Result<String, DbErr> {
        let system = entity::prelude::SdeSolarSystem::find_by_id(solar_system_id)
            .one(self.db)
            .await?;

        Ok(system
            .map(|s| s.solar_system_name)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()))
    }

    /// Region containing a solar system, `None` for an unknown system
    pub async fn system_region(&self, solar_system_id: i64) -> Result<Option<i64>, DbErr> {
        let system = entity::prelude::SdeSolarSystem::find_by_id(solar_system_id)
            .one(self.db)
            .await?;

        Ok(system.map(|s| s.region_id))
    }

    pub async fn region_name(&self, region_id: i64) -> Result<String, DbErr> {
        let region = entity::prelude::SdeRegion::find_by_id(region_id)
            .one(self.db)
            .await?;

        Ok(region
            .map(|r| r.region_name)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()))
    }

    pub async fn type_name(&self, type_id: i64) -> Result<String, DbErr> {
        let inv_type = entity::prelude::SdeType::find_by_id(type_id)
            .one(self.db)
            .await?;

        Ok(inv_type
            .and_then(|t| t.type_name)
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()))
    }

    /// Read every stargate connection into an in-memory graph
    pub async fn load_jump_graph(&self) -> Result<RegionGraph, DbErr> {
        let jumps = entity::prelude::SdeJump::find().all(self.db).await?;

        Ok(RegionGraph::from_edges(
            jumps
                .into_iter()
                .map(|j| (j.from_solar_system_id, j.to_solar_system_id)),
        ))
    }
}
