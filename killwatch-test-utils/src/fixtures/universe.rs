//! Static data fixtures.
//!
//! Inserts rows into the SDE tables. The tables must have been created first with
//! `TestBuilder::with_universe_tables`.

use sea_orm::{ActiveValue, DbErr, EntityTrait};

use crate::TestContext;

impl TestContext {
    pub async fn insert_region(&self, region_id: i64, name: &str) -> Result<(), DbErr> {
        let region = entity::sde_region::ActiveModel {
            region_id: ActiveValue::Set(region_id),
            region_name: ActiveValue::Set(name.to_string()),
        };

        entity::prelude::SdeRegion::insert(region)
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    pub async fn insert_system(
        &self,
        solar_system_id: i64,
        region_id: i64,
        name: &str,
    ) -> Result<(), DbErr> {
        let system = entity::sde_solar_system::ActiveModel {
            solar_system_id: ActiveValue::Set(solar_system_id),
            region_id: ActiveValue::Set(region_id),
            solar_system_name: ActiveValue::Set(name.to_string()),
        };

        entity::prelude::SdeSolarSystem::insert(system)
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    pub async fn insert_type(&self, type_id: i64, name: Option<&str>) -> Result<(), DbErr> {
        let inv_type = entity::sde_type::ActiveModel {
            type_id: ActiveValue::Set(type_id),
            type_name: ActiveValue::Set(name.map(str::to_string)),
        };

        entity::prelude::SdeType::insert(inv_type)
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }

    /// Insert stargate connections, one row per `(from, to)` direction
    pub async fn insert_jumps(&self, jumps: &[(i64, i64)]) -> Result<(), DbErr> {
        if jumps.is_empty() {
            return Ok(());
        }

        let jumps = jumps.iter().map(|&(from, to)| entity::sde_jump::ActiveModel {
            from_solar_system_id: ActiveValue::Set(from),
            to_solar_system_id: ActiveValue::Set(to),
        });

        entity::prelude::SdeJump::insert_many(jumps)
            .exec_without_returning(&self.db)
            .await?;

        Ok(())
    }
}
