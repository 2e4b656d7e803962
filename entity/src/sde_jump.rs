use sea_orm::entity::prelude::*;

/// A directed stargate connection between two solar systems.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mapSolarSystemJumps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "fromSolarSystemID")]
    pub from_solar_system_id: i64,
    #[sea_orm(primary_key, auto_increment = false, column_name = "toSolarSystemID")]
    pub to_solar_system_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
