use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mapSolarSystems")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "solarSystemID")]
    pub solar_system_id: i64,
    #[sea_orm(column_name = "regionID")]
    pub region_id: i64,
    #[sea_orm(column_name = "solarSystemName")]
    pub solar_system_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
