use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invTypes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "typeID")]
    pub type_id: i64,
    #[sea_orm(column_name = "typeName")]
    pub type_name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
