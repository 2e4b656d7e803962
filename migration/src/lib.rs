pub use sea_orm_migration::prelude::*;

mod m20251101_000001_zkb_killmail;
mod m20251101_000002_actor_name;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251101_000001_zkb_killmail::Migration),
            Box::new(m20251101_000002_actor_name::Migration),
        ]
    }
}
