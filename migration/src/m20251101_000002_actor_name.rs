use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActorName::Table)
                    .if_not_exists()
                    .col(string(ActorName::Kind))
                    .col(big_integer(ActorName::ActorId))
                    .col(string(ActorName::Name))
                    .col(timestamp(ActorName::UpdatedAt))
                    .primary_key(
                        Index::create()
                            .col(ActorName::Kind)
                            .col(ActorName::ActorId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActorName::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ActorName {
    Table,
    Kind,
    ActorId,
    Name,
    UpdatedAt,
}
