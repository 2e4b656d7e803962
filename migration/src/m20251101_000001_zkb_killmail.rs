use sea_orm_migration::{prelude::*, schema::*};

static IDX_ZKB_KILLMAIL_CREATED_AT: &str = "idx_zkb_killmail_created_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ZkbKillmail::Table)
                    .if_not_exists()
                    .col(big_integer(ZkbKillmail::Id).primary_key())
                    .col(text(ZkbKillmail::Killmail))
                    .col(timestamp(ZkbKillmail::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ZKB_KILLMAIL_CREATED_AT)
                    .table(ZkbKillmail::Table)
                    .col(ZkbKillmail::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ZKB_KILLMAIL_CREATED_AT)
                    .table(ZkbKillmail::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ZkbKillmail::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum ZkbKillmail {
    Table,
    Id,
    Killmail,
    CreatedAt,
}
