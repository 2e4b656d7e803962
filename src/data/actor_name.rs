use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::model::names::ActorKind;

/// Cache of character, corporation and alliance names resolved through ESI.
pub struct ActorNameRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ActorNameRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get cached names for the provided IDs, IDs without a cached name are absent
    pub async fn get_many(
        &self,
        kind: ActorKind,
        actor_ids: &[i64],
    ) -> Result<Vec<(i64, String)>, DbErr> {
        if actor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let names = entity::prelude::ActorName::find()
            .filter(entity::actor_name::Column::Kind.eq(kind.as_str()))
            .filter(entity::actor_name::Column::ActorId.is_in(actor_ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(names
            .into_iter()
            .map(|name| (name.actor_id, name.name))
            .collect())
    }

    /// Insert or refresh cached names
    pub async fn upsert_many(
        &self,
        kind: ActorKind,
        names: Vec<(i64, String)>,
    ) -> Result<(), DbErr> {
        if names.is_empty() {
            return Ok(());
        }

        let names = names
            .into_iter()
            .map(|(actor_id, name)| entity::actor_name::ActiveModel {
                kind: ActiveValue::Set(kind.as_str().to_string()),
                actor_id: ActiveValue::Set(actor_id),
                name: ActiveValue::Set(name),
                updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            });

        entity::prelude::ActorName::insert_many(names)
            .on_conflict(
                OnConflict::columns([
                    entity::actor_name::Column::Kind,
                    entity::actor_name::Column::ActorId,
                ])
                .update_columns([
                    entity::actor_name::Column::Name,
                    entity::actor_name::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }
}
