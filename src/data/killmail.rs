use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait};

/// Append-only cache of raw killmails keyed by killmail ID.
pub struct KillmailRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> KillmailRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a raw killmail, ignoring IDs that are already cached
    ///
    /// # Returns
    /// - `Ok(true)` - The killmail was written
    /// - `Ok(false)` - A killmail with this ID was already cached
    pub async fn insert(&self, killmail_id: i64, raw: &str) -> Result<bool, DbErr> {
        let killmail = entity::zkb_killmail::ActiveModel {
            id: ActiveValue::Set(killmail_id),
            killmail: ActiveValue::Set(raw.to_string()),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
        };

        let rows_affected = entity::prelude::ZkbKillmail::insert(killmail)
            .on_conflict(
                OnConflict::column(entity::zkb_killmail::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(rows_affected > 0)
    }

    /// Get the raw JSON of a cached killmail
    pub async fn get(&self, killmail_id: i64) -> Result<Option<String>, DbErr> {
        let killmail = entity::prelude::ZkbKillmail::find_by_id(killmail_id)
            .one(self.db)
            .await?;

        Ok(killmail.map(|k| k.killmail))
    }
}

#[cfg(test)]
mod tests {
    use killwatch_test_utils::prelude::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;

    /// Tests caching a new killmail.
    ///
    /// Expected: Ok(true) and the raw JSON can be read back
    #[tokio::test]
    async fn inserts_new_killmail() -> Result<(), TestError> {
        let test = TestBuilder::new().with_cache_tables().build().await?;
        let killmail_repo = KillmailRepository::new(&test.db);

        let written = killmail_repo.insert(100, r#"{"killmail_id":100}"#).await?;

        assert!(written);
        assert_eq!(
            killmail_repo.get(100).await?.as_deref(),
            Some(r#"{"killmail_id":100}"#)
        );

        Ok(())
    }

    /// Tests inserting the same killmail ID twice.
    ///
    /// Verifies the second insert neither errors nor replaces the first payload.
    ///
    /// Expected: Ok(false) on the duplicate and exactly one row stored
    #[tokio::test]
    async fn duplicate_insert_is_ignored() -> Result<(), TestError> {
        let test = TestBuilder::new().with_cache_tables().build().await?;
        let killmail_repo = KillmailRepository::new(&test.db);

        assert!(killmail_repo.insert(100, r#"{"first":true}"#).await?);
        let result = killmail_repo.insert(100, r#"{"first":false}"#).await;

        assert!(result.is_ok(), "Error: {:?}", result);
        assert!(!result.unwrap());
        assert_eq!(entity::prelude::ZkbKillmail::find().count(&test.db).await?, 1);
        assert_eq!(
            killmail_repo.get(100).await?.as_deref(),
            Some(r#"{"first":true}"#)
        );

        Ok(())
    }

    /// Tests looking up a killmail that was never cached.
    ///
    /// Expected: Ok(None)
    #[tokio::test]
    async fn get_returns_none_for_unknown_id() -> Result<(), TestError> {
        let test = TestBuilder::new().with_cache_tables().build().await?;
        let killmail_repo = KillmailRepository::new(&test.db);

        assert_eq!(killmail_repo.get(404).await?, None);

        Ok(())
    }

    /// Tests that a missing table surfaces as an error rather than a panic.
    ///
    /// Expected: Err
    #[tokio::test]
    async fn insert_fails_without_table() -> Result<(), TestError> {
        let test = TestBuilder::new().build().await?;
        let killmail_repo = KillmailRepository::new(&test.db);

        let result = killmail_repo.insert(100, "{}").await;

        assert!(result.is_err());

        Ok(())
    }
}
