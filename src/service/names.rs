use std::collections::{BTreeSet, HashSet};

use dioxus_logger::tracing;
use futures::stream::{FuturesUnordered, StreamExt};
use sea_orm::DatabaseConnection;

use crate::{
    data::actor_name::ActorNameRepository,
    error::Error,
    model::{
        killmail::NameIds,
        names::{ActorKind, ActorNames},
    },
    service::retry::RetryContext,
};

/// Number of concurrent ESI requests per chunk
const ESI_CHUNK_SIZE: usize = 10;

/// Resolves character, corporation and alliance IDs to names.
///
/// Names are read from the `actor_name` cache first, anything missing is fetched
/// from ESI and written back to the cache.
pub struct NameService<'a> {
    db: &'a DatabaseConnection,
    esi_client: &'a eve_esi::Client,
}

impl<'a> NameService<'a> {
    /// Creates a new instance of [`NameService`]
    pub fn new(db: &'a DatabaseConnection, esi_client: &'a eve_esi::Client) -> Self {
        Self { db, esi_client }
    }

    /// Resolve every ID referenced by a killmail
    ///
    /// Never fails: an ID that could not be resolved is left out of its mapping
    /// and the failure is logged. ID 0 always maps to an empty string.
    pub async fn resolve(&self, ids: &NameIds) -> ActorNames {
        let mut names = ActorNames::new();

        for (kind, actor_ids) in [
            (ActorKind::Character, &ids.character_ids),
            (ActorKind::Corporation, &ids.corporation_ids),
            (ActorKind::Alliance, &ids.alliance_ids),
        ] {
            let resolved = self.resolve_kind(kind, actor_ids).await;
            names.map_mut(kind).extend(resolved);
        }

        names
    }

    async fn resolve_kind(&self, kind: ActorKind, actor_ids: &[i64]) -> Vec<(i64, String)> {
        let unique_ids: Vec<i64> = actor_ids
            .iter()
            .copied()
            .filter(|&id| id != 0)
            .collect::<BTreeSet<i64>>()
            .into_iter()
            .collect();

        if unique_ids.is_empty() {
            return Vec::new();
        }

        let name_repo = ActorNameRepository::new(self.db);

        // The cache only saves ESI requests, a broken cache falls back to ESI
        let cached = match name_repo.get_many(kind, &unique_ids).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Failed to read cached {} names: {}", kind, e);
                Vec::new()
            }
        };

        let cached_ids: HashSet<i64> = cached.iter().map(|(id, _)| *id).collect();
        let missing_ids: Vec<i64> = unique_ids
            .into_iter()
            .filter(|id| !cached_ids.contains(id))
            .collect();

        if missing_ids.is_empty() {
            return cached;
        }

        let fetched = self.fetch_names(kind, &missing_ids).await;

        if let Err(e) = name_repo.upsert_many(kind, fetched.clone()).await {
            tracing::warn!("Failed to cache {} {} names: {}", fetched.len(), kind, e);
        }

        cached.into_iter().chain(fetched).collect()
    }

    /// Fetch names from ESI in chunks of up to 10 concurrent requests
    async fn fetch_names(&self, kind: ActorKind, actor_ids: &[i64]) -> Vec<(i64, String)> {
        let esi_client = self.esi_client;
        let mut fetched = Vec::with_capacity(actor_ids.len());

        for chunk in actor_ids.chunks(ESI_CHUNK_SIZE) {
            let mut futures = FuturesUnordered::new();

            for &actor_id in chunk {
                let future = async move {
                    let description = format!("{} {} name", kind, actor_id);
                    let result = RetryContext::new()
                        .execute_with_retry(&description, || {
                            fetch_name(esi_client, kind, actor_id)
                        })
                        .await;
                    (actor_id, result)
                };
                futures.push(future);
            }

            while let Some((actor_id, result)) = futures.next().await {
                match result {
                    Ok(name) => fetched.push((actor_id, name)),
                    Err(e) => {
                        tracing::warn!("Failed to resolve {} {}: {}", kind, actor_id, e)
                    }
                }
            }
        }

        fetched
    }
}

async fn fetch_name(
    esi_client: &eve_esi::Client,
    kind: ActorKind,
    actor_id: i64,
) -> Result<String, Error> {
    let name = match kind {
        ActorKind::Character => {
            esi_client
                .character()
                .get_character_public_information(actor_id)
                .await?
                .name
        }
        ActorKind::Corporation => {
            esi_client
                .corporation()
                .get_corporation_information(actor_id)
                .await?
                .name
        }
        ActorKind::Alliance => {
            esi_client
                .alliance()
                .get_alliance_information(actor_id)
                .await?
                .name
        }
    };

    Ok(name)
}

#[cfg(test)]
mod tests {
    use killwatch_test_utils::prelude::*;

    use super::*;

    fn ids(character_ids: &[i64], corporation_ids: &[i64], alliance_ids: &[i64]) -> NameIds {
        NameIds {
            character_ids: character_ids.to_vec(),
            corporation_ids: corporation_ids.to_vec(),
            alliance_ids: alliance_ids.to_vec(),
        }
    }

    /// Tests resolving names that are not cached yet.
    ///
    /// Verifies each ID is fetched once from ESI even when it appears several
    /// times, and that the fetched names are written to the cache.
    ///
    /// Expected: all names resolved, one request per unique ID
    #[tokio::test]
    async fn fetches_missing_names_from_esi() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_cache_tables()
            .with_character_endpoint(1, "Pilot", 1)
            .with_corporation_endpoint(2, "Corp", 1)
            .with_alliance_endpoint(3, "Alliance", 1)
            .build()
            .await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[1, 1], &[2], &[3, 3, 3]))
            .await;

        assert_eq!(names.get(ActorKind::Character, 1), Some("Pilot"));
        assert_eq!(names.get(ActorKind::Corporation, 2), Some("Corp"));
        assert_eq!(names.get(ActorKind::Alliance, 3), Some("Alliance"));

        let cached = ActorNameRepository::new(&test.db)
            .get_many(ActorKind::Corporation, &[2])
            .await?;
        assert_eq!(cached, vec![(2, "Corp".to_string())]);

        test.assert_mocks();

        Ok(())
    }

    /// Tests that cached names skip ESI entirely.
    ///
    /// Expected: name resolved with zero ESI requests
    #[tokio::test]
    async fn uses_cached_names() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_cache_tables()
            .with_character_endpoint(1, "Pilot", 0)
            .build()
            .await?;
        ActorNameRepository::new(&test.db)
            .upsert_many(ActorKind::Character, vec![(1, "Cached Pilot".to_string())])
            .await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[1], &[], &[]))
            .await;

        assert_eq!(names.get(ActorKind::Character, 1), Some("Cached Pilot"));
        test.assert_mocks();

        Ok(())
    }

    /// Tests that the absent sentinel is never requested and always present.
    ///
    /// Expected: 0 -> "" in all three maps without any ESI request
    #[tokio::test]
    async fn zero_maps_to_empty_name() -> Result<(), TestError> {
        let test = TestBuilder::new().with_cache_tables().build().await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[0], &[0, 0], &[]))
            .await;

        for kind in ActorKind::ALL {
            assert_eq!(names.get(kind, 0), Some(""));
        }
        assert_eq!(names.character_ids.len(), 1);

        Ok(())
    }

    /// Tests that a failed lookup is left out instead of failing the batch.
    ///
    /// ESI answers 404 for deleted characters, which is not retried.
    ///
    /// Expected: the resolvable name is present, the failed ID is missing
    #[tokio::test]
    async fn omits_ids_that_fail_to_resolve() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_cache_tables()
            .with_character_endpoint(1, "Pilot", 1)
            .with_esi_error_endpoint("/characters/404", 404, 1)
            .build()
            .await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[1, 404], &[], &[]))
            .await;

        assert_eq!(names.get(ActorKind::Character, 1), Some("Pilot"));
        assert_eq!(names.get(ActorKind::Character, 404), None);
        test.assert_mocks();

        Ok(())
    }

    /// Tests that an ESI server error is retried.
    ///
    /// Expected: name resolved after one failed and one successful request
    #[tokio::test]
    async fn retries_on_esi_server_error() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_cache_tables()
            .with_mock_endpoint(|server| {
                server
                    .mock("GET", "/alliances/3")
                    .with_status(500)
                    .expect(1)
                    .create()
            })
            .with_alliance_endpoint(3, "Alliance", 1)
            .build()
            .await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[], &[], &[3]))
            .await;

        assert_eq!(names.get(ActorKind::Alliance, 3), Some("Alliance"));
        test.assert_mocks();

        Ok(())
    }

    /// Tests resolving names without a usable cache.
    ///
    /// Expected: names still resolved from ESI
    #[tokio::test]
    async fn resolves_without_cache_tables() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_character_endpoint(1, "Pilot", 1)
            .build()
            .await?;

        let names = NameService::new(&test.db, &test.esi_client)
            .resolve(&ids(&[1], &[], &[]))
            .await;

        assert_eq!(names.get(ActorKind::Character, 1), Some("Pilot"));

        Ok(())
    }
}
