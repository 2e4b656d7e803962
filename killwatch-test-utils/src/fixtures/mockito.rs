//! HTTP mock endpoint creation for ESI and RedisQ.
//!
//! Each method registers one endpoint on the mock server and returns the `Mock`
//! so the caller can verify how many times it was hit.

use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use mockito::{Matcher, Mock};
use serde_json::Value;

use crate::{constant::TEST_REDISQ_QUEUE_ID, TestContext};

impl TestContext {
    /// Mock `GET /characters/{character_id}` returning the provided character
    pub fn create_character_endpoint(
        &mut self,
        character_id: i64,
        mock_character: Character,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/characters/{}", character_id);

        self.server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_character).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /corporations/{corporation_id}` returning the provided corporation
    pub fn create_corporation_endpoint(
        &mut self,
        corporation_id: i64,
        mock_corporation: Corporation,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/corporations/{}", corporation_id);

        self.server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_corporation).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /alliances/{alliance_id}` returning the provided alliance
    pub fn create_alliance_endpoint(
        &mut self,
        alliance_id: i64,
        mock_alliance: Alliance,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/alliances/{}", alliance_id);

        self.server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_alliance).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Mock any ESI path responding with an error status
    pub fn create_esi_error_endpoint(
        &mut self,
        path: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"mock error"}"#)
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /listen.php?queueID=...` returning the provided body
    pub fn create_redisq_endpoint(&mut self, body: Value, expected_requests: usize) -> Mock {
        self.server
            .mock("GET", "/listen.php")
            .match_query(Matcher::UrlEncoded(
                "queueID".to_string(),
                TEST_REDISQ_QUEUE_ID.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Mock `GET /listen.php?queueID=...` responding with a raw status and body
    pub fn create_redisq_raw_endpoint(
        &mut self,
        status: usize,
        body: &str,
        expected_requests: usize,
    ) -> Mock {
        self.server
            .mock("GET", "/listen.php")
            .match_query(Matcher::UrlEncoded(
                "queueID".to_string(),
                TEST_REDISQ_QUEUE_ID.to_string(),
            ))
            .with_status(status)
            .with_body(body)
            .expect(expected_requests)
            .create()
    }
}
