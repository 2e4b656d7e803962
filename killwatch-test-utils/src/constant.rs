//! Placeholder values shared by every test environment.

/// User agent sent by the test ESI client and RedisQ client.
pub static TEST_USER_AGENT: &str = "killwatch-test/1.0 (contact@example.com)";

/// Queue ID the mock RedisQ endpoints expect in the `queueID` query parameter.
pub static TEST_REDISQ_QUEUE_ID: &str = "killwatch-test";
