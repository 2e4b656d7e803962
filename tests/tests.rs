mod pipeline;

#[cfg(feature = "redis-test")]
mod bus;
