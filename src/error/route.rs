use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    // The universe is far smaller than the jump ceiling, so hitting it means the
    // jump table is corrupt rather than the destination being far away.
    #[error(
        "Route search from solar system {origin} to {destination} exceeded {max_jumps} jumps.\n\
        \n\
        The static data jump table is most likely corrupt or incomplete, verify the SDE \
        database before trusting any jump counts."
    )]
    SearchExhausted {
        origin: i64,
        destination: i64,
        max_jumps: usize,
    },
}
