//! In-memory session store with time-based eviction.
//!
//! - `store` -- `SessionStore`, a single reader/writer lock over every session
//! - `sweeper` -- `EvictionSweeper`, the cancellable periodic sweep task
//!
//! Expired sessions are hidden on read (lazy expiry) and physically removed
//! by the sweeper (active expiry).
//!
//! The whole keyspace shares one lock. That caps write throughput; if it
//! ever matters, shard the table by user-id hash into independently locked
//! partitions.

pub mod store;
pub mod sweeper;

pub use store::SessionStore;
pub use sweeper::EvictionSweeper;
