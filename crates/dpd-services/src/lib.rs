//! # dpd-services
//!
//! The client-side board engine: identity, the record store, the async
//! mutation gateway and the board controller that ties them to a render sink.

pub mod board;
pub mod gateway;
pub mod identity;
pub mod ids;
pub mod latency;
pub mod record_store;
pub mod seed;

pub use board::{Board, LOAD_FAILED_MESSAGE};
pub use gateway::MutationGateway;
pub use identity::{generate_client_id, ClientIdentity, DEFAULT_CLIENT_ID_KEY};
pub use ids::IdSequence;
pub use latency::SimulatedLatency;
pub use record_store::{RecordStore, DEFAULT_TOPICS_KEY};
pub use seed::sample_topics;
