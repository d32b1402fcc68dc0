pub mod error;
pub mod lookup;
pub mod model;
pub mod resolver;
pub mod strategies;
pub mod strategy;

pub use error::ProbeError;
pub use lookup::{LookupClient, LookupReport};
pub use model::{Edge, EdgeKind, Node, NodeKind};
pub use resolver::DnsClient;
pub use strategy::Strategy;
