/// Server services
pub mod gateway;

pub use gateway::AudioGateway;
