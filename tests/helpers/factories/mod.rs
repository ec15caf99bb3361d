pub mod scripted_transport;
pub mod series_batch_factory;

pub use scripted_transport::{ScriptedTransport, TransportLog};
pub use series_batch_factory::SeriesBatchFactory;

#[cfg(test)]
mod series_batch_factory_test;
