pub use super::factories::{ScriptedTransport, SeriesBatchFactory};

pub struct Factory;

impl Factory {
    pub fn series_batch() -> SeriesBatchFactory {
        SeriesBatchFactory::new()
    }

    pub fn scripted_transport() -> ScriptedTransport {
        ScriptedTransport::new()
    }
}
