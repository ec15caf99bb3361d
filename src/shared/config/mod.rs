pub mod model;

pub use model::{
    ConnectionConfig, LoggingConfig, ProtocolConfig, Settings, load_settings, load_settings_from,
};
