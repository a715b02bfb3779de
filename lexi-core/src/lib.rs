pub mod config;

pub use config::{
    Config, ConfigError, GatewaySettings, ModelSettings, RetrievalSettings, Secrets, SecretsError,
    Settings, SettingsError, SpeechSettings,
};
