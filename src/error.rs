use thiserror::Error;

/// Recoverable failures inside the backdrop core.
///
/// None of these reach the user: the caller logs and skips the update, and the
/// next event or tick retries with the last good state.
#[derive(Debug, Error)]
pub enum BackdropError {
    #[error("surrounding cube has no scale snapshot yet")]
    MissingCubeSnapshot,
    #[error("unknown telemetry resource `{0}`")]
    UnknownResource(String),
    #[error("could not decode telemetry resource `{resource}`")]
    Decode {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}
