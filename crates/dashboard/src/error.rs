use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Input(#[from] core_types::CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] database::DbError),

    /// Relayed as-is so the user sees the provider's or proxy's message.
    #[error(transparent)]
    Feed(#[from] api_client::ApiError),

    #[error(transparent)]
    Simulator(#[from] simulator::SimulatorError),
}
