use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Storage error: {0}")]
    Store(#[from] avr_store::StoreError),

    #[error("Receiver client error: {0}")]
    Client(#[from] avr_client::ClientError),

    #[error("Invalid platform configuration: {0}")]
    Config(#[from] serde_json::Error),
}
