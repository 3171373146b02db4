pub mod baseline;
pub mod nonce;

pub use baseline::{BaselinePolicy, GeneratedPolicy};
pub use nonce::{NonceGenerator, RequestNonce};
