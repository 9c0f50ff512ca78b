//! Natural-language rationale for model classifications: prompt building,
//! input preconditions, and the Azure OpenAI chat client.

mod error;
pub use error::RationaleError;

pub mod prompt;
pub use prompt::{ChatMessage, RationaleInputs};

#[cfg(feature = "http")]
pub mod client;

#[cfg(feature = "http")]
pub use client::{AzureConfig, Rationale, RationaleClient};
