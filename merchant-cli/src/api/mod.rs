//! Merchant API Module
//!
//! Record types, the HTTP client for the two update endpoints, and the
//! decoding of both known backend response contracts into one outcome type.

pub mod client;
pub mod constants;
pub mod models;
pub mod response;

pub use client::{MerchantApi, MerchantClient};
pub use models::{CanonicalField, MerchantData, MerchantRecord, UploadFile};
pub use response::{ApiVariant, UploadOutcome};
