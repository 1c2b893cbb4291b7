//! Merchant API endpoints and request constants

/// Path of the single-record update endpoint, followed by `/{merchantId}`
pub const UPDATE_MERCHANT_PATH: &str = "merchant/update";

/// Path of the bulk spreadsheet update endpoint
pub const UPDATE_MULTIPLE_PATH: &str = "merchant/update-multiple";

/// Multipart field carrying the uploaded spreadsheet
pub const UPLOAD_FIELD_NAME: &str = "file";

pub const USER_AGENT: &str = concat!("merchant-cli/", env!("CARGO_PKG_VERSION"));

/// Join a base URL and an endpoint path without doubling slashes
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// URL of the single-record update endpoint for `merchant_id`
pub fn update_merchant_url(base_url: &str, merchant_id: &str) -> String {
    format!(
        "{}/{}",
        endpoint_url(base_url, UPDATE_MERCHANT_PATH),
        urlencoding::encode(merchant_id)
    )
}
