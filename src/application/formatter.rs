use base64::{engine::general_purpose::STANDARD, Engine};

use crate::domain::models::ActionPostResponse;

/// Packages a serialized transaction for the wallet.
pub fn format_response(serialized: &[u8], message: impl Into<String>) -> ActionPostResponse {
    ActionPostResponse {
        transaction: STANDARD.encode(serialized),
        message: message.into(),
    }
}
