//! Merchant order numbers.

use chrono::{DateTime, Utc};

use super::PaidService;

/// Number of trailing openid characters embedded in an order number.
pub const OPENID_SUFFIX_LEN: usize = 8;

/// Last [`OPENID_SUFFIX_LEN`] characters of `openid` (all of it if shorter).
pub fn openid_suffix(openid: &str) -> &str {
    let count = openid.chars().count();
    if count <= OPENID_SUFFIX_LEN {
        return openid;
    }
    let start = openid
        .char_indices()
        .nth(count - OPENID_SUFFIX_LEN)
        .map(|(index, _)| index)
        .unwrap_or(0);
    &openid[start..]
}

/// `<service>_<unix seconds>_<openid suffix>`.
pub fn order_number(service: PaidService, openid: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}_{}", service.as_str(), at.timestamp(), openid_suffix(openid))
}
