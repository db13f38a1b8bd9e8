//! WeChat Pay v2 request signing.
//!
//! Parameters with empty values and the `sign` field itself are dropped, the
//! rest are sorted by key and joined as `k=v` pairs with `&`, and
//! `&key=<api key>` is appended. The digest is MD5 or HMAC-SHA256 keyed with
//! the api key, rendered as upper-case hex.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the signature field in gateway payloads.
pub const SIGN_FIELD: &str = "sign";

/// Length of generated nonce strings.
pub const NONCE_LEN: usize = 32;

/// Gateway parameters, kept sorted by key.
pub type Params = BTreeMap<String, String>;

/// Digest used for signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignType {
    #[default]
    Md5,
    HmacSha256,
}

impl SignType {
    /// Name the gateway expects in `sign_type` / `signType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignType::Md5 => "MD5",
            SignType::HmacSha256 => "HMAC-SHA256",
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignType {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(SignType::Md5),
            "hmac-sha256" | "hmac_sha256" => Ok(SignType::HmacSha256),
            other => Err(PaymentError::Signing(format!("unsupported sign type: {}", other))),
        }
    }
}

/// The string that gets digested.
pub fn signing_string(params: &Params, api_key: &str) -> String {
    let mut joined = params
        .iter()
        .filter(|(key, value)| !value.is_empty() && key.as_str() != SIGN_FIELD)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    if !joined.is_empty() {
        joined.push('&');
    }
    joined.push_str("key=");
    joined.push_str(api_key);
    joined
}

/// Signs `params` with `api_key`.
pub fn sign(params: &Params, api_key: &str, sign_type: SignType) -> Result<String, PaymentError> {
    let payload = signing_string(params, api_key);
    let digest = match sign_type {
        SignType::Md5 => format!("{:x}", md5::compute(payload.as_bytes())),
        SignType::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(api_key.as_bytes())
                .map_err(|e| PaymentError::Signing(e.to_string()))?;
            mac.update(payload.as_bytes());
            hex::encode(mac.finalize().into_bytes())
        }
    };
    Ok(digest.to_uppercase())
}

/// Checks the `sign` field of `params` in constant time.
///
/// A missing signature never verifies.
pub fn verify(params: &Params, api_key: &str, sign_type: SignType) -> Result<bool, PaymentError> {
    let Some(provided) = params.get(SIGN_FIELD).filter(|s| !s.is_empty()) else {
        return Ok(false);
    };
    let expected = sign(params, api_key, sign_type)?;
    Ok(expected.as_bytes().ct_eq(provided.as_bytes()).into())
}

/// Random alphanumeric nonce of [`NONCE_LEN`] characters.
pub fn nonce_str() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

    fn sample() -> Params {
        [
            ("appid", "wxd930ea5d5a258f4f"),
            ("mch_id", "10000100"),
            ("device_info", "1000"),
            ("body", "test"),
            ("nonce_str", "ibuaiVcKdpRxkhJA"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn signing_string_is_sorted_and_keyed() {
        assert_eq!(
            signing_string(&sample(), API_KEY),
            "appid=wxd930ea5d5a258f4f&body=test&device_info=1000&mch_id=10000100&nonce_str=ibuaiVcKdpRxkhJA&key=192006250b4c09247ec02edce69f6a2d"
        );
    }

    #[test]
    fn empty_values_and_sign_are_skipped() {
        let mut params = sample();
        params.insert("attach".to_string(), String::new());
        params.insert(SIGN_FIELD.to_string(), "OLD".to_string());

        assert_eq!(signing_string(&params, API_KEY), signing_string(&sample(), API_KEY));
    }

    #[test]
    fn md5_matches_gateway_documentation() {
        assert_eq!(
            sign(&sample(), API_KEY, SignType::Md5).unwrap(),
            "9A0A8659F005D6984697E2CA0A9CF3B7"
        );
    }

    #[test]
    fn hmac_sha256_matches_gateway_documentation() {
        assert_eq!(
            sign(&sample(), API_KEY, SignType::HmacSha256).unwrap(),
            "6A9AE1657590FD6257D693A078E1C3E4BB6BA4DC30B23E0EE2496E54170DACD6"
        );
    }

    #[test]
    fn verify_accepts_own_signature_and_rejects_tampering() {
        let mut params = sample();
        let signature = sign(&params, API_KEY, SignType::Md5).unwrap();
        params.insert(SIGN_FIELD.to_string(), signature);
        assert!(verify(&params, API_KEY, SignType::Md5).unwrap());

        params.insert("body".to_string(), "tampered".to_string());
        assert!(!verify(&params, API_KEY, SignType::Md5).unwrap());
    }

    #[test]
    fn verify_rejects_missing_signature() {
        assert!(!verify(&sample(), API_KEY, SignType::Md5).unwrap());
    }

    #[test]
    fn nonce_is_32_alphanumeric_chars() {
        let nonce = nonce_str();
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(nonce, nonce_str());
    }

    #[test]
    fn sign_type_parses_config_names() {
        assert_eq!("md5".parse::<SignType>().unwrap(), SignType::Md5);
        assert_eq!("HMAC-SHA256".parse::<SignType>().unwrap(), SignType::HmacSha256);
        assert!("sha1".parse::<SignType>().is_err());
    }
}
