//! AWS Signature Version 4 request signing.
//!
//! The admin API authenticates exactly like S3: the request is canonicalized,
//! hashed, and signed with a key derived from the secret key, the date, the
//! region and the service name.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Hex SHA-256 of an empty payload.
pub const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Canonicalizable view of an HTTP request.
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    /// Upper-case HTTP method.
    pub method: &'a str,
    /// Already percent-encoded absolute path.
    pub path: &'a str,
    /// Decoded query parameters.
    pub query: Vec<(String, String)>,
    /// Headers to sign. Names are lower-cased during canonicalization.
    pub headers: Vec<(String, String)>,
    /// Hex SHA-256 of the request body.
    pub payload_hash: &'a str,
}

/// Signs requests for one set of credentials, region and service.
#[derive(Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
    region: String,
    service: String,
}

impl Signer {
    /// Creates a signer.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Credential scope for the given `YYYYMMDD` date.
    pub fn scope(&self, date: &str) -> String {
        format!("{date}/{}/{}/aws4_request", self.region, self.service)
    }

    /// Builds the `Authorization` header value.
    ///
    /// `amz_date` is the `YYYYMMDDTHHMMSSZ` timestamp also sent as
    /// `x-amz-date`; it must be one of the signed headers.
    pub fn authorization(&self, request: &SigningRequest<'_>, amz_date: &str) -> String {
        let date = &amz_date[..8.min(amz_date.len())];
        let scope = self.scope(date);
        let (canonical, signed_headers) = canonical_request(request);

        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical.as_bytes())
        );

        let key = signing_key(&self.secret_key, date, &self.region, &self.service);
        let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

        format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.access_key
        )
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

/// Returns the canonical request and the signed headers list.
pub fn canonical_request(request: &SigningRequest<'_>) -> (String, String) {
    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), normalize_header_value(value)))
        .collect();
    headers.sort();

    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let path = if request.path.is_empty() {
        "/"
    } else {
        request.path
    };

    let canonical = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        request.method,
        path,
        canonical_query(&request.query),
        canonical_headers,
        signed_headers,
        request.payload_hash
    );

    (canonical, signed_headers)
}

/// Encodes and sorts query parameters.
pub fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encodes everything except RFC 3986 unreserved characters.
pub fn uri_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

/// Derives the signing key for a date, region and service.
pub fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Hex SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    #[test]
    fn test_signing_key_derivation() {
        let key = signing_key(SECRET, "20120215", "us-east-1", "iam");
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_get_vanilla_signature() {
        let signer = Signer::new("AKIDEXAMPLE", SECRET, "us-east-1", "service");
        let request = SigningRequest {
            method: "GET",
            path: "/",
            query: Vec::new(),
            headers: vec![
                ("Host".to_string(), "example.amazonaws.com".to_string()),
                ("X-Amz-Date".to_string(), "20150830T123600Z".to_string()),
            ],
            payload_hash: EMPTY_SHA256,
        };

        assert_eq!(
            signer.authorization(&request, "20150830T123600Z"),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, \
             SignedHeaders=host;x-amz-date, \
             Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        );
    }

    #[test]
    fn test_canonical_request_layout() {
        let request = SigningRequest {
            method: "PUT",
            path: "/minio/admin/v3/set-user-status",
            query: vec![
                ("status".to_string(), "enabled".to_string()),
                ("accessKey".to_string(), "user one".to_string()),
            ],
            headers: vec![
                ("x-amz-date".to_string(), "20240101T000000Z".to_string()),
                ("Host".to_string(), "  localhost:9000 ".to_string()),
            ],
            payload_hash: EMPTY_SHA256,
        };

        let (canonical, signed) = canonical_request(&request);
        assert_eq!(signed, "host;x-amz-date");
        assert_eq!(
            canonical,
            format!(
                "PUT\n/minio/admin/v3/set-user-status\naccessKey=user%20one&status=enabled\n\
                 host:localhost:9000\nx-amz-date:20240101T000000Z\n\nhost;x-amz-date\n{EMPTY_SHA256}"
            )
        );
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("abc-_.~XYZ09"), "abc-_.~XYZ09");
        assert_eq!(uri_encode("a b/c+d"), "a%20b%2Fc%2Bd");
        assert_eq!(uri_encode("ü"), "%C3%BC");
    }

    #[test]
    fn test_sha256_hex_of_empty_payload() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA256);
    }
}
