//! Signed HTTP client for the MinIO admin API.

use std::sync::Arc;

use bytes::Bytes;
use jiff::Timestamp;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};
use url::Url;

use super::signer::{SigningRequest, Signer, sha256_hex};
use crate::types::{AccountStatus, BucketQuota, DataUsageInfo, InfoMessage, StorageInfo};
use crate::{Error, MinossConfig, MinossCredentials, Result, TRACING_TARGET_ADMIN};

/// Path prefix of every admin API call.
pub const ADMIN_API_PREFIX: &str = "/minio/admin/v3";

/// Region admin requests are signed for.
pub const ADMIN_SIGNING_REGION: &str = "us-east-1";

/// Service name admin requests are signed for.
pub const ADMIN_SIGNING_SERVICE: &str = "s3";

const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";
const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Error body returned by the admin API.
#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Message", default)]
    message: String,
}

struct AdminClientInner {
    http: reqwest::Client,
    base_url: Url,
    signer: Signer,
    session_token: Option<String>,
}

/// Client for the MinIO administrative API.
///
/// Covers bucket quotas, usage and storage reporting, and user management.
/// Every call is a single signed request; nothing is retried.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

impl AdminClient {
    /// Creates an admin client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &MinossConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| Error::Config(format!("Invalid endpoint URL: {e}")))?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(format!("minoss/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let credentials: &MinossCredentials = config.credentials();
        let signer = Signer::new(
            credentials.access_key(),
            credentials.secret_key(),
            ADMIN_SIGNING_REGION,
            ADMIN_SIGNING_SERVICE,
        );

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                http,
                base_url,
                signer,
                session_token: credentials.session_token().map(String::from),
            }),
        })
    }

    /// Returns the endpoint the client talks to.
    #[inline]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetches the quota configured on a bucket.
    pub async fn get_bucket_quota(&self, bucket: &str) -> Result<BucketQuota> {
        self.get_json("get-bucket-quota", &[("bucket", bucket)])
            .await
    }

    /// Replaces the quota configured on a bucket.
    pub async fn set_bucket_quota(&self, bucket: &str, quota: &BucketQuota) -> Result<()> {
        let body = serde_json::to_vec(quota)?;
        self.execute(Method::PUT, "set-bucket-quota", &[("bucket", bucket)], body)
            .await?;
        Ok(())
    }

    /// Fetches cluster-wide data usage.
    pub async fn data_usage_info(&self) -> Result<DataUsageInfo> {
        self.get_json("datausageinfo", &[]).await
    }

    /// Fetches server and drive information of every node.
    pub async fn server_info(&self) -> Result<InfoMessage> {
        self.get_json("info", &[]).await
    }

    /// Fetches drive capacity information.
    pub async fn storage_info(&self) -> Result<StorageInfo> {
        self.get_json("storageinfo", &[]).await
    }

    /// Deletes a user.
    pub async fn remove_user(&self, access_key: &str) -> Result<()> {
        self.execute(
            Method::DELETE,
            "remove-user",
            &[("accessKey", access_key)],
            Vec::new(),
        )
        .await?;
        Ok(())
    }

    /// Enables or disables a user.
    pub async fn set_user_status(&self, access_key: &str, status: AccountStatus) -> Result<()> {
        self.execute(
            Method::PUT,
            "set-user-status",
            &[("accessKey", access_key), ("status", status.as_ref())],
            Vec::new(),
        )
        .await?;
        Ok(())
    }

    /// Attaches a canned policy to a user or group.
    pub async fn set_policy(&self, policy_name: &str, entity: &str, is_group: bool) -> Result<()> {
        let is_group = if is_group { "true" } else { "false" };
        self.execute(
            Method::PUT,
            "set-user-or-group-policy",
            &[
                ("policyName", policy_name),
                ("userOrGroup", entity),
                ("isGroup", is_group),
            ],
            Vec::new(),
        )
        .await?;
        Ok(())
    }

    /// Builds the URL of an admin API call.
    pub(crate) fn endpoint_url(&self, api: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.inner.base_url.clone();
        url.set_path(&format!("{ADMIN_API_PREFIX}/{api}"));
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Computes the authentication headers of a request.
    pub(crate) fn signed_headers(
        &self,
        method: &Method,
        url: &Url,
        body: &[u8],
        now: Timestamp,
    ) -> Result<HeaderMap> {
        let amz_date = now.strftime("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = sha256_hex(body);

        let mut signed = vec![
            ("host".to_string(), host_header(url)?),
            (X_AMZ_CONTENT_SHA256.to_string(), payload_hash.clone()),
            (X_AMZ_DATE.to_string(), amz_date.clone()),
        ];
        if let Some(token) = &self.inner.session_token {
            signed.push((X_AMZ_SECURITY_TOKEN.to_string(), token.clone()));
        }

        let request = SigningRequest {
            method: method.as_str(),
            path: url.path(),
            query: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            headers: signed.clone(),
            payload_hash: &payload_hash,
        };
        let authorization = self.inner.signer.authorization(&request, &amz_date);

        let mut headers = HeaderMap::new();
        // Host is filled in by the HTTP client from the URL.
        for (name, value) in signed.into_iter().filter(|(name, _)| name != "host") {
            headers.insert(header_name(&name)?, header_value(&value)?);
        }
        headers.insert(AUTHORIZATION, header_value(&authorization)?);

        Ok(headers)
    }

    async fn get_json<T: DeserializeOwned>(&self, api: &str, query: &[(&str, &str)]) -> Result<T> {
        let body = self.execute(Method::GET, api, query, Vec::new()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    #[instrument(skip(self, query, body), target = TRACING_TARGET_ADMIN, fields(method = %method))]
    async fn execute(
        &self,
        method: Method,
        api: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<Bytes> {
        let url = self.endpoint_url(api, query);
        let headers = self.signed_headers(&method, &url, &body, Timestamp::now())?;

        debug!(target: TRACING_TARGET_ADMIN, url = %url, "Sending admin request");

        let response = self
            .inner
            .http
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let err = decode_error(status, &bytes);
            error!(target: TRACING_TARGET_ADMIN, api, error = %err, "Admin request failed");
            return Err(err);
        }

        Ok(bytes)
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("signer", &self.inner.signer)
            .finish_non_exhaustive()
    }
}

/// Turns a non-success admin response into an [`Error::Admin`].
fn decode_error(status: StatusCode, body: &[u8]) -> Error {
    let parsed: ErrorResponse = serde_json::from_slice(body).unwrap_or_default();

    let code = if parsed.code.is_empty() {
        status.canonical_reason().unwrap_or("Unknown").to_string()
    } else {
        parsed.code
    };
    let message = if parsed.message.is_empty() {
        String::from_utf8_lossy(body).trim().to_string()
    } else {
        parsed.message
    };

    Error::Admin {
        status_code: status.as_u16(),
        code,
        message,
    }
}

fn host_header(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Config(format!("Endpoint has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| Error::InvalidRequest(format!("Invalid header name '{name}': {e}")))
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidRequest(format!("Invalid header value: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::signer::EMPTY_SHA256;

    fn test_client(credentials: MinossCredentials) -> AdminClient {
        let config = MinossConfig::new("localhost:9000", credentials);
        AdminClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        let client = test_client(MinossCredentials::new("minioadmin", "minioadmin"));

        let url = client.endpoint_url("get-bucket-quota", &[("bucket", "photos")]);
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/minio/admin/v3/get-bucket-quota?bucket=photos"
        );

        let url = client.endpoint_url("info", &[]);
        assert_eq!(url.as_str(), "http://localhost:9000/minio/admin/v3/info");
    }

    #[test]
    fn test_signed_headers() {
        let client = test_client(MinossCredentials::new("minioadmin", "minioadmin"));
        let url = client.endpoint_url("storageinfo", &[]);
        let now: Timestamp = "2024-01-02T03:04:05Z".parse().unwrap();

        let headers = client
            .signed_headers(&Method::GET, &url, b"", now)
            .unwrap();

        assert_eq!(headers[X_AMZ_DATE], "20240102T030405Z");
        assert_eq!(headers[X_AMZ_CONTENT_SHA256], EMPTY_SHA256);
        assert!(headers.get(X_AMZ_SECURITY_TOKEN).is_none());
        assert!(headers.get("host").is_none());

        let auth = headers[AUTHORIZATION].to_str().unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=minioadmin/20240102/us-east-1/s3/aws4_request, "
        ));
        assert!(auth.contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date, "));
    }

    #[test]
    fn test_signed_headers_with_session_token() {
        let client = test_client(MinossCredentials::with_session_token(
            "access", "secret", "token",
        ));
        let url = client.endpoint_url("info", &[]);
        let now: Timestamp = "2024-01-02T03:04:05Z".parse().unwrap();

        let headers = client
            .signed_headers(&Method::PUT, &url, b"{}", now)
            .unwrap();

        assert_eq!(headers[X_AMZ_SECURITY_TOKEN], "token");
        assert_eq!(headers[X_AMZ_CONTENT_SHA256], sha256_hex(b"{}"));
        let auth = headers[AUTHORIZATION].to_str().unwrap();
        assert!(auth.contains(
            "SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token"
        ));
    }

    #[test]
    fn test_signature_depends_on_time() {
        let client = test_client(MinossCredentials::new("access", "secret"));
        let url = client.endpoint_url("info", &[]);

        let first = client
            .signed_headers(&Method::GET, &url, b"", "2024-01-02T03:04:05Z".parse().unwrap())
            .unwrap();
        let second = client
            .signed_headers(&Method::GET, &url, b"", "2024-01-02T03:04:06Z".parse().unwrap())
            .unwrap();

        assert_ne!(first[AUTHORIZATION], second[AUTHORIZATION]);
    }

    #[test]
    fn test_decode_error_json_body() {
        let body = br#"{"Code":"XMinioAdminNoSuchUser","Message":"The specified user does not exist.","Resource":"/minio/admin/v3/remove-user"}"#;
        let err = decode_error(StatusCode::NOT_FOUND, body);

        match err {
            Error::Admin {
                status_code,
                code,
                message,
            } => {
                assert_eq!(status_code, 404);
                assert_eq!(code, "XMinioAdminNoSuchUser");
                assert_eq!(message, "The specified user does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_plain_body() {
        let err = decode_error(StatusCode::FORBIDDEN, b"access denied\n");
        match err {
            Error::Admin { code, message, .. } => {
                assert_eq!(code, "Forbidden");
                assert_eq!(message, "access denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
