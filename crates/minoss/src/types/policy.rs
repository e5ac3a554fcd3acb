//! Bucket policy documents.
//!
//! Policies are plain AWS IAM-style JSON documents. The types here only cover
//! the subset needed to build and inspect bucket policies; the server is the
//! authority on validation.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::Result;

/// Policy language version used by every generated document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
pub enum Effect {
    /// Grants the listed actions.
    Allow,
    /// Denies the listed actions.
    Deny,
}

/// Principal a statement applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// AWS account principals, `*` for everyone.
    #[serde(rename = "AWS", default)]
    pub aws: Vec<String>,
}

impl Principal {
    /// Principal matching every caller, including anonymous ones.
    pub fn anyone() -> Self {
        Self {
            aws: vec!["*".to_string()],
        }
    }
}

/// Individual statement within a bucket policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    /// Statement effect.
    #[serde(rename = "Effect")]
    pub effect: Effect,
    /// Principal this statement applies to.
    #[serde(rename = "Principal", default)]
    pub principal: Principal,
    /// Actions this statement applies to.
    #[serde(rename = "Action", default)]
    pub action: Vec<String>,
    /// Resources this statement applies to.
    #[serde(rename = "Resource", default)]
    pub resource: Vec<String>,
}

impl PolicyStatement {
    /// Creates a new statement with the given effect and no principal.
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            principal: Principal::default(),
            action: Vec::new(),
            resource: Vec::new(),
        }
    }

    /// Sets the principal.
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = principal;
        self
    }

    /// Adds an action to the statement.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action.push(action.into());
        self
    }

    /// Adds a resource to the statement.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource.push(resource.into());
        self
    }
}

/// Bucket policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketPolicy {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,
    /// Policy statements.
    #[serde(rename = "Statement", default)]
    pub statements: Vec<PolicyStatement>,
}

impl BucketPolicy {
    /// Creates a new empty bucket policy.
    pub fn new() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statements: Vec::new(),
        }
    }

    /// Adds a policy statement.
    pub fn with_statement(mut self, statement: PolicyStatement) -> Self {
        self.statements.push(statement);
        self
    }

    /// Public read-only policy for a bucket.
    ///
    /// Anyone may locate and list the bucket and its multipart uploads, and
    /// read every object in it. Used to serve downloads straight from the
    /// storage endpoint.
    pub fn public_read(bucket: &str) -> Self {
        let bucket_arn = format!("arn:aws:s3:::{bucket}");
        let objects_arn = format!("arn:aws:s3:::{bucket}/*");

        Self::new()
            .with_statement(
                PolicyStatement::new(Effect::Allow)
                    .with_principal(Principal::anyone())
                    .with_action("s3:GetBucketLocation")
                    .with_action("s3:ListBucket")
                    .with_action("s3:ListBucketMultipartUploads")
                    .with_resource(bucket_arn),
            )
            .with_statement(
                PolicyStatement::new(Effect::Allow)
                    .with_principal(Principal::anyone())
                    .with_action("s3:GetObject")
                    .with_action("s3:ListMultipartUploadParts")
                    .with_resource(objects_arn),
            )
    }

    /// Converts the policy to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for BucketPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON text of [`BucketPolicy::public_read`].
pub fn default_public_policy(bucket: &str) -> Result<String> {
    BucketPolicy::public_read(bucket).to_json()
}
