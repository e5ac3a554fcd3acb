//! Subcommands and their execution.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use minoss::{
    AccountStatus, GetObjectOptions, MinossClient, PutObjectOptions, RemoveObjectOptions,
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::TRACING_TARGET_COMMAND;

/// Path argument meaning standard input or output.
const STDIO: &str = "-";

/// Operation to run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List buckets.
    Buckets,

    /// Create a bucket unless it already exists.
    MakeBucket { bucket: String },

    /// List the top level of a bucket.
    Objects { bucket: String },

    /// List objects under a prefix.
    Search {
        bucket: String,
        /// Key prefix to match.
        #[arg(long, default_value = "")]
        prefix: String,
        /// Descend into nested prefixes.
        #[arg(long)]
        recursive: bool,
    },

    /// Upload a file, or standard input when the path is `-`.
    Upload {
        bucket: String,
        key: String,
        path: PathBuf,
        /// MIME type stored with the object.
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Download an object to a file, or standard output when the path is `-`.
    Download {
        bucket: String,
        key: String,
        path: PathBuf,
        /// Object version to fetch.
        #[arg(long)]
        version_id: Option<String>,
        /// Byte offset to start at.
        #[arg(long)]
        offset: Option<u64>,
        /// Number of bytes to fetch.
        #[arg(long)]
        length: Option<u64>,
    },

    /// Remove an object.
    Remove {
        bucket: String,
        key: String,
        /// Respect governance-mode retention instead of bypassing it.
        #[arg(long)]
        keep_governance: bool,
    },

    /// Manage bucket policies.
    #[command(subcommand)]
    Policy(PolicyCommand),

    /// Manage bucket quotas.
    #[command(subcommand)]
    Quota(QuotaCommand),

    /// Report data and storage usage.
    #[command(subcommand)]
    Usage(UsageCommand),

    /// Print server and drive information of every node.
    ServerInfo,

    /// Print drive capacity information.
    StorageInfo,

    /// Manage users.
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum PolicyCommand {
    /// Print the policy of a bucket.
    Get { bucket: String },
    /// Replace the policy of a bucket with a JSON document.
    Set { bucket: String, policy: String },
    /// Allow anonymous read-only access to a bucket.
    Public { bucket: String },
    /// Remove the policy of a bucket.
    Remove { bucket: String },
}

#[derive(Debug, Clone, Subcommand)]
pub enum QuotaCommand {
    /// Print the quota of a bucket in MiB.
    Get { bucket: String },
    /// Set a hard quota in MiB.
    Set { bucket: String, mib: i64 },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsageCommand {
    /// Usage per bucket.
    Buckets,
    /// Cluster-wide data usage.
    Data,
    /// Summed drive capacity.
    Storage,
    /// Drive status per instance.
    Details,
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserCommand {
    /// Delete a user.
    Remove { access_key: String },
    /// Enable or disable a user.
    Status {
        access_key: String,
        status: AccountStatus,
    },
    /// Attach a canned policy to a user or group.
    Policy {
        entity: String,
        policy_name: String,
        /// Treat the entity as a group.
        #[arg(long)]
        group: bool,
    },
}

impl Command {
    /// Returns the command as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buckets => "buckets",
            Self::MakeBucket { .. } => "make-bucket",
            Self::Objects { .. } => "objects",
            Self::Search { .. } => "search",
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
            Self::Remove { .. } => "remove",
            Self::Policy(PolicyCommand::Get { .. }) => "policy get",
            Self::Policy(PolicyCommand::Set { .. }) => "policy set",
            Self::Policy(PolicyCommand::Public { .. }) => "policy public",
            Self::Policy(PolicyCommand::Remove { .. }) => "policy remove",
            Self::Quota(QuotaCommand::Get { .. }) => "quota get",
            Self::Quota(QuotaCommand::Set { .. }) => "quota set",
            Self::Usage(UsageCommand::Buckets) => "usage buckets",
            Self::Usage(UsageCommand::Data) => "usage data",
            Self::Usage(UsageCommand::Storage) => "usage storage",
            Self::Usage(UsageCommand::Details) => "usage details",
            Self::ServerInfo => "server-info",
            Self::StorageInfo => "storage-info",
            Self::User(UserCommand::Remove { .. }) => "user remove",
            Self::User(UserCommand::Status { .. }) => "user status",
            Self::User(UserCommand::Policy { .. }) => "user policy",
        }
    }

    /// Runs the command.
    ///
    /// Returns the JSON document to print, or `None` when the command wrote
    /// object data to standard output itself.
    pub async fn execute(self, client: &MinossClient) -> anyhow::Result<Option<Value>> {
        let buckets = client.bucket_operations();
        let objects = client.object_operations();
        let admin = client.admin_operations();

        let output = match self {
            Self::Buckets => to_json(buckets.list_buckets().await?)?,
            Self::MakeBucket { bucket } => {
                buckets.make_bucket(&bucket).await?;
                json!({ "bucket": bucket })
            }
            Self::Objects { bucket } => to_json(objects.get_object_list(&bucket).await?)?,
            Self::Search {
                bucket,
                prefix,
                recursive,
            } => to_json(objects.search_objects(&bucket, &prefix, recursive).await?)?,
            Self::Upload {
                bucket,
                key,
                path,
                content_type,
            } => {
                let options = content_type
                    .map(|content_type| PutObjectOptions::default().with_content_type(content_type));
                let result = if is_stdio(&path) {
                    objects
                        .upload_object(&bucket, &key, tokio::io::stdin(), options)
                        .await?
                } else {
                    objects
                        .upload_object_from_file(&bucket, &key, &path, options)
                        .await
                        .with_context(|| format!("failed to upload {}", path.display()))?
                };
                to_json(result)?
            }
            Self::Download {
                bucket,
                key,
                path,
                version_id,
                offset,
                length,
            } => {
                let options = Some(GetObjectOptions {
                    version_id,
                    offset,
                    length,
                });
                if is_stdio(&path) {
                    let mut stdout = tokio::io::stdout();
                    let size = objects
                        .download_object(&bucket, &key, &mut stdout, options)
                        .await?;
                    tracing::info!(target: TRACING_TARGET_COMMAND, size, "Object written to stdout");
                    return Ok(None);
                }
                let size = objects
                    .download_object_to_file(&bucket, &key, &path, options)
                    .await
                    .with_context(|| format!("failed to download into {}", path.display()))?;
                json!({ "key": key, "path": path, "size": size })
            }
            Self::Remove {
                bucket,
                key,
                keep_governance,
            } => {
                let options = RemoveObjectOptions {
                    governance_bypass: !keep_governance,
                };
                objects.remove_object(&bucket, &key, Some(options)).await?;
                json!({ "bucket": bucket, "key": key })
            }
            Self::Policy(command) => match command {
                PolicyCommand::Get { bucket } => {
                    let policy = buckets.get_bucket_policy(&bucket).await?;
                    // Policies are JSON documents; print them as such when they parse.
                    serde_json::from_str(&policy).unwrap_or(Value::String(policy))
                }
                PolicyCommand::Set { bucket, policy } => {
                    serde_json::from_str::<Value>(&policy)
                        .context("policy must be a JSON document")?;
                    buckets.set_bucket_policy(&bucket, &policy).await?;
                    json!({ "bucket": bucket })
                }
                PolicyCommand::Public { bucket } => {
                    buckets.set_bucket_public_policy(&bucket).await?;
                    json!({ "bucket": bucket })
                }
                PolicyCommand::Remove { bucket } => {
                    buckets.remove_bucket_policy(&bucket).await?;
                    json!({ "bucket": bucket })
                }
            },
            Self::Quota(command) => match command {
                QuotaCommand::Get { bucket } => {
                    let mib = admin.get_quota(&bucket).await?;
                    json!({ "bucket": bucket, "quota_mib": mib })
                }
                QuotaCommand::Set { bucket, mib } => {
                    admin.set_quota(&bucket, mib).await?;
                    json!({ "bucket": bucket, "quota_mib": mib })
                }
            },
            Self::Usage(command) => match command {
                UsageCommand::Buckets => to_json(admin.buckets_usage().await?)?,
                UsageCommand::Data => to_json(admin.data_usage().await?)?,
                UsageCommand::Storage => to_json(admin.storage_usage().await?)?,
                UsageCommand::Details => to_json(admin.storage_details().await?)?,
            },
            Self::ServerInfo => to_json(admin.server_info().await?)?,
            Self::StorageInfo => to_json(admin.storage_info().await?)?,
            Self::User(command) => match command {
                UserCommand::Remove { access_key } => {
                    admin.remove_user(&access_key).await?;
                    json!({ "access_key": access_key })
                }
                UserCommand::Status { access_key, status } => {
                    admin.set_user_status(&access_key, status).await?;
                    json!({ "access_key": access_key, "status": status })
                }
                UserCommand::Policy {
                    entity,
                    policy_name,
                    group,
                } => {
                    admin.set_policy(&entity, &policy_name, group).await?;
                    json!({ "entity": entity, "policy": policy_name, "is_group": group })
                }
            },
        };

        Ok(Some(output))
    }
}

fn to_json(value: impl Serialize) -> anyhow::Result<Value> {
    serde_json::to_value(value).context("failed to encode output")
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_stdio() {
        assert!(is_stdio(Path::new("-")));
        assert!(!is_stdio(Path::new("./-")));
        assert!(!is_stdio(Path::new("out.bin")));
    }

    #[test]
    fn test_to_json_of_report() {
        let usage = minoss::StorageUsage {
            used: 1,
            available: 2,
            total: 3,
        };
        assert_eq!(
            to_json(usage).unwrap(),
            json!({ "used": 1, "available": 2, "total": 3 })
        );
    }
}
