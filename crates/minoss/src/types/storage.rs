//! Storage usage reports derived from admin API responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::admin::{Disk, InfoMessage, StorageInfo};

/// Aggregate capacity across every drive of the cluster, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    pub used: u64,
    pub available: u64,
    pub total: u64,
}

impl StorageUsage {
    /// Sums drive capacities of a `storageinfo` response.
    pub fn from_storage_info(info: &StorageInfo) -> Self {
        info.disks.iter().fold(Self::default(), |mut usage, disk| {
            usage.total += disk.total_space;
            usage.used += disk.used_space;
            usage.available += disk.available_space;
            usage
        })
    }
}

/// A single drive of a storage instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDisk {
    /// Mount path of the drive.
    pub device_name: String,
    /// Drive UUID.
    pub device_sn: String,
    /// Full `host:port` endpoint of the server owning the drive.
    pub instance: String,
    pub total_capacity: u64,
    pub available_capacity: u64,
    /// Whether the drive is online.
    pub ok: bool,
}

impl StorageDisk {
    fn new(instance: &str, disk: &Disk) -> Self {
        Self {
            device_name: disk.drive_path.clone(),
            device_sn: disk.uuid.clone(),
            instance: instance.to_string(),
            total_capacity: disk.total_space,
            available_capacity: disk.available_space,
            ok: disk.is_ok(),
        }
    }
}

/// Drive summary of one storage instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDetails {
    /// Number of drives not in the `ok` state.
    pub offline: u64,
    /// Available bytes across all drives of the instance.
    pub available: u64,
    /// Number of drives in the `ok` state.
    pub online: u64,
    pub disks: Vec<StorageDisk>,
}

impl StorageDetails {
    /// Groups the drives of an `info` response by instance.
    ///
    /// The instance key is the server endpoint without its port. Servers
    /// sharing a host are merged into one entry.
    pub fn from_server_info(info: &InfoMessage) -> BTreeMap<String, StorageDetails> {
        let mut details: BTreeMap<String, StorageDetails> = BTreeMap::new();

        for server in &info.servers {
            let entry = details.entry(instance_host(&server.endpoint)).or_default();

            for disk in &server.disks {
                entry.available += disk.available_space;
                if disk.is_ok() {
                    entry.online += 1;
                } else {
                    entry.offline += 1;
                }
                entry.disks.push(StorageDisk::new(&server.endpoint, disk));
            }
        }

        details
    }
}

/// Strips the port from a `host:port` endpoint.
///
/// Bracketed IPv6 endpoints keep their address; bare hosts are returned as is.
pub fn instance_host(endpoint: &str) -> String {
    if let Some(rest) = endpoint.strip_prefix('[')
        && let Some((host, _)) = rest.split_once(']')
    {
        return host.to_string();
    }

    match endpoint.split_once(':') {
        Some((host, _)) => host.to_string(),
        None => endpoint.to_string(),
    }
}
