use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::BACKUP_FORMAT_MAJOR;
use crate::errors::{BackupError, CortexResult};

/// Wire-stable backup payload (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPayload {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub user_id: String,
    pub collections: HashMap<String, Vec<Value>>,
    pub meta: BackupMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMeta {
    pub format: String,
}

impl Default for BackupMeta {
    fn default() -> Self {
        Self {
            format: "memoria_backup".to_string(),
        }
    }
}

/// Strategy for reconciling an imported item against an existing one (§6 `importBackup`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    Replace,
    Merge,
    SkipExisting,
}

impl BackupPayload {
    /// Validate the wire format version, rejecting unknown/incompatible
    /// majors with a typed error (§6: "Unknown or incompatible versions
    /// MUST be rejected with a typed error").
    pub fn validate_version(&self) -> CortexResult<()> {
        let major = self
            .version
            .split('.')
            .next()
            .and_then(|s| s.parse::<u32>().ok());
        match major {
            Some(m) if m == BACKUP_FORMAT_MAJOR => Ok(()),
            _ => Err(BackupError::UnsupportedVersion {
                version: self.version.clone(),
            }
            .into()),
        }
    }
}
