//! Revocation (blacklist) entries and the durable document format.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

use crate::errors::DomainError;

/// Reason recorded when a token is exchanged for a new one
pub const REASON_REFRESHED: &str = "refreshed";
/// Reason recorded on explicit logout
pub const REASON_LOGOUT: &str = "logout";
/// Reason recorded when the inactivity timeout revokes a token
pub const REASON_SESSION_TIMEOUT: &str = "session_timeout";
/// Reason recorded when all of a user's sessions are revoked
pub const REASON_REVOKE_ALL: &str = "revoke_all_sessions";
/// Default reason for administrative revocations
pub const REASON_MANUAL: &str = "manual_revocation";
/// Reason assigned to a listed jti that carries no metadata
pub const REASON_UNKNOWN: &str = "unknown";

/// Metadata kept for one revoked token identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationEntry {
    #[serde(default = "Utc::now", with = "timestamp")]
    pub added_at: DateTime<Utc>,

    #[serde(default = "unknown_reason")]
    pub reason: String,

    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

fn unknown_reason() -> String {
    REASON_UNKNOWN.to_string()
}

impl RevocationEntry {
    pub fn new(
        reason: impl Into<String>,
        expires_at: Option<DateTime<Utc>>,
        user_id: Option<i64>,
    ) -> Self {
        Self {
            added_at: Utc::now(),
            reason: reason.into(),
            expires_at,
            user_id,
        }
    }
}

/// How long revocation entries are kept before they may be pruned
///
/// Pruning only reclaims storage: by the time an entry is removed the token
/// it names has expired on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Grace period after a known token expiry
    pub expired_grace: Duration,
    /// Maximum age for entries whose token expiry is unknown
    pub fallback_max_age: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            expired_grace: Duration::hours(24),
            fallback_max_age: Duration::days(7),
        }
    }
}

impl RetentionPolicy {
    /// Builds a policy from configured hours and days
    ///
    /// Negative values and values too large for a duration are rejected.
    pub fn new(expired_retention_hours: i64, fallback_retention_days: i64) -> Result<Self, DomainError> {
        let expired_grace = Duration::try_hours(expired_retention_hours)
            .filter(|grace| *grace >= Duration::zero())
            .ok_or_else(|| DomainError::Validation {
                message: format!("expired_retention_hours out of range: {}", expired_retention_hours),
            })?;
        let fallback_max_age = Duration::try_days(fallback_retention_days)
            .filter(|age| *age >= Duration::zero())
            .ok_or_else(|| DomainError::Validation {
                message: format!("fallback_retention_days out of range: {}", fallback_retention_days),
            })?;
        Ok(Self {
            expired_grace,
            fallback_max_age,
        })
    }

    pub fn is_prunable(&self, entry: &RevocationEntry, now: DateTime<Utc>) -> bool {
        match entry.expires_at {
            Some(expires_at) => now - expires_at > self.expired_grace,
            None => now - entry.added_at > self.fallback_max_age,
        }
    }

    /// Removes prunable entries in place and returns how many were dropped
    pub fn prune(&self, entries: &mut HashMap<String, RevocationEntry>, now: DateTime<Utc>) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_prunable(entry, now));
        before - entries.len()
    }
}

/// A revoked jti together with its metadata, for per-user listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    pub jti: String,
    #[serde(flatten)]
    pub entry: RevocationEntry,
}

/// On-disk and export format of the revocation set
///
/// `{ "blacklist": [jti, ...], "metadata": { jti: {...} }, "last_updated": iso }`
///
/// Reading is lenient per entry: metadata that cannot be read (for example
/// an unparsable timestamp) drops that jti alone, and a missing `reason` or
/// `added_at` falls back to `"unknown"` and the load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct RevocationDocument {
    pub blacklist: Vec<String>,

    pub metadata: BTreeMap<String, RevocationEntry>,

    #[serde(with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,

    /// Jtis whose metadata was unreadable; not restored from `blacklist`
    #[serde(skip)]
    rejected: BTreeSet<String>,
}

/// Untyped view of the document used while reading
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    blacklist: Vec<serde_json::Value>,

    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,

    #[serde(default)]
    last_updated: Option<serde_json::Value>,
}

impl From<RawDocument> for RevocationDocument {
    fn from(raw: RawDocument) -> Self {
        let blacklist = raw
            .blacklist
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(jti) => Some(jti),
                other => {
                    warn!(item = %other, "Ignoring non-string blacklist item");
                    None
                }
            })
            .collect();

        let mut metadata = BTreeMap::new();
        let mut rejected = BTreeSet::new();
        for (jti, value) in raw.metadata {
            match serde_json::from_value::<RevocationEntry>(value) {
                Ok(entry) => {
                    metadata.insert(jti, entry);
                }
                Err(e) => {
                    warn!(jti = %jti, error = %e, "Dropping unreadable revocation entry");
                    rejected.insert(jti);
                }
            }
        }

        let last_updated = raw
            .last_updated
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(timestamp::parse);

        Self {
            blacklist,
            metadata,
            last_updated,
            rejected,
        }
    }
}

impl RevocationDocument {
    /// Builds a document from the in-memory map, sorted for stable output
    pub fn from_entries(entries: &HashMap<String, RevocationEntry>) -> Self {
        let metadata: BTreeMap<String, RevocationEntry> = entries
            .iter()
            .map(|(jti, entry)| (jti.clone(), entry.clone()))
            .collect();
        Self {
            blacklist: metadata.keys().cloned().collect(),
            metadata,
            last_updated: Some(Utc::now()),
            rejected: BTreeSet::new(),
        }
    }

    /// Flattens the document into the in-memory map
    ///
    /// A jti listed in `blacklist` without metadata is kept with reason
    /// `"unknown"` and `added_at = now`, so it ages out under the fallback rule.
    /// Metadata without a matching `blacklist` item is treated as revoked too.
    /// Jtis dropped while reading stay dropped.
    pub fn into_entries(self) -> HashMap<String, RevocationEntry> {
        let mut metadata = self.metadata;
        let mut entries: HashMap<String, RevocationEntry> = HashMap::new();
        for jti in self.blacklist {
            if self.rejected.contains(&jti) {
                continue;
            }
            let entry = metadata
                .remove(&jti)
                .unwrap_or_else(|| RevocationEntry::new(REASON_UNKNOWN, None, None));
            entries.insert(jti, entry);
        }
        entries.extend(metadata);
        entries
    }
}

/// Lenient ISO-8601 timestamps
///
/// Writes RFC 3339 in UTC; reads RFC 3339 or a naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// value, which is taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw))),
                None => Ok(None),
            }
        }
    }
}
