/// Scenario and scene identifiers are assigned by the studio server
/// (64-bit integers).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
