use chrono::NaiveDateTime;
use enlace_error::error::UtilError;
use uuid::Uuid;

/// Check if a string is a valid UUIDv4
///
/// # Arguments
///
/// * `uid` - A string slice that holds the UUID
///
/// # Returns
///
/// * `bool` - A boolean indicating if the UUID is version 4
pub fn is_valid_uuid4(uid: &str) -> Result<bool, UtilError> {
    match Uuid::parse_str(uid) {
        Ok(uuid) => Ok(uuid.get_version_num() == 4),
        Err(_) => Err(UtilError::UuidError),
    }
}

pub fn create_uuid4() -> String {
    Uuid::new_v4().to_string()
}

pub fn get_utc_datetime() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Round to two decimals, the precision used by the dashboards
pub fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `part` in `total` as a percentage. Zero when total is zero.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    round_two(part as f64 * 100.0 / total as f64)
}
