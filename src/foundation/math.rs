use crate::foundation::error::{ExportError, ExportResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Round a non-negative float to a pixel count, never below 1.
pub(crate) fn px_at_least_one(v: f64) -> u32 {
    if !v.is_finite() || v < 1.0 {
        return 1;
    }
    v.round().min(f64::from(u32::MAX)) as u32
}

/// Stable 64-bit fingerprint of a serializable plan.
///
/// JSON serialization of plan structs is field-ordered, so equal plans hash equally.
pub(crate) fn fingerprint_of<T: serde::Serialize>(value: &T) -> ExportResult<u64> {
    let bytes = serde_json::to_vec(value).map_err(|e| ExportError::serde(e.to_string()))?;
    Ok(xxhash_rust::xxh3::xxh3_64(&bytes))
}
