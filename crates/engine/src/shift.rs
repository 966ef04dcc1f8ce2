//! Milking shifts and bucket weights.

/// Shift of the day for a local clock hour: morning (1) before 11h,
/// midday (2) before 16h, evening (3) after.
pub fn detect_shift(hour: u32) -> u32 {
    match hour {
        0..=10 => 1,
        11..=15 => 2,
        _ => 3,
    }
}

/// Liters in a bucket weighing `kg` of milk.
pub fn bucket_to_liters(kg: f64, density: f64) -> f64 {
    if kg <= 0.0 {
        return 0.0;
    }
    kg / density
}
