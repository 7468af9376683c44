use crate::models::Nutrient;

/// Shortest decimal form of a raw value: 2000 -> "2000", 2.5 -> "2.5".
pub fn number(value: f64) -> String {
    format!("{value}")
}

/// Nearest whole number, halves rounding up.
pub fn whole(value: f64) -> String {
    let rounded = (value + 0.5).floor();
    // avoid "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    number(rounded)
}

pub fn with_unit(value: String, nutrient: Nutrient) -> String {
    format!("{value}{}", nutrient.unit())
}

/// Share of a target reached, always within [0, 100].
pub fn progress_percent(current: f64, target: f64) -> f64 {
    let percent = current * 100.0 / target;
    if !percent.is_finite() || percent < 0.0 {
        0.0
    } else {
        percent.min(100.0)
    }
}
