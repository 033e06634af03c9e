//! Numeric solved.ac tier to display label.

const UNRATED: &str = "Unrated / Not Ratable";
const TIERS: [&str; 6] = ["Bronze", "Silver", "Gold", "Platinum", "Diamond", "Ruby"];
const STEPS: [&str; 5] = ["V", "IV", "III", "II", "I"];

/// Formats a solved.ac level (1..=31) as a tier label such as `Gold IV`.
///
/// Level 0 and anything outside the known range is reported as unrated.
#[must_use]
pub fn level_label(level: i32) -> String {
    match level {
        31 => "Master".to_string(),
        1..=30 => {
            let index = usize::try_from(level - 1).unwrap_or_default();
            format!("{} {}", TIERS[index / 5], STEPS[index % 5])
        }
        _ => UNRATED.to_string(),
    }
}
