use crate::core::types::{AlertCategory, Rgb};

const DOMINANCE: i16 = 50;

pub fn classify(color: Option<Rgb>) -> AlertCategory {
    let Some(Rgb(r, g, b)) = color else {
        return AlertCategory::Normal;
    };
    let (r, g, b) = (i16::from(r), i16::from(g), i16::from(b));

    // Orange must be tested before red: every orange sample also passes the red test.
    if g > r.max(b) + DOMINANCE {
        AlertCategory::Advancement
    } else if r > g + DOMINANCE && g > b + DOMINANCE {
        AlertCategory::SmallAlert
    } else if r > g.max(b) + DOMINANCE {
        AlertCategory::CriticalAlert
    } else {
        AlertCategory::Normal
    }
}
