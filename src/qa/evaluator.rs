/// Pass/fail decision for a measured width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub passed: bool,
    pub message: Option<String>,
}

/// Compare a measured width against an optional maximum.
///
/// An unknown maximum always passes: a missing constraint must never block a
/// translation.
pub fn evaluate(width: u32, max: Option<u32>) -> Evaluation {
    match max {
        Some(max) if width > max => {
            let excess = width - max;
            Evaluation {
                passed: false,
                message: Some(format!(
                    "Translation text width ({}px) exceeds maximum allowed width ({}px) by {} pixels",
                    width, max, excess
                )),
            }
        }
        _ => Evaluation {
            passed: true,
            message: None,
        },
    }
}
