use crate::{model::ForecastWindow, nlu::DurationEntity};

const DAY_IN_SECONDS: f64 = 86_400.0;

/// Converts the first duration mention into a forecast window.
///
/// Partial days round up. A missing, zero or non-finite duration falls back
/// to the minimum window.
pub fn normalize(durations: &[DurationEntity]) -> ForecastWindow {
    let seconds = durations
        .first()
        .and_then(|d| d.normalized_seconds)
        .filter(|s| s.is_finite() && *s != 0.0);

    match seconds {
        Some(seconds) => ForecastWindow::new((seconds / DAY_IN_SECONDS).ceil() as i64),
        None => ForecastWindow::default(),
    }
}
