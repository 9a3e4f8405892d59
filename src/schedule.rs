//! Schedule preview data
//!
//! The Schedule tab shows a sample 24-hour curve so the user can see what an
//! automatic schedule would look like. This is preview data only: the real
//! time-of-day curve is computed and applied by the backend, never here.

use crate::bridge::{TEMPERATURE_MAX, TEMPERATURE_MIN};
use chrono::Timelike;

/// One hour of the preview curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulePoint {
    /// Hour of day, 0..24
    pub hour: u32,
    /// Color temperature in Kelvin
    pub temperature: u16,
    /// Brightness fraction
    pub brightness: f64,
}

/// Sample day curve: night floor, morning ramp, day plateau, evening ramp
pub fn preview_points() -> Vec<SchedulePoint> {
    (0..24)
        .map(|hour| {
            let (temperature, brightness) = match hour {
                6..=8 => {
                    // Morning transition
                    let step = hour - 6;
                    (3000 + step as u16 * 1166, 0.6 + f64::from(step) * 0.133)
                }
                9..=16 => (6500, 1.0),
                17..=20 => {
                    // Evening transition
                    let step = hour - 17;
                    (6500 - step as u16 * 875, 1.0 - f64::from(step) * 0.1)
                }
                _ => (3000, 0.6),
            };
            SchedulePoint {
                hour,
                temperature,
                brightness,
            }
        })
        .collect()
}

/// Fraction of the day elapsed at `time`, in `0.0..1.0`
pub fn day_fraction(time: chrono::NaiveTime) -> f64 {
    f64::from(time.hour() * 60 + time.minute()) / (24.0 * 60.0)
}

/// Human label for the time of day
pub fn phase_label(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Morning",
        12..=16 => "Afternoon",
        17..=20 => "Evening",
        _ => "Night",
    }
}

/// SVG path commands for the temperature line, scaled to the given viewbox
pub fn temperature_path(points: &[SchedulePoint], width: f64, height: f64) -> String {
    polyline(points, width, |p| {
        let span = f64::from(TEMPERATURE_MAX - TEMPERATURE_MIN);
        (1.0 - f64::from(p.temperature - TEMPERATURE_MIN) / span) * height
    })
}

/// SVG path commands for the brightness line, scaled to the given viewbox
pub fn brightness_path(points: &[SchedulePoint], width: f64, height: f64) -> String {
    polyline(points, width, |p| (1.0 - p.brightness) * height)
}

fn polyline(points: &[SchedulePoint], width: f64, y_of: impl Fn(&SchedulePoint) -> f64) -> String {
    let last_hour = points.len().saturating_sub(1).max(1) as f64;
    let mut commands = String::new();
    for (i, point) in points.iter().enumerate() {
        let x = i as f64 / last_hour * width;
        let y = y_of(point);
        let op = if i == 0 { 'M' } else { 'L' };
        commands.push_str(&format!("{op} {x:.1} {y:.1} "));
    }
    commands.trim_end().to_string()
}
