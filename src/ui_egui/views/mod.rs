//! Grid views and their shared layout helpers.

pub mod grid;
pub mod heatmap;
pub mod legend;
pub mod palette;
pub mod participant_list;

use chrono::{Datelike, NaiveDate};

/// Constants for grid rendering
pub const TIME_LABEL_WIDTH: f32 = 48.0;
pub const HEADER_HEIGHT: f32 = 34.0;
pub const CELL_MIN_WIDTH: f32 = 50.0;
pub const EDIT_CELL_HEIGHT: f32 = 18.0;
pub const EDIT_CELL_HEIGHT_TOUCH: f32 = 32.0;
pub const VIEW_CELL_HEIGHT: f32 = 14.0;
pub const VIEW_CELL_HEIGHT_TOUCH: f32 = 24.0;

/// Hour boundary label, e.g. 960 -> "16:00"
pub fn format_hour_label(minutes: u16) -> String {
    format!("{}:00", minutes / 60)
}

/// Full time label honouring the clock-format setting,
/// e.g. 960 -> "16:00" or "4:00 PM"
pub fn format_time_label(minutes: u16, time_format: &str) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if time_format == "12h" {
        let period = if hours >= 12 { "PM" } else { "AM" };
        let display_hours = match hours % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hours, mins, period)
    } else {
        format!("{:02}:{:02}", hours, mins)
    }
}

/// Header date line, e.g. "5.01"
pub fn format_day_label(date: NaiveDate) -> String {
    format!("{}.{:02}", date.day(), date.month())
}

/// Polish weekday abbreviation for the header row
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    match date.weekday().num_days_from_monday() {
        0 => "pon",
        1 => "wt",
        2 => "śr",
        3 => "czw",
        4 => "pt",
        5 => "sob",
        _ => "niedz",
    }
}
