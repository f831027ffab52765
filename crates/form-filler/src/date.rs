//! Generation date formatting

use chrono::NaiveDate;

/// Format the generation date as "Month DD, YYYY"
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use form_filler::format_generation_date;
///
/// let date = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();
/// assert_eq!(format_generation_date(date), "September 07, 2025");
/// ```
pub fn format_generation_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
