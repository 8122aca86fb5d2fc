//! Locale-specific date rendering for notification text.
//!
//! The formatter sits behind a trait so the locale can be swapped without
//! touching the booking rules.

use chrono::{DateTime, Datelike, Timelike, Utc};

pub trait DateFormatter {
    fn long_date(&self, instant: DateTime<Utc>) -> String;
}

/// Brazilian Portuguese long format: "dia 10 de junho, às 14:00h".
pub struct Portuguese;

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

impl DateFormatter for Portuguese {
    fn long_date(&self, instant: DateTime<Utc>) -> String {
        let month = MONTHS[instant.month0() as usize];
        format!(
            "dia {:02} de {}, às {}:{:02}h",
            instant.day(),
            month,
            instant.hour(),
            instant.minute()
        )
    }
}

/// Builds the message recorded for the provider when a booking is made.
pub fn booking_message(
    formatter: &impl DateFormatter,
    user_name: &str,
    slot: DateTime<Utc>,
) -> String {
    format!(
        "Novo agendamento de {} para {}",
        user_name,
        formatter.long_date(slot)
    )
}
