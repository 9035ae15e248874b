//! Durable notification record shape.
//!
//! Notifier implementations persist one of these per delivered alert.
//! The core only defines the fields; storage is the implementation's
//! concern.

use chrono::{DateTime, Utc};

use super::AlertRequest;

/// The fields a notifier persists for one delivered alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    /// Subordinate display name.
    pub subordinate_name: String,
    /// Supervisor display name.
    pub supervisor_name: String,
    /// Delivery date, `dd/mm/yyyy`.
    pub date: String,
    /// Delivery time, `h:mm AM/PM`.
    pub time: String,
    /// Alert body as delivered.
    pub message: String,
    /// Precise creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Build a record from an alert.
    pub fn from_alert(alert: &AlertRequest) -> Self {
        Self::with_timestamp(alert, alert.raised_at)
    }

    /// Build a record with an explicit timestamp.
    pub fn with_timestamp(alert: &AlertRequest, at: DateTime<Utc>) -> Self {
        Self {
            subordinate_name: alert.subordinate_name.clone(),
            supervisor_name: alert.supervisor_name.clone(),
            date: at.format("%d/%m/%Y").to_string(),
            time: at.format("%-I:%M %p").to_string(),
            message: alert.body.clone(),
            created_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_formats_date_and_time() {
        let alert = AlertRequest::new("pso-1", "Out of Radius Alert", "body", "Aamir", "Bilal");
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 15, 5, 0).unwrap();
        let record = NotificationRecord::with_timestamp(&alert, at);

        assert_eq!(record.date, "07/03/2026");
        assert_eq!(record.time, "3:05 PM");
        assert_eq!(record.message, "body");
        assert_eq!(record.supervisor_name, "Aamir");
        assert_eq!(record.subordinate_name, "Bilal");
        assert_eq!(record.created_at, at);
    }

    #[test]
    fn test_record_morning_time() {
        let alert = AlertRequest::new("pso-1", "t", "b", "pp", "pso");
        let at = Utc.with_ymd_and_hms(2026, 11, 21, 7, 0, 0).unwrap();
        let record = NotificationRecord::with_timestamp(&alert, at);

        assert_eq!(record.date, "21/11/2026");
        assert_eq!(record.time, "7:00 AM");
    }
}
