use chrono::{DateTime, NaiveDateTime, Utc};
use timetable_core::RecurringEvent;

/// Emit an ICS calendar with one weekly-recurring VEVENT per lesson.
///
/// Notes:
/// - DTSTART/DTEND are the first occurrence in local time with a TZID, so the
///   weekly rule repeats on the school's weekday and wall clock.
/// - UNTIL is UTC, as RFC 5545 requires when DTSTART carries a TZID.
/// - UIDs come from the class and slot, so re-importing updates in place.
/// - `dtstamp` is passed in so output is reproducible.
pub fn events_to_ics(events: &[RecurringEvent], dtstamp: DateTime<Utc>) -> String {
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n");
    s.push_str("PRODID:-//Timetable//EN\r\nCALSCALE:GREGORIAN\r\n");

    let stamp = ics_utc(dtstamp);
    for e in events {
        s.push_str("BEGIN:VEVENT\r\n");
        s.push_str(&format!("UID:{}\r\n", e.uid));
        s.push_str(&format!("DTSTAMP:{}\r\n", stamp));
        let tzid = e.timezone.name();
        s.push_str(&format!("DTSTART;TZID={tzid}:{}\r\n", ics_local(e.first_start)));
        s.push_str(&format!("DTEND;TZID={tzid}:{}\r\n", ics_local(e.first_end)));
        s.push_str(&format!(
            "RRULE:FREQ=WEEKLY;BYDAY={};UNTIL={}\r\n",
            e.day.ics_code(),
            ics_utc(e.until_utc)
        ));
        s.push_str(&format!("SUMMARY:{}\r\n", escape_ics(&e.summary)));
        s.push_str(&format!("DESCRIPTION:{}\r\n", escape_ics(&e.description)));
        s.push_str(&format!("LOCATION:{}\r\n", escape_ics(&e.location)));
        s.push_str("END:VEVENT\r\n");
    }

    s.push_str("END:VCALENDAR\r\n");
    s
}

fn ics_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

fn ics_local(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
