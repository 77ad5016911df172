//! XML plumbing for the calendar-query REPORT.
//!
//! Builds the request body and pulls the `calendar-data` payloads back out
//! of the multistatus response.

use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

/// DAV namespace
pub const DAV_NS: &str = "DAV:";
/// CalDAV namespace
pub const CALDAV_NS: &str = "urn:ietf:params:xml:ns:caldav";

/// Generates a calendar-query REPORT body for fetching events in
/// `[start, end)`, with the server expanding recurrences in the range.
pub fn calendar_query_body(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut query = BytesStart::new("c:calendar-query");
    query.push_attribute(("xmlns:d", DAV_NS));
    query.push_attribute(("xmlns:c", CALDAV_NS));
    writer.write_event(Event::Start(query)).unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("d:prop")))
        .unwrap();
    writer
        .write_event(Event::Empty(BytesStart::new("c:calendar-data")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("d:prop")))
        .unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("c:filter")))
        .unwrap();

    let mut vcal_filter = BytesStart::new("c:comp-filter");
    vcal_filter.push_attribute(("name", "VCALENDAR"));
    writer.write_event(Event::Start(vcal_filter)).unwrap();

    let mut vevent_filter = BytesStart::new("c:comp-filter");
    vevent_filter.push_attribute(("name", "VEVENT"));
    writer.write_event(Event::Start(vevent_filter)).unwrap();

    let mut time_range = BytesStart::new("c:time-range");
    time_range.push_attribute(("start", format_caldav_datetime(start).as_str()));
    time_range.push_attribute(("end", format_caldav_datetime(end).as_str()));
    writer.write_event(Event::Empty(time_range)).unwrap();

    writer
        .write_event(Event::End(BytesEnd::new("c:comp-filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:comp-filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:filter")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("c:calendar-query")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Parses a multistatus REPORT response and returns the `calendar-data`
/// payload of each response element (each one a complete ICS document).
pub fn parse_calendar_data(xml: &str) -> Vec<String> {
    let mut payloads = Vec::new();

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_calendar_data = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if local_name(&name) == "calendar-data" {
                    in_calendar_data = true;
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if local_name(&name) == "calendar-data" {
                    in_calendar_data = false;
                }
            }
            Ok(Event::Text(e)) => {
                if in_calendar_data {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if !text.is_empty() {
                        payloads.push(text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_calendar_data {
                    payloads.push(String::from_utf8_lossy(&e).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    payloads
}

/// Extracts the local name from a potentially namespaced element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Formats a datetime for the time-range filter (UTC, basic format).
fn format_caldav_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn query_body_carries_time_range() {
        let start = Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 10, 0, 0, 0).unwrap();

        let body = calendar_query_body(start, end);

        assert!(body.contains("calendar-query"));
        assert!(body.contains("calendar-data"));
        assert!(body.contains("time-range"));
        assert!(body.contains("20250610T000000Z"));
        assert!(body.contains("20260610T000000Z"));
        assert!(body.contains("VCALENDAR"));
        assert!(body.contains("VEVENT"));
    }

    #[test]
    fn extracts_calendar_data_payloads() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<multistatus xmlns="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <response>
    <href>/calendars/user/work/event1.ics</href>
    <propstat>
      <prop>
        <C:calendar-data>BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:event1@example.com
DTSTART:20250610T100000Z
DTEND:20250610T110000Z
SUMMARY:Team Meeting
END:VEVENT
END:VCALENDAR</C:calendar-data>
      </prop>
      <status>HTTP/1.1 200 OK</status>
    </propstat>
  </response>
  <response>
    <href>/calendars/user/work/event2.ics</href>
    <propstat>
      <prop>
        <C:calendar-data><![CDATA[BEGIN:VCALENDAR
BEGIN:VEVENT
UID:event2@example.com
DTSTART;VALUE=DATE:20250611
DTEND;VALUE=DATE:20250612
SUMMARY:Holiday
END:VEVENT
END:VCALENDAR]]></C:calendar-data>
      </prop>
    </propstat>
  </response>
</multistatus>"#;

        let payloads = parse_calendar_data(xml);

        assert_eq!(payloads.len(), 2);
        assert!(payloads[0].contains("Team Meeting"));
        assert!(payloads[1].contains("Holiday"));
    }

    #[test]
    fn response_without_calendar_data_is_empty() {
        let xml = r#"<multistatus xmlns="DAV:"><response><href>/x</href></response></multistatus>"#;
        assert!(parse_calendar_data(xml).is_empty());
    }

    #[test]
    fn datetime_formatting() {
        let dt = Utc.with_ymd_and_hms(2025, 2, 5, 14, 30, 0).unwrap();
        assert_eq!(format_caldav_datetime(dt), "20250205T143000Z");
    }
}
