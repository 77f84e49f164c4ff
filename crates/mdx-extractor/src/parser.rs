//! Parsing of the core properties part
//!
//! Elements are matched by local name, so the namespace prefixes a producer
//! chose (`dc:`, `cp:`, `dcterms:`) do not matter.

use crate::error::ExtractionError;
use chrono::{Duration, NaiveDate, NaiveDateTime, SecondsFormat};
use mdx_domain::metadata::FieldKind;
use mdx_domain::{CoreField, FieldMap, FieldValue};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

/// Parse `docProps/core.xml` into a complete field map
///
/// Fields whose element is missing stay [`FieldValue::Absent`]. An element
/// that is present but empty yields an empty text value.
pub fn parse_core_properties(xml: &str) -> Result<FieldMap, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut fields = FieldMap::absent();

    let mut depth = 0usize;
    let mut saw_root = false;
    // Field being read, with the depth its element opened at
    let mut current: Option<(CoreField, usize)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                saw_root = true;
                if current.is_none() && depth == 2 {
                    if let Some(field) = CoreField::from_element(e.local_name().as_ref()) {
                        current = Some((field, depth));
                        text.clear();
                    }
                }
            }
            Event::Empty(e) => {
                saw_root = true;
                if current.is_none() && depth == 1 {
                    if let Some(field) = CoreField::from_element(e.local_name().as_ref()) {
                        fields.set(field, convert(field, ""));
                    }
                }
            }
            Event::Text(e) => {
                if current.is_some() {
                    text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if current.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if let Some((field, open_depth)) = current {
                    if open_depth == depth {
                        fields.set(field, convert(field, &text));
                        current = None;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ExtractionError::MalformedXml("no root element".to_string()));
    }
    if depth != 0 {
        return Err(ExtractionError::MalformedXml(
            "unexpected end of document".to_string(),
        ));
    }

    Ok(fields)
}

/// Whether a `[Content_Types].xml` part declares a part of the given content type
pub fn declares_content_type(xml: &str, content_type: &str) -> Result<bool, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Override" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    if attr.key.local_name().as_ref() == b"ContentType"
                        && attr.unescape_value()? == content_type
                    {
                        return Ok(true);
                    }
                }
            }
            Event::Eof => return Ok(false),
            _ => {}
        }
        buf.clear();
    }
}

/// Convert raw element text to the field's value kind
fn convert(field: CoreField, raw: &str) -> FieldValue {
    match field.kind() {
        FieldKind::Text => FieldValue::Text(raw.to_string()),
        FieldKind::Integer => match raw.trim().parse::<i64>() {
            Ok(n) => FieldValue::Integer(n),
            Err(_) => FieldValue::Text(raw.to_string()),
        },
        FieldKind::DateTime => match normalize_w3cdtf(raw) {
            Some(ts) => FieldValue::Timestamp(ts),
            None => {
                warn!(field = %field, value = raw, "ignoring unparseable date");
                FieldValue::Absent
            }
        },
    }
}

/// Normalize a W3C date-time string to RFC 3339 in UTC
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and `YYYY-MM-DDThh:mm[:ss[.f]]`
/// with an optional `Z` or `±hh:mm` designator. Values without a designator
/// are taken as UTC.
///
/// # Examples
///
/// ```
/// use mdx_extractor::parser::normalize_w3cdtf;
///
/// assert_eq!(
///     normalize_w3cdtf("2024-01-15T12:30:00+02:00").as_deref(),
///     Some("2024-01-15T10:30:00+00:00")
/// );
/// assert_eq!(normalize_w3cdtf("yesterday"), None);
/// ```
pub fn normalize_w3cdtf(raw: &str) -> Option<String> {
    let (body, offset_secs) = split_offset(raw.trim())?;
    let local = parse_naive(body)?;
    let utc = local.checked_sub_signed(Duration::seconds(offset_secs))?;
    Some(utc.and_utc().to_rfc3339_opts(SecondsFormat::AutoSi, false))
}

/// Split a trailing time-zone designator off a date-time string
fn split_offset(s: &str) -> Option<(&str, i64)> {
    if let Some(body) = s.strip_suffix('Z') {
        return Some((body, 0));
    }

    let cut = s.len().checked_sub(6);
    let split = cut.and_then(|n| Some((s.get(..n)?, s.get(n..)?)));
    if let Some((body, tz)) = split {
        let bytes = tz.as_bytes();
        if body.contains('T') && (bytes[0] == b'+' || bytes[0] == b'-') && bytes[3] == b':' {
            let hours: i64 = tz.get(1..3)?.parse().ok()?;
            let minutes: i64 = tz.get(4..6)?.parse().ok()?;
            let sign = if bytes[0] == b'-' { -1 } else { 1 };
            return Some((body, sign * (hours * 3600 + minutes * 60)));
        }
    }

    Some((s, 0))
}

fn parse_naive(body: &str) -> Option<NaiveDateTime> {
    if body.contains('T') {
        return NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M"))
            .ok();
    }

    let parts: Vec<&str> = body.split('-').collect();
    let date = match parts.as_slice() {
        [y, m, d] if y.len() == 4 && m.len() == 2 && d.len() == 2 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
        }
        [y, m] if y.len() == 4 && m.len() == 2 => {
            NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, 1)
        }
        [y] if y.len() == 4 => NaiveDate::from_ymd_opt(y.parse().ok()?, 1, 1),
        _ => None,
    }?;
    date.and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>Quarterly Report</dc:title>
  <dc:creator>Jane Doe</dc:creator>
  <cp:keywords>finance; q1</cp:keywords>
  <dc:description>Numbers &amp; notes</dc:description>
  <cp:lastModifiedBy>John Roe</cp:lastModifiedBy>
  <cp:revision>7</cp:revision>
  <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-15T10:30:00Z</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">2024-02-01T08:00:00+01:00</dcterms:modified>
</cp:coreProperties>"#;

    #[test]
    fn test_parse_full_core_properties() {
        let fields = parse_core_properties(CORE_XML).unwrap();

        assert_eq!(fields.len(), 15);
        assert_eq!(fields.get(CoreField::Title).as_text(), Some("Quarterly Report"));
        assert_eq!(fields.get(CoreField::Author).as_text(), Some("Jane Doe"));
        assert_eq!(fields.get(CoreField::Keywords).as_text(), Some("finance; q1"));
        assert_eq!(fields.get(CoreField::Comments).as_text(), Some("Numbers & notes"));
        assert_eq!(fields.get(CoreField::LastModifiedBy).as_text(), Some("John Roe"));
        assert_eq!(fields.get(CoreField::Revision), &FieldValue::Integer(7));
        assert_eq!(
            fields.get(CoreField::Created),
            &FieldValue::Timestamp("2024-01-15T10:30:00+00:00".to_string())
        );
        assert_eq!(
            fields.get(CoreField::Modified),
            &FieldValue::Timestamp("2024-02-01T07:00:00+00:00".to_string())
        );
        assert!(fields.get(CoreField::Subject).is_absent());
        assert!(fields.get(CoreField::LastPrinted).is_absent());
        assert_eq!(fields.present_count(), 8);
    }

    #[test]
    fn test_prefixes_do_not_matter() {
        let xml = r#"<core xmlns:x="http://purl.org/dc/elements/1.1/"><x:title>T</x:title><subject>S</subject></core>"#;
        let fields = parse_core_properties(xml).unwrap();
        assert_eq!(fields.get(CoreField::Title).as_text(), Some("T"));
        assert_eq!(fields.get(CoreField::Subject).as_text(), Some("S"));
    }

    #[test]
    fn test_empty_elements_are_present_but_empty() {
        let xml = r#"<cp:coreProperties xmlns:cp="c" xmlns:dc="d"><dc:title/><dc:subject></dc:subject></cp:coreProperties>"#;
        let fields = parse_core_properties(xml).unwrap();
        assert_eq!(fields.get(CoreField::Title), &FieldValue::Text(String::new()));
        assert_eq!(fields.get(CoreField::Subject), &FieldValue::Text(String::new()));
    }

    #[test]
    fn test_text_passes_through_unchanged() {
        let xml = "<p><title>  padded  </title></p>";
        let fields = parse_core_properties(xml).unwrap();
        assert_eq!(fields.get(CoreField::Title).as_text(), Some("  padded  "));
    }

    #[test]
    fn test_non_numeric_revision_is_kept_as_text() {
        let xml = "<p><revision>draft-2</revision></p>";
        let fields = parse_core_properties(xml).unwrap();
        assert_eq!(fields.get(CoreField::Revision), &FieldValue::Text("draft-2".into()));
    }

    #[test]
    fn test_unparseable_date_is_absent() {
        let xml = "<p><created>last tuesday</created></p>";
        let fields = parse_core_properties(xml).unwrap();
        assert!(fields.get(CoreField::Created).is_absent());
    }

    #[test]
    fn test_nested_elements_are_ignored() {
        let xml = "<p><extra><title>inner</title></extra><title>outer</title></p>";
        let fields = parse_core_properties(xml).unwrap();
        assert_eq!(fields.get(CoreField::Title).as_text(), Some("outer"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_core_properties("<p><title>x</subject></p>").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedXml(_)));

        let err = parse_core_properties("<p><title>x</title>").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedXml(_)));

        let err = parse_core_properties("").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedXml(_)));
    }

    #[test]
    fn test_declares_content_type() {
        let xml = r#"<?xml version="1.0"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;
        assert!(declares_content_type(
            xml,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"
        )
        .unwrap());
        assert!(!declares_content_type(xml, "application/vnd.ms-excel").unwrap());
        assert!(!declares_content_type(xml, "application/xml").unwrap());
    }

    #[test]
    fn test_normalize_w3cdtf_forms() {
        assert_eq!(
            normalize_w3cdtf("2024-01-15T10:30:00Z").as_deref(),
            Some("2024-01-15T10:30:00+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024-01-15T10:30:00").as_deref(),
            Some("2024-01-15T10:30:00+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024-01-15T10:30:00.250-05:00").as_deref(),
            Some("2024-01-15T15:30:00.250+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024-01-15T10:30Z").as_deref(),
            Some("2024-01-15T10:30:00+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024-01-15").as_deref(),
            Some("2024-01-15T00:00:00+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024-03").as_deref(),
            Some("2024-03-01T00:00:00+00:00")
        );
        assert_eq!(
            normalize_w3cdtf("2024").as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_normalize_w3cdtf_crosses_midnight() {
        assert_eq!(
            normalize_w3cdtf("2024-01-01T01:00:00+02:00").as_deref(),
            Some("2023-12-31T23:00:00+00:00")
        );
    }

    #[test]
    fn test_normalize_w3cdtf_rejects_garbage() {
        assert_eq!(normalize_w3cdtf(""), None);
        assert_eq!(normalize_w3cdtf("2024-13-01"), None);
        assert_eq!(normalize_w3cdtf("24-01-01"), None);
        assert_eq!(normalize_w3cdtf("2024-01-15T25:00:00Z"), None);
        assert_eq!(normalize_w3cdtf("éééééééé"), None);
    }
}
