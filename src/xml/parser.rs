//! Parser für den Pherogramm-Metadatenblock.

use super::metadata::{PherogramMetadata, ShiftRecord};
use crate::core::GapPattern;
use anyhow::{bail, Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::str::FromStr;

/// Parsed einen `<pherogramAlignment>`-Block aus einem XML-String.
pub fn parse_pherogram_metadata(xml_content: &str) -> Result<PherogramMetadata> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();
    let mut metadata: Option<PherogramMetadata> = None;

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?.into_owned();
                match tag.as_str() {
                    "pherogramAlignment" => {
                        let attrs = read_attributes(&reader, e)?;
                        metadata = Some(PherogramMetadata {
                            trace_length: required(&attrs, "traceLength")?,
                            left: required(&attrs, "left")?,
                            right: required(&attrs, "right")?,
                            first_seq_pos: required(&attrs, "firstSeqPos")?,
                            shifts: Vec::new(),
                        });
                    }
                    "shift" => {
                        let Some(meta) = metadata.as_mut() else {
                            bail!("<shift> ausserhalb von <pherogramAlignment>");
                        };
                        let attrs = read_attributes(&reader, e)?;
                        let anchor: usize = required(&attrs, "anchor")?;
                        let gaps = match attrs.get("gaps") {
                            Some(mask) => Some(GapPattern::from_mask(mask).with_context(|| {
                                format!("Ungueltiges Lueckenmuster an Anker {}: '{}'", anchor, mask)
                            })?),
                            None => None,
                        };
                        meta.shifts.push(ShiftRecord {
                            anchor,
                            delta: required(&attrs, "delta")?,
                            gaps,
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err).context("Fehler beim Parsen des XML"),
            _ => {}
        }

        buffer.clear();
    }

    let Some(mut metadata) = metadata else {
        bail!("Element <pherogramAlignment> fehlt");
    };
    metadata.shifts.sort_by_key(|s| s.anchor);
    Ok(metadata)
}

fn read_attributes(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn required<T>(attrs: &HashMap<String, String>, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(value) = attrs.get(key) else {
        bail!("Pflichtattribut '{}' fehlt", key);
    };
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("Ungueltiger Wert fuer '{}': '{}'", key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sorts_shifts_and_reads_masks() {
        let xml = r#"
        <pherogramAlignment traceLength="30" left="2" right="25" firstSeqPos="7">
            <shift anchor="12" delta="-2"/>
            <shift anchor="4" delta="2" gaps="B--"/>
        </pherogramAlignment>
        "#;
        let meta = parse_pherogram_metadata(xml).expect("gueltiges XML");
        assert_eq!(meta.trace_length, 30);
        assert_eq!(meta.first_seq_pos, 7);
        assert_eq!(meta.shifts[0].anchor, 4);
        assert_eq!(
            meta.shifts[0].gaps.as_ref().map(|g| g.to_mask()).as_deref(),
            Some("B--")
        );
        assert_eq!(meta.shifts[1].delta, -2);
    }

    #[test]
    fn test_missing_attribute_fails() {
        let xml = r#"<pherogramAlignment traceLength="30" left="0" right="30"/>"#;
        let err = parse_pherogram_metadata(xml).expect_err("firstSeqPos fehlt");
        assert!(format!("{err:#}").contains("firstSeqPos"));
    }

    #[test]
    fn test_invalid_number_fails() {
        let xml = r#"
        <pherogramAlignment traceLength="10" left="0" right="10" firstSeqPos="0">
            <shift anchor="x" delta="1"/>
        </pherogramAlignment>
        "#;
        assert!(parse_pherogram_metadata(xml).is_err());
    }

    #[test]
    fn test_missing_root_fails() {
        assert!(parse_pherogram_metadata("<other/>").is_err());
    }
}
