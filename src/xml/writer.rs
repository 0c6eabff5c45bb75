//! Writer für den Pherogramm-Metadatenblock.

use super::metadata::PherogramMetadata;

/// Schreibt die Metadaten als XML; Verschiebungen in aufsteigender Anker-Reihenfolge.
pub fn write_pherogram_metadata(metadata: &PherogramMetadata) -> String {
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    output.push_str(&format!(
        "<pherogramAlignment traceLength=\"{}\" left=\"{}\" right=\"{}\" firstSeqPos=\"{}\">\n",
        metadata.trace_length, metadata.left, metadata.right, metadata.first_seq_pos
    ));

    let mut shifts: Vec<_> = metadata.shifts.iter().collect();
    shifts.sort_by_key(|s| s.anchor);
    for shift in shifts {
        output.push_str(&format!(
            "    <shift anchor=\"{}\" delta=\"{}\"",
            shift.anchor, shift.delta
        ));
        if let Some(gaps) = &shift.gaps {
            // Maske besteht nur aus '-' und 'B', kein Escaping nötig
            output.push_str(&format!(" gaps=\"{}\"", gaps.to_mask()));
        }
        output.push_str("/>\n");
    }

    output.push_str("</pherogramAlignment>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::metadata::ShiftRecord;

    #[test]
    fn test_write_orders_shifts_by_anchor() {
        let meta = PherogramMetadata {
            trace_length: 10,
            left: 0,
            right: 10,
            first_seq_pos: 0,
            shifts: vec![
                ShiftRecord {
                    anchor: 7,
                    delta: -1,
                    gaps: None,
                },
                ShiftRecord {
                    anchor: 2,
                    delta: 1,
                    gaps: None,
                },
            ],
        };
        let xml = write_pherogram_metadata(&meta);
        let first = xml.find("anchor=\"2\"").expect("Anker 2 geschrieben");
        let second = xml.find("anchor=\"7\"").expect("Anker 7 geschrieben");
        assert!(first < second);
    }
}
