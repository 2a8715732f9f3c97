use anyhow::{Context, Result};
use std::io::Write;
use timetable_core::{SchoolCell, SchoolDay, SchoolRow, StreamRow};

/// Whole-school week as CSV: one row per class entry per slot. Break slots
/// give a single "Break" row; empty slots a single "-" row.
pub fn write_school_week<W: Write>(week: &[(SchoolDay, Vec<SchoolRow>)], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["day", "period", "time", "slot", "grade_level", "class", "entry"])?;

    for (day, rows) in week {
        for row in rows {
            let lead = [
                day.name().to_string(),
                (row.slot.index + 1).to_string(),
                row.slot.time_range(),
                row.slot.label.clone(),
            ];
            match &row.cell {
                SchoolCell::Break => {
                    writer.write_record(lead.iter().cloned().chain(marker("Break")))?;
                }
                SchoolCell::Classes(entries) if entries.is_empty() => {
                    writer.write_record(lead.iter().cloned().chain(marker("-")))?;
                }
                SchoolCell::Classes(entries) => {
                    for e in entries {
                        writer.write_record(lead.iter().cloned().chain([
                            e.class.grade_level.clone(),
                            e.class.stream.clone(),
                            e.cell.to_string(),
                        ]))?;
                    }
                }
            }
        }
    }
    writer.flush().context("flush CSV")?;
    Ok(())
}

/// Empty grade and class columns, then `entry`.
fn marker(entry: &str) -> [String; 3] {
    [String::new(), String::new(), entry.to_string()]
}

/// One stream's week as CSV: a row per slot, a column per day.
pub fn write_stream_week<W: Write>(week: &[(SchoolDay, Vec<StreamRow>)], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["period".to_string(), "time".to_string()];
    header.extend(week.iter().map(|(d, _)| d.name().to_string()));
    writer.write_record(&header)?;

    let slots = week.first().map(|(_, rows)| rows.len()).unwrap_or(0);
    for i in 0..slots {
        let Some(first) = week.first().and_then(|(_, rows)| rows.get(i)) else {
            continue;
        };
        let mut record = vec![(i + 1).to_string(), first.slot.time_range()];
        for (_, rows) in week {
            record.push(rows.get(i).map(|r| r.cell.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush().context("flush CSV")?;
    Ok(())
}

pub fn to_string<F>(write: F) -> Result<String>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}
