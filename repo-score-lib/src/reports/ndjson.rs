use crate::Result;
use crate::scoring::MetricRecord;
use core::fmt::Write;

/// Write one JSON object per record, one record per line.
pub fn generate<W: Write>(records: &[MetricRecord], writer: &mut W) -> Result<()> {
    for record in records {
        writeln!(writer, "{}", serde_json::to_string(record)?)?;
    }

    Ok(())
}
