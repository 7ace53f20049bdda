//! FASTA loading and job chunking.

use std::path::Path;

use c4_core::{AlphabetType, C4Error, Result};
use log::debug;
use needletail::parse_fastx_file;

use crate::record::SeqRecord;

/// Load every record of a FASTA/FASTQ file.
///
/// Each record keeps the first whitespace-delimited word of its header as id
/// and the rest of the header, if any, as description.
/// With [`AlphabetType::Unknown`] the alphabet is guessed per record.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a record
/// fails alphabet validation.
pub fn read_fasta(path: impl AsRef<Path>, alphabet: AlphabetType) -> Result<Vec<SeqRecord>> {
    let path = path.as_ref();
    let mut reader = parse_fastx_file(path)
        .map_err(|e| C4Error::Parse(format!("{}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| C4Error::Parse(e.to_string()))?;
        let header = String::from_utf8_lossy(record.id());
        let (id, description) = match header.trim().split_once(char::is_whitespace) {
            Some((id, rest)) => (id, Some(rest.trim())),
            None => (header.trim(), None),
        };
        let seq = record.seq();
        let mut rec = SeqRecord::new(id, &seq, alphabet)?;
        if let Some(text) = description.filter(|d| !d.is_empty()) {
            rec = rec.with_description(text);
        }
        records.push(rec);
    }
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Select the `id`-th of `total` contiguous chunks of `records` (1-based).
///
/// `total == 0` selects everything.
///
/// # Errors
///
/// Returns an error if `total > 0` and `id` is not in `1..=total`.
pub fn select_chunk<T>(records: Vec<T>, id: usize, total: usize) -> Result<Vec<T>> {
    if total == 0 {
        return Ok(records);
    }
    if id == 0 || id > total {
        return Err(C4Error::InvalidInput(format!(
            "chunk id {id} out of range 1..={total}"
        )));
    }
    let n = records.len();
    let start = (id - 1) * n / total;
    let end = id * n / total;
    Ok(records.into_iter().skip(start).take(end - start).collect())
}
