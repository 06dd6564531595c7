//! Single-record CSV framing for key listings and list ranges.
//!
//! The wire format is one RFC 4180 record per response body with the trailing
//! record terminator trimmed. An empty collection is framed as an empty body.

use ::csv::{ReaderBuilder, Writer};

pub use ::csv::Error;

/// Serializes `fields` as one CSV record without a trailing newline.
pub fn write_record<I, T>(fields: I) -> Result<String, Error>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let fields: Vec<T> = fields.into_iter().collect();
    if fields.is_empty() {
        return Ok(String::new());
    }
    // A lone empty field would serialize to just the record terminator and
    // trim down to the same empty body as a zero-field record; quote it so it
    // reads back as one field.
    if fields.len() == 1 && fields[0].as_ref().is_empty() {
        return Ok("\"\"".to_string());
    }

    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(fields.iter().map(|field| field.as_ref().as_bytes()))?;
    writer.flush()?;
    let buf = writer
        .into_inner()
        .map_err(|err| Error::from(err.into_error()))?;

    let mut record = String::from_utf8_lossy(&buf).into_owned();
    record.truncate(record.trim_end_matches(['\r', '\n']).len());
    Ok(record)
}

/// Parses the first CSV record of `body`. An empty body yields no fields.
pub fn read_record(body: &str) -> Result<Vec<String>, Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::{read_record, write_record};

    #[test]
    fn round_trips_plain_fields() {
        let record = write_record(["alpha", "beta", "gamma"]).unwrap();
        assert_eq!(record, "alpha,beta,gamma");
        assert_eq!(read_record(&record).unwrap(), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn quotes_fields_with_separators() {
        let record = write_record(["a,b", "c\"d"]).unwrap();
        assert_eq!(record, "\"a,b\",\"c\"\"d\"");
        assert_eq!(read_record(&record).unwrap(), vec!["a,b", "c\"d"]);
    }

    #[test]
    fn empty_collection_is_empty_body() {
        let record = write_record(Vec::<String>::new()).unwrap();
        assert_eq!(record, "");
        assert!(read_record("").unwrap().is_empty());
    }

    #[test]
    fn single_field_record() {
        let record = write_record(["only"]).unwrap();
        assert_eq!(record, "only");
        assert_eq!(read_record(&record).unwrap(), vec!["only"]);
    }

    #[test]
    fn lone_empty_field_round_trips() {
        let record = write_record([""]).unwrap();
        assert_eq!(record, "\"\"");
        assert_eq!(read_record(&record).unwrap(), vec![""]);
    }

    #[test]
    fn trailing_empty_field_round_trips() {
        let record = write_record(["a", ""]).unwrap();
        assert_eq!(record, "a,");
        assert_eq!(read_record(&record).unwrap(), vec!["a", ""]);
    }
}
