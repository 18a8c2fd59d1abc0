//! Delimited-text decode/encode with delimiter auto-detection.

use std::io::{BufRead, BufReader};

use crate::error::{Result, RetortError};
use crate::schema::Table;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Decoder configuration for the delimited family.
#[derive(Debug, Clone)]
pub struct DelimitedConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the stream has a header row.
    pub has_header: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for DelimitedConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: b'"',
        }
    }
}

/// Decode delimited bytes into a table, returning the delimiter that was
/// used so an export can mirror it.
pub fn decode(bytes: &[u8], config: &DelimitedConfig) -> Result<(Table, u8)> {
    let delimiter = match config.delimiter {
        Some(d) => d,
        None => detect_delimiter(bytes)?,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(config.has_header)
        .quote(config.quote)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = if config.has_header {
        reader.headers()?.iter().map(|s| s.to_string()).collect()
    } else {
        match reader.records().next() {
            Some(Ok(record)) => (0..record.len())
                .map(|i| format!("column_{}", i + 1))
                .collect(),
            Some(Err(e)) => return Err(e.into()),
            None => return Err(RetortError::Format("no data rows found".to_string())),
        }
    };

    if headers.is_empty() {
        return Err(RetortError::Format("no columns found".to_string()));
    }

    // The headerless branch above consumed the first record; start over.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(config.has_header)
        .quote(config.quote)
        .flexible(true)
        .from_reader(bytes);

    let expected = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        // Ragged rows are padded with nulls or truncated to the header width.
        while row.len() < expected {
            row.push(String::new());
        }
        row.truncate(expected);
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RetortError::Format("no data rows found".to_string()));
    }

    let table = super::table_from_grid(headers, rows)?;
    Ok((table, delimiter))
}

/// Encode a table as delimited text.
pub fn encode(table: &Table, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column| column.values[row].render())
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| RetortError::Format(e.to_string()))
}

/// Detect the delimiter by scoring consistency over the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(RetortError::Format("no lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delimiter in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delimiter))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Consistent counts win; tab gets a slight bonus since it rarely
        // appears inside actual field values.
        let score = if consistent {
            first_count * 1000 + if delimiter == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delimiter;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delimiter = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, Value};

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_respects_quotes() {
        let data = b"a;b\n\"x;y\";2\n\"z;w\";4";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_decode_typed_columns() {
        let data = b"name,age,score,joined\nAlice,30,1.5,2024-01-01\nBob,25,2.0,2024-02-01";
        let (table, delimiter) = decode(data, &DelimitedConfig::default()).unwrap();

        assert_eq!(delimiter, b',');
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("name").unwrap().dtype, ColumnType::String);
        assert_eq!(table.column("age").unwrap().dtype, ColumnType::Integer);
        assert_eq!(table.column("score").unwrap().dtype, ColumnType::Float);
        assert_eq!(
            table.column("joined").unwrap().dtype,
            ColumnType::Timestamp
        );
        assert_eq!(table.column("age").unwrap().values[1], Value::Int(25));
    }

    #[test]
    fn test_decode_pads_ragged_rows() {
        let data = b"a,b,c\n1,2\n4,5,6";
        let (table, _) = decode(data, &DelimitedConfig::default()).unwrap();
        assert_eq!(table.column("c").unwrap().values[0], Value::Null);
    }

    #[test]
    fn test_decode_headerless_generates_names() {
        let config = DelimitedConfig {
            has_header: false,
            ..DelimitedConfig::default()
        };
        let (table, _) = decode(b"1,2\n3,4", &config).unwrap();
        assert_eq!(table.column_names(), vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_decode_empty_input_fails() {
        assert!(decode(b"", &DelimitedConfig::default()).is_err());
        assert!(decode(b"only,a,header\n", &DelimitedConfig::default()).is_err());
    }

    #[test]
    fn test_encode_round_trip() {
        let data = b"name,price\nwidget,10\ngadget,0\n";
        let (table, delimiter) = decode(data, &DelimitedConfig::default()).unwrap();
        let encoded = encode(&table, delimiter).unwrap();
        let (back, _) = decode(&encoded, &DelimitedConfig::default()).unwrap();
        assert_eq!(back, table);
    }
}
