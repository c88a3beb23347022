//! bib2csv: Convert a BibTeX file to CSV
//!
//! One row per entry, input order preserved. Compact JSON summary on stdout.

use crate::bib::{first_author, parse_bibliography, strip_braces, BibEntry};
use crate::error::{Error, Result};
use crate::schema::{ConvertedRow, CONVERTED_COLUMNS};
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Args)]
pub struct ConvertArgs {
    /// Bibliography file to convert (BibTeX)
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// CSV file to write
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ConvertOutput {
    pub entries: usize,
    pub output: String,
    pub timestamp: String,
}

/// Run the bib2csv command
pub async fn run_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read file: {}", args.input.display()))?;

    let rows = convert(&content)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;
    tracing::info!(entries = rows.len(), input = %args.input.display(), "parsed bibliography");

    write_converted(&args.output, &rows)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let output = ConvertOutput {
        entries: rows.len(),
        output: args.output.display().to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    println!("{}", serde_json::to_string(&output)?);

    eprintln!("Done: {} entries", rows.len());

    Ok(())
}

/// Parse BibTeX source and convert every entry
pub fn convert(src: &str) -> Result<Vec<ConvertedRow>> {
    Ok(parse_bibliography(src)?.iter().map(convert_entry).collect())
}

/// Flatten one entry into a row
pub fn convert_entry(entry: &BibEntry) -> ConvertedRow {
    let venue = entry.journal().or_else(|| entry.booktitle());
    let arxiv = venue.is_none() && entry.archive_prefix().is_some_and(|p| !p.is_empty());

    let (publication, arxiv_id) = if arxiv {
        ("arXiv".to_string(), Some(entry.key().to_string()))
    } else {
        (
            venue.or_else(|| entry.archive_prefix()).unwrap_or_default().to_string(),
            None,
        )
    };

    ConvertedRow {
        title: entry.title().map(strip_braces).unwrap_or_default(),
        author: entry.author().map(first_author).unwrap_or_default().to_string(),
        publication,
        year: entry.year().unwrap_or_default().to_string(),
        publisher: entry.publisher().unwrap_or_default().to_string(),
        doi: entry.doi().map(String::from),
        arxiv_id,
    }
}

/// Write rows to a CSV file
pub fn write_converted(path: &Path, rows: &[ConvertedRow]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    write_converted_to(file, rows)
}

/// Write rows as CSV.
///
/// `doi` and `arxiv_id` columns appear only when at least one row carries a
/// value; rows without one get an empty cell.
pub fn write_converted_to<W: Write>(writer: W, rows: &[ConvertedRow]) -> Result<()> {
    let with_doi = rows.iter().any(|r| r.doi.is_some());
    let with_arxiv = rows.iter().any(|r| r.arxiv_id.is_some());

    let mut wtr = csv::Writer::from_writer(writer);

    // Always `doi` then `arxiv_id`, regardless of which appears first in the input
    let mut header: Vec<&str> = CONVERTED_COLUMNS.to_vec();
    if with_doi {
        header.push("doi");
    }
    if with_arxiv {
        header.push("arxiv_id");
    }
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.title.as_str(),
            row.author.as_str(),
            row.publication.as_str(),
            row.year.as_str(),
            row.publisher.as_str(),
        ];
        if with_doi {
            record.push(row.doi.as_deref().unwrap_or_default());
        }
        if with_arxiv {
            record.push(row.arxiv_id.as_deref().unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fields: &[(&str, &str)]) -> BibEntry {
        BibEntry::from_fields("key2020", fields.iter().copied())
    }

    fn to_csv(rows: &[ConvertedRow]) -> String {
        let mut buf = Vec::new();
        write_converted_to(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_end_to_end_entry() {
        let rows = convert(
            r#"@article{smith2020,
                title = "{Deep Learning}",
                author = "Smith, J. and Doe, A.",
                journal = "Nature",
                year = "2020",
                doi = "10.1/xyz"
            }"#,
        )
        .unwrap();

        assert_eq!(
            rows,
            vec![ConvertedRow {
                title: "Deep Learning".to_string(),
                author: "Smith, J.".to_string(),
                publication: "Nature".to_string(),
                year: "2020".to_string(),
                publisher: String::new(),
                doi: Some("10.1/xyz".to_string()),
                arxiv_id: None,
            }]
        );
    }

    #[test]
    fn test_fields_pass_through_verbatim() {
        let rows = convert(
            r#"@article{k,
                title = {{IEEE} {G}raphs},
                author = {{\"O}zt{\"u}rk, A. and Bo, B.},
                journal = {{IEEE} Transactions},
                publisher = {{ACM} Press \& Co},
                year = {2020}
            }"#,
        )
        .unwrap();

        assert_eq!(rows[0].title, "IEEE Graphs");
        assert_eq!(rows[0].author, r#"{\"O}zt{\"u}rk, A."#);
        assert_eq!(rows[0].publication, "{IEEE} Transactions");
        assert_eq!(rows[0].publisher, r"{ACM} Press \& Co");
        assert_eq!(rows[0].year, "2020");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let row = convert_entry(&entry(&[]));
        assert_eq!(row, ConvertedRow::default());
    }

    #[test]
    fn test_first_author_only() {
        let row = convert_entry(&entry(&[("author", "A and B and C")]));
        assert_eq!(row.author, "A");
    }

    #[test]
    fn test_title_braces_stripped() {
        let row = convert_entry(&entry(&[("title", "{BERT}: {P}re-training")]));
        assert_eq!(row.title, "BERT: Pre-training");
    }

    #[test]
    fn test_publication_fallback_order() {
        let row = convert_entry(&entry(&[("booktitle", "NeurIPS"), ("journal", "JMLR")]));
        assert_eq!(row.publication, "JMLR");

        let row = convert_entry(&entry(&[("booktitle", "NeurIPS")]));
        assert_eq!(row.publication, "NeurIPS");
    }

    #[test]
    fn test_arxiv_without_venue() {
        let row = convert_entry(&entry(&[("archivePrefix", "arXiv"), ("eprint", "2101.00001")]));
        assert_eq!(row.publication, "arXiv");
        assert_eq!(row.arxiv_id.as_deref(), Some("key2020"));
    }

    #[test]
    fn test_arxiv_with_journal_keeps_journal() {
        let row = convert_entry(&entry(&[("archivePrefix", "arXiv"), ("journal", "Nature")]));
        assert_eq!(row.publication, "Nature");
        assert_eq!(row.arxiv_id, None);
    }

    #[test]
    fn test_empty_archive_prefix_is_not_arxiv() {
        let row = convert_entry(&entry(&[("archivePrefix", "")]));
        assert_eq!(row.publication, "");
        assert_eq!(row.arxiv_id, None);
    }

    #[test]
    fn test_csv_base_columns_only() {
        let out = to_csv(&[ConvertedRow {
            title: "T".to_string(),
            author: "A".to_string(),
            ..Default::default()
        }]);
        assert_eq!(out, "title,author,publication,year,publisher\nT,A,,,\n");
    }

    #[test]
    fn test_csv_optional_columns_when_any_row_has_them() {
        let rows = vec![
            ConvertedRow {
                title: "With DOI".to_string(),
                doi: Some("10.1/xyz".to_string()),
                ..Default::default()
            },
            ConvertedRow {
                title: "Preprint".to_string(),
                publication: "arXiv".to_string(),
                arxiv_id: Some("2101.00001".to_string()),
                ..Default::default()
            },
        ];
        let out = to_csv(&rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "title,author,publication,year,publisher,doi,arxiv_id");
        assert_eq!(lines[1], "With DOI,,,,,10.1/xyz,");
        assert_eq!(lines[2], "Preprint,,arXiv,,,,2101.00001");
    }
}
