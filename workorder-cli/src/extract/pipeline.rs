//! Extraction pipeline entry points
//!
//! load workbook -> normalize -> forward-fill identity -> customer filter ->
//! per extract: rule filter, dedup, shape columns, write with auto-fit -> sink

use std::path::Path;

use anyhow::Result;

use super::error::ExtractError;
use super::excel::{RawSheet, read_workbook, read_workbook_bytes, write_extract};
use super::filter::{apply_filter, dedup_rows, shape_columns};
use super::normalize::{build_dataset, forward_fill};
use super::sink::{OutputSink, ZipSink};
use super::types::Dataset;
use crate::config::ExtractConfig;

/// One file written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOutput {
    /// Name the sink stored the file under
    pub file_name: String,
    /// Data rows (header excluded)
    pub rows: usize,
    /// Column order of the file
    pub columns: Vec<String>,
}

/// Summary of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Rows read across all sheets
    pub input_rows: usize,
    /// Rows left after the customer filter
    pub filtered_rows: usize,
    /// Files written, in extract order
    pub outputs: Vec<ExtractOutput>,
}

impl ExtractionReport {
    pub fn total_rows(&self) -> usize {
        self.outputs.iter().map(|o| o.rows).sum()
    }
}

/// Read and prepare the dataset from an xlsx file
pub fn load_dataset<P: AsRef<Path>>(path: P, config: &ExtractConfig) -> Result<Dataset> {
    prepare_dataset(read_workbook(path)?, config)
}

/// Read and prepare the dataset from in-memory xlsx bytes
pub fn load_dataset_bytes(bytes: &[u8], config: &ExtractConfig) -> Result<Dataset> {
    prepare_dataset(read_workbook_bytes(bytes)?, config)
}

/// Concatenate and normalize sheets, then forward-fill the identity column
///
/// Fails when there are no data rows, then on a missing identity column.
pub fn prepare_dataset(sheets: Vec<RawSheet>, config: &ExtractConfig) -> Result<Dataset> {
    let mut dataset = build_dataset(sheets);

    if dataset.is_empty() {
        return Err(ExtractError::EmptyInput.into());
    }
    if !dataset.has_column(&config.identity_column) {
        return Err(ExtractError::MissingColumn(config.identity_column.clone()).into());
    }

    let filled = forward_fill(&mut dataset, &config.identity_column)?;
    log::info!(
        "Loaded {} rows, {} columns ({} '{}' values filled from previous rows)",
        dataset.len(),
        dataset.columns().len(),
        filled,
        config.identity_column
    );

    Ok(dataset)
}

/// Run every configured extract over a prepared dataset, writing into `sink`
pub fn run_extracts(
    dataset: &Dataset,
    config: &ExtractConfig,
    sink: &mut dyn OutputSink,
) -> Result<ExtractionReport> {
    let customers = apply_filter(dataset, &config.customer_filter);
    log::info!(
        "{} of {} rows pass the customer filter",
        customers.len(),
        dataset.len()
    );

    let mut outputs = Vec::with_capacity(config.extracts.len());

    for rule in &config.extracts {
        let matched = apply_filter(&customers, &rule.filter_rule());
        let matched_count = matched.len();
        let unique = dedup_rows(matched);
        let shaped = shape_columns(&unique, &config.columns, &config.leading_columns);

        let bytes = write_extract(&shaped)?;
        let file_name = sink.write(&rule.output_name(), &bytes)?;

        log::info!(
            "{}: {} rows ({} duplicates removed)",
            file_name,
            shaped.len(),
            matched_count - shaped.len()
        );

        outputs.push(ExtractOutput {
            file_name,
            rows: shaped.len(),
            columns: shaped.columns().to_vec(),
        });
    }

    Ok(ExtractionReport {
        input_rows: dataset.len(),
        filtered_rows: customers.len(),
        outputs,
    })
}

/// Load an xlsx file and run all extracts into `sink`
pub fn run_extraction<P: AsRef<Path>>(
    path: P,
    config: &ExtractConfig,
    sink: &mut dyn OutputSink,
) -> Result<ExtractionReport> {
    let dataset = load_dataset(path, config)?;
    run_extracts(&dataset, config, sink)
}

/// Run all extracts over an uploaded workbook and return the zip archive bytes
pub fn extract_to_archive(bytes: &[u8], config: &ExtractConfig) -> Result<(Vec<u8>, ExtractionReport)> {
    let dataset = load_dataset_bytes(bytes, config)?;
    let mut sink = ZipSink::new();
    let report = run_extracts(&dataset, config, &mut sink)?;
    Ok((sink.finish()?, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::excel::read_workbook_bytes;
    use crate::extract::fixtures::{ORDER_HEADERS, typed_workbook_bytes, workbook_bytes};
    use crate::extract::sink::FolderSink;
    use crate::extract::types::{Cell, ExtractRule, FilterRule};
    use std::collections::HashMap;
    use std::io::{Cursor, Read};
    use tempfile::TempDir;

    const CLOSED: &str = "(X) CHC-HOUSE/UNIT CLOSED";
    const RESKED: &str = "(X) CRES - RESKED  WITH PREFERRED DATE";
    const INSTALL_CLOSED: &str = "Install_(X)_CHC-HOUSE_UNIT_CLOSED.xlsx";

    /// Captures written files in memory
    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl OutputSink for MemorySink {
        fn write(&mut self, name: &str, bytes: &[u8]) -> Result<String> {
            self.files.push((name.to_string(), bytes.to_vec()));
            Ok(name.to_string())
        }
    }

    impl MemorySink {
        fn get(&self, name: &str) -> &[u8] {
            &self.files.iter().find(|(n, _)| n == name).unwrap().1
        }
    }

    fn order<'a>(
        id: &'a str,
        name: &'a str,
        ctype: &'a str,
        subtype: &'a str,
        skill: &'a str,
        reason: &'a str,
        notes: &'a str,
    ) -> Vec<&'a str> {
        vec![id, name, "1 Main St", "555-0100", ctype, subtype, skill, reason, notes, "2024-01-05"]
    }

    /// Two sheets, 10 rows: 6 pass the customer filter, 3 match Install/closed (2 unique)
    fn sample_workbook() -> Vec<u8> {
        let sheet1 = vec![
            ORDER_HEADERS.to_vec(),
            order("W1", "Ann", "Consumer", "Regular", "Install", CLOSED, "gate locked"),
            order("", "Ann", "Consumer", "Regular", "Install", CLOSED, "gate locked"),
            order("W2", "Bob", "Business", "Regular", "Install", CLOSED, "office shut"),
            order("W3", "Cy", "Consumer", "Regular", "Repair", CLOSED, "no answer"),
            order("W4", "Di", "Consumer", "VIP", "Install", CLOSED, "vip"),
        ];
        let sheet2 = vec![
            ORDER_HEADERS.to_vec(),
            order("W5", " Eve ", "Consumer", "Regular", "Install", CLOSED, "dog"),
            order("W6", "Fay", "Consumer", "Regular", "Install", RESKED, "asked for friday"),
            order("W7", "Gus", "Consumer", "Regular", "Repair", RESKED, "asked for monday"),
            order("W8", "Hal", "Business", "Gold", "Repair", RESKED, "biz"),
            order("W9", "Ivy", "Consumer", "Premium", "Repair", RESKED, "premium"),
        ];
        workbook_bytes(&[("North", sheet1), ("South", sheet2)])
    }

    fn read_extract(bytes: &[u8]) -> (Vec<String>, Vec<Vec<Cell>>) {
        let mut sheets = read_workbook_bytes(bytes).unwrap();
        let sheet = sheets.remove(0);
        (sheet.headers, sheet.rows)
    }

    #[test]
    fn test_end_to_end_counts_and_columns() {
        let config = ExtractConfig::default();
        let dataset = load_dataset_bytes(&sample_workbook(), &config).unwrap();
        assert_eq!(dataset.len(), 10);

        let mut sink = MemorySink::default();
        let report = run_extracts(&dataset, &config, &mut sink).unwrap();

        assert_eq!(report.input_rows, 10);
        assert_eq!(report.filtered_rows, 6);
        assert_eq!(report.outputs.len(), 4);

        let install_closed = &report.outputs[0];
        assert_eq!(install_closed.file_name, INSTALL_CLOSED);
        assert_eq!(install_closed.rows, 2);

        let (headers, rows) = read_extract(sink.get(INSTALL_CLOSED));
        assert_eq!(
            headers,
            vec![
                "workordernumber",
                "customername",
                "customercontact",
                "customeraddress",
                "lastupdatedate",
                "customertype",
                "customersubtype",
                "skillset",
                "delayreason",
                "delaynotes",
            ]
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Cell::from("W1"));
        assert_eq!(rows[1][0], Cell::from("W5"));
        assert_eq!(rows[1][1], Cell::from("Eve"));
    }

    #[test]
    fn test_output_names_follow_config_order() {
        let config = ExtractConfig::default();
        let mut sink = MemorySink::default();
        let dataset = load_dataset_bytes(&sample_workbook(), &config).unwrap();

        run_extracts(&dataset, &config, &mut sink).unwrap();

        let names: Vec<String> = sink.files.iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, config.output_names());
    }

    #[test]
    fn test_business_customers_never_exported() {
        let config = ExtractConfig::default();
        let dataset = load_dataset_bytes(&sample_workbook(), &config).unwrap();
        let mut sink = MemorySink::default();

        run_extracts(&dataset, &config, &mut sink).unwrap();

        for (_, bytes) in &sink.files {
            let (headers, rows) = read_extract(bytes);
            let idx = headers.iter().position(|h| h == "customertype").unwrap();
            assert!(rows.iter().all(|r| r[idx] != Cell::from("Business")));
        }
    }

    #[test]
    fn test_every_extract_row_count() {
        let config = ExtractConfig::default();
        let dataset = load_dataset_bytes(&sample_workbook(), &config).unwrap();
        let mut sink = MemorySink::default();

        let report = run_extracts(&dataset, &config, &mut sink).unwrap();

        let counts: HashMap<&str, usize> = report
            .outputs
            .iter()
            .map(|o| (o.file_name.as_str(), o.rows))
            .collect();
        assert_eq!(counts[INSTALL_CLOSED], 2);
        assert_eq!(counts["Repair_(X)_CHC-HOUSE_UNIT_CLOSED.xlsx"], 1);
        assert_eq!(counts["Install_(X)_CRES_-_RESKED__WITH_PREFERRED_DATE.xlsx"], 1);
        assert_eq!(counts["Repair_(X)_CRES_-_RESKED__WITH_PREFERRED_DATE.xlsx"], 1);
        assert_eq!(report.total_rows(), 5);
    }

    #[test]
    fn test_missing_identity_column_fails_fast() {
        let bytes = workbook_bytes(&[(
            "Sheet1",
            vec![vec!["CustomerName", "CustomerType"], vec!["Ann", "Consumer"]],
        )]);

        let err = load_dataset_bytes(&bytes, &ExtractConfig::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ExtractError>(),
            Some(&ExtractError::MissingColumn("workordernumber".to_string()))
        );
    }

    #[test]
    fn test_header_only_input_is_empty() {
        let bytes = workbook_bytes(&[("Sheet1", vec![ORDER_HEADERS.to_vec()])]);

        let err = load_dataset_bytes(&bytes, &ExtractConfig::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<ExtractError>(), Some(&ExtractError::EmptyInput));
    }

    #[test]
    fn test_missing_filter_columns_yield_empty_extracts() {
        let bytes = workbook_bytes(&[(
            "Sheet1",
            vec![
                vec!["WorkOrderNumber", "SkillSet", "DelayReason"],
                vec!["W1", "Install", CLOSED],
            ],
        )]);
        let config = ExtractConfig::default();
        let dataset = load_dataset_bytes(&bytes, &config).unwrap();
        let mut sink = MemorySink::default();

        let report = run_extracts(&dataset, &config, &mut sink).unwrap();

        assert_eq!(report.filtered_rows, 0);
        assert!(report.outputs.iter().all(|o| o.rows == 0));
        assert_eq!(sink.files.len(), 4);
    }

    #[test]
    fn test_custom_rules_substitute_tables() {
        let config = ExtractConfig {
            customer_filter: FilterRule::new().with("customertype", "Business"),
            extracts: vec![ExtractRule::new("Repair", RESKED)],
            ..ExtractConfig::default()
        };
        let dataset = load_dataset_bytes(&sample_workbook(), &config).unwrap();
        let mut sink = MemorySink::default();

        let report = run_extracts(&dataset, &config, &mut sink).unwrap();

        assert_eq!(report.filtered_rows, 2);
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].rows, 1);
    }

    #[test]
    fn test_folder_mode_twice_creates_two_directories() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("orders.xlsx");
        std::fs::write(&input, sample_workbook()).unwrap();
        let config = ExtractConfig::default();

        for expected in ["Extracted", "Extracted1"] {
            let dataset = load_dataset(&input, &config).unwrap();
            let mut sink = FolderSink::create_beside(&input).unwrap();
            run_extracts(&dataset, &config, &mut sink).unwrap();
            assert_eq!(sink.dir(), tmp.path().join(expected));
        }

        for dir in ["Extracted", "Extracted1"] {
            for name in config.output_names() {
                assert!(tmp.path().join(dir).join(&name).is_file(), "{}/{}", dir, name);
            }
        }
    }

    #[test]
    fn test_archive_contains_one_entry_per_extract() {
        let config = ExtractConfig::default();
        let (bytes, report) = extract_to_archive(&sample_workbook(), &config).unwrap();
        assert_eq!(report.outputs.len(), 4);

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        let mut expected = config.output_names();
        expected.sort();
        assert_eq!(names, expected);

        let mut inner = Vec::new();
        archive
            .by_name(INSTALL_CLOSED)
            .unwrap()
            .read_to_end(&mut inner)
            .unwrap();
        let (_, rows) = read_extract(&inner);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_zip_sink_via_run_extraction() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("orders.xlsx");
        std::fs::write(&input, sample_workbook()).unwrap();

        let mut sink = ZipSink::new();
        let report = run_extraction(&input, &ExtractConfig::default(), &mut sink).unwrap();

        let archive = zip::ZipArchive::new(Cursor::new(sink.finish().unwrap())).unwrap();
        assert_eq!(archive.len(), report.outputs.len());
    }

    #[test]
    fn test_blank_workbook_is_empty_input() {
        let bytes = workbook_bytes(&[("Sheet1", vec![])]);

        let err = load_dataset_bytes(&bytes, &ExtractConfig::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<ExtractError>(), Some(&ExtractError::EmptyInput));
    }

    fn typed_order(id: Cell, contact: Cell, skill: &str, notes: &str, updated: f64) -> Vec<Cell> {
        vec![
            id,
            Cell::from("Ann"),
            Cell::from("1 Main St"),
            contact,
            Cell::from("Consumer"),
            Cell::from("Regular"),
            Cell::from(skill),
            Cell::from(CLOSED),
            Cell::from(notes),
            Cell::DateTime(updated),
        ]
    }

    #[test]
    fn test_numeric_ids_and_dates_survive_export() {
        let header: Vec<Cell> = ORDER_HEADERS.iter().map(|h| Cell::from(*h)).collect();
        let bytes = typed_workbook_bytes(&[(
            "Sheet1",
            vec![
                header,
                typed_order(Cell::Number(1001.0), Cell::Number(5550100.0), "Install", "gate", 45296.0),
                typed_order(Cell::Empty, Cell::from(" 555-0101 "), "Install", "second visit", 45297.0),
                typed_order(Cell::Number(1002.0), Cell::from("555-0102"), "Repair", "dog", 45298.5),
            ],
        )]);
        let config = ExtractConfig::default();

        let dataset = load_dataset_bytes(&bytes, &config).unwrap();
        let mut sink = MemorySink::default();
        let report = run_extracts(&dataset, &config, &mut sink).unwrap();
        assert_eq!(report.outputs[0].rows, 2);

        let (headers, rows) = read_extract(sink.get(INSTALL_CLOSED));
        assert_eq!(headers[0], "workordernumber");
        assert_eq!(headers[2], "customercontact");
        assert_eq!(headers[4], "lastupdatedate");

        // Numeric identity column keeps its type and is forward-filled
        assert_eq!(rows[0][0], Cell::Number(1001.0));
        assert_eq!(rows[1][0], Cell::Number(1001.0));
        // A column holding any text is stringified and trimmed throughout
        assert_eq!(rows[0][2], Cell::from("5550100"));
        assert_eq!(rows[1][2], Cell::from("555-0101"));
        // Dates come back as dates
        assert_eq!(rows[0][4], Cell::DateTime(45296.0));
        assert_eq!(rows[1][4], Cell::DateTime(45297.0));
    }
}
