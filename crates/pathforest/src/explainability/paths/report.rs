//! Ranked pathway report and its console / on-disk renderings.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{CategoryMap, PathError, RankedPath};
use crate::config::ArtifactFormat;
use crate::repr::ClassLabel;

/// Ranked paths of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    /// Number of leaves in the forest predicting the class.
    pub total_paths: usize,
    /// Number of distinct paths among them.
    pub distinct_paths: usize,
    /// Most frequent paths, rank 1 first.
    pub ranked: Vec<RankedPath>,
}

/// Ranked paths for every class some leaf predicts, in ascending class order.
#[derive(Debug, Clone, PartialEq)]
pub struct PathReport<C: ClassLabel> {
    classes: BTreeMap<C, ClassSummary>,
}

impl<C: ClassLabel> PathReport<C> {
    pub fn new(classes: BTreeMap<C, ClassSummary>) -> Self {
        Self { classes }
    }

    pub fn get(&self, class: &C) -> Option<&ClassSummary> {
        self.classes.get(class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&C, &ClassSummary)> {
        self.classes.iter()
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One row of the persisted pathway table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Conditions")]
    pub conditions: String,
    #[serde(rename = "Frequency")]
    pub frequency: usize,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
    #[serde(rename = "Mean_Probability")]
    pub mean_probability: f64,
}

const CSV_HEADER: [&str; 6] = [
    "Label",
    "Rank",
    "Conditions",
    "Frequency",
    "Percentage",
    "Mean_Probability",
];

/// Renders a [`PathReport`] with demapped conditions.
#[derive(Debug, Clone, Copy)]
pub struct ReportEmitter<'a> {
    categories: &'a CategoryMap,
    delimiter: &'a str,
}

impl<'a> ReportEmitter<'a> {
    pub fn new(categories: &'a CategoryMap, delimiter: &'a str) -> Self {
        Self {
            categories,
            delimiter,
        }
    }

    /// Table rows, class by class, rank by rank.
    pub fn rows<C: ClassLabel>(&self, report: &PathReport<C>) -> Vec<ReportRow> {
        report
            .iter()
            .flat_map(|(class, summary)| {
                summary.ranked.iter().map(move |ranked| ReportRow {
                    label: class.to_string(),
                    rank: ranked.rank,
                    conditions: self.categories.render_path(&ranked.path, self.delimiter),
                    frequency: ranked.count,
                    percentage: ranked.percentage,
                    mean_probability: ranked.mean_confidence,
                })
            })
            .collect()
    }

    /// Console listing: one block per class.
    pub fn render_text<C: ClassLabel>(&self, report: &PathReport<C>) -> String {
        let mut out = String::new();
        for (class, summary) in report.iter() {
            let _ = writeln!(
                out,
                "=== Class {class}: top {} of {} distinct paths ({} leaves) ===",
                summary.ranked.len(),
                summary.distinct_paths,
                summary.total_paths
            );
            for ranked in &summary.ranked {
                let conditions = self.categories.render_path(&ranked.path, self.delimiter);
                let conditions = if conditions.is_empty() {
                    "(root)".to_string()
                } else {
                    conditions
                };
                let _ = writeln!(out, "  #{} {conditions}", ranked.rank);
                let _ = writeln!(
                    out,
                    "     frequency: {}  percentage: {:.2}%  mean probability: {:.4}",
                    ranked.count, ranked.percentage, ranked.mean_confidence
                );
            }
            out.push('\n');
        }
        out
    }

    /// Persist the table at `path`.
    ///
    /// The table is written to a sibling temporary file and renamed into place,
    /// so on failure no partial artifact is left at `path`.
    pub fn write<C: ClassLabel>(
        &self,
        report: &PathReport<C>,
        path: impl AsRef<Path>,
        format: ArtifactFormat,
    ) -> Result<(), PathError> {
        let path = path.as_ref();
        let rows = self.rows(report);
        let tmp = partial_path(path);

        let result = write_rows(&rows, &tmp, format).and_then(|()| fs::rename(&tmp, path));
        if let Err(source) = result {
            let _ = fs::remove_file(&tmp);
            return Err(PathError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_rows(rows: &[ReportRow], path: &Path, format: ArtifactFormat) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ArtifactFormat::Csv => write_csv(rows, &mut writer)?,
        ArtifactFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            csv_field(&row.label),
            row.rank,
            csv_field(&row.conditions),
            row.frequency,
            row.percentage,
            row.mean_probability
        )?;
    }
    Ok(())
}

/// Quote a field if it contains a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
