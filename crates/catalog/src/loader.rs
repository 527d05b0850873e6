//! CSV loaders for the three spreadsheet exports.
//!
//! Headers are matched by name through [`LoaderConfig`], so column order in
//! the export does not matter. In lenient mode (the default) rows missing a
//! required value are skipped with a warning and absent optional columns read
//! as empty; strict mode turns both into errors.

use crate::config::LoaderConfig;
use crate::error::{CatalogError, Result};
use crate::forbidden::ForbiddenPairSet;
use crate::metadata::MechanismMetadata;
use crate::product::ProductRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Header name → column position
struct HeaderIndex<'a> {
    positions: HashMap<String, usize>,
    source_name: &'a str,
    strict: bool,
}

impl<'a> HeaderIndex<'a> {
    fn new(headers: &csv::StringRecord, source_name: &'a str, strict: bool) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (normalize_header(h), idx))
            .collect();
        Self {
            positions,
            source_name,
            strict,
        }
    }

    fn required(&self, column: &str) -> Result<usize> {
        self.positions
            .get(column.trim())
            .copied()
            .ok_or_else(|| CatalogError::missing_column(self.source_name, column))
    }

    fn optional(&self, column: &str) -> Result<Option<usize>> {
        match self.positions.get(column.trim()) {
            Some(idx) => Ok(Some(*idx)),
            None if self.strict => Err(CatalogError::missing_column(self.source_name, column)),
            None => {
                log::debug!("{}: optional column '{column}' absent", self.source_name);
                Ok(None)
            }
        }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches(BYTE_ORDER_MARK).trim().to_string()
}

fn cell(row: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Resolve a required value, or decide to skip the row
fn required_cell(
    row: &csv::StringRecord,
    idx: usize,
    column: &str,
    row_number: usize,
    headers: &HeaderIndex<'_>,
) -> Result<Option<String>> {
    match cell(row, Some(idx)) {
        Some(value) => Ok(Some(value)),
        None if headers.strict => Err(CatalogError::missing_field(
            headers.source_name,
            row_number,
            column,
        )),
        None => {
            log::warn!(
                "{}: skipping row {row_number}: no value for '{column}'",
                headers.source_name
            );
            Ok(None)
        }
    }
}

/// Load product records from a CSV export
pub fn load_products<R: Read>(
    input: R,
    config: &LoaderConfig,
    source_name: &str,
) -> Result<Vec<ProductRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let header_row = reader.headers()?.clone();
    let headers = HeaderIndex::new(&header_row, source_name, config.strict);
    let columns = &config.product_columns;

    let trade_name_idx = headers.required(&columns.trade_name)?;
    let crop_idx = headers.required(&columns.crop)?;
    let mechanism_idx = headers.required(&columns.mechanism)?;
    let target_idx = headers.optional(&columns.target)?;
    let category_idx = headers.optional(&columns.category)?;
    let formulation_idx = headers.optional(&columns.formulation)?;
    let registered_idx = headers.optional(&columns.registered_on)?;
    let ingredient_idx = headers.optional(&columns.ingredient)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let row_number = idx + 1;
        let row = result?;

        let trade_name =
            required_cell(&row, trade_name_idx, &columns.trade_name, row_number, &headers)?;
        let crop = required_cell(&row, crop_idx, &columns.crop, row_number, &headers)?;
        let mechanism =
            required_cell(&row, mechanism_idx, &columns.mechanism, row_number, &headers)?;
        let (Some(trade_name), Some(crop), Some(mechanism)) = (trade_name, crop, mechanism) else {
            skipped += 1;
            continue;
        };

        records.push(ProductRecord {
            trade_name,
            crop,
            target: cell(&row, target_idx),
            mechanism,
            category: cell(&row, category_idx),
            formulation: cell(&row, formulation_idx).unwrap_or_default(),
            registered_on: cell(&row, registered_idx).unwrap_or_default(),
            ingredient: cell(&row, ingredient_idx).unwrap_or_default(),
        });
    }

    log::info!(
        "{source_name}: loaded {} product records ({skipped} skipped)",
        records.len()
    );
    Ok(records)
}

/// Load mechanism metadata keyed by atomic code
pub fn load_mechanisms<R: Read>(
    input: R,
    config: &LoaderConfig,
    source_name: &str,
) -> Result<HashMap<String, MechanismMetadata>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let header_row = reader.headers()?.clone();
    let headers = HeaderIndex::new(&header_row, source_name, config.strict);
    let columns = &config.mechanism_columns;

    let code_idx = headers.required(&columns.code)?;
    let name_idx = headers.optional(&columns.name)?;
    let mode_idx = headers.optional(&columns.mode_of_action)?;
    let site_idx = match &columns.site_of_action {
        Some(column) => headers.optional(column)?,
        None => None,
    };
    let ingredient_idx = headers.optional(&columns.ingredient)?;

    let mut metadata = HashMap::new();
    for (idx, result) in reader.records().enumerate() {
        let row_number = idx + 1;
        let row = result?;
        let Some(code) = required_cell(&row, code_idx, &columns.code, row_number, &headers)? else {
            continue;
        };

        let entry = MechanismMetadata {
            name: cell(&row, name_idx).unwrap_or_default(),
            mode_of_action: cell(&row, mode_idx).unwrap_or_default(),
            site_of_action: cell(&row, site_idx).unwrap_or_default(),
            ingredient: cell(&row, ingredient_idx).unwrap_or_default(),
        };
        if metadata.insert(code.clone(), entry).is_some() {
            log::warn!("{source_name}: duplicate mechanism '{code}' at row {row_number}, keeping the later row");
        }
    }

    log::info!("{source_name}: loaded {} mechanisms", metadata.len());
    Ok(metadata)
}

/// Load the forbidden pairs from a square compatibility table.
///
/// The first row holds column codes (its first cell is a corner label), the
/// first cell of every other row holds that row's code. Any cell equal to
/// `marker`, ignoring case, forbids its row/column pair. Blank cells past the
/// header width are ignored; anything else there is an error.
pub fn load_forbidden_pairs<R: Read>(
    input: R,
    marker: &str,
    source_name: &str,
) -> Result<ForbiddenPairSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let marker = marker.trim().to_lowercase();
    let mut set = ForbiddenPairSet::new();
    let mut rows = reader.records();

    let Some(header) = rows.next() else {
        log::warn!("{source_name}: compatibility table is empty");
        return Ok(set);
    };
    let header = header?;
    let columns: Vec<String> = header.iter().skip(1).map(normalize_header).collect();
    for code in columns.iter().filter(|c| !c.is_empty()) {
        set.register(code);
    }

    for (idx, result) in rows.enumerate() {
        let row_number = idx + 1;
        let row = result?;
        if row.iter().skip(header.len()).any(|v| !v.trim().is_empty()) {
            return Err(CatalogError::invalid_table(format!(
                "{source_name}: row {row_number} has values past the last of {} header cells",
                header.len()
            )));
        }

        let Some(row_code) = cell(&row, Some(0)) else {
            log::debug!("{source_name}: row {row_number} has no code, ignored");
            continue;
        };
        set.register(&row_code);

        for (col, value) in row.iter().enumerate().take(header.len()).skip(1) {
            if value.trim().to_lowercase() != marker {
                continue;
            }
            let column_code = &columns[col - 1];
            if column_code.is_empty() {
                return Err(CatalogError::invalid_table(format!(
                    "{source_name}: marker in row {row_number} under an unnamed column"
                )));
            }
            set.insert(&row_code, column_code);
        }
    }

    log::info!("{source_name}: loaded {} forbidden pairs", set.len());
    Ok(set)
}

pub fn load_products_from_path(path: &Path, config: &LoaderConfig) -> Result<Vec<ProductRecord>> {
    let file = File::open(path)?;
    load_products(file, config, &path.display().to_string())
}

pub fn load_mechanisms_from_path(
    path: &Path,
    config: &LoaderConfig,
) -> Result<HashMap<String, MechanismMetadata>> {
    let file = File::open(path)?;
    load_mechanisms(file, config, &path.display().to_string())
}

pub fn load_forbidden_pairs_from_path(path: &Path, marker: &str) -> Result<ForbiddenPairSet> {
    let file = File::open(path)?;
    load_forbidden_pairs(file, marker, &path.display().to_string())
}
