// src/catalog/xlsx.rs
use crate::catalog::lookup::Catalog;
use crate::catalog::source::CatalogSource;
use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::models::{CatalogEntry, MAX_CATALOG_AMOUNT};
use async_trait::async_trait;
use calamine::{open_workbook_auto, Data, Reader};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const COL_DESCRIPTION: &str = "DESCRICAO";
pub const COL_CASH_PRICE: &str = "A VISTA";
pub const COL_UNIT_WEIGHT: &str = "PESO UND";
pub const COL_MODEL_LINK: &str = "LINK_KIT";
pub const COL_AREA: &str = "AREA";

static EMPTY_CELL: Data = Data::Empty;

/// Spreadsheet catalog (xlsx, xls, ods) read through calamine
pub struct XlsxCatalogSource {
    path: PathBuf,
    sheet: Option<String>,
}

impl XlsxCatalogSource {
    pub fn new<P: AsRef<Path>>(path: P, sheet: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet,
        }
    }
}

#[async_trait]
impl CatalogSource for XlsxCatalogSource {
    async fn load(&self) -> CatalogResult<Catalog> {
        let path = self.path.clone();
        let sheet = self.sheet.clone();

        // calamine is blocking; keep it off the runtime threads
        tokio::task::spawn_blocking(move || read_workbook(&path, sheet.as_deref()))
            .await
            .map_err(|e| CatalogError::Open(format!("Catalog reader task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        match &self.sheet {
            Some(sheet) => format!("{} [{}]", self.path.display(), sheet),
            None => self.path.display().to_string(),
        }
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> CatalogResult<Catalog> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CatalogError::Open(format!("{}: {}", path.display(), e)))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| CatalogError::Open(format!("{}: workbook has no sheets", path.display())))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CatalogError::Open(format!("{} [{}]: {}", path.display(), sheet_name, e)))?;

    let mut rows = range.rows();
    let header = rows.next().ok_or(CatalogError::Empty)?;
    let catalog = parse_rows(header, rows)?;

    log::debug!("Read {} kits from sheet '{}'", catalog.len(), sheet_name);
    Ok(catalog)
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    description: usize,
    cash_price: usize,
    unit_weight: usize,
    model_link: usize,
    area: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> CatalogResult<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|cell| cell.to_string().trim() == name)
        };
        let require = |name: &str| find(name).ok_or_else(|| CatalogError::MissingColumn(name.to_string()));

        Ok(Self {
            description: require(COL_DESCRIPTION)?,
            cash_price: require(COL_CASH_PRICE)?,
            unit_weight: require(COL_UNIT_WEIGHT)?,
            model_link: require(COL_MODEL_LINK)?,
            area: find(COL_AREA),
        })
    }
}

/// Validate data rows against a header row.
///
/// Price and weight must be non-negative numbers in every kit row. A
/// non-numeric area is treated as absent.
pub fn parse_rows<'a, I>(header: &[Data], rows: I) -> CatalogResult<Catalog>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let columns = ColumnMap::from_header(header)?;
    let mut entries = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        // Header is spreadsheet row 1
        let row_number = index + 2;

        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let cell = |col: usize| row.get(col).unwrap_or(&EMPTY_CELL);

        let description = cell_text(cell(columns.description)).unwrap_or_default();
        let cash_price = required_amount(cell(columns.cash_price), row_number, COL_CASH_PRICE)?;
        let unit_weight = required_amount(cell(columns.unit_weight), row_number, COL_UNIT_WEIGHT)?;
        let model_link = cell_text(cell(columns.model_link)).unwrap_or_default();
        let total_area = columns
            .area
            .and_then(|col| cell_decimal(cell(col)).ok().flatten());

        entries.push(CatalogEntry {
            description,
            cash_price,
            unit_weight,
            model_link,
            total_area,
        });
    }

    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    Ok(Catalog::new(entries))
}

fn required_amount(cell: &Data, row: usize, column: &str) -> CatalogResult<Decimal> {
    let invalid = |reason: String| CatalogError::InvalidCell {
        row,
        column: column.to_string(),
        reason,
    };

    let value = cell_decimal(cell)
        .map_err(invalid)?
        .ok_or_else(|| invalid("value is missing".to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(invalid(format!("negative value {}", value)));
    }

    if value > MAX_CATALOG_AMOUNT {
        return Err(invalid(format!("{} exceeds the limit of {}", value, MAX_CATALOG_AMOUNT)));
    }

    Ok(value)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => Some(other.to_string()),
    }
}

fn cell_decimal(cell: &Data) -> Result<Option<Decimal>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Int(i) => Ok(Some(Decimal::from(*i))),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(Some)
            .ok_or_else(|| format!("{} is not a finite number", f)),
        Data::String(s) => parse_decimal_text(s),
        other => Err(format!("'{}' is not numeric", other)),
    }
}

/// Parse numeric text written with either `.` or `,` as decimal separator.
///
/// When both appear, whichever comes last is the decimal separator and the
/// other one groups thousands (`1.234,50` and `1,234.50`).
fn parse_decimal_text(text: &str) -> Result<Option<Decimal>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) => trimmed.replace(',', "."),
        _ => trimmed.to_string(),
    };

    Decimal::from_str(&normalized)
        .map(Some)
        .map_err(|_| format!("'{}' is not numeric", trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    fn header() -> Vec<Data> {
        vec![
            text("DESCRICAO"),
            text("A VISTA"),
            text(" PESO UND "),
            text("LINK_KIT"),
            text("AREA"),
        ]
    }

    fn parse(rows: &[Vec<Data>]) -> CatalogResult<Catalog> {
        parse_rows(&header(), rows.iter().map(|r| r.as_slice()))
    }

    #[test]
    fn parses_numeric_and_text_cells() {
        let catalog = parse(&[
            vec![
                text("Chalé 36m²"),
                Data::Float(50000.0),
                Data::Int(3000),
                text("https://example.com/chale"),
                Data::Float(36.0),
            ],
            vec![
                text("Pousada"),
                text("1234,50"),
                text("800.5"),
                text("https://example.com/pousada"),
                Data::Empty,
            ],
        ])
        .expect("catalog");

        let entries = catalog.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].description, "Chalé 36m²");
        assert_eq!(entries[0].cash_price, dec!(50000));
        assert_eq!(entries[0].unit_weight, dec!(3000));
        assert_eq!(entries[0].total_area, Some(dec!(36)));
        assert_eq!(entries[1].cash_price, dec!(1234.50));
        assert_eq!(entries[1].unit_weight, dec!(800.5));
        assert_eq!(entries[1].total_area, None);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let header = vec![text("DESCRICAO"), text("A VISTA"), text("LINK_KIT")];
        let err = parse_rows(&header, std::iter::empty()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn(ref c) if c == "PESO UND"));
    }

    #[test]
    fn area_column_is_optional() {
        let header = vec![text("DESCRICAO"), text("A VISTA"), text("PESO UND"), text("LINK_KIT")];
        let row = vec![text("Kit"), Data::Int(10), Data::Int(20), text("https://example.com")];
        let catalog = parse_rows(&header, std::iter::once(row.as_slice())).expect("catalog");
        assert_eq!(catalog.entries()[0].total_area, None);
    }

    #[test]
    fn non_numeric_price_is_fatal() {
        let err = parse(&[vec![
            text("Kit"),
            text("sob consulta"),
            Data::Int(20),
            text("https://example.com"),
            Data::Empty,
        ]])
        .unwrap_err();

        match err {
            CatalogError::InvalidCell { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "A VISTA");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_or_negative_weight_is_fatal() {
        let missing = parse(&[vec![text("Kit"), Data::Int(10), Data::Empty, text("l"), Data::Empty]]);
        assert!(matches!(missing, Err(CatalogError::InvalidCell { .. })));

        let negative = parse(&[vec![text("Kit"), Data::Int(10), Data::Int(-5), text("l"), Data::Empty]]);
        assert!(matches!(negative, Err(CatalogError::InvalidCell { .. })));
    }

    #[test]
    fn non_numeric_area_is_ignored() {
        let catalog = parse(&[vec![
            text("Kit"),
            Data::Int(10),
            Data::Int(20),
            text("https://example.com"),
            text("n/d"),
        ]])
        .expect("catalog");
        assert_eq!(catalog.entries()[0].total_area, None);
    }

    #[test]
    fn blank_rows_are_skipped_and_empty_catalog_is_an_error() {
        let blank = vec![Data::Empty; 5];
        let err = parse(&[blank.clone(), blank]).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn price_too_large_to_quote_is_fatal() {
        let err = parse(&[vec![text("Kit"), Data::Float(5e28), Data::Int(10), text("l"), Data::Empty]])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidCell { row: 2, ref column, .. } if column == "A VISTA"
        ));

        let heavy = parse(&[vec![text("Kit"), Data::Int(10), Data::Float(6e28), text("l"), Data::Empty]]);
        assert!(matches!(heavy, Err(CatalogError::InvalidCell { .. })));

        let at_limit = parse(&[vec![
            text("Kit"),
            text(&MAX_CATALOG_AMOUNT.to_string()),
            Data::Int(10),
            text("l"),
            Data::Empty,
        ]])
        .expect("catalog");
        assert_eq!(at_limit.entries()[0].cash_price, MAX_CATALOG_AMOUNT);
    }

    #[test]
    fn text_amounts_accept_thousands_separators() {
        let catalog = parse(&[
            vec![text("Kit A"), text("1.234,50"), text("2.500"), text("l"), text("36,5")],
            vec![text("Kit B"), text("1,234.50"), text("12.345.678,9"), text("l"), Data::Empty],
        ])
        .expect("catalog");

        let entries = catalog.entries();
        assert_eq!(entries[0].cash_price, dec!(1234.50));
        assert_eq!(entries[0].unit_weight, dec!(2.5));
        assert_eq!(entries[0].total_area, Some(dec!(36.5)));
        assert_eq!(entries[1].cash_price, dec!(1234.50));
        assert_eq!(entries[1].unit_weight, dec!(12345678.9));
    }

    #[tokio::test]
    async fn missing_workbook_fails_to_open() {
        let source = XlsxCatalogSource::new("/nonexistent/precos.xlsx", None);
        assert!(matches!(source.load().await, Err(CatalogError::Open(_))));
    }

    fn add_kit_sheet(workbook: &mut Workbook, name: &str, kits: &[(&str, f64, f64)]) {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name).expect("sheet name");
        for (col, title) in [COL_DESCRIPTION, COL_CASH_PRICE, COL_UNIT_WEIGHT, COL_MODEL_LINK]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *title).expect("header");
        }
        for (i, (description, price, weight)) in kits.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, *description).expect("description");
            sheet.write_number(row, 1, *price).expect("price");
            sheet.write_number(row, 2, *weight).expect("weight");
            sheet
                .write_string(row, 3, format!("https://example.com/{}/{}", name, row))
                .expect("link");
        }
    }

    /// Two-sheet workbook: "Tabela" first, then "Promo"
    fn write_fixture(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("precos.xlsx");
        let mut workbook = Workbook::new();
        add_kit_sheet(&mut workbook, "Tabela", &[("Chalé 36m²", 50000.0, 3000.0)]);
        add_kit_sheet(
            &mut workbook,
            "Promo",
            &[("Pousada 4 suítes", 180000.0, 9000.0), ("A-frame 48m²", 61000.5, 3600.0)],
        );
        workbook.save(&path).expect("save workbook");
        path
    }

    #[tokio::test]
    async fn reads_first_sheet_by_default() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_fixture(&dir);

        let catalog = XlsxCatalogSource::new(&path, None).load().await.expect("catalog");

        assert_eq!(catalog.len(), 1);
        let entry = &catalog.entries()[0];
        assert_eq!(entry.description, "Chalé 36m²");
        assert_eq!(entry.cash_price, dec!(50000));
        assert_eq!(entry.unit_weight, dec!(3000));
        assert_eq!(entry.model_link, "https://example.com/Tabela/1");
        assert_eq!(entry.total_area, None);
    }

    #[tokio::test]
    async fn reads_the_named_sheet() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_fixture(&dir);

        let source = XlsxCatalogSource::new(&path, Some("Promo".to_string()));
        assert!(source.describe().ends_with("precos.xlsx [Promo]"));

        let catalog = source.load().await.expect("catalog");
        let descriptions: Vec<&str> = catalog.entries().iter().map(|e| e.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Pousada 4 suítes", "A-frame 48m²"]);
        assert_eq!(catalog.entries()[1].cash_price, dec!(61000.5));
    }

    #[tokio::test]
    async fn unknown_sheet_fails_to_open() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_fixture(&dir);

        let source = XlsxCatalogSource::new(&path, Some("Inexistente".to_string()));
        match source.load().await {
            Err(CatalogError::Open(message)) => assert!(message.contains("Inexistente")),
            other => panic!("unexpected result: {:?}", other.map(|c| c.len())),
        }
    }
}
