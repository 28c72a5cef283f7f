use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the indicators table from a file.  Dispatch by extension.
///
/// Every format must provide the six columns
/// `country, continent, year, lifeExp, pop, gdpPercap`:
/// * `.csv`     – header row with those names
/// * `.json`    – `[{ "country": "Chad", "year": 1952, ... }, ...]`
/// * `.parquet` – one column per field (Utf8 / Int32|Int64 / Float32|Float64)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(Dataset::new(records)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(row_no, rec)| rec.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        append_batch(&batch, &mut records)?;
    }
    Ok(records)
}

fn append_batch(batch: &RecordBatch, out: &mut Vec<Record>) -> Result<()> {
    let country = column(batch, "country")?;
    let continent = column(batch, "continent")?;
    let year = column(batch, "year")?;
    let life_exp = column(batch, "lifeExp")?;
    let pop = column(batch, "pop")?;
    let gdp_percap = column(batch, "gdpPercap")?;

    out.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        out.push(Record {
            country: string_at(country, row).context("country")?,
            continent: string_at(continent, row).context("continent")?,
            year: int_at(year, row).context("year")?,
            life_exp: float_at(life_exp, row).context("lifeExp")?,
            pop: int_at(pop, row).context("pop")?,
            gdp_percap: float_at(gdp_percap, row).context("gdpPercap")?,
        });
    }
    Ok(())
}

// -- Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("row {row}: null value");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(arr.value(row).to_string())
        }
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn int_at(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("row {row}: null value");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected an integer column, got {other:?}"),
    }
}

fn float_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("row {row}: null value");
    }
    match col.data_type() {
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            Ok(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("expected a float column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gapminder-explorer-{}-{name}", std::process::id()))
    }

    const CSV: &str = "country,continent,year,lifeExp,pop,gdpPercap\n\
                       Chad,Africa,1952,38.09,2682462,700\n\
                       Chad,Africa,1957,39.5,2894650,720\n";

    #[test]
    fn test_load_csv() {
        let path = temp_path("ok.csv");
        std::fs::write(&path, CSV).unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.year_bounds(), (1952, 1957));
        assert_eq!(ds.records()[0].pop, 2_682_462);
        assert_eq!(ds.records()[1].gdp_percap, 720.0);
    }

    #[test]
    fn test_csv_missing_column_fails() {
        let path = temp_path("missing.csv");
        std::fs::write(&path, "country,continent,year\nChad,Africa,1952\n").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("CSV row 0"));
    }

    #[test]
    fn test_load_json() {
        let path = temp_path("ok.json");
        std::fs::write(
            &path,
            r#"[{"country":"Chad","continent":"Africa","year":1952,"lifeExp":38.09,"pop":2682462,"gdpPercap":700.0}]"#,
        )
        .unwrap();
        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.records()[0].country, "Chad");
        assert_eq!(ds.records()[0].life_exp, 38.09);
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let path = temp_path("empty.csv");
        std::fs::write(&path, "country,continent,year,lifeExp,pop,gdpPercap\n").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("no records"));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("table.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn test_load_parquet_mixed_widths() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("country", DataType::Utf8, false),
            Field::new("continent", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("lifeExp", DataType::Float64, false),
            Field::new("pop", DataType::Int64, false),
            Field::new("gdpPercap", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Japan", "Japan"])),
                Arc::new(StringArray::from(vec!["Asia", "Asia"])),
                Arc::new(Int32Array::from(vec![1952, 1957])),
                Arc::new(Float64Array::from(vec![63.03, 65.5])),
                Arc::new(Int64Array::from(vec![86_459_025, 91_563_009])),
                Arc::new(Float32Array::from(vec![3216.5, 4317.5])),
            ],
        )
        .unwrap();

        let path = temp_path("ok.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].year, 1957);
        assert_eq!(ds.records()[1].pop, 91_563_009);
        assert_eq!(ds.records()[0].gdp_percap, 3216.5);
    }
}
