//! Write a synthetic, gapminder-shaped indicators table so the explorer can
//! be tried without the published dataset. Values are generated, not real.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Serialize)]
struct Row {
    country: String,
    continent: String,
    year: i64,
    #[serde(rename = "lifeExp")]
    life_exp: f64,
    pop: i64,
    #[serde(rename = "gdpPercap")]
    gdp_percap: f64,
}

/// (country, continent, starting life expectancy, starting population, starting GDP per capita)
const COUNTRIES: &[(&str, &str, f64, f64, f64)] = &[
    ("Chad", "Africa", 38.0, 2.7e6, 700.0),
    ("Kenya", "Africa", 42.0, 6.5e6, 850.0),
    ("Nigeria", "Africa", 36.0, 33.0e6, 1000.0),
    ("Egypt", "Africa", 41.0, 22.0e6, 1400.0),
    ("Brazil", "Americas", 51.0, 56.0e6, 2100.0),
    ("Canada", "Americas", 68.0, 14.8e6, 11000.0),
    ("Mexico", "Americas", 50.0, 30.0e6, 3500.0),
    ("Peru", "Americas", 44.0, 8.0e6, 3750.0),
    ("India", "Asia", 37.0, 372.0e6, 550.0),
    ("Japan", "Asia", 63.0, 86.0e6, 3200.0),
    ("Vietnam", "Asia", 40.0, 26.0e6, 600.0),
    ("Indonesia", "Asia", 37.5, 82.0e6, 750.0),
    ("France", "Europe", 67.0, 42.0e6, 7000.0),
    ("Norway", "Europe", 72.0, 3.3e6, 10000.0),
    ("Portugal", "Europe", 59.0, 8.5e6, 3000.0),
    ("Poland", "Europe", 61.0, 25.0e6, 4000.0),
    ("Australia", "Oceania", 69.0, 8.7e6, 10000.0),
    ("New Zealand", "Oceania", 69.5, 1.99e6, 10500.0),
];

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let years: Vec<i64> = (1952..=2007).step_by(5).collect();
    let mut rows = Vec::with_capacity(COUNTRIES.len() * years.len());

    for &(country, continent, life0, pop0, gdp0) in COUNTRIES {
        let life_gain = rng.gauss(0.35, 0.08).max(0.05);
        let pop_growth = rng.gauss(0.018, 0.006).max(0.0);
        let gdp_growth = rng.gauss(0.022, 0.01).max(-0.005);

        for (step, &year) in years.iter().enumerate() {
            let t = (step * 5) as f64;
            let life_exp = (life0 + life_gain * t + rng.gauss(0.0, 0.5)).min(83.0);
            let pop = (pop0 * (1.0 + pop_growth).powf(t)).round() as i64;
            let gdp_percap = gdp0 * (1.0 + gdp_growth).powf(t) * (1.0 + rng.gauss(0.0, 0.03));

            rows.push(Row {
                country: country.to_string(),
                continent: continent.to_string(),
                year,
                life_exp: (life_exp * 1000.0).round() / 1000.0,
                pop,
                gdp_percap: (gdp_percap * 100.0).round() / 100.0,
            });
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("lifeExp", DataType::Float64, false),
        Field::new("pop", DataType::Int64, false),
        Field::new("gdpPercap", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.continent.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.life_exp))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.pop))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.gdp_percap))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_csv("gapminder.csv", &rows)?;
    write_parquet("gapminder.parquet", &rows)?;

    println!(
        "Wrote {} rows ({} countries) to gapminder.csv and gapminder.parquet",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
