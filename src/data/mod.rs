/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Record>, year bounds, continent/country index
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  continent / country / year predicates → row subset
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod model;
pub mod filter;
