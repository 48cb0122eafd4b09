/// Data layer: core types, loading, preparation, and filtering.
///
/// Architecture:
/// ```text
///  pop.csv    lex.csv    ny_gnp_pcap_pp_cd.csv
///     │          │          │
///     ▼          ▼          ▼
///   ┌──────────┐
///   │  loader   │  wide CSV → RawTable, content-hash load cache
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ pipeline  │  fill → melt → coerce → join → fill/drop
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ GapminderDataset│  Vec<Observation>, country/year indices
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  (year, country selection) → visible indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
