//! CSV Data Loader Module
//! Loads the five analytics extracts into Polars DataFrames at startup.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

use super::preprocess::{self, PreprocessError};

pub const SESSIONS_FILE: &str = "users_sessions.csv";
pub const SALES_FILE: &str = "sales_items.csv";
pub const TRAFFIC_FILE: &str = "traffic.csv";
pub const DEVICES_FILE: &str = "devices.csv";
pub const PAGES_FILE: &str = "most_visited_pages.csv";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("failed to preprocess {}: {source}", path.display())]
    Preprocess {
        path: PathBuf,
        #[source]
        source: PreprocessError,
    },
}

/// The five preprocessed tables, loaded once and read-only for the process
/// lifetime. Filtering always produces new frames.
pub struct AnalyticsTables {
    pub sessions: DataFrame,
    pub sales: DataFrame,
    pub traffic: DataFrame,
    pub devices: DataFrame,
    pub pages: DataFrame,
}

impl AnalyticsTables {
    /// Load and preprocess all extracts from `dir`. The files are independent,
    /// so they load in parallel; the result is deterministic either way.
    pub fn load(dir: &Path) -> Result<Self, LoaderError> {
        let files = [
            SESSIONS_FILE,
            SALES_FILE,
            TRAFFIC_FILE,
            DEVICES_FILE,
            PAGES_FILE,
        ];
        let mut frames: Vec<DataFrame> = files
            .par_iter()
            .map(|file| Self::load_table(dir, file))
            .collect::<Result<_, _>>()?;

        let traffic =
            preprocess::fill_missing_medium(&frames[2]).map_err(|source| {
                LoaderError::Preprocess {
                    path: dir.join(TRAFFIC_FILE),
                    source,
                }
            })?;

        let tables = Self {
            sessions: std::mem::take(&mut frames[0]),
            sales: std::mem::take(&mut frames[1]),
            traffic,
            devices: std::mem::take(&mut frames[3]),
            pages: std::mem::take(&mut frames[4]),
        };

        info!(
            sessions = tables.sessions.height(),
            sales = tables.sales.height(),
            traffic = tables.traffic.height(),
            devices = tables.devices.height(),
            pages = tables.pages.height(),
            "loaded analytics extracts"
        );
        Ok(tables)
    }

    fn load_table(dir: &Path, file: &str) -> Result<DataFrame, LoaderError> {
        let path = dir.join(file);
        let df = LazyCsvReader::new(&path)
            .with_infer_schema_length(Some(10_000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Csv {
                path: path.clone(),
                source,
            })?;
        preprocess::derive_date_parts(&df)
            .map_err(|source| LoaderError::Preprocess { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sample_extracts(dir: &Path) {
        fs::write(
            dir.join(SESSIONS_FILE),
            "event_date,users,new_users,sessions,pageviews\n\
             20230110,100,40,120,500\n\
             20230211,200,80,240,900\n",
        )
        .unwrap();
        fs::write(
            dir.join(SALES_FILE),
            "event_date,item_brand,item_category,item_name,item_revenue_in_usd,quantity\n\
             20230110,Acme,Tops,Tee,40.5,2\n",
        )
        .unwrap();
        fs::write(
            dir.join(TRAFFIC_FILE),
            "event_date,medium,sessions\n\
             20230110,organic,60\n\
             20230211,,70\n",
        )
        .unwrap();
        fs::write(
            dir.join(DEVICES_FILE),
            "event_date,category,events\n\
             20230110,desktop,10\n",
        )
        .unwrap();
        fs::write(
            dir.join(PAGES_FILE),
            "event_date,title,n\n\
             20230110,Home,1000\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_and_preprocesses_all_tables() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_extracts(dir.path());

        let tables = AnalyticsTables::load(dir.path()).unwrap();

        assert_eq!(tables.sessions.height(), 2);
        for table in [
            &tables.sessions,
            &tables.sales,
            &tables.traffic,
            &tables.devices,
            &tables.pages,
        ] {
            for derived in ["year", "month", "month_name"] {
                assert!(table.column(derived).is_ok(), "missing {derived}");
            }
        }

        // The blank medium was normalized during load.
        let mediums = crate::data::columns::str_values(&tables.traffic, "medium").unwrap();
        assert_eq!(mediums, vec!["organic", "direct"]);
    }

    #[test]
    fn malformed_event_date_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_extracts(dir.path());
        fs::write(
            dir.path().join(DEVICES_FILE),
            "event_date,category,events\nnot-a-date,desktop,10\n",
        )
        .unwrap();

        assert!(matches!(
            AnalyticsTables::load(dir.path()),
            Err(LoaderError::Preprocess { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AnalyticsTables::load(dir.path()),
            Err(LoaderError::Csv { .. })
        ));
    }
}
