// Lazily loaded, explicitly owned player table with reload support.
//
// The store loads the dataset on first access and reloads it whenever the
// file's modification time changes or `reload()` is called. Callers own the
// store; there is no process-wide cache.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::info;

use crate::dataset::DatasetError;
use crate::table::{LoadOptions, PlayerTable};

#[derive(Debug)]
struct Loaded {
    table: PlayerTable,
    modified: Option<SystemTime>,
    loaded_at: DateTime<Local>,
}

#[derive(Debug)]
pub struct TableStore {
    path: PathBuf,
    options: LoadOptions,
    loaded: Option<Loaded>,
}

impl TableStore {
    /// Create a store for the dataset at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        TableStore {
            path: path.into(),
            options,
            loaded: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// When the current table was loaded, if it has been.
    pub fn loaded_at(&self) -> Option<DateTime<Local>> {
        self.loaded.as_ref().map(|l| l.loaded_at)
    }

    /// The current table, loading or reloading it first if needed.
    ///
    /// A failed reload returns the error and keeps the previous table.
    pub fn table(&mut self) -> Result<&PlayerTable, DatasetError> {
        let current = match self.loaded.take() {
            Some(loaded) if self.modified_time() == loaded.modified => loaded,
            previous => match self.load_fresh() {
                Ok(fresh) => fresh,
                Err(e) => {
                    self.loaded = previous;
                    return Err(e);
                }
            },
        };
        Ok(&self.loaded.insert(current).table)
    }

    /// Force a reload from disk regardless of modification time.
    pub fn reload(&mut self) -> Result<&PlayerTable, DatasetError> {
        let loaded = self.load_fresh()?;
        Ok(&self.loaded.insert(loaded).table)
    }

    /// Change the load options; the next access recomputes the table.
    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
        self.loaded = None;
    }

    fn modified_time(&self) -> Option<SystemTime> {
        std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .ok()
    }

    fn load_fresh(&self) -> Result<Loaded, DatasetError> {
        let modified = self.modified_time();
        let table = PlayerTable::load(&self.path, &self.options)?;
        let loaded_at = Local::now();
        info!(
            "Player table ready: {} players from {} at {}",
            table.len(),
            self.path.display(),
            loaded_at.format("%Y-%m-%d %H:%M:%S")
        );
        Ok(Loaded {
            table,
            modified,
            loaded_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DATA: &str = "\
Player,Team,Pos,Age,G,PTS,TRB,AST,STL,BLK,TOV
Alpha,BOS,PG,25,70,20.0,4.0,6.0,1.0,0.2,2.0
Beta,NYK,C,27,60,15.0,10.0,2.0,0.8,1.8,1.5";

    fn temp_dataset(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hoopsight_store_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("players.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_lazily_on_first_access() {
        let path = temp_dataset("lazy", DATA);
        let mut store = TableStore::new(&path, LoadOptions::default());
        assert!(!store.is_loaded());
        assert!(store.loaded_at().is_none());

        assert_eq!(store.table().unwrap().len(), 2);
        assert!(store.is_loaded());
        assert!(store.loaded_at().is_some());
    }

    #[test]
    fn reload_picks_up_new_contents() {
        let path = temp_dataset("reload", DATA);
        let mut store = TableStore::new(&path, LoadOptions::default());
        assert_eq!(store.table().unwrap().len(), 2);

        let mut more = DATA.to_string();
        more.push_str("\nGamma,MIA,SF,30,50,12.0,5.0,3.0,1.0,0.5,1.0");
        fs::write(&path, more).unwrap();

        assert_eq!(store.reload().unwrap().len(), 3);
        assert!(store.table().unwrap().get("Gamma").is_some());
    }

    #[test]
    fn missing_file_surfaces_load_error() {
        let mut store = TableStore::new("no/such/players.csv", LoadOptions::default());
        assert!(matches!(store.table(), Err(DatasetError::Io { .. })));
        assert!(!store.is_loaded());
    }

    #[test]
    fn failed_reload_keeps_previous_table() {
        let path = temp_dataset("failed_reload", DATA);
        let mut store = TableStore::new(&path, LoadOptions::default());
        assert_eq!(store.table().unwrap().len(), 2);

        fs::remove_file(&path).unwrap();
        assert!(matches!(store.table(), Err(DatasetError::Io { .. })));
        assert!(store.is_loaded());
        assert!(matches!(store.reload(), Err(DatasetError::Io { .. })));
        assert!(store.is_loaded());

        fs::write(&path, DATA).unwrap();
        assert_eq!(store.table().unwrap().len(), 2);
    }

    #[test]
    fn set_options_invalidates_table() {
        let path = temp_dataset("options", DATA);
        let mut store = TableStore::new(&path, LoadOptions::default());
        let before = store.table().unwrap().get("Alpha").unwrap().fantasy_points;

        let mut options = LoadOptions::default();
        options.scoring.points = 0.0;
        store.set_options(options);
        assert!(!store.is_loaded());

        let after = store.table().unwrap().get("Alpha").unwrap().fantasy_points;
        assert!((before - after - 20.0).abs() < 1e-9);
    }
}
