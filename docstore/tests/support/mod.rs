//! Shared fixtures for filesystem-backed integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use docstore::DocumentStore;
use docstore::domain::StoreConfig;
use tempfile::TempDir;

/// A temporary documents root with the default zone layout.
pub struct Sandbox {
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().join("docs")).expect("utf-8 temp path");
        Dir::create_ambient_dir_all(&root, ambient_authority()).expect("create docs root");
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).expect("open docs root");
        Self {
            _temp: temp,
            root,
            dir,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Opens a store over `config`, creating its directories.
    pub fn open(&self, config: StoreConfig) -> DocumentStore {
        let store = DocumentStore::open(config);
        store.init().expect("create zones");
        store
    }

    pub fn write(&self, relative: &str) {
        self.dir
            .write(relative, format!("contents of {relative}"))
            .expect("write fixture file");
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.dir.is_file(relative)
    }

    pub fn remove(&self, relative: &str) {
        self.dir.remove_file(relative).expect("remove file");
    }

    pub fn read(&self, relative: &str) -> String {
        self.dir.read_to_string(relative).expect("read file")
    }

    pub fn names(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .dir
            .read_dir(relative)
            .expect("list directory")
            .map(|entry| {
                entry
                    .expect("directory entry")
                    .file_name()
                    .into_string()
                    .expect("utf-8 name")
            })
            .collect();
        names.sort();
        names
    }
}
