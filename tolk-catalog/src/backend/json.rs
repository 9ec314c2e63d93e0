use crate::backend::CatalogBackend;
use crate::error::{Error, Result};
use crate::Catalog;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, trace};

/// [JsonFileBackend] stores one pretty-printed JSON file per locale (`<directory>/<locale>.json`).
///
/// Writes go to a temporary file in the same directory first, which is then renamed over the
/// catalog file. Readers therefore observe either the old or the new catalog, never a mix.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    directory: PathBuf,
}

impl JsonFileBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let mut directory = directory.into();
        if directory.as_os_str().is_empty() {
            directory = PathBuf::from(".");
        }
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the catalog file of a locale.
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.directory.join(format!("{locale}.json"))
    }

    /// Writes the catalog into a temporary file next to its target without replacing the target.
    ///
    /// The write only becomes visible with [StagedCatalog::commit]. If the staged catalog is
    /// dropped instead, the temporary file is removed and the target stays untouched.
    pub fn stage(&self, locale: &str, catalog: &Catalog) -> Result<StagedCatalog> {
        let target = self.path_for(locale);
        let io_error = |source| Error::Io {
            locale: locale.to_owned(),
            path: target.clone(),
            source,
        };

        fs::create_dir_all(&self.directory).map_err(io_error)?;
        let replaced = fs::metadata(&target)
            .ok()
            .filter(|metadata| metadata.is_file())
            .map(|metadata| metadata.permissions());
        let mut temp = temp_builder()
            .tempfile_in(&self.directory)
            .map_err(io_error)?;
        serde_json::to_writer_pretty(&mut temp, catalog).map_err(|source| Error::Serialize {
            locale: locale.to_owned(),
            source,
        })?;
        temp.flush().map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        // the renamed file keeps the mode of the catalog it replaces
        if let Some(permissions) = replaced {
            temp.as_file().set_permissions(permissions).map_err(io_error)?;
        }
        trace!(locale, temp = ?temp.path(), "staged catalog");

        Ok(StagedCatalog {
            locale: locale.to_owned(),
            target,
            temp,
        })
    }
}

/// New catalog files are created like any other file (`0o666` minus the umask) instead of the
/// private mode of temporary files.
#[cfg_attr(not(unix), allow(unused_mut))]
fn temp_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

impl CatalogBackend for JsonFileBackend {
    #[tracing::instrument(skip(self))]
    fn load(&self, locale: &str) -> Result<Catalog> {
        let path = self.path_for(locale);
        let data = fs::read_to_string(&path).map_err(|source| Error::Io {
            locale: locale.to_owned(),
            path: path.clone(),
            source,
        })?;
        let catalog: Catalog = serde_json::from_str(&data).map_err(|source| Error::Parse {
            locale: locale.to_owned(),
            path: path.clone(),
            source,
        })?;
        debug!(path = ?path, entries = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    #[tracing::instrument(skip(self, catalog))]
    fn save(&self, locale: &str, catalog: &Catalog) -> Result<()> {
        self.stage(locale, catalog)?.commit()?;
        debug!(entries = catalog.len(), "saved catalog");
        Ok(())
    }
}

/// A catalog that was written to a temporary file but not yet moved over its target.
#[derive(Debug)]
pub struct StagedCatalog {
    locale: String,
    target: PathBuf,
    temp: NamedTempFile,
}

impl StagedCatalog {
    /// The catalog file that will be replaced on commit.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The temporary file that currently holds the new catalog.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Atomically renames the temporary file over the target.
    pub fn commit(self) -> Result<()> {
        let StagedCatalog {
            locale,
            target,
            temp,
        } = self;
        temp.persist(&target).map_err(|err| Error::Persist {
            locale,
            path: target,
            source: err.error,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        [
            ("Hello", Some("Здравей".to_string())),
            ("Bye", None),
            ("Empty", Some(String::new())),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());

        backend.save("bg", &sample()).expect("save catalog");
        let loaded = backend.load("bg").expect("load catalog");

        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_save_pretty_two_spaces() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());

        let mut catalog = Catalog::new();
        catalog.insert("Hello", None);
        backend.save("en", &catalog).expect("save catalog");

        let content = fs::read_to_string(dir.path().join("en.json")).expect("read catalog");
        assert_eq!(content, "{\n  \"Hello\": null\n}");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path().join("nested").join("i18n"));

        backend.save("en", &sample()).expect("save catalog");
        assert!(dir.path().join("nested/i18n/en.json").is_file());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());

        let err = backend.load("fr").expect_err("no catalog present");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("en.json"), "{ not json").expect("write file");
        let backend = JsonFileBackend::new(dir.path());

        let err = backend.load("en").expect_err("invalid catalog");
        assert!(matches!(err, Error::Parse { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_uncommitted_stage_leaves_target_untouched() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());
        backend.save("en", &sample()).expect("save catalog");
        let before = fs::read_to_string(backend.path_for("en")).expect("read catalog");

        let mut changed = sample();
        changed.insert("New", None);
        let staged = backend.stage("en", &changed).expect("stage catalog");
        let temp_path = staged.temp_path().to_path_buf();
        assert!(temp_path.is_file());
        assert_eq!(temp_path.parent(), Some(dir.path()));

        // simulate a failure between writing and renaming
        drop(staged);

        let after = fs::read_to_string(backend.path_for("en")).expect("read catalog");
        assert_eq!(before, after);
        assert!(!temp_path.exists());
        assert_eq!(backend.load("en").expect("load catalog"), sample());
    }

    #[test]
    fn test_commit_replaces_target() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());
        backend.save("en", &sample()).expect("save catalog");

        let mut changed = sample();
        changed.insert("New", None);
        let staged = backend.stage("en", &changed).expect("stage catalog");
        assert_eq!(staged.target(), backend.path_for("en"));
        staged.commit().expect("commit catalog");

        assert_eq!(backend.load("en").expect("load catalog"), changed);
        let leftovers = fs::read_dir(dir.path()).expect("read dir").count();
        assert_eq!(leftovers, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());
        let path = backend.path_for("en");
        backend.save("en", &sample()).expect("save catalog");

        for mode in [0o644, 0o640] {
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).expect("set mode");
            backend.save("en", &sample()).expect("save catalog");

            let saved = fs::metadata(&path).expect("metadata").permissions().mode();
            assert_eq!(saved & 0o777, mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_save_new_file_uses_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());
        let reference = dir.path().join("reference");
        fs::write(&reference, "").expect("write file");

        backend.save("en", &sample()).expect("save catalog");

        let mode = |path: &Path| fs::metadata(path).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode(&backend.path_for("en")), mode(&reference));
    }

    #[test]
    fn test_commit_failure_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let backend = JsonFileBackend::new(dir.path());
        // a non-empty directory in place of the catalog file cannot be replaced by a rename
        fs::create_dir_all(backend.path_for("en").join("blocker")).expect("create dir");

        let err = backend.save("en", &sample()).expect_err("target is a directory");
        assert!(matches!(err, Error::Persist { .. }));
        assert!(backend.path_for("en").is_dir());
    }
}
