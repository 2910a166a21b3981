use crate::errors::Error;
use crate::settings::Setting;
use crate::StorageAdapter;
use fluxstyle_shared::types::Result;
use log::warn;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores settings in a flat json object (`{ "stylesheet.length_unit": "s:px" }`). Every `set()` writes
/// the whole file back; a missing file is only created by the first `set()`.
pub struct JsonStorageAdapter {
    path: PathBuf,
    elements: Mutex<HashMap<String, Setting>>,
}

impl TryFrom<&Path> for JsonStorageAdapter {
    type Error = anyhow::Error;

    fn try_from(path: &Path) -> Result<Self> {
        let elements = if !path.exists() {
            HashMap::new()
        } else if path.is_file() {
            read_file(path)?
        } else {
            return Err(Error::Config(format!("{} is not a regular file", path.display())).into());
        };

        Ok(JsonStorageAdapter {
            path: path.to_path_buf(),
            elements: Mutex::new(elements),
        })
    }
}

impl StorageAdapter for JsonStorageAdapter {
    fn get(&self, key: &str) -> Option<Setting> {
        self.elements.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Setting) -> Result<()> {
        let mut elements = self.elements.lock();
        elements.insert(key.to_owned(), value);
        write_file(&self.path, &elements)
    }

    fn all(&self) -> Result<HashMap<String, Setting>> {
        Ok(self.elements.lock().clone())
    }
}

/// Reads the json file. Entries that cannot be parsed into a setting are skipped with a warning.
fn read_file(path: &Path) -> Result<HashMap<String, Setting>> {
    let buf = fs::read_to_string(path).map_err(Error::from)?;
    let parsed: Value = serde_json::from_str(&buf).map_err(Error::from)?;

    let mut elements = HashMap::new();
    if let Value::Object(settings) = parsed {
        for (key, value) in settings {
            match serde_json::from_value::<Setting>(value) {
                Ok(setting) => {
                    elements.insert(key, setting);
                }
                Err(err) => warn!("problem reading setting {key} from json: {err}"),
            }
        }
    }

    Ok(elements)
}

fn write_file(path: &Path, elements: &HashMap<String, Setting>) -> Result<()> {
    // Sorted so the file stays diffable
    let sorted: BTreeMap<&String, &Setting> = elements.iter().collect();
    let json = serde_json::to_string_pretty(&sorted).map_err(Error::from)?;
    fs::write(path, json).map_err(Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fluxstyle-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn creates_on_first_set_and_persists() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        let adapter = JsonStorageAdapter::try_from(path.as_path()).unwrap();
        assert!(adapter.all().unwrap().is_empty());
        assert!(!path.exists());

        adapter
            .set("stylesheet.length_unit", Setting::String("rem".into()))
            .unwrap();

        let reopened = JsonStorageAdapter::try_from(path.as_path()).unwrap();
        assert_eq!(
            reopened.get("stylesheet.length_unit"),
            Some(Setting::String("rem".into()))
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn reading_a_missing_file_leaves_no_trace() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let adapter = JsonStorageAdapter::try_from(path.as_path()).unwrap();
        assert_eq!(adapter.get("stylesheet.length_unit"), None);
        assert!(!path.exists());
    }

    #[test]
    fn directory_is_refused() {
        assert!(JsonStorageAdapter::try_from(std::env::temp_dir().as_path()).is_err());
    }

    #[test]
    fn skips_broken_entries() {
        let path = temp_path("broken");
        fs::write(&path, r#"{ "a.b": "b:true", "c.d": "nonsense" }"#).unwrap();

        let adapter = JsonStorageAdapter::try_from(path.as_path()).unwrap();
        assert_eq!(adapter.get("a.b"), Some(Setting::Bool(true)));
        assert_eq!(adapter.get("c.d"), None);

        let _ = fs::remove_file(&path);
    }
}
