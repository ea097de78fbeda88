use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::fleet::model::{HostIdentity, ThresholdPair, Thresholds};

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read inventory {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse inventory {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid inventory: {0}")]
    Validation(String),
}

/// The hosts to watch plus the thresholds they are judged by.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(alias = "servers")]
    pub hosts: Vec<HostIdentity>,
    #[serde(default, alias = "defaultThresholds")]
    pub thresholds: Thresholds,
}

impl Inventory {
    pub fn validate(&self) -> Result<(), InventoryError> {
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if host.id.trim().is_empty() {
                return Err(InventoryError::Validation(
                    "host id must not be empty".to_string(),
                ));
            }
            if !seen.insert(host.id.as_str()) {
                return Err(InventoryError::Validation(format!(
                    "duplicate host id {}",
                    host.id
                )));
            }
            if host.query_target.trim().is_empty() {
                return Err(InventoryError::Validation(format!(
                    "host {} has an empty queryTarget",
                    host.id
                )));
            }
        }

        validate_pair("thresholds.cpu", self.thresholds.cpu)?;
        validate_pair("thresholds.memory", self.thresholds.memory)?;
        validate_pair("thresholds.disk", self.thresholds.disk)?;
        Ok(())
    }

    fn fill_display_names(&mut self) {
        for host in &mut self.hosts {
            if host.display_name.trim().is_empty() {
                host.display_name = host.id.clone();
            }
        }
    }
}

pub fn load_inventory(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
    let path = path.as_ref();
    let path_str = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
        path: path_str.clone(),
        source,
    })?;
    let mut inventory: Inventory =
        serde_json::from_str(&raw).map_err(|source| InventoryError::Parse {
            path: path_str,
            source,
        })?;
    inventory.validate()?;
    inventory.fill_display_names();
    Ok(inventory)
}

fn validate_pair(field: &str, pair: ThresholdPair) -> Result<(), InventoryError> {
    if !pair.warning.is_finite() || !pair.critical.is_finite() {
        return Err(InventoryError::Validation(format!(
            "{} must be finite numbers",
            field
        )));
    }
    if pair.warning > pair.critical {
        return Err(InventoryError::Validation(format!(
            "{}.warning must not exceed {}.critical",
            field, field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{InventoryError, load_inventory};

    fn write_inventory(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write inventory");
        file
    }

    #[test]
    fn loads_canonical_field_names() {
        let file = write_inventory(
            r#"{
                "hosts": [
                    {"id": "web-1", "displayName": "Web 1", "groupLabel": "shop", "queryTarget": "10.0.0.1:9100"}
                ],
                "thresholds": {"cpu": {"warning": 70, "critical": 85}}
            }"#,
        );

        let inventory = load_inventory(file.path()).expect("inventory");
        assert_eq!(inventory.hosts.len(), 1);
        assert_eq!(inventory.hosts[0].group_label, "shop");
        assert_eq!(inventory.thresholds.cpu.warning, 70.0);
        assert_eq!(inventory.thresholds.memory.critical, 90.0);
    }

    #[test]
    fn accepts_legacy_field_names_and_fills_names() {
        let file = write_inventory(
            r#"{
                "servers": [
                    {"id": "db-1", "project": "billing", "instance": "10.0.0.2:9100"},
                    {"id": "db-2", "name": "Replica", "instance": "10.0.0.3:9100"}
                ],
                "defaultThresholds": {"disk": {"warning": 75, "critical": 95}}
            }"#,
        );

        let inventory = load_inventory(file.path()).expect("inventory");
        assert_eq!(inventory.hosts[0].display_name, "db-1");
        assert_eq!(inventory.hosts[0].group_label, "billing");
        assert_eq!(inventory.hosts[0].query_target, "10.0.0.2:9100");
        assert_eq!(inventory.hosts[1].display_name, "Replica");
        assert_eq!(inventory.thresholds.disk.critical, 95.0);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let file = write_inventory(
            r#"{"hosts": [
                {"id": "a", "queryTarget": "a:9100"},
                {"id": "a", "queryTarget": "b:9100"}
            ]}"#,
        );

        assert!(matches!(
            load_inventory(file.path()),
            Err(InventoryError::Validation(message)) if message.contains("duplicate")
        ));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let file = write_inventory(
            r#"{"hosts": [], "thresholds": {"memory": {"warning": 95, "critical": 90}}}"#,
        );

        assert!(matches!(
            load_inventory(file.path()),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_and_bad_json_are_distinct_errors() {
        assert!(matches!(
            load_inventory("/definitely/not/here.json"),
            Err(InventoryError::Read { .. })
        ));

        let file = write_inventory("{ not json");
        assert!(matches!(
            load_inventory(file.path()),
            Err(InventoryError::Parse { .. })
        ));
    }
}
