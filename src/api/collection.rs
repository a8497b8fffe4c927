//! Targets keyed by stable id, with storage-minimal persistence
//!
//! Only each target's id, title and origin list are stored. Pairs,
//! intersections and estimates are always derivable and are recomputed on
//! load, so a stored file can never carry a stale estimate.

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{Origin, Target};
use crate::processing::TriangulationEngine;
use crate::validation::{normalize_origin, TriangulationError, TriangulationResult};

/// Stored form of one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub origins: Vec<Origin>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CollectionFile {
    targets: Vec<TargetRecord>,
}

/// Ordered set of targets sharing one engine
pub struct TargetCollection {
    engine: TriangulationEngine,
    targets: IndexMap<String, Target>,
}

impl Default for TargetCollection {
    fn default() -> Self {
        Self::new(TriangulationEngine::default())
    }
}

impl TargetCollection {
    pub fn new(engine: TriangulationEngine) -> Self {
        Self {
            engine,
            targets: IndexMap::new(),
        }
    }

    pub fn engine(&self) -> &TriangulationEngine {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Target> {
        self.targets.get(id)
    }

    /// Targets in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    pub fn create_target(&mut self, id: &str, title: &str) -> TriangulationResult<&Target> {
        if self.targets.contains_key(id) {
            return Err(TriangulationError::DuplicateTarget { id: id.to_string() });
        }
        debug!("Creating target '{}'", id);
        let target = self.targets.entry(id.to_string()).or_insert(Target::new(id, title));
        Ok(&*target)
    }

    pub fn set_title(&mut self, id: &str, title: &str) -> TriangulationResult<()> {
        let target = Self::lookup(&mut self.targets, id)?;
        target.title = title.to_string();
        Ok(())
    }

    /// Drop a target; remaining targets keep their order
    pub fn remove_target(&mut self, id: &str) -> TriangulationResult<Target> {
        self.targets
            .shift_remove(id)
            .ok_or_else(|| TriangulationError::TargetNotFound { id: id.to_string() })
    }

    pub fn add_origin(&mut self, id: &str, origin: Origin) -> TriangulationResult<usize> {
        let target = Self::lookup(&mut self.targets, id)?;
        self.engine.add_origin(target, origin)
    }

    pub fn move_origin(
        &mut self,
        id: &str,
        index: usize,
        latitude: f64,
        longitude: f64,
    ) -> TriangulationResult<()> {
        let target = Self::lookup(&mut self.targets, id)?;
        self.engine.move_origin(target, index, latitude, longitude)
    }

    pub fn remove_origin(&mut self, id: &str, index: usize) -> TriangulationResult<Origin> {
        let target = Self::lookup(&mut self.targets, id)?;
        self.engine.remove_origin(target, index)
    }

    fn lookup<'a>(
        targets: &'a mut IndexMap<String, Target>,
        id: &str,
    ) -> TriangulationResult<&'a mut Target> {
        targets
            .get_mut(id)
            .ok_or_else(|| TriangulationError::TargetNotFound { id: id.to_string() })
    }

    pub fn to_records(&self) -> Vec<TargetRecord> {
        self.targets
            .values()
            .map(|target| TargetRecord {
                id: target.id.clone(),
                title: target.title.clone(),
                origins: target.origins().to_vec(),
            })
            .collect()
    }

    /// Rebuild a collection from stored records, recomputing every target.
    ///
    /// Fails without partial results on a duplicate id or an unusable origin.
    pub fn from_records(
        records: Vec<TargetRecord>,
        engine: TriangulationEngine,
    ) -> TriangulationResult<Self> {
        let mut collection = Self::new(engine);
        for record in records {
            if collection.targets.contains_key(&record.id) {
                return Err(TriangulationError::DuplicateTarget { id: record.id });
            }
            let mut target = Target::new(&record.id, &record.title);
            target.origins = record
                .origins
                .into_iter()
                .map(normalize_origin)
                .collect::<TriangulationResult<Vec<Origin>>>()?;
            collection.engine.recompute(&mut target);
            collection.targets.insert(record.id, target);
        }
        Ok(collection)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TriangulationResult<()> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let file = CollectionFile {
            targets: self.to_records(),
        };

        let content = serde_json::to_string_pretty(&file).map_err(|e| TriangulationError::Persistence {
            message: format!("Failed to serialize targets: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| TriangulationError::Persistence {
            message: format!("Failed to write '{}': {}", path_str, e),
        })?;

        info!("Saved {} targets to {}", self.len(), path_str);
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(
        path: P,
        engine: TriangulationEngine,
    ) -> TriangulationResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| TriangulationError::Persistence {
            message: format!("Failed to read '{}': {}", path_str, e),
        })?;

        let file: CollectionFile =
            serde_json::from_str(&content).map_err(|e| TriangulationError::Persistence {
                message: format!("Failed to parse '{}': {}", path_str, e),
            })?;

        let collection = Self::from_records(file.targets, engine)?;
        info!("Loaded {} targets from {}", collection.len(), path_str);
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetState;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}_{}.json", name, std::process::id()))
    }

    fn sample_collection() -> TargetCollection {
        let mut collection = TargetCollection::default();
        collection.create_target("tower", "Water tower").unwrap();
        collection.create_target("mast", "Radio mast").unwrap();
        collection
            .add_origin(
                "tower",
                Origin::new(0.0, 0.0, 90.0, 1.5)
                    .with_title("Gate")
                    .with_photo_url("data:image/jpeg;base64,/9j/4AAQ")
                    .with_timestamp("3/14/2024, 10:01:02 AM"),
            )
            .unwrap();
        collection
            .add_origin("tower", Origin::new(0.0, 1.0, 180.0, -0.25).with_title("Bridge"))
            .unwrap();
        collection
    }

    #[test]
    fn test_create_and_remove_targets() {
        let mut collection = sample_collection();
        assert_eq!(collection.len(), 2);
        assert!(matches!(
            collection.create_target("tower", "Again"),
            Err(TriangulationError::DuplicateTarget { .. })
        ));

        collection.create_target("chimney", "Chimney").unwrap();
        collection.set_title("chimney", "Old chimney").unwrap();
        assert_eq!(collection.get("chimney").unwrap().title, "Old chimney");
        assert!(collection.set_title("nope", "x").is_err());
        collection.remove_target("mast").unwrap();
        let ids: Vec<&str> = collection.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tower", "chimney"]);

        assert!(matches!(
            collection.remove_target("mast"),
            Err(TriangulationError::TargetNotFound { .. })
        ));
    }

    #[test]
    fn test_edits_are_routed_by_id() {
        let mut collection = sample_collection();
        assert_eq!(collection.get("tower").unwrap().state(), TargetState::Measured);
        assert_eq!(collection.get("mast").unwrap().state(), TargetState::Empty);

        collection.move_origin("tower", 1, 0.0, 2.0).unwrap();
        let estimate = collection.get("tower").unwrap().estimated_position().unwrap();
        assert!((estimate.longitude - 2.0).abs() < 1e-6);

        let err = collection.add_origin("nope", Origin::new(0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(err.is_contract_violation());
        assert!(collection.remove_origin("tower", 9).is_err());

        collection.remove_origin("tower", 0).unwrap();
        assert_eq!(collection.get("tower").unwrap().state(), TargetState::Underdetermined);
    }

    #[test]
    fn test_records_round_trip_through_file() {
        let collection = sample_collection();
        let path = temp_path("triangulation_targets");

        collection.save_to_file(&path).unwrap();
        let loaded = TargetCollection::load_from_file(&path, TriangulationEngine::default()).unwrap();

        assert_eq!(loaded.len(), 2);
        let original = collection.get("tower").unwrap();
        let restored = loaded.get("tower").unwrap();
        assert_eq!(restored.title, "Water tower");
        assert_eq!(restored.origins()[0].title, "Gate");
        assert_eq!(restored.origins()[0].photo_url, "data:image/jpeg;base64,/9j/4AAQ");
        assert_eq!(restored.origins()[0].timestamp, "3/14/2024, 10:01:02 AM");
        assert_eq!(restored.origins()[1].tilt_angle, -0.25);
        assert_eq!(restored.pairs().len(), 1);
        assert_eq!(restored.state(), original.state());

        let (a, b) = (
            restored.estimated_position().unwrap(),
            original.estimated_position().unwrap(),
        );
        assert!((a.latitude - b.latitude).abs() < 1e-9);
        assert!((a.longitude - b.longitude).abs() < 1e-9);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_stored_file_holds_only_origins() {
        let collection = sample_collection();
        let json = serde_json::to_string(&CollectionFile {
            targets: collection.to_records(),
        })
        .unwrap();
        assert!(json.contains("\"origins\""));
        assert!(!json.contains("intersections"));
        assert!(!json.contains("estimated_position"));
    }

    #[test]
    fn test_from_records_rejects_duplicates_and_bad_origins() {
        let duplicate = vec![
            TargetRecord { id: "a".into(), title: "A".into(), origins: vec![] },
            TargetRecord { id: "a".into(), title: "A again".into(), origins: vec![] },
        ];
        assert!(matches!(
            TargetCollection::from_records(duplicate, TriangulationEngine::default()),
            Err(TriangulationError::DuplicateTarget { .. })
        ));

        let bad = vec![TargetRecord {
            id: "b".into(),
            title: "B".into(),
            origins: vec![Origin::new(120.0, 0.0, 0.0, 0.0)],
        }];
        assert!(matches!(
            TargetCollection::from_records(bad, TriangulationEngine::default()),
            Err(TriangulationError::InvalidOrigin { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TargetCollection::load_from_file("/nonexistent/targets.json", TriangulationEngine::default());
        assert!(matches!(result, Err(TriangulationError::Persistence { .. })));
    }
}
