use indexmap::IndexMap;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::{
    error::{ModesError, Result},
    types::{DEFAULT_MODE_IDS, ModePreset, ModesDatabase, default_presets},
};

/// In-memory mode presets, seeded with the built-in modes
///
/// Writers are serialized by the lock; `last_updated` strictly increases
/// with every mutation even when the clock does not.
#[derive(Debug)]
pub struct ModeStore {
    inner: RwLock<ModesDatabase>,
}

impl Default for ModeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeStore {
    pub fn new() -> Self {
        Self::with_modes(default_presets())
    }

    /// Seed the store with an explicit set of modes
    pub fn with_modes(modes: IndexMap<String, ModePreset>) -> Self {
        Self {
            inner: RwLock::new(ModesDatabase {
                modes,
                last_updated: Timestamp::now().as_millisecond(),
            }),
        }
    }

    /// Copy of the current database
    pub async fn snapshot(&self) -> ModesDatabase {
        self.inner.read().await.clone()
    }

    /// Add a custom mode at the end of the list
    pub async fn add(&self, id: &str, preset: ModePreset) -> Result<ModesDatabase> {
        let mut db = self.inner.write().await;

        if db.modes.contains_key(id) {
            return Err(ModesError::AlreadyExists(id.to_string()));
        }

        let order = u32::try_from(db.modes.len() + 1).unwrap_or(u32::MAX);
        db.modes.insert(
            id.to_string(),
            ModePreset {
                is_custom: true,
                order: Some(order),
                ..preset
            },
        );
        touch(&mut db);

        tracing::info!(mode = id, order, "mode added");
        Ok(db.clone())
    }

    /// Replace a custom mode, keeping its position
    pub async fn update(&self, id: &str, preset: ModePreset) -> Result<ModesDatabase> {
        let mut db = self.inner.write().await;
        let existing = mutable_entry(&db, id)?;

        let order = existing.order;
        db.modes.insert(
            id.to_string(),
            ModePreset {
                is_custom: true,
                order,
                ..preset
            },
        );
        touch(&mut db);

        tracing::info!(mode = id, "mode updated");
        Ok(db.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<ModesDatabase> {
        let mut db = self.inner.write().await;
        mutable_entry(&db, id)?;

        db.modes.shift_remove(id);
        touch(&mut db);

        tracing::info!(mode = id, "mode deleted");
        Ok(db.clone())
    }
}

fn mutable_entry<'a>(db: &'a ModesDatabase, id: &str) -> Result<&'a ModePreset> {
    let preset = db.modes.get(id).ok_or_else(|| ModesError::NotFound(id.to_string()))?;

    if !preset.is_custom && DEFAULT_MODE_IDS.contains(&id) {
        return Err(ModesError::DefaultImmutable(id.to_string()));
    }

    Ok(preset)
}

fn touch(db: &mut ModesDatabase) {
    db.last_updated = Timestamp::now().as_millisecond().max(db.last_updated + 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preset(prompt: &str) -> ModePreset {
        ModePreset {
            prompt: prompt.to_string(),
            description: "custom".to_string(),
            input_disabled: false,
            input_placeholder: None,
            icon: None,
            order: Some(99),
            is_custom: false,
        }
    }

    #[tokio::test]
    async fn add_appends_custom_mode() {
        let store = ModeStore::new();

        let db = store.add("anime", preset("make it anime")).await.unwrap();
        let added = &db.modes["anime"];

        assert!(added.is_custom);
        assert_eq!(added.order, Some(4));
        assert_eq!(db.modes.keys().last().map(String::as_str), Some("anime"));
    }

    #[tokio::test]
    async fn add_rejects_duplicates() {
        let store = ModeStore::new();

        assert!(matches!(
            store.add("clothing", preset("x")).await,
            Err(ModesError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_order() {
        let store = ModeStore::new();
        store.add("anime", preset("v1")).await.unwrap();

        let db = store.update("anime", preset("v2")).await.unwrap();

        assert_eq!(db.modes["anime"].prompt, "v2");
        assert_eq!(db.modes["anime"].order, Some(4));
        assert!(db.modes["anime"].is_custom);
    }

    #[tokio::test]
    async fn defaults_are_immutable() {
        let store = ModeStore::new();

        assert!(matches!(
            store.update("hairstyle", preset("x")).await,
            Err(ModesError::DefaultImmutable(_))
        ));
        assert!(matches!(
            store.delete("freestyle").await,
            Err(ModesError::DefaultImmutable(_))
        ));
        assert_eq!(store.snapshot().await.modes.len(), 3);
    }

    #[tokio::test]
    async fn unknown_mode_is_not_found() {
        let store = ModeStore::new();

        assert!(matches!(store.update("nope", preset("x")).await, Err(ModesError::NotFound(_))));
        assert!(matches!(store.delete("nope").await, Err(ModesError::NotFound(_))));
    }

    #[tokio::test]
    async fn last_updated_strictly_increases() {
        let store = ModeStore::new();
        let mut previous = store.snapshot().await.last_updated;

        for id in ["a", "b", "c"] {
            let db = store.add(id, preset(id)).await.unwrap();
            assert!(db.last_updated > previous);
            previous = db.last_updated;
        }

        let db = store.delete("b").await.unwrap();
        assert!(db.last_updated > previous);
        assert!(!db.modes.contains_key("b"));
    }
}
