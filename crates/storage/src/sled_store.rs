// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::StringStorage;
use async_trait::async_trait;
use eyre::{eyre, Result, WrapErr};
use once_cell::sync::Lazy;
use sled::{Db, Tree};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;

const TREE: &str = "quiz_storage";

// Only one handle per db path may be open in a process
static SLED_CACHE: Lazy<Mutex<HashMap<PathBuf, Db>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn get_or_open_db(path: &Path) -> Result<Db> {
    std::fs::create_dir_all(path)
        .wrap_err_with(|| format!("Could not create database dir '{}'", path.display()))?;
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    let mut cache = SLED_CACHE
        .lock()
        .map_err(|_| eyre!("sled cache lock poisoned"))?;
    if let Some(db) = cache.get(&key) {
        return Ok(db.clone());
    }

    let db = sled::open(path)
        .wrap_err_with(|| format!("Could not open database at path '{}'", path.display()))?;
    if db.was_recovered() {
        info!("recovered db at: {:?}", path);
    } else {
        info!("created db at: {:?}", path);
    }
    cache.insert(key, db.clone());
    Ok(db)
}

/// Durable store backed by sled
#[derive(Clone)]
pub struct SledStringStorage {
    tree: Tree,
}

impl SledStringStorage {
    pub fn open(path: &Path) -> Result<Self> {
        let tree = get_or_open_db(path)?.open_tree(TREE)?;
        Ok(Self { tree })
    }

    /// Forget the cached handle for `path`. The db closes once every open store is dropped.
    pub fn close(path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if let Ok(mut cache) = SLED_CACHE.lock() {
            cache.remove(&key);
        }
    }
}

#[async_trait]
impl StringStorage for SledStringStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self
            .tree
            .get(key)
            .wrap_err_with(|| format!("Failed to fetch {key}"))?
        else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8(raw.to_vec())?))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.tree
            .insert(key, value.as_bytes())
            .wrap_err("Could not insert data into db")?;
        self.tree.flush_async().await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.tree
            .remove(key)
            .wrap_err("Could not remove data from db")?;
        self.tree.flush_async().await?;
        Ok(())
    }
}
