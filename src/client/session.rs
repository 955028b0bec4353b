use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use super::ClientError;

#[derive(Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Where the client keeps its bearer token between runs.
///
/// A persistent store mirrors every change to a small JSON file, so a token
/// saved by one process is picked up by the next one. An ephemeral store only
/// lives in memory.
pub struct SessionStore {
    path: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn ephemeral() -> Self {
        Self {
            path: None,
            token: RwLock::new(None),
        }
    }

    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let token = match fs::read_to_string(&path) {
            Ok(contents) => Some(serde_json::from_str::<SessionFile>(&contents)?.token),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            token: RwLock::new(token),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(path) = &self.path {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let contents = serde_json::to_string(&SessionFile {
                token: token.to_string(),
            })?;
            fs::write(path, contents)?;
        }
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) =
            Some(token.to_string());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ClientError> {
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        *self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
