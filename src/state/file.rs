//! Simple file-backed [`StateStore`] snapshotting the checkpoint after each advance.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	state::{StateError, StateFuture, StateStore, TapState},
};

/// Persists the checkpoint mapping to a JSON file after each mutation.
///
/// Writes go to a sibling temporary file first and replace the snapshot via
/// rename, so readers never observe a partially written checkpoint.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<TapState>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading any existing snapshot.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StateError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { TapState::default() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn load_snapshot(path: &Path) -> Result<TapState, StateError> {
		let metadata = path.metadata().map_err(|e| StateError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(TapState::default());
		}

		let bytes = fs::read(path).map_err(|e| StateError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StateError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StateError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StateError::Backend {
				message: format!("Failed to create state directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &TapState) -> Result<(), StateError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StateError::Serialization {
				message: format!("Failed to serialize state snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StateError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StateError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StateError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StateError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl StateStore for FileStore {
	fn load(&self) -> StateFuture<'_, TapState> {
		Box::pin(async move { Ok(self.inner.read().clone()) })
	}

	fn persist<'a>(&'a self, state: &'a TapState) -> StateFuture<'a, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			*guard = state.clone();
			self.persist_locked(&guard)?;

			Ok(())
		})
	}
}
