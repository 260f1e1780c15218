//! Stored identity (username) and credential (bearer token).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::DataPaths;
use crate::error::SenpaiError;

#[derive(Debug, Clone)]
pub struct Profile {
    identity: PathBuf,
    credential: PathBuf,
}

impl Profile {
    pub fn new(paths: &DataPaths) -> Self {
        Self {
            identity: paths.identity.clone(),
            credential: paths.credential.clone(),
        }
    }

    /// The stored username, if any. A missing or blank file is `None`.
    pub fn identity(&self) -> Result<Option<String>, SenpaiError> {
        read_trimmed(&self.identity)
    }

    pub fn save_identity(&self, username: &str) -> Result<(), SenpaiError> {
        save(&self.identity, username)?;
        tracing::info!(path = %self.identity.display(), "identity saved");
        Ok(())
    }

    /// The stored bearer token, if any.
    pub fn credential(&self) -> Result<Option<String>, SenpaiError> {
        read_trimmed(&self.credential)
    }

    pub fn save_credential(&self, token: &str) -> Result<(), SenpaiError> {
        save(&self.credential, token)?;
        tracing::info!(path = %self.credential.display(), "credential saved");
        Ok(())
    }
}

fn read_trimmed(path: &Path) -> Result<Option<String>, SenpaiError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let value = content.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn save(path: &Path, value: &str) -> Result<(), SenpaiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SenpaiError::Input("value must not be empty".into()));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, value)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn profile() -> (tempfile::TempDir, Profile) {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::resolve(&AppConfig::default(), dir.path());
        (dir, Profile::new(&paths))
    }

    #[test]
    fn test_missing_files_are_none() {
        let (_dir, profile) = profile();
        assert_eq!(profile.identity().unwrap(), None);
        assert_eq!(profile.credential().unwrap(), None);
    }

    #[test]
    fn test_blank_identity_is_none() {
        let (dir, profile) = profile();
        std::fs::write(dir.path().join("username.txt"), "  \n").unwrap();
        assert_eq!(profile.identity().unwrap(), None);
    }

    #[test]
    fn test_save_and_read_back_trimmed() {
        let (_dir, profile) = profile();
        profile.save_identity("  senpai_fan \n").unwrap();
        profile.save_credential("tok123").unwrap();
        assert_eq!(profile.identity().unwrap().as_deref(), Some("senpai_fan"));
        assert_eq!(profile.credential().unwrap().as_deref(), Some("tok123"));
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let (_dir, profile) = profile();
        assert!(matches!(
            profile.save_identity("   "),
            Err(SenpaiError::Input(_))
        ));
    }
}
