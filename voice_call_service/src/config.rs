// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Voice call service settings, loadable from JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VoiceCallConfig {
    /// Refuse to place or answer a call unless both modem voice endpoints open.
    pub require_audio: bool,
    /// Calls that may be in progress at once.
    pub max_calls: usize,
    pub max_destination_len: usize,
}

impl Default for VoiceCallConfig {
    fn default() -> Self {
        VoiceCallConfig {
            require_audio: true,
            max_calls: 1,
            max_destination_len: 16,
        }
    }
}

impl VoiceCallConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(Error::Config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|e| Error::ReadConfig(path.to_path_buf(), e))?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let cfg = VoiceCallConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, VoiceCallConfig::default());
        assert!(cfg.require_audio);
        assert_eq!(cfg.max_calls, 1);
        assert_eq!(cfg.max_destination_len, 16);
    }

    #[test]
    fn partial_override() {
        let cfg = VoiceCallConfig::from_json_str(r#"{"require_audio": false, "max_calls": 3}"#)
            .unwrap();
        assert!(!cfg.require_audio);
        assert_eq!(cfg.max_calls, 3);
        assert_eq!(cfg.max_destination_len, 16);
    }

    #[test]
    fn unknown_field_rejected() {
        let err = VoiceCallConfig::from_json_str(r#"{"require_adio": false}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_destination_len": 20}}"#).unwrap();
        let cfg = VoiceCallConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.max_destination_len, 20);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VoiceCallConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::ReadConfig(_, _)));
    }
}
