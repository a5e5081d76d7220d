// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use argh::FromArgs;
use audio_endpoints::AudioBackend;
use voice_call_service::Result;
use voice_call_service::VoiceCallConfig;

fn default_audio_backend() -> AudioBackend {
    AudioBackend::Noop
}

fn parse_audio_backend(value: &str) -> std::result::Result<AudioBackend, String> {
    AudioBackend::from_str(value).map_err(|e| e.to_string())
}

#[derive(Clone, Debug, FromArgs)]
/// voicecall
pub struct Args {
    /// the audio service for the modem voice endpoints, [noop, modem]. (default: noop)
    #[argh(
        option,
        short = 'a',
        default = "default_audio_backend()",
        from_str_fn(parse_audio_backend)
    )]
    pub audio: AudioBackend,
    /// path to a JSON voice call config.
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
    /// place the call even if the audio endpoints cannot be opened
    #[argh(switch)]
    pub allow_no_audio: bool,
    /// whether or not to print the debug messages
    #[argh(switch)]
    pub debug: bool,
    /// number to dial
    #[argh(positional)]
    pub destination: String,
}

impl Args {
    /// Loads the config file, if any, and applies the command line overrides.
    pub fn voice_call_config(&self) -> Result<VoiceCallConfig> {
        let mut config = match &self.config {
            Some(path) => VoiceCallConfig::from_file(path)?,
            None => VoiceCallConfig::default(),
        };
        if self.allow_no_audio {
            config.require_audio = false;
        }
        Ok(config)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"
Destination: {}
Audio service: {}
Config: {}
Allow no audio: {}
          "#,
            self.destination,
            self.audio,
            self.config
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "default".to_owned()),
            self.allow_no_audio,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let args = Args::from_args(&["voicecall"], &["5551234"]).unwrap();
        assert_eq!(args.audio, AudioBackend::Noop);
        assert_eq!(args.destination, "5551234");
        assert!(!args.allow_no_audio);
        assert_eq!(args.voice_call_config().unwrap(), VoiceCallConfig::default());
    }

    #[test]
    fn modem_backend_without_audio_requirement() {
        let args =
            Args::from_args(&["voicecall"], &["-a", "modem", "--allow-no-audio", "5551234"])
                .unwrap();
        assert_eq!(args.audio, AudioBackend::Modem);
        assert!(!args.voice_call_config().unwrap().require_audio);
    }

    #[test]
    fn unknown_backend_rejected() {
        assert!(Args::from_args(&["voicecall"], &["-a", "alsa", "5551234"]).is_err());
    }

    #[test]
    fn config_file_overridden_by_switch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"require_audio": true, "max_calls": 2}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_owned();
        let args = Args::from_args(
            &["voicecall"],
            &["-c", path.as_str(), "--allow-no-audio", "5551234"],
        )
        .unwrap();
        let config = args.voice_call_config().unwrap();
        assert!(!config.require_audio);
        assert_eq!(config.max_calls, 2);
    }
}
