// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Provides the interface a voice call uses to acquire modem voice audio endpoints.
//!
//! A voice call component asks an `AudioService` for the modem's voice transmit and receive
//! endpoints. `ModemAudioService` hands out `AudioStreamRef` handles for the modem voice path,
//! while `NoopAudioService` never does. The latter lets a caller's "no endpoint available" path
//! run deterministically without any audio hardware.
//!
//! ```
//! use audio_endpoints::{AudioService, ModemAudioService, NoopAudioService};
//!
//! let mut audio: NoopAudioService = NoopAudioService::new();
//! assert!(audio.open_modem_voice_tx().is_none());
//! assert!(audio.open_modem_voice_rx().is_none());
//!
//! let mut audio = ModemAudioService::new();
//! let tx = audio.open_modem_voice_tx().expect("tx endpoint is free");
//! // Only one transmit endpoint can be held at a time.
//! assert!(audio.open_modem_voice_tx().is_none());
//! drop(tx);
//! assert!(audio.open_modem_voice_tx().is_some());
//! ```

use std::error;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use log::debug;
use remain::sorted;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error as ThisError;

mod modem;

pub use modem::AudioStreamRef;
pub use modem::ModemAudioService;

/// Errors that can pass across threads.
pub type BoxError = Box<dyn error::Error + Send + Sync>;

#[sorted]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("invalid audio backend: `{0}`, must be one of [noop, modem]")]
    InvalidBackend(String),
}

/// Direction of a modem voice endpoint, seen from the local end of the call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamDirection {
    /// Uplink, local audio sent to the modem.
    Tx,
    /// Downlink, audio received from the modem.
    Rx,
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StreamDirection::Tx => write!(f, "tx"),
            StreamDirection::Rx => write!(f, "rx"),
        }
    }
}

/// `AudioService` opens the modem voice endpoints of a call.
///
/// Either operation may return `None`. An absent endpoint is not an error here; the caller
/// decides whether it can go on without it.
pub trait AudioService: Send {
    /// Handle to an opened endpoint.
    type Stream;

    /// Opens the modem voice transmit endpoint.
    fn open_modem_voice_tx(&mut self) -> Option<Self::Stream>;

    /// Opens the modem voice receive endpoint.
    fn open_modem_voice_rx(&mut self) -> Option<Self::Stream>;

    /// Opens the endpoint for `direction`.
    fn open_modem_voice(&mut self, direction: StreamDirection) -> Option<Self::Stream> {
        match direction {
            StreamDirection::Tx => self.open_modem_voice_tx(),
            StreamDirection::Rx => self.open_modem_voice_rx(),
        }
    }
}

impl<A: AudioService + ?Sized> AudioService for Box<A> {
    type Stream = A::Stream;

    fn open_modem_voice_tx(&mut self) -> Option<Self::Stream> {
        (**self).open_modem_voice_tx()
    }

    fn open_modem_voice_rx(&mut self) -> Option<Self::Stream> {
        (**self).open_modem_voice_rx()
    }
}

impl<A: AudioService + ?Sized> AudioService for &mut A {
    type Stream = A::Stream;

    fn open_modem_voice_tx(&mut self) -> Option<Self::Stream> {
        (**self).open_modem_voice_tx()
    }

    fn open_modem_voice_rx(&mut self) -> Option<Self::Stream> {
        (**self).open_modem_voice_rx()
    }
}

/// Audio service without a modem voice path. Every open reports that no endpoint is available.
///
/// `S` is the handle type the caller expects; no value of it is ever created.
pub struct NoopAudioService<S = AudioStreamRef> {
    _stream: PhantomData<fn() -> S>,
}

impl<S> NoopAudioService<S> {
    pub const fn new() -> Self {
        NoopAudioService {
            _stream: PhantomData,
        }
    }
}

impl<S> Default for NoopAudioService<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for NoopAudioService<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for NoopAudioService<S> {}

impl<S> fmt::Debug for NoopAudioService<S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("NoopAudioService")
    }
}

impl<S> AudioService for NoopAudioService<S> {
    type Stream = S;

    fn open_modem_voice_tx(&mut self) -> Option<S> {
        None
    }

    fn open_modem_voice_rx(&mut self) -> Option<S> {
        None
    }
}

/// Audio service implementations that can be picked when composing a voice call service.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioBackend {
    #[default]
    Noop,
    Modem,
}

impl fmt::Display for AudioBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AudioBackend::Noop => write!(f, "noop"),
            AudioBackend::Modem => write!(f, "modem"),
        }
    }
}

impl FromStr for AudioBackend {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "noop" => Ok(AudioBackend::Noop),
            "modem" => Ok(AudioBackend::Modem),
            _ => Err(Error::InvalidBackend(s.to_owned())),
        }
    }
}

/// Creates the audio service for `backend`.
pub fn create_audio_service(
    backend: AudioBackend,
) -> Box<dyn AudioService<Stream = AudioStreamRef>> {
    debug!("creating {} audio service", backend);
    match backend {
        AudioBackend::Noop => Box::new(NoopAudioService::new()),
        AudioBackend::Modem => Box::new(ModemAudioService::new()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn noop_tx_is_always_absent() {
        let mut audio: NoopAudioService = NoopAudioService::new();
        for _ in 0..100 {
            assert!(audio.open_modem_voice_tx().is_none());
        }
    }

    #[test]
    fn noop_rx_is_always_absent() {
        let mut audio: NoopAudioService = NoopAudioService::default();
        for _ in 0..100 {
            assert!(audio.open_modem_voice_rx().is_none());
        }
    }

    #[test]
    fn noop_pair_is_stable() {
        let mut audio: NoopAudioService = NoopAudioService::new();
        let first = (audio.open_modem_voice_tx(), audio.open_modem_voice_rx());
        assert!(first.0.is_none() && first.1.is_none());
        // Interleave in the other order; nothing carries over between calls.
        let second = (audio.open_modem_voice_rx(), audio.open_modem_voice_tx());
        assert!(second.0.is_none() && second.1.is_none());
        assert!(audio.open_modem_voice(StreamDirection::Tx).is_none());
        assert!(audio.open_modem_voice(StreamDirection::Rx).is_none());
    }

    #[test]
    fn noop_never_builds_a_stream() {
        static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

        struct CountedStream;

        impl CountedStream {
            #[allow(dead_code)]
            fn new() -> Self {
                CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
                CountedStream
            }
        }

        let mut audio = NoopAudioService::<CountedStream>::new();
        for _ in 0..10 {
            assert!(audio.open_modem_voice_tx().is_none());
            assert!(audio.open_modem_voice_rx().is_none());
        }
        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn noop_through_box_and_reference() {
        let mut boxed = create_audio_service(AudioBackend::Noop);
        assert!(boxed.open_modem_voice_tx().is_none());
        assert!(boxed.open_modem_voice_rx().is_none());

        fn open_pair<A: AudioService>(mut audio: A) -> (Option<A::Stream>, Option<A::Stream>) {
            (audio.open_modem_voice_tx(), audio.open_modem_voice_rx())
        }

        let mut audio: NoopAudioService = NoopAudioService::new();
        let (tx, rx) = open_pair(&mut audio);
        assert!(tx.is_none() && rx.is_none());
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("noop".parse::<AudioBackend>().unwrap(), AudioBackend::Noop);
        assert_eq!("modem".parse::<AudioBackend>().unwrap(), AudioBackend::Modem);
        match "cras".parse::<AudioBackend>() {
            Err(Error::InvalidBackend(name)) => assert_eq!(name, "cras"),
            other => panic!("unexpected parse result {:?}", other),
        }
        assert_eq!(AudioBackend::default(), AudioBackend::Noop);
        assert_eq!(AudioBackend::Modem.to_string(), "modem");
    }

    #[test]
    fn backend_deserialize() {
        let backend: AudioBackend = serde_json::from_str("\"modem\"").unwrap();
        assert_eq!(backend, AudioBackend::Modem);
        assert!(serde_json::from_str::<AudioBackend>("\"Modem\"").is_err());
    }

    #[test]
    fn modem_backend_hands_out_streams() {
        let mut audio = create_audio_service(AudioBackend::Modem);
        let tx = audio.open_modem_voice_tx().unwrap();
        assert_eq!(tx.direction(), StreamDirection::Tx);
    }
}
