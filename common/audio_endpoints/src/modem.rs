// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use log::debug;
use log::warn;

use super::AudioService;
use super::StreamDirection;

/// Handle to an open modem voice endpoint.
///
/// The modem has a single voice PCM path, so the endpoint stays reserved for this handle until it
/// is dropped.
#[derive(Debug)]
pub struct AudioStreamRef {
    id: u32,
    direction: StreamDirection,
    lease: Arc<AtomicBool>,
}

impl AudioStreamRef {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn direction(&self) -> StreamDirection {
        self.direction
    }
}

impl fmt::Display for AudioStreamRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "modem-voice-{}#{}", self.direction, self.id)
    }
}

impl Drop for AudioStreamRef {
    fn drop(&mut self) {
        self.lease.store(false, Ordering::Release);
        debug!("released {}", self);
    }
}

/// `AudioService` backed by the modem voice path. At most one handle per direction is live.
pub struct ModemAudioService {
    present: bool,
    next_id: u32,
    tx: Arc<AtomicBool>,
    rx: Arc<AtomicBool>,
}

impl ModemAudioService {
    pub fn new() -> Self {
        ModemAudioService {
            present: true,
            next_id: 1,
            tx: Arc::new(AtomicBool::new(false)),
            rx: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a service for a modem that reports no voice path. Every open returns `None`.
    pub fn unavailable() -> Self {
        ModemAudioService {
            present: false,
            ..Self::new()
        }
    }

    /// Returns true while a handle for `direction` is alive.
    pub fn is_open(&self, direction: StreamDirection) -> bool {
        self.lease(direction).load(Ordering::Acquire)
    }

    fn lease(&self, direction: StreamDirection) -> &Arc<AtomicBool> {
        match direction {
            StreamDirection::Tx => &self.tx,
            StreamDirection::Rx => &self.rx,
        }
    }

    fn open(&mut self, direction: StreamDirection) -> Option<AudioStreamRef> {
        if !self.present {
            warn!("modem voice path not present, no {} endpoint", direction);
            return None;
        }

        let lease = Arc::clone(self.lease(direction));
        if lease
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!("modem voice {} endpoint is already open", direction);
            return None;
        }

        let id = self.next_id;
        // Ids are nonzero.
        self.next_id = self.next_id.checked_add(1).unwrap_or(1);
        let stream = AudioStreamRef {
            id,
            direction,
            lease,
        };
        debug!("opened {}", stream);
        Some(stream)
    }
}

impl Default for ModemAudioService {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioService for ModemAudioService {
    type Stream = AudioStreamRef;

    fn open_modem_voice_tx(&mut self) -> Option<AudioStreamRef> {
        self.open(StreamDirection::Tx)
    }

    fn open_modem_voice_rx(&mut self) -> Option<AudioStreamRef> {
        self.open(StreamDirection::Rx)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn one_stream_per_direction() {
        let mut audio = ModemAudioService::new();
        let tx = audio.open_modem_voice_tx().unwrap();
        let rx = audio.open_modem_voice_rx().unwrap();
        assert!(audio.open_modem_voice_tx().is_none());
        assert!(audio.open_modem_voice_rx().is_none());
        assert!(audio.is_open(StreamDirection::Tx));
        assert!(audio.is_open(StreamDirection::Rx));
        assert_eq!(tx.direction(), StreamDirection::Tx);
        assert_eq!(rx.direction(), StreamDirection::Rx);
    }

    #[test]
    fn drop_releases_endpoint() {
        let mut audio = ModemAudioService::new();
        let tx = audio.open_modem_voice_tx().unwrap();
        assert_eq!(tx.id(), 1);
        drop(tx);
        assert!(!audio.is_open(StreamDirection::Tx));
        let tx = audio.open_modem_voice_tx().unwrap();
        assert_eq!(tx.id(), 2);
        assert_eq!(tx.to_string(), "modem-voice-tx#2");
    }

    #[test]
    fn release_from_another_thread() {
        let mut audio = ModemAudioService::new();
        let rx = audio.open_modem_voice_rx().unwrap();
        thread::spawn(move || drop(rx)).join().unwrap();
        assert!(audio.open_modem_voice_rx().is_some());
    }

    #[test]
    fn unavailable_modem_never_opens() {
        let mut audio = ModemAudioService::unavailable();
        assert!(audio.open_modem_voice_tx().is_none());
        assert!(audio.open_modem_voice_rx().is_none());
        assert!(!audio.is_open(StreamDirection::Tx));
    }

    #[test]
    fn refused_open_keeps_existing_lease() {
        let mut audio = ModemAudioService::new();
        let _tx = audio.open_modem_voice_tx().unwrap();
        assert!(audio.open_modem_voice(StreamDirection::Tx).is_none());
        assert!(audio.is_open(StreamDirection::Tx));
    }
}
