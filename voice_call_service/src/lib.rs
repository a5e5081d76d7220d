// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Places and receives modem voice calls and acquires their audio endpoints.
//!
//! `VoiceCallService` is given its collaborators when it is built: an
//! `audio_endpoints::AudioService` for the modem voice endpoints and a `ModemVoice` for call
//! control. Tests swap in `audio_endpoints::NoopAudioService` to drive the paths where no audio
//! endpoint is available.

mod call;
mod config;
mod error;
mod modem;
mod service;

pub use call::CallEvent;
pub use call::CallRef;
pub use call::CallState;
pub use call::TerminationReason;
pub use config::VoiceCallConfig;
pub use error::Error;
pub use error::Result;
pub use modem::ModemVoice;
pub use modem::NoopModem;
pub use service::HandlerRef;
pub use service::StateHandler;
pub use service::VoiceCallService;
