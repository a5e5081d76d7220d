// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use audio_endpoints::BoxError;
use log::debug;

use crate::CallRef;

/// Call control requests the voice call service sends to the modem.
///
/// Progress comes back through `VoiceCallService::handle_modem_event`.
pub trait ModemVoice: Send {
    fn dial(&mut self, call: CallRef, destination: &str) -> Result<(), BoxError>;
    fn answer(&mut self, call: CallRef) -> Result<(), BoxError>;
    fn hang_up(&mut self, call: CallRef) -> Result<(), BoxError>;
}

impl<M: ModemVoice + ?Sized> ModemVoice for Box<M> {
    fn dial(&mut self, call: CallRef, destination: &str) -> Result<(), BoxError> {
        (**self).dial(call, destination)
    }

    fn answer(&mut self, call: CallRef) -> Result<(), BoxError> {
        (**self).answer(call)
    }

    fn hang_up(&mut self, call: CallRef) -> Result<(), BoxError> {
        (**self).hang_up(call)
    }
}

/// Modem that accepts every request and never reports progress on its own.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopModem;

impl NoopModem {
    pub fn new() -> Self {
        NoopModem
    }
}

impl ModemVoice for NoopModem {
    fn dial(&mut self, call: CallRef, destination: &str) -> Result<(), BoxError> {
        debug!("noop modem: dial {} for {}", destination, call);
        Ok(())
    }

    fn answer(&mut self, call: CallRef) -> Result<(), BoxError> {
        debug!("noop modem: answer {}", call);
        Ok(())
    }

    fn hang_up(&mut self, call: CallRef) -> Result<(), BoxError> {
        debug!("noop modem: hang up {}", call);
        Ok(())
    }
}
