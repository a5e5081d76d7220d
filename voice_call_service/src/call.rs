// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fmt;

/// Reference to a call owned by a `VoiceCallService`. Never reused by the same service.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallRef(u32);

impl CallRef {
    pub(crate) fn new(id: u32) -> Self {
        CallRef(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "call#{}", self.0)
    }
}

/// Events reported to state handlers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallEvent {
    Alerting,
    Connected,
    Terminated,
    /// Incoming call.
    Offer,
    Busy,
    ResourceBusy,
    CallEndFailed,
    CallAnswerFailed,
}

impl fmt::Display for CallEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CallEvent::*;
        let name = match self {
            Alerting => "ALERTING",
            Connected => "CONNECTED",
            Terminated => "TERMINATED",
            Offer => "OFFER_CALL",
            Busy => "BUSY",
            ResourceBusy => "RESOURCE_BUSY",
            CallEndFailed => "CALL_END_FAILED",
            CallAnswerFailed => "CALL_ANSWER_FAILED",
        };
        write!(f, "{}", name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CallState {
    Dialing,
    Incoming,
    Alerting,
    Connected,
    Terminated,
}

impl CallState {
    pub fn is_terminated(self) -> bool {
        self == CallState::Terminated
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CallState::*;
        let name = match self {
            Dialing => "dialing",
            Incoming => "incoming",
            Alerting => "alerting",
            Connected => "connected",
            Terminated => "terminated",
        };
        write!(f, "{}", name)
    }
}

/// Why a call ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// Hung up through `VoiceCallService::end`.
    LocalEnded,
    RemoteEnded,
    NetworkFail,
    Busy,
    /// Rejected because a required audio endpoint could not be opened.
    AudioUnavailable,
    Undefined,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TerminationReason::*;
        let name = match self {
            LocalEnded => "local ended",
            RemoteEnded => "remote ended",
            NetworkFail => "network failure",
            Busy => "busy",
            AudioUnavailable => "audio unavailable",
            Undefined => "undefined",
        };
        write!(f, "{}", name)
    }
}
