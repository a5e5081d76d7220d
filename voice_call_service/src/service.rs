// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::BTreeMap;

use audio_endpoints::AudioService;
use audio_endpoints::StreamDirection;
use log::debug;
use log::info;
use log::warn;

use crate::CallEvent;
use crate::CallRef;
use crate::CallState;
use crate::Error;
use crate::ModemVoice;
use crate::Result;
use crate::TerminationReason;
use crate::VoiceCallConfig;

/// Called with the call, its remote party and the event, in registration order.
pub type StateHandler = Box<dyn FnMut(CallRef, &str, CallEvent) + Send>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HandlerRef(u32);

struct Call<S> {
    /// Dialed number, or the caller's number for incoming calls.
    destination: String,
    state: CallState,
    termination: Option<TerminationReason>,
    tx: Option<S>,
    rx: Option<S>,
}

impl<S> Call<S> {
    fn new(destination: &str, state: CallState) -> Self {
        Call {
            destination: destination.to_owned(),
            state,
            termination: None,
            tx: None,
            rx: None,
        }
    }

    fn stream_mut(&mut self, direction: StreamDirection) -> &mut Option<S> {
        match direction {
            StreamDirection::Tx => &mut self.tx,
            StreamDirection::Rx => &mut self.rx,
        }
    }

    fn release_audio(&mut self) {
        self.tx = None;
        self.rx = None;
    }
}

/// Tracks voice calls and the modem voice endpoints attached to them.
///
/// The audio service and modem are injected at construction, so a test can run the service on
/// `audio_endpoints::NoopAudioService` and observe how it copes without audio endpoints.
pub struct VoiceCallService<A: AudioService, M: ModemVoice> {
    config: VoiceCallConfig,
    audio: A,
    modem: M,
    calls: BTreeMap<CallRef, Call<A::Stream>>,
    /// `None` once every id has been handed out.
    next_call_id: Option<u32>,
    handlers: Vec<(HandlerRef, StateHandler)>,
    next_handler_id: Option<u32>,
}

impl<A: AudioService, M: ModemVoice> VoiceCallService<A, M> {
    pub fn new(config: VoiceCallConfig, audio: A, modem: M) -> Self {
        VoiceCallService {
            config,
            audio,
            modem,
            calls: BTreeMap::new(),
            next_call_id: Some(1),
            handlers: Vec::new(),
            next_handler_id: Some(1),
        }
    }

    pub fn config(&self) -> &VoiceCallConfig {
        &self.config
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn modem(&self) -> &M {
        &self.modem
    }

    /// Places a call to `destination`.
    ///
    /// With `require_audio` set, both modem voice endpoints are opened before the modem is asked
    /// to dial. If either is absent the call is not placed and `Error::AudioUnavailable` names the
    /// missing direction.
    pub fn start(&mut self, destination: &str) -> Result<CallRef> {
        self.check_destination(destination)?;
        if self.active_calls() >= self.config.max_calls {
            return Err(Error::CallLimitReached(self.config.max_calls));
        }

        let (tx, rx) = if self.config.require_audio {
            let tx = self.open_required(StreamDirection::Tx)?;
            let rx = self.open_required(StreamDirection::Rx)?;
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let call = self.allocate_call_ref()?;
        self.modem
            .dial(call, destination)
            .map_err(|e| Error::Dial(destination.to_owned(), e))?;
        info!("{}: dialing {}", call, destination);

        let mut entry = Call::new(destination, CallState::Dialing);
        entry.tx = tx;
        entry.rx = rx;
        self.calls.insert(call, entry);
        Ok(call)
    }

    /// Records a call offered by the network and reports `CallEvent::Offer`.
    pub fn notify_incoming(&mut self, origin: &str) -> Result<CallRef> {
        let call = self.allocate_call_ref()?;
        info!("{}: incoming from {}", call, origin);
        self.calls.insert(call, Call::new(origin, CallState::Incoming));
        self.emit(call, CallEvent::Offer);
        Ok(call)
    }

    /// Answers an incoming call. The modem confirms with `CallEvent::Connected`.
    ///
    /// With `require_audio` set and an endpoint absent, the call is rejected and terminates
    /// with `TerminationReason::AudioUnavailable`. If the modem fails to answer, the endpoints
    /// are released again and the call stays incoming, so `answer` can be retried.
    pub fn answer(&mut self, call: CallRef) -> Result<()> {
        let state = self.state(call)?;
        if state != CallState::Incoming {
            return Err(Error::InvalidState {
                call,
                state,
                op: "answer",
            });
        }

        if self.config.require_audio {
            let opened = match self.open_required(StreamDirection::Tx) {
                Ok(tx) => self.open_required(StreamDirection::Rx).map(|rx| (tx, rx)),
                Err(e) => Err(e),
            };
            match opened {
                Ok((tx, rx)) => {
                    let entry = self.call_mut(call)?;
                    entry.tx = Some(tx);
                    entry.rx = Some(rx);
                }
                Err(e) => {
                    if let Err(hangup_err) = self.modem.hang_up(call) {
                        warn!("{}: failed to reject: {}", call, hangup_err);
                    }
                    self.terminate(call, TerminationReason::AudioUnavailable);
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.modem.answer(call) {
            self.call_mut(call)?.release_audio();
            self.emit(call, CallEvent::CallAnswerFailed);
            return Err(Error::Answer(call, e));
        }
        debug!("{}: answered", call);
        Ok(())
    }

    /// Hangs up a call that has not terminated yet.
    pub fn end(&mut self, call: CallRef) -> Result<()> {
        let state = self.state(call)?;
        if state.is_terminated() {
            return Err(Error::InvalidState {
                call,
                state,
                op: "end",
            });
        }

        if let Err(e) = self.modem.hang_up(call) {
            self.emit(call, CallEvent::CallEndFailed);
            return Err(Error::Hangup(call, e));
        }
        self.terminate(call, TerminationReason::LocalEnded);
        Ok(())
    }

    /// Forgets a call. A call still in progress is hung up first.
    pub fn delete(&mut self, call: CallRef) -> Result<()> {
        let state = self.state(call)?;
        if !state.is_terminated() {
            if let Err(e) = self.modem.hang_up(call) {
                warn!("{}: hang up before delete failed: {}", call, e);
            }
        }
        self.calls.remove(&call);
        debug!("{}: deleted", call);
        Ok(())
    }

    /// Returns the modem voice transmit endpoint of `call`, opening it on first use.
    pub fn get_tx_audio_stream(&mut self, call: CallRef) -> Result<Option<&A::Stream>> {
        self.audio_stream(call, StreamDirection::Tx)
    }

    /// Returns the modem voice receive endpoint of `call`, opening it on first use.
    pub fn get_rx_audio_stream(&mut self, call: CallRef) -> Result<Option<&A::Stream>> {
        self.audio_stream(call, StreamDirection::Rx)
    }

    pub fn get_termination_reason(&self, call: CallRef) -> Result<TerminationReason> {
        self.call(call)?
            .termination
            .ok_or(Error::NotTerminated(call))
    }

    pub fn state(&self, call: CallRef) -> Result<CallState> {
        Ok(self.call(call)?.state)
    }

    pub fn destination(&self, call: CallRef) -> Result<&str> {
        Ok(self.call(call)?.destination.as_str())
    }

    /// Number of calls that have not terminated.
    pub fn active_calls(&self) -> usize {
        self.calls
            .values()
            .filter(|c| !c.state.is_terminated())
            .count()
    }

    pub fn add_state_handler(&mut self, handler: StateHandler) -> Result<HandlerRef> {
        let id = self.next_handler_id.ok_or(Error::IdsExhausted("state handler"))?;
        self.next_handler_id = id.checked_add(1);
        let handler_ref = HandlerRef(id);
        self.handlers.push((handler_ref, handler));
        Ok(handler_ref)
    }

    /// Returns false if `handler_ref` was not registered.
    pub fn remove_state_handler(&mut self, handler_ref: HandlerRef) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(r, _)| *r != handler_ref);
        self.handlers.len() != before
    }

    /// Applies progress reported by the modem and forwards the event to the state handlers.
    ///
    /// `reason` overrides the termination reason inferred from `event`. Events for a call that
    /// already terminated are dropped.
    pub fn handle_modem_event(
        &mut self,
        call: CallRef,
        event: CallEvent,
        reason: Option<TerminationReason>,
    ) -> Result<()> {
        let entry = self.call_mut(call)?;
        if entry.state.is_terminated() {
            warn!("{}: ignoring {} after termination", call, event);
            return Ok(());
        }
        debug!("{}: modem reported {}", call, event);

        match event {
            CallEvent::Alerting => entry.state = CallState::Alerting,
            CallEvent::Connected => entry.state = CallState::Connected,
            CallEvent::Terminated => {
                self.terminate(call, reason.unwrap_or(TerminationReason::RemoteEnded));
                return Ok(());
            }
            CallEvent::Busy => {
                entry.state = CallState::Terminated;
                entry.termination = Some(reason.unwrap_or(TerminationReason::Busy));
                entry.release_audio();
            }
            CallEvent::ResourceBusy => {
                entry.state = CallState::Terminated;
                entry.termination = Some(reason.unwrap_or(TerminationReason::Undefined));
                entry.release_audio();
            }
            CallEvent::Offer | CallEvent::CallEndFailed | CallEvent::CallAnswerFailed => {}
        }
        self.emit(call, event);
        Ok(())
    }

    fn check_destination(&self, destination: &str) -> Result<()> {
        let valid = !destination.is_empty()
            && destination.chars().count() <= self.config.max_destination_len
            && destination
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '*' | '#'));
        if valid {
            Ok(())
        } else {
            Err(Error::BadDestination(destination.to_owned()))
        }
    }

    fn open_required(&mut self, direction: StreamDirection) -> Result<A::Stream> {
        self.audio.open_modem_voice(direction).ok_or_else(|| {
            warn!("no modem voice {} endpoint available", direction);
            Error::AudioUnavailable(direction)
        })
    }

    fn audio_stream(
        &mut self,
        call: CallRef,
        direction: StreamDirection,
    ) -> Result<Option<&A::Stream>> {
        let entry = self.calls.get_mut(&call).ok_or(Error::InvalidCallRef(call))?;
        if entry.state.is_terminated() {
            return Err(Error::InvalidState {
                call,
                state: entry.state,
                op: "open audio for",
            });
        }

        let slot = entry.stream_mut(direction);
        if slot.is_none() {
            *slot = self.audio.open_modem_voice(direction);
            if slot.is_none() {
                warn!("{}: no modem voice {} endpoint", call, direction);
            }
        }
        Ok(slot.as_ref())
    }

    fn allocate_call_ref(&mut self) -> Result<CallRef> {
        let id = self.next_call_id.ok_or(Error::IdsExhausted("call"))?;
        self.next_call_id = id.checked_add(1);
        Ok(CallRef::new(id))
    }

    fn call(&self, call: CallRef) -> Result<&Call<A::Stream>> {
        self.calls.get(&call).ok_or(Error::InvalidCallRef(call))
    }

    fn call_mut(&mut self, call: CallRef) -> Result<&mut Call<A::Stream>> {
        self.calls.get_mut(&call).ok_or(Error::InvalidCallRef(call))
    }

    fn terminate(&mut self, call: CallRef, reason: TerminationReason) {
        if let Some(entry) = self.calls.get_mut(&call) {
            entry.state = CallState::Terminated;
            entry.termination = Some(reason);
            entry.release_audio();
            info!("{}: terminated, {}", call, reason);
        }
        self.emit(call, CallEvent::Terminated);
    }

    fn emit(&mut self, call: CallRef, event: CallEvent) {
        let destination = self
            .calls
            .get(&call)
            .map(|c| c.destination.as_str())
            .unwrap_or_default();
        for (_, handler) in self.handlers.iter_mut() {
            handler(call, destination, event);
        }
    }
}
