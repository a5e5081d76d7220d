// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::io;
use std::path::PathBuf;

use audio_endpoints::BoxError;
use audio_endpoints::StreamDirection;
use remain::sorted;
use thiserror::Error;

use crate::CallRef;
use crate::CallState;

pub type Result<T> = std::result::Result<T, Error>;

#[sorted]
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to answer {0}: {1}")]
    Answer(CallRef, BoxError),
    #[error("no modem voice {0} endpoint available")]
    AudioUnavailable(StreamDirection),
    #[error("invalid destination `{0}`")]
    BadDestination(String),
    #[error("too many calls in progress, limit is {0}")]
    CallLimitReached(usize),
    #[error("failed to parse voice call config: {0}")]
    Config(serde_json::Error),
    #[error("failed to dial `{0}`: {1}")]
    Dial(String, BoxError),
    #[error("failed to hang up {0}: {1}")]
    Hangup(CallRef, BoxError),
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),
    #[error("unknown {0}")]
    InvalidCallRef(CallRef),
    #[error("cannot {op} {call} while it is {state}")]
    InvalidState {
        call: CallRef,
        state: CallState,
        op: &'static str,
    },
    #[error("{0} has not terminated")]
    NotTerminated(CallRef),
    #[error("failed to read voice call config {}: {1}", .0.display())]
    ReadConfig(PathBuf, io::Error),
}
