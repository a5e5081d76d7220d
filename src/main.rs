// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Places one modem voice call through `VoiceCallService` and reports what happened.

mod args;

use anyhow::Context;
use anyhow::Result;
use args::Args;
use audio_endpoints::create_audio_service;
use log::debug;
use log::error;
use log::info;
use log::warn;
use voice_call_service::CallEvent;
use voice_call_service::CallRef;
use voice_call_service::NoopModem;
use voice_call_service::VoiceCallService;

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn run(args: &Args) -> Result<()> {
    debug!("{}", args);
    let config = args
        .voice_call_config()
        .context("failed to load voice call config")?;
    let audio = create_audio_service(args.audio);
    let mut service = VoiceCallService::new(config, audio, NoopModem::new());
    debug!("voice call config: {:?}", service.config());
    service.add_state_handler(Box::new(|call: CallRef, remote: &str, event: CallEvent| {
        info!("{} ({}): {}", call, remote, event);
    }))?;

    let call = service
        .start(&args.destination)
        .with_context(|| format!("failed to call {}", args.destination))?;

    // NoopModem reports nothing on its own, so play the network side here.
    service.handle_modem_event(call, CallEvent::Alerting, None)?;
    service.handle_modem_event(call, CallEvent::Connected, None)?;

    match service.get_tx_audio_stream(call)? {
        Some(stream) => info!("{}: transmitting on {}", call, stream),
        None => warn!("{}: no transmit endpoint", call),
    }
    match service.get_rx_audio_stream(call)? {
        Some(stream) => info!("{}: receiving on {}", call, stream),
        None => warn!("{}: no receive endpoint", call),
    }

    service.end(call)?;
    debug!("call id {} ended", call.id());
    info!("{}: {}", call, service.get_termination_reason(call)?);
    service.delete(call)?;
    Ok(())
}

fn main() {
    let args: Args = argh::from_env();
    init_logging(args.debug);

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
