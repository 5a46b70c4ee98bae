// SPDX-License-Identifier: MPL-2.0
//! Line-oriented demo driving two mounted players against a simulated
//! platform.

use playback_controller::config::{self, Config, SessionSettings};
use playback_controller::domain::media::MediaResource;
use playback_controller::domain::playback::ControlsHideDelay;
use playback_controller::error::{Error, Result};
use playback_controller::player::{
    Command, Envelope, Key, PlatformEvent, Pointer, SessionHost, SessionId, SimulatedPlatform,
    Support,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
playback_controller demo

USAGE:
  playback_controller [OPTIONS] [URL...]

OPTIONS:
  --config <PATH>      Read settings from PATH instead of the user config dir
  --hide-delay <SECS>  Controls auto-hide delay
  --deny-fullscreen    Simulate a platform that refuses fullscreen
  -h, --help           Print this help

COMMANDS (stdin):
  key <name>             Document key press (\" \", k, f, m, c, ArrowLeft, ArrowRight)
  move <n> | click <n>   Pointer over / click on player n
  track <n> <x> <width>  Click on player n's progress track
  volume <n> <v>         Set volume
  rate <n> <r>           Set playback rate
  pip <n>                Toggle picture-in-picture
  time <n> <secs>        Simulate a position report
  end <n>                Simulate end of media
  paused <n>|playing <n> Simulate a pause or play started outside the player
  bind <n> <url>         Bind a new resource
  status                 Print every player
  quit
";

struct Args {
    config: Option<PathBuf>,
    hide_delay: Option<u32>,
    deny_fullscreen: bool,
    urls: Vec<String>,
}

fn parse_args() -> Result<Option<Args>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(None);
    }

    let parsed = Args {
        config: args.opt_value_from_str("--config").map_err(arg_error)?,
        hide_delay: args.opt_value_from_str("--hide-delay").map_err(arg_error)?,
        deny_fullscreen: args.contains("--deny-fullscreen"),
        urls: args
            .finish()
            .into_iter()
            .filter_map(|s| s.into_string().ok())
            .collect(),
    };
    Ok(Some(parsed))
}

fn arg_error(err: pico_args::Error) -> Error {
    Error::InvalidArgument(err.to_string())
}

fn load_settings(args: &Args) -> SessionSettings {
    let loaded = match &args.config {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    };
    let config = loaded.unwrap_or_else(|err| {
        log::warn!("Using default settings: {err}");
        Config::default()
    });

    let mut settings = SessionSettings::from(&config);
    if let Some(secs) = args.hide_delay {
        settings.hide_delay = ControlsHideDelay::new(secs);
    }
    settings
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = parse_args()? else {
        return Ok(());
    };
    let settings = load_settings(&args);
    let fullscreen = if args.deny_fullscreen {
        Support::Denied
    } else {
        Support::Granted
    };

    let mut host = SessionHost::new(settings, |tx| {
        SimulatedPlatform::new()
            .with_fullscreen(fullscreen)
            .auto_acknowledge(tx)
    });

    let mut urls = args.urls.into_iter();
    let players: Vec<SessionId> = [
        urls.next().unwrap_or_else(|| "intro.mp4".to_string()),
        urls.next().unwrap_or_else(|| "talk.webm".to_string()),
    ]
    .into_iter()
    .map(|url| host.mount(MediaResource::video(url)))
    .collect();
    report_notices(host.pump());
    print_status(&host);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            delivered = host.process_next() => {
                match delivered {
                    Some(Ok(())) => print_status(&host),
                    Some(Err(notice)) => println!("notice: {notice}"),
                    None => break,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match run_line(&mut host, &players, line.trim()) {
                    Ok(true) => break,
                    Ok(false) => {
                        report_notices(host.pump());
                        print_status(&host);
                    }
                    Err(err) => println!("error: {err}"),
                }
            }
        }
    }

    for id in players {
        host.unmount(id);
    }
    Ok(())
}

/// Runs one stdin command. Returns true on `quit`.
fn run_line(host: &mut SessionHost, players: &[SessionId], line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(false);
    };

    if verb == "quit" {
        return Ok(true);
    }
    if verb == "status" {
        return Ok(false);
    }
    if verb == "key" {
        // A bare "key " line is the space bar.
        let name = line.strip_prefix("key ").unwrap_or(" ");
        let name = if name.trim().is_empty() { " " } else { name.trim() };
        match host.dispatch_key(Key::from_name(name))? {
            Some(id) => println!("{id} handled {name:?}"),
            None => println!("no player reacted to {name:?}"),
        }
        return Ok(false);
    }

    let id = player(players, words.next())?;
    match verb {
        "move" => host.dispatch_pointer(id, Pointer::Move)?,
        "click" => host.dispatch_pointer(id, Pointer::SurfaceClick)?,
        "track" => {
            let x = number(words.next())?;
            let width = number(words.next())?;
            host.dispatch_pointer(id, Pointer::TrackClick { x, width })?;
        }
        "volume" => host.execute(id, Command::SetVolume(number(words.next())? as f32))?,
        "rate" => host.execute(id, Command::SetPlaybackRate(number(words.next())?))?,
        "pip" => host.execute(id, Command::TogglePictureInPicture)?,
        "bind" => {
            let url = words.next().unwrap_or_default();
            host.execute(id, Command::Bind(MediaResource::video(url)))?;
        }
        "time" => {
            let position_secs = number(words.next())?;
            host.deliver(Envelope::platform(id, PlatformEvent::TimeUpdate { position_secs }))?;
        }
        "end" => host.deliver(Envelope::platform(id, PlatformEvent::Ended))?,
        "paused" => host.deliver(Envelope::platform(id, PlatformEvent::Paused))?,
        "playing" => host.deliver(Envelope::platform(id, PlatformEvent::Playing))?,
        other => return Err(Error::InvalidArgument(format!("unknown command {other:?}"))),
    }
    Ok(false)
}

fn player(players: &[SessionId], word: Option<&str>) -> Result<SessionId> {
    word.and_then(|w| w.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| players.get(index).copied())
        .ok_or_else(|| Error::InvalidArgument(format!("player must be 1..={}", players.len())))
}

fn number(word: Option<&str>) -> Result<f64> {
    word.and_then(|w| w.parse().ok())
        .ok_or_else(|| Error::InvalidArgument("expected a number".to_string()))
}

fn report_notices(notices: Vec<Error>) {
    for notice in notices {
        println!("notice: {notice}");
    }
}

fn print_status(host: &SessionHost) {
    for id in host.ids() {
        let Some(snap) = host.snapshot(id) else {
            continue;
        };
        let mut flags = Vec::new();
        if host.registry().is_active(id) {
            flags.push("active");
        }
        if snap.fullscreen {
            flags.push("fullscreen");
        }
        if snap.picture_in_picture {
            flags.push("pip");
        }
        if snap.muted {
            flags.push("muted");
        }
        if !snap.controls_visible {
            flags.push("controls hidden");
        }
        println!(
            "{id}: {:<7} {} vol {:.2} x{} [{}]{}",
            snap.status.to_string(),
            snap.time_label(),
            snap.volume,
            snap.playback_rate,
            flags.join(", "),
            snap.error_message
                .map(|msg| format!(" error: {msg}"))
                .unwrap_or_default(),
        );
    }
}
