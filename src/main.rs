//! Chordpad - Call-and-response chord pad for ear training

use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use chordpad::chords;
use chordpad::config;
use chordpad::engine::{self, EngineState, VoiceEngine};
use chordpad::ui;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play { config: config_path } => {
            let cfg = config::load_or_default(config_path.as_deref())?;

            let mut engine = VoiceEngine::with_device(&cfg);
            ui::run_ui(&mut engine)?;

            if engine.state() == EngineState::Unavailable {
                println!("No audio output was available; nothing was played.");
            }
            wait_for_tails(&engine);
        }

        Commands::Audition {
            button,
            side,
            hold,
            config: config_path,
        } => {
            let cfg = config::load_or_default(config_path.as_deref())?;

            let Some(pad) = chords::find_button(button) else {
                bail!("No button {} (expected 1-8)", button);
            };
            let chord = pad.chord(side);
            let id = pad.sound_id(side);

            let mut engine = VoiceEngine::with_device(&cfg);
            match engine.unlock_audio() {
                EngineState::Running => {}
                state => bail!("Audio output is not running ({:?})", state),
            }

            println!("Playing {} as '{}': {:?} Hz", chord.name, id, chord.notes);
            engine.start(&id, chord.notes);
            thread::sleep(Duration::from_secs_f64(hold));

            engine.stop(&id);
            println!("Released; ringing out for {:.1}s", cfg.voice.release);
            wait_for_tails(&engine);
        }

        Commands::Devices => {
            println!("Available audio devices:\n");

            match engine::default_device_name() {
                Some(name) => println!("Default output: {}\n", name),
                None => println!("No default output device\n"),
            }

            println!("Output devices:");
            let devices = engine::list_output_devices();
            if devices.is_empty() {
                println!("  (none)");
            }
            for (name, config) in devices {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!(
                        "  Device: {}",
                        cfg.audio.device.as_deref().unwrap_or("(default)")
                    );
                    println!("  Offline sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Master gain: {:.2}", cfg.voice.master_gain);
                    println!("  Attack: {:.0} ms", cfg.voice.attack * 1000.0);
                    println!("  Release: {:.2} s", cfg.voice.release);
                    println!("  Release floor: {}", cfg.voice.release_floor);
                    println!("  Halt margin: {:.0} ms", cfg.voice.halt_margin * 1000.0);
                    println!("  Waveform: {:?}", cfg.voice.waveform);
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../chordpad.example.yaml");

            let path = "chordpad.yaml";
            if std::path::Path::new(path).exists() {
                println!("chordpad.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created chordpad.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

/// Keep the process alive until released voices have rung out
fn wait_for_tails(engine: &VoiceEngine) {
    let Some(graph) = engine.graph() else {
        return;
    };

    let voice = engine.voice_config();
    let Ok(limit) = Duration::try_from_secs_f64(voice.release + voice.halt_margin + 0.5) else {
        return;
    };
    let started = Instant::now();

    while started.elapsed() < limit {
        let remaining = graph
            .lock()
            .map(|mut g| {
                g.reclaim_finished();
                g.voice_count()
            })
            .unwrap_or(0);
        if remaining == 0 {
            break;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
