// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `tuninglab` prints tuning tables and comma analyses, and renders them to sound.

use std::io;
use std::path::PathBuf;

use log::{debug, info};
use snafu::{ResultExt, Snafu};
use structopt::StructOpt;

use tuning_lab::chord::ChordQuality;
use tuning_lab::comma;
use tuning_lab::ear::{self, BeatSpeed};
use tuning_lab::error::TuningError;
use tuning_lab::fretboard;
use tuning_lab::harmonics;
use tuning_lab::note::Note;
use tuning_lab::output::{sox, SoxTarget};
use tuning_lab::pitch;
use tuning_lab::report;
use tuning_lab::synth::{self, SynthesisParams, Timbre, WaveformSpec};
use tuning_lab::tuning::{ConcertPitch, TuningSystem};
use tuning_lab::wave::SampleBuffer;

#[derive(Debug, StructOpt)]
#[structopt(name = "tuninglab", about = "Exploring historical tuning systems by numbers and by ear")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    #[structopt(flatten)]
    audio: AudioOpt,

    #[structopt(subcommand)]
    command: Subcommand,
}

#[derive(Debug, StructOpt)]
struct AudioOpt {
    /// Play the sound of the result.
    #[structopt(long, global = true)]
    play: bool,

    /// Write the sound of the result to a file (any sox-supported format).
    #[structopt(short, long, global = true, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Length of every tone in seconds.
    #[structopt(long, global = true, default_value = "2.0")]
    duration: f64,

    #[structopt(long, global = true, default_value = "44100")]
    sample_rate: u32,

    /// One of pure, piano, organ, flute, clarinet, violin, bell, electric-piano, soft-string.
    #[structopt(long, global = true, default_value = "pure")]
    timbre: Timbre,
}

impl AudioOpt {
    fn wanted(&self) -> bool {
        self.play || self.output.is_some()
    }

    fn params(&self) -> SynthesisParams {
        SynthesisParams {
            duration_s: self.duration,
            sample_rate: self.sample_rate,
            spec: self.timbre.spec(),
        }
    }
}

#[derive(Debug, StructOpt)]
enum Subcommand {
    /// List the degrees of a tuning system with their frequencies.
    Scale {
        #[structopt(short, long, default_value = "just")]
        system: TuningSystem,
        #[structopt(short, long, default_value = "C4")]
        tonic: Note,
        /// Frequency of the tonic, defaults to its pitch relative to A4 = 440 Hz.
        #[structopt(short, long)]
        root: Option<f64>,
        #[structopt(long, default_value = "1")]
        octaves: u32,
    },
    /// Stack fifths and measure how far they miss the octave.
    Comma {
        #[structopt(short, long, default_value = "100")]
        root: f64,
        #[structopt(long, default_value = "12")]
        steps: u32,
        /// Stack tempered fifths instead of pure 3:2 fifths.
        #[structopt(long)]
        tempered: bool,
    },
    /// Build a chord and compare its tones with equal temperament.
    Chord {
        #[structopt(short, long, default_value = "major")]
        quality: ChordQuality,
        #[structopt(short, long, default_value = "just")]
        system: TuningSystem,
        #[structopt(short, long, default_value = "C4")]
        tonic: Note,
        #[structopt(short, long)]
        root: Option<f64>,
    },
    /// Compare every degree of one system with another.
    Compare {
        #[structopt(default_value = "equal")]
        system: TuningSystem,
        #[structopt(default_value = "just")]
        reference: TuningSystem,
        #[structopt(short, long, default_value = "C4")]
        tonic: Note,
    },
    /// Fret positions of two systems on a string of the given length.
    Fretboard {
        #[structopt(short = "l", long, default_value = "650")]
        scale_length: f64,
        #[structopt(default_value = "equal")]
        a: TuningSystem,
        #[structopt(default_value = "just")]
        b: TuningSystem,
    },
    /// The harmonic series of a fundamental.
    Harmonics {
        #[structopt(short, long, default_value = "110")]
        fundamental: f64,
        #[structopt(short, long, default_value = "16")]
        count: u32,
    },
    /// The cycle of fifths of a system and its wolf fifth.
    Wolf {
        #[structopt(default_value = "pythagorean")]
        system: TuningSystem,
        #[structopt(short, long, default_value = "C4")]
        tonic: Note,
    },
    /// Grade a guess against a target pitch and let both sound together.
    Ear {
        /// Frequency of the target in Hz.
        target: f64,
        /// Frequency of the guess in Hz.
        guess: f64,
        #[structopt(long, default_value = "flute")]
        target_timbre: Timbre,
        #[structopt(long, default_value = "flute")]
        guess_timbre: Timbre,
    },
    /// Beating at one of the practice rates: 1, 2, 4 or 8 Hz.
    Beats {
        #[structopt(default_value = "1")]
        speed: BeatSpeed,
    },
}

#[derive(Debug, Snafu)]
enum CliError {
    #[snafu(display("{}", source))]
    Compute { source: TuningError },
    #[snafu(display("Audio output failed: {}", source))]
    Audio { source: io::Error },
    #[snafu(display("Could not set up logging: {}", source))]
    Logging { source: log::SetLoggerError },
}

fn root_or_concert_pitch(root: Option<f64>, tonic: Note) -> f64 {
    root.unwrap_or_else(|| ConcertPitch::default().frequency(tonic))
}

/// Render the sound only when it is going to be heard or stored.
fn emit<F>(audio: &AudioOpt, render: F) -> Result<(), CliError>
where
    F: FnOnce(&SynthesisParams) -> Result<SampleBuffer, TuningError>,
{
    if !audio.wanted() {
        return Ok(());
    }
    let buffer = match prepare(render(&audio.params()).context(Compute)?) {
        Some(buffer) => buffer,
        None => {
            info!("nothing to render");
            return Ok(());
        }
    };
    if let Some(path) = &audio.output {
        sox::output(&buffer, SoxTarget::File(path)).context(Audio)?;
    }
    if audio.play {
        sox::output(&buffer, SoxTarget::Play).context(Audio)?;
    }
    Ok(())
}

/// Scale a rendered buffer for output, or `None` if there is no audio at all.
fn prepare(buffer: SampleBuffer) -> Option<SampleBuffer> {
    debug!(
        "rendered {} samples at {} Hz",
        buffer.len(),
        buffer.sample_rate()
    );
    if buffer.is_empty() {
        return None;
    }
    // leave some headroom for the output format
    Some(buffer.scaled(0.8))
}

fn run(opt: Opt) -> Result<(), CliError> {
    let audio = &opt.audio;
    match opt.command {
        Subcommand::Scale {
            system,
            tonic,
            root,
            octaves,
        } => {
            let root = root_or_concert_pitch(root, tonic);
            info!("{} scale on {} ({:.3} Hz)", system, tonic, root);
            let rows = pitch::scale_table(tonic, root, system, octaves).context(Compute)?;
            print!("{}", report::scale_table(&rows));
            let frequencies: Vec<f64> = rows.iter().map(|row| row.frequency).collect();
            emit(audio, |params| {
                synth::synthesize_sequence(&frequencies, params, 0.1)
            })
        }
        Subcommand::Comma {
            root,
            steps,
            tempered,
        } => {
            let fifth = if tempered {
                comma::tempered_fifth()
            } else {
                comma::PURE_FIFTH
            };
            let analysis = comma::analyze_chain(root, fifth, steps).context(Compute)?;
            print!("{}", report::comma_analysis(&analysis));
            emit(audio, |params| {
                let targets = [analysis.octave_target_hz, analysis.closing_hz];
                let apart = synth::synthesize_sequence(&targets, params, 0.2)?;
                let together = params.render(&targets)?;
                Ok(SampleBuffer::concat(
                    params.sample_rate,
                    &[apart, together],
                    (0.2 * params.sample_rate as f64) as usize,
                ))
            })
        }
        Subcommand::Chord {
            quality,
            system,
            tonic,
            root,
        } => {
            let root = root_or_concert_pitch(root, tonic);
            let chord = quality.chord();
            let tones = chord.tones(tonic, root, system).context(Compute)?;
            println!("{} {} chord in {}", tonic, quality, system);
            print!("{}", report::chord_tones(&tones));
            emit(audio, |params| {
                let tuned = chord.frequencies(root, system)?;
                let tempered = chord.frequencies(root, TuningSystem::EqualTemperament)?;
                let gap = params.sample_rate as usize / 5;
                Ok(SampleBuffer::concat(
                    params.sample_rate,
                    &[params.render(&tuned)?, params.render(&tempered)?],
                    gap,
                ))
            })
        }
        Subcommand::Compare {
            system,
            reference,
            tonic,
        } => {
            let rows = comma::deviation_table(system, reference).context(Compute)?;
            print!(
                "{}",
                report::deviation_table(&rows, system.name(), reference.name())
            );
            let root = ConcertPitch::default().frequency(tonic);
            emit(audio, |params| {
                let scale = |system| -> Result<Vec<f64>, TuningError> {
                    (0..=12)
                        .map(|degree| pitch::frequency(root, degree, 0, system))
                        .collect()
                };
                let gap = params.sample_rate as usize / 2;
                Ok(SampleBuffer::concat(
                    params.sample_rate,
                    &[
                        synth::synthesize_sequence(&scale(system)?, params, 0.05)?,
                        synth::synthesize_sequence(&scale(reference)?, params, 0.05)?,
                    ],
                    gap,
                ))
            })
        }
        Subcommand::Fretboard { scale_length, a, b } => {
            let rows = fretboard::compare_frets(scale_length, a, b).context(Compute)?;
            print!("{}", report::fret_comparison(&rows, a.name(), b.name()));
            Ok(())
        }
        Subcommand::Harmonics { fundamental, count } => {
            let series = harmonics::harmonic_series(fundamental, count).context(Compute)?;
            print!("{}", report::harmonic_series(&series));
            emit(audio, |params| {
                let orders: Vec<u32> = (1..=count).collect();
                let spec = WaveformSpec::harmonic_selection(&orders);
                synth::synthesize(
                    &[fundamental],
                    params.duration_s,
                    params.sample_rate,
                    &spec,
                )
            })
        }
        Subcommand::Wolf { system, tonic } => {
            let fifths = comma::fifths(system).context(Compute)?;
            let wolf = comma::wolf_fifth(system).context(Compute)?;
            print!("{}", report::interval_cycle(&fifths, wolf.as_ref()));
            match &wolf {
                Some(w) => println!(
                    "The wolf fifth is {:+.2} cents away from a pure fifth.",
                    w.deviation_cents
                ),
                None => println!("No fifth strays more than {} cents.", comma::WOLF_THRESHOLD_CENTS),
            }
            let instance = match wolf {
                Some(instance) => instance,
                None => {
                    if audio.wanted() {
                        info!("{} has no wolf fifth, nothing to render", system);
                    }
                    return Ok(());
                }
            };
            let root = ConcertPitch::default().frequency(tonic);
            emit(audio, |params| {
                let low = pitch::frequency(root, instance.from_degree, 0, system)?;
                let pure = params.render(&[low, low * comma::PURE_FIFTH])?;
                let howling = params.render(&[low, low * instance.ratio])?;
                Ok(SampleBuffer::concat(
                    params.sample_rate,
                    &[pure, howling],
                    params.sample_rate as usize / 5,
                ))
            })
        }
        Subcommand::Ear {
            target,
            guess,
            target_timbre,
            guess_timbre,
        } => {
            println!(
                "Target {:.3} Hz, guess {:.3} Hz: {:.1} Hz beating, {}",
                target,
                guess,
                ear::beat_frequency(target, guess),
                ear::grade(target, guess)
            );
            emit(audio, |params| {
                ear::render_duet(
                    target,
                    &target_timbre.spec(),
                    guess,
                    &guess_timbre.spec(),
                    params.duration_s,
                    params.sample_rate,
                )
            })
        }
        Subcommand::Beats { speed } => {
            println!(
                "{:.0} Hz against {:.0} Hz beats at {}",
                ear::QUIZ_BASE_HZ,
                ear::QUIZ_BASE_HZ + speed.hz(),
                speed
            );
            emit(audio, |params| {
                ear::render_beat_quiz(speed, params.duration_s, params.sample_rate)
            })
        }
    }
}

fn main() -> Result<(), CliError> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).context(Logging)?;

    run(opt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffers_are_not_sent() {
        assert_eq!(prepare(SampleBuffer::new(0, 44100)), None);
    }

    #[test]
    fn rendered_buffers_keep_headroom() {
        let buffer = SampleBuffer::from_samples(vec![0.0, 1.0, -0.5], 8000);
        let prepared = prepare(buffer).unwrap();
        assert_eq!(prepared.samples(), &[0.0, 0.8, -0.4]);
        assert_eq!(prepared.sample_rate(), 8000);
    }

    #[test]
    fn ear_subcommand_arguments() {
        let opt = Opt::from_iter(&[
            "tuninglab",
            "ear",
            "440",
            "442.5",
            "--guess-timbre",
            "soft-string",
        ]);
        match opt.command {
            Subcommand::Ear {
                target,
                guess,
                target_timbre,
                guess_timbre,
            } => {
                assert_eq!(target, 440.0);
                assert_eq!(guess, 442.5);
                assert_eq!(target_timbre, Timbre::Flute);
                assert_eq!(guess_timbre, Timbre::SoftString);
            }
            other => panic!("unexpected subcommand {:?}", other),
        }
        assert!(!opt.audio.wanted());
    }
}
