// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Easy interface for getting sound to play using a sox subprocess.

use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use log::{debug, info, warn};

use crate::wave::SampleBuffer;

/// Where sox sends the audio.
#[derive(Debug, Copy, Clone)]
pub enum SoxTarget<'a> {
    /// Play on the default audio device.
    Play,
    /// Write to a file, in any format sox derives from the extension.
    File(&'a Path),
}

/// A running sox process accepting mono `f64` samples on its standard input.
pub struct SoxSink {
    player: Child,
    audio_stream: ChildStdin,
    buffer: Vec<u8>,
}

/// Arguments describing the raw sample stream fed to sox.
fn input_args(sample_rate: u32) -> Vec<String> {
    vec![
        "-R".to_string(), // make the output reproducible
        "--channels".to_string(),
        "1".to_string(),
        "--rate".to_string(),
        sample_rate.to_string(),
        "--type".to_string(),
        "f64".to_string(),
        "/dev/stdin".to_string(),
    ]
}

/// Paths of the `play` and `sox` executables.
fn sox_binaries() -> (PathBuf, PathBuf) {
    // For properly recording the sox dependency on nix:
    if let Some(sox_bin) = option_env!("NIX_SOX_BIN") {
        debug!("using sox from nix store {}", sox_bin);
        (Path::new(sox_bin).join("play"), Path::new(sox_bin).join("sox"))
    } else {
        ("play".into(), "sox".into())
    }
}

impl SoxSink {
    pub fn new(sample_rate: u32, target: SoxTarget) -> io::Result<Self> {
        let (play, sox) = sox_binaries();
        let args = input_args(sample_rate);

        let mut player = match target {
            SoxTarget::Play => Command::new(&play)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()?,
            SoxTarget::File(outfile) => Command::new(&sox)
                .args(&args)
                .arg(outfile)
                .stdin(Stdio::piped())
                .spawn()?,
        };

        let audio_stream = player.stdin.take().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "sox did not open its input")
        })?;

        Ok(Self {
            player,
            audio_stream,
            buffer: Vec::new(),
        })
    }

    /// Send a buffer of samples to sox.
    pub fn write(&mut self, samples: &SampleBuffer) -> io::Result<()> {
        if self.buffer.len() < samples.byte_len() {
            self.buffer.resize(samples.byte_len(), 0);
        }
        let copied = samples.copy_bytes_to(&mut self.buffer);
        self.audio_stream.write_all(&self.buffer[..copied * 8])?;
        self.audio_stream.flush()
    }

    /// Close the stream and wait for sox to finish playing or writing.
    pub fn finish(self) -> io::Result<()> {
        let SoxSink {
            mut player,
            audio_stream,
            ..
        } = self;
        // sox exits once its input is closed
        drop(audio_stream);
        let status = player.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("sox exited with {}", status),
            ))
        }
    }
}

/// Render a whole buffer through a fresh sox process.
pub fn output(samples: &SampleBuffer, target: SoxTarget) -> io::Result<()> {
    match target {
        SoxTarget::Play => info!("playing {:.2} s of audio", samples.duration_s()),
        SoxTarget::File(path) => info!(
            "writing {:.2} s of audio to {}",
            samples.duration_s(),
            path.display()
        ),
    }
    let mut sink = SoxSink::new(samples.sample_rate(), target)?;
    let written = sink.write(samples);
    finish_after(written, || sink.finish())
}

/// Run `finish` whatever the outcome of the write, so sox is always reaped.
/// A failed write is reported over the exit status it causes.
fn finish_after<F>(written: io::Result<()>, finish: F) -> io::Result<()>
where
    F: FnOnce() -> io::Result<()>,
{
    let finished = finish();
    if let Err(err) = &written {
        warn!("sending audio to sox failed: {}", err);
    }
    written.and(finished)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_input_is_mono_f64() {
        let args = input_args(44100);
        assert_eq!(
            args,
            vec!["-R", "--channels", "1", "--rate", "44100", "--type", "f64", "/dev/stdin"]
        );
    }

    #[test]
    fn finishes_after_a_failed_write() {
        let mut finished = false;
        let result = finish_after(
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")),
            || {
                finished = true;
                Err(io::Error::new(io::ErrorKind::Other, "sox exited with 2"))
            },
        );
        assert!(finished);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);

        let result = finish_after(Ok(()), || {
            Err(io::Error::new(io::ErrorKind::Other, "sox exited with 2"))
        });
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::Other);
    }
}
