// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Frequencies of historical tuning systems, the commas between them,
//! and additive synthesis to make the differences audible.

pub mod comma;
pub mod error;
pub mod note;
pub mod pitch;
pub mod synth;
pub mod tuning;
pub mod wave;

// Demo modules built on top of the core
pub mod chord;
pub mod ear;
pub mod fretboard;
pub mod harmonics;
pub mod report;

// Utility modules
pub mod output;
pub mod rational;
