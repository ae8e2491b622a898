// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Plain text tables for the command line.

use crate::chord::ChordTone;
use crate::comma::{CommaAnalysis, DegreeDeviation, IntervalInstance};
use crate::fretboard::FretComparison;
use crate::harmonics::Harmonic;
use crate::note::CHROMATIC_NAMES;
use crate::pitch::ScaleRow;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Align {
    Left,
    Right,
}

/// Column aligned text table with a dashed rule below the header.
#[derive(Debug)]
struct Table {
    columns: Vec<(&'static str, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(columns: &[(&'static str, Align)]) -> Self {
        Table {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self.columns.iter().map(|(h, _)| h.to_string()).collect();
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

        let mut out = String::new();
        for cells in std::iter::once(&header)
            .chain(std::iter::once(&rule))
            .chain(self.rows.iter())
        {
            let line: Vec<String> = cells
                .iter()
                .zip(self.columns.iter())
                .zip(widths.iter())
                .map(|((cell, (_, align)), width)| match align {
                    Align::Left => format!("{:<width$}", cell, width = width),
                    Align::Right => format!("{:>width$}", cell, width = width),
                })
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

/// Degrees of a scale with their frequencies.
pub fn scale_table(rows: &[ScaleRow]) -> String {
    let mut table = Table::new(&[
        ("Step", Align::Right),
        ("Note", Align::Left),
        ("Interval", Align::Left),
        ("Hz", Align::Right),
        ("Cents", Align::Right),
    ]);
    for row in rows {
        table.row(vec![
            row.step.to_string(),
            row.note.to_string(),
            row.interval.to_string(),
            format!("{:.3}", row.frequency),
            format!("{:.1}", row.cents),
        ]);
    }
    table.render()
}

/// Summary of a chain of stacked intervals.
pub fn comma_analysis(analysis: &CommaAnalysis) -> String {
    let lines = [
        ("Root", format!("{:.3} Hz", analysis.root_hz)),
        ("Steps", analysis.steps.to_string()),
        ("Chained", format!("{:.3} Hz", analysis.chained_hz)),
        (
            "Reduced",
            format!(
                "{:.3} Hz after {} halvings",
                analysis.reduced_hz, analysis.reductions
            ),
        ),
        (
            "Closing",
            format!(
                "{:.3} Hz ({} octaves)",
                analysis.closing_hz, analysis.octaves
            ),
        ),
        ("Octave", format!("{:.3} Hz", analysis.octave_target_hz)),
        (
            "Comma",
            format!(
                "{:+.3} Hz, {:+.3} cents",
                analysis.comma_hz, analysis.comma_cents
            ),
        ),
    ];
    let mut out = String::new();
    for (label, value) in lines.iter() {
        out.push_str(&format!("{:<9}{}\n", format!("{}:", label), value));
    }
    out
}

/// Tones of a chord with their distance to equal temperament.
pub fn chord_tones(tones: &[ChordTone]) -> String {
    let mut table = Table::new(&[
        ("Note", Align::Left),
        ("Interval", Align::Left),
        ("Hz", Align::Right),
        ("vs equal", Align::Right),
    ]);
    for tone in tones {
        table.row(vec![
            tone.note.map_or_else(|| "-".to_string(), |n| n.to_string()),
            tone.interval.to_string(),
            format!("{:.3}", tone.frequency),
            format!("{:+.2}", tone.cents_from_equal),
        ]);
    }
    table.render()
}

/// Degree by degree difference between two systems.
pub fn deviation_table(rows: &[DegreeDeviation], name: &str, reference: &str) -> String {
    let mut table = Table::new(&[
        ("Degree", Align::Right),
        ("Note", Align::Left),
        ("Ratio", Align::Right),
        ("Reference", Align::Right),
        ("Cents", Align::Right),
    ]);
    for row in rows {
        table.row(vec![
            row.degree.to_string(),
            CHROMATIC_NAMES[row.degree as usize % 12].to_string(),
            format!("{:.6}", row.ratio),
            format!("{:.6}", row.reference_ratio),
            format!("{:+.2}", row.cents),
        ]);
    }
    format!("{} against {}\n{}", name, reference, table.render())
}

/// Fret positions of two systems next to each other.
pub fn fret_comparison(rows: &[FretComparison], name_a: &str, name_b: &str) -> String {
    let mut table = Table::new(&[
        ("Fret", Align::Right),
        ("Note", Align::Left),
        ("A (mm)", Align::Right),
        ("B (mm)", Align::Right),
        ("A - B (mm)", Align::Right),
    ]);
    for row in rows {
        table.row(vec![
            row.degree.to_string(),
            row.name.to_string(),
            format!("{:.2}", row.position_a),
            format!("{:.2}", row.position_b),
            format!("{:+.2}", row.difference),
        ]);
    }
    format!("A: {}\nB: {}\n{}", name_a, name_b, table.render())
}

/// Members of a harmonic series.
pub fn harmonic_series(series: &[Harmonic]) -> String {
    let mut table = Table::new(&[
        ("N", Align::Right),
        ("Hz", Align::Right),
        ("Amplitude", Align::Right),
        ("Nearest interval", Align::Left),
        ("Cents", Align::Right),
    ]);
    for harmonic in series {
        table.row(vec![
            harmonic.order.to_string(),
            format!("{:.2}", harmonic.frequency),
            format!("{:.3}", harmonic.amplitude),
            harmonic.interval.to_string(),
            format!("{:+.2}", harmonic.cents_deviation),
        ]);
    }
    table.render()
}

/// All instances of an interval, marking the wolf if there is one.
pub fn interval_cycle(instances: &[IntervalInstance], wolf: Option<&IntervalInstance>) -> String {
    let mut table = Table::new(&[
        ("From", Align::Left),
        ("To", Align::Left),
        ("Ratio", Align::Right),
        ("Cents", Align::Right),
        ("", Align::Left),
    ]);
    for instance in instances {
        let is_wolf = wolf.map_or(false, |w| w.from_degree == instance.from_degree);
        table.row(vec![
            CHROMATIC_NAMES[instance.from_degree as usize % 12].to_string(),
            CHROMATIC_NAMES[instance.to_degree as usize % 12].to_string(),
            format!("{:.6}", instance.ratio),
            format!("{:+.2}", instance.deviation_cents),
            if is_wolf { "wolf".to_string() } else { String::new() },
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comma;
    use crate::note::Note;
    use crate::pitch;
    use crate::tuning::TuningSystem;
    use expect_test::{expect, Expect};

    fn check(actual: String, expected: Expect) {
        expected.assert_eq(&actual);
    }

    #[test]
    fn just_scale_from_100_hz() {
        let rows =
            pitch::scale_table(Note::from_midi(60), 100.0, TuningSystem::JustIntonation, 1)
                .unwrap();
        check(
            scale_table(&rows),
            expect![[r#"
                Step  Note  Interval             Hz   Cents
                ----  ----  --------------  -------  ------
                   0  C4    Unison          100.000     0.0
                   1  C#4   Minor second    106.667   111.7
                   2  D4    Major second    112.500   203.9
                   3  D#4   Minor third     120.000   315.6
                   4  E4    Major third     125.000   386.3
                   5  F4    Perfect fourth  133.333   498.0
                   6  F#4   Tritone         140.625   590.2
                   7  G4    Perfect fifth   150.000   702.0
                   8  G#4   Minor sixth     160.000   813.7
                   9  A4    Major sixth     166.667   884.4
                  10  A#4   Minor seventh   180.000  1017.6
                  11  B4    Major seventh   187.500  1088.3
                  12  C5    Octave          200.000  1200.0
            "#]],
        );
    }

    #[test]
    fn pythagorean_comma_summary() {
        let analysis = comma::analyze_chain(100.0, comma::PURE_FIFTH, 12).unwrap();
        check(
            comma_analysis(&analysis),
            expect![[r#"
                Root:    100.000 Hz
                Steps:   12
                Chained: 12974.634 Hz
                Reduced: 101.364 Hz after 7 halvings
                Closing: 202.729 Hz (7 octaves)
                Octave:  200.000 Hz
                Comma:   +2.729 Hz, +23.460 cents
            "#]],
        );
    }

    #[test]
    fn wolf_is_marked() {
        let fifths = comma::fifths(TuningSystem::Pythagorean).unwrap();
        let wolf = comma::wolf_fifth(TuningSystem::Pythagorean).unwrap();
        let text = interval_cycle(&fifths, wolf.as_ref());
        let marked: Vec<&str> = text.lines().filter(|l| l.ends_with("wolf")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].starts_with("F#    C#"), "{}", marked[0]);
        assert!(marked[0].contains("-23.46"));
    }

    #[test]
    fn no_trailing_whitespace() {
        let series = crate::harmonics::harmonic_series(100.0, 8).unwrap();
        let text = harmonic_series(&series);
        assert_eq!(text.lines().count(), 10);
        assert!(text.lines().all(|l| l == l.trim_end()));
    }
}
