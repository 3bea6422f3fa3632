use crate::core::gap::{ManeuverClass, Outcome};
use anyhow::Context;
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::Path;

/// SimulationResult contains the cumulative race times of both cars and the resulting gap for
/// every simulated lap.
///
/// * `lap_idxs` - Lap numbers of the simulated laps
/// * `racetimes_me` - (s) Cumulative race time of our car, offset by the initial gap
/// * `racetimes_opp` - (s) Cumulative race time of the opponent
/// * `gap_history` - (s) racetimes_opp - racetimes_me, positive if we are ahead
/// * `catch_lap` - First lap on which we are ahead (only set for an overtake)
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SimulationResult {
    pub lap_idxs: Vec<u32>,
    pub racetimes_me: Vec<f64>,
    pub racetimes_opp: Vec<f64>,
    pub gap_history: Vec<f64>,
    pub outcome: Outcome,
    pub catch_lap: Option<u32>,
    pub maneuver: ManeuverClass,
}

#[derive(Debug, Serialize)]
struct GapRow {
    lap: u32,
    me: f64,
    opponent: f64,
    gap: f64,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.gap_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gap_history.is_empty()
    }

    pub fn final_gap(&self) -> Option<f64> {
        self.gap_history.last().copied()
    }

    fn rows(&self) -> impl Iterator<Item = GapRow> + '_ {
        self.lap_idxs
            .iter()
            .zip(self.racetimes_me.iter())
            .zip(self.racetimes_opp.iter())
            .zip(self.gap_history.iter())
            .map(|(((&lap, &me), &opponent), &gap)| GapRow {
                lap,
                me,
                opponent,
                gap,
            })
    }

    /// summary returns the one-line verdict: outcome, final gap, catch lap and maneuver class.
    pub fn summary(&self) -> String {
        let final_gap = self.final_gap().unwrap_or(0.0);
        let catch_lap = match self.catch_lap {
            Some(lap) => lap.to_string(),
            None => "N/A".to_owned(),
        };
        format!(
            "{} | final gap {:.2}s ({:+.2}s) | catch lap {} | {}",
            self.outcome,
            final_gap.abs(),
            final_gap,
            catch_lap,
            self.maneuver
        )
    }

    /// fmt_gap_table returns the per-lap table of cumulative race times and gaps.
    pub fn fmt_gap_table(&self) -> Result<String, fmt::Error> {
        let mut content = String::new();
        writeln!(&mut content, "lap, {:>10}, {:>10}, {:>9}", "me", "opponent", "gap")?;
        for row in self.rows() {
            writeln!(
                &mut content,
                "{:3}, {:9.3}s, {:9.3}s, {:8.3}s",
                row.lap, row.me, row.opponent, row.gap
            )?;
        }
        Ok(content)
    }

    /// print_gap_table prints the gap history and the verdict to the console output.
    pub fn print_gap_table(&self) -> anyhow::Result<()> {
        let table = self.fmt_gap_table()?;
        println!("RESULT: Gap history (positive = ahead)");
        print!("{}", table);
        println!("RESULT: {}", self.summary());
        Ok(())
    }

    /// write_csv writes the gap history with the columns lap, me, opponent, gap.
    pub fn write_csv(&self, filepath: &Path) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(filepath).context(format!(
            "Failed to create result file {}!",
            filepath.display()
        ))?;
        for row in self.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
