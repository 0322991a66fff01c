//! Process-wide rendering statistics.
//!
//! Worker threads report through a lock-free channel; aggregation into the
//! named counters happens lazily when the totals are read.
use std::io::{self, Write};
use crossbeam_channel::{unbounded, Receiver, Sender};
use hashbrown::HashMap;
use parking_lot::Mutex;

pub struct StatsAccumulator {
    s_percentage: Sender<(&'static str, u64, u64)>,
    r_percentage: Receiver<(&'static str, u64, u64)>,
    percentages: Mutex<HashMap<&'static str, (u64, u64)>>
}

lazy_static! {
    static ref INSTANCE: StatsAccumulator = StatsAccumulator::new();
}

impl StatsAccumulator {
    fn new() -> StatsAccumulator {
        let (s_percentage, r_percentage) = unbounded();
        StatsAccumulator{
            s_percentage,
            r_percentage,
            percentages: Mutex::new(HashMap::new())
        }
    }

    /// Returns the singleton instance of the StatsAccumulator.
    pub fn instance() -> &'static StatsAccumulator {
        &INSTANCE
    }

    /// Record `num` out of `denom` events for a named percentage counter.
    pub fn report_percentage(&self, name: &'static str, num: u64, denom: u64) {
        let _ = self.s_percentage.send((name, num, denom));
    }

    /// Drain pending reports into the aggregated counters.
    pub fn accumulate(&self) {
        let mut percentages = self.percentages.lock();
        while let Ok((name, num, denom)) = self.r_percentage.try_recv() {
            let entry = percentages.entry(name).or_insert((0, 0));
            entry.0 += num;
            entry.1 += denom;
        }
    }

    /// The aggregated (numerator, denominator) pair for a counter, if any
    /// reports have arrived for it.
    pub fn percentage(&self, name: &'static str) -> Option<(u64, u64)> {
        self.accumulate();
        self.percentages.lock().get(name).copied()
    }

    /// Pretty-print every counter, grouped by the `category/title` naming
    /// convention.
    pub fn print<W: Write>(&self, dest: &mut W) -> io::Result<()> {
        self.accumulate();
        let percentages = self.percentages.lock();
        let mut names: Vec<&&'static str> = percentages.keys().collect();
        names.sort();
        for name in names {
            let (num, denom) = percentages[*name];
            if denom == 0 {
                continue;
            }
            let (category, title) = split_category(name);
            writeln!(dest, "  {}", category)?;
            writeln!(dest, "    {:<42}{:12} {:12} ({:.2}%)",
                title, num, denom, num as f64 * 100.0 / denom as f64)?;
        }
        Ok(())
    }
}

fn split_category(s: &str) -> (&str, &str) {
    match s.find('/') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => ("", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_accumulate_across_threads() {
        let stats = StatsAccumulator::instance();
        let threads: Vec<_> = (0..4).map(|_| {
            std::thread::spawn(|| {
                for _ in 0..100 {
                    StatsAccumulator::instance().report_percentage("Test/Events", 1, 2);
                }
            })
        }).collect();
        for t in threads {
            t.join().unwrap();
        }
        let (num, denom) = stats.percentage("Test/Events").unwrap();
        assert!(num >= 400 && denom >= 800);
        assert_eq!(denom, num * 2);

        let mut out = Vec::new();
        stats.print(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Events"));
    }
}
