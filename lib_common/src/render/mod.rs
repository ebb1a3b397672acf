//! Fixed-width table output, matching how the leader's UI presents
//! system events. Purely presentational; all policy lives upstream.

use std::io::{self, Write};

use crate::alerts::record::EventRecord;

const BORDER: &str = "+-------+------------+-----------------------------+--------+---------+---------------------------+---------------------------+-------------+";
const HEADING: &str = "|  ID   | Importance |            Alert            |  User  | Version |        Start_Time         |         End_Time          | Annotations |";

/// Fixed label for the alert column; system events are always
/// configuration updates in this listing.
const EVENT_LABEL: &str = "System Configuration Update";

/// Rendered in the end-time column while an alert is still ongoing.
const ONGOING_SENTINEL: &str = "Ongoing";

/// Writes the eight-column event table to any `Write` sink.
pub struct TableRenderer<W> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BORDER)?;
        writeln!(self.out, "{}", HEADING)?;
        writeln!(self.out, "{}", BORDER)
    }

    pub fn footer(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", BORDER)
    }

    /// Append one record row with its resolved annotation text.
    pub fn row(&mut self, record: &EventRecord, annotation: &str) -> io::Result<()> {
        let stop_time = record.stop_time.as_deref().unwrap_or(ONGOING_SENTINEL);
        writeln!(
            self.out,
            "| {:<5} | {:<10} | {:<27} | {:<6} | {:<7} | {:<25} | {:<25} | {:<11} |",
            record.id,
            record.importance.label(),
            EVENT_LABEL,
            record.username,
            record.version,
            record.start_time,
            stop_time,
            annotation
        )
    }
}
