//! CSV trace of the chain, one row per particle per step plus a row per
//! settle event.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::chain::SpringChain;

pub struct TraceWriter {
    writer: Writer<File>,
    rows:   u64,
}

impl TraceWriter {
    /// Create (or truncate) `path` and write the header row.
    pub fn create(path: &Path) -> csv::Result<Self> {
        let mut writer = Writer::from_path(path)?;
        writer.write_record(["step", "event", "particle", "position", "velocity"])?;
        Ok(Self { writer, rows: 0 })
    }

    pub fn write_state(&mut self, chain: &SpringChain) -> csv::Result<()> {
        let step = chain.steps().to_string();
        for (i, (x, v)) in chain.positions().iter().zip(chain.velocities()).enumerate() {
            self.writer.write_record(&[
                step.clone(),
                "state".to_string(),
                i.to_string(),
                format!("{x:.6}"),
                format!("{v:.6}"),
            ])?;
            self.rows += 1;
        }
        Ok(())
    }

    pub fn write_settle(&mut self, chain: &SpringChain) -> csv::Result<()> {
        let step = chain.steps().to_string();
        self.writer.write_record([step.as_str(), "settle", "", "", ""])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn finish(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
