//! Charts are rendered to standalone SVG documents.
//!
//! Rendering is pure: every function takes computed data and returns the document text. What
//! happens to the document afterwards is up to a [ChartSink], the binary writes each one into a
//! directory with [DirectorySink].
mod plots;
pub mod svg;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

pub use plots::{render_return_risk_over_time, render_risk_return, render_weight_allocation};

pub const RISK_RETURN: &str = "risk_return";
pub const WEIGHT_ALLOCATION: &str = "weight_allocation";
pub const RETURN_RISK_OVER_TIME: &str = "return_risk_over_time";

/// Receives finished charts.
pub trait ChartSink {
    fn show(&mut self, name: &str, svg: String) -> Result<()>;
}

/// Writes each chart to `<dir>/<name>.svg`, creating the directory on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.svg"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ChartSink for DirectorySink {
    fn show(&mut self, name: &str, svg: String) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("could not create {}", self.dir.display()))?;
        let path = self.path_for(name);
        fs::write(&path, svg).with_context(|| format!("could not write {}", path.display()))?;
        info!("Rendered {name} to {}", path.display());
        Ok(())
    }
}

/// Keeps charts in memory in the order they were shown.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub charts: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self { charts: Vec::new() }
    }

    pub fn names(&self) -> Vec<&str> {
        self.charts.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.charts
            .iter()
            .find(|(chart_name, _)| chart_name == name)
            .map(|(_, svg)| svg.as_str())
    }
}

impl ChartSink for MemorySink {
    fn show(&mut self, name: &str, svg: String) -> Result<()> {
        self.charts.push((name.to_string(), svg));
        Ok(())
    }
}
