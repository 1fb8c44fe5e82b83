// crates/beamsim-cli/src/io/jsonl.rs

use std::io::Write;

use anyhow::Context;

/// One sampled instant of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub t_ms: u64,
    pub position_mm: f64,
    pub angle_deg: f64,
    pub target_mm: Option<f64>,
}

/// Format: {"t_ms":N,"position_mm":X,"angle_deg":Y[,"target_mm":Z]}
pub fn format_sample(s: &Sample) -> String {
    let mut line = format!(
        "{{\"t_ms\":{},\"position_mm\":{:.4},\"angle_deg\":{:.4}",
        s.t_ms, s.position_mm, s.angle_deg
    );
    if let Some(t) = s.target_mm {
        line.push_str(&format!(",\"target_mm\":{t:.4}"));
    }
    line.push('}');
    line
}

pub fn write_samples_file(path: &str, samples: &[Sample]) -> anyhow::Result<()> {
    let mut s = String::new();
    for x in samples {
        s.push_str(&format_sample(x));
        s.push('\n');
    }
    std::fs::write(path, s).with_context(|| format!("write samples jsonl: {path}"))?;
    Ok(())
}

pub fn write_samples_stdout(samples: &[Sample]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for x in samples {
        writeln!(out, "{}", format_sample(x)).context("write samples to stdout")?;
    }
    Ok(())
}
