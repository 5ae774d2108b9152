// src/output.rs
//! CSV export for external plotting tools

use crate::error::SimResult;
use crate::mc::EnsembleSummary;
use crate::models::PricePath;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `day,price,event`; `event` is 1 on the configured event day.
pub fn write_path_csv<W: Write>(mut writer: W, path: &PricePath) -> SimResult<()> {
    writeln!(writer, "day,price,event")?;
    for (day, price) in path.iter().enumerate() {
        let marker = u8::from(path.event_day() == Some(day));
        writeln!(writer, "{},{},{}", day, price, marker)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_path_to_file<P: AsRef<Path>>(filename: P, path: &PricePath) -> SimResult<()> {
    let file = File::create(filename)?;
    write_path_csv(BufWriter::new(file), path)
}

/// Writes one row per day with whichever summary columns were computed.
pub fn write_ensemble_summary_csv<W: Write>(
    mut writer: W,
    summary: &EnsembleSummary,
    days: usize,
    event_day: Option<usize>,
) -> SimResult<()> {
    let mut header = vec!["day".to_string()];
    if summary.mean.is_some() {
        header.push("mean".to_string());
    }
    if summary.std_dev.is_some() {
        header.push("std_dev".to_string());
    }
    if let Some(bands) = &summary.quantile_bands {
        header.extend(bands.iter().map(|b| format!("q{}", b.quantile)));
    }
    header.push("event".to_string());
    writeln!(writer, "{}", header.join(","))?;

    for day in 0..=days {
        let mut row = vec![day.to_string()];
        if let Some(mean) = &summary.mean {
            row.push(mean[day].to_string());
        }
        if let Some(std_dev) = &summary.std_dev {
            row.push(std_dev[day].to_string());
        }
        if let Some(bands) = &summary.quantile_bands {
            row.extend(bands.iter().map(|b| b.values[day].to_string()));
        }
        row.push(u8::from(event_day == Some(day)).to_string());
        writeln!(writer, "{}", row.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, String)]) -> SimResult<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    file.flush()?;
    Ok(())
}
