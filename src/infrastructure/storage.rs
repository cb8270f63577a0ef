use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::court::CourtType;

pub fn ensure_pdf_dir(pdf_dir: &Path) -> std::io::Result<PathBuf> {
    ensure_dir(pdf_dir)?;
    Ok(pdf_dir.to_path_buf())
}

pub fn ensure_parent_dir(file_path: &Path) -> std::io::Result<()> {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

pub fn pdf_file_name(court: CourtType, date: NaiveDate) -> String {
    format!("cause_list_{}_{}.pdf", court.slug(), date.format("%Y%m%d"))
}

/// Writes the PDF, replacing any earlier file for the same court and date.
pub fn write_pdf(pdf_dir: &Path, file_name: &str, content: &[u8]) -> std::io::Result<PathBuf> {
    let pdf_dir = ensure_pdf_dir(pdf_dir)?;
    let pdf_path = pdf_dir.join(file_name);
    fs::write(&pdf_path, content)?;
    Ok(pdf_path)
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
