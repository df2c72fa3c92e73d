use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::league_baseline::BaselineMap;
use crate::match_record::MatchRecord;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const MATCH_HEADERS: &[&str] = &[
    "match_id",
    "league",
    "date",
    "home_team",
    "away_team",
    "home_goals",
    "away_goals",
    "home_shots",
    "away_shots",
    "home_shots_on_target",
    "away_shots_on_target",
    "home_possession",
    "away_possession",
    "home_pass_success",
    "away_pass_success",
    "home_fouls",
    "away_fouls",
    "home_yellow_cards",
    "away_yellow_cards",
    "home_corners",
    "away_corners",
    "home_red_cards",
    "away_red_cards",
];

const BASELINE_HEADERS: &[&str] = &[
    "league",
    "goal_baseline",
    "corner_baseline",
    "yellow_card_baseline",
    "home_advantage",
    "foul_to_yellow",
    "red_card_penalty",
    "sample_size",
];

enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// CSV with a UTF-8 BOM so spreadsheet tools keep non-ASCII team names intact.
pub fn write_csv(path: &Path, matches: &[MatchRecord]) -> Result<usize> {
    ensure_parent(path)?;
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    file.write_all(UTF8_BOM).context("write csv bom")?;
    let mut writer = csv::Writer::from_writer(file);
    for m in matches {
        writer.serialize(m).context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    tracing::info!(path = %path.display(), rows = matches.len(), "exported matches csv");
    Ok(matches.len())
}

pub fn read_csv(path: &Path) -> Result<Vec<MatchRecord>> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
    let mut reader = csv::Reader::from_reader(body);
    let mut out = Vec::new();
    for (idx, row) in reader.deserialize::<MatchRecord>().enumerate() {
        out.push(row.with_context(|| format!("decode csv row {}", idx + 1))?);
    }
    Ok(out)
}

/// Workbook with a `Matches` sheet and, when given, a `Baselines` sheet.
pub fn write_xlsx(path: &Path, matches: &[MatchRecord], baselines: Option<&BaselineMap>) -> Result<usize> {
    ensure_parent(path)?;
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_header(sheet, MATCH_HEADERS)?;
        for (idx, m) in matches.iter().enumerate() {
            write_row(sheet, idx as u32 + 1, &match_cells(m))?;
        }
    }
    if let Some(baselines) = baselines {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Baselines")?;
        write_header(sheet, BASELINE_HEADERS)?;
        for (idx, (league, b)) in baselines.iter().enumerate() {
            let cells = [
                Cell::Text(league),
                Cell::Number(b.goal_baseline),
                Cell::Number(b.corner_baseline),
                Cell::Number(b.yellow_card_baseline),
                Cell::Number(b.home_advantage),
                Cell::Number(b.foul_to_yellow),
                Cell::Number(b.red_card_penalty),
                Cell::Number(b.sample_size as f64),
            ];
            write_row(sheet, idx as u32 + 1, &cells)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = matches.len(), "exported matches workbook");
    Ok(matches.len())
}

fn match_cells(m: &MatchRecord) -> Vec<Cell<'_>> {
    let count = |v: u32| Cell::Number(v as f64);
    vec![
        Cell::Text(&m.match_id),
        Cell::Text(&m.league),
        Cell::Text(&m.date),
        Cell::Text(&m.home_team),
        Cell::Text(&m.away_team),
        count(m.home_goals),
        count(m.away_goals),
        count(m.home_shots),
        count(m.away_shots),
        count(m.home_shots_on_target),
        count(m.away_shots_on_target),
        Cell::Number(m.home_possession),
        Cell::Number(m.away_possession),
        Cell::Number(m.home_pass_success),
        Cell::Number(m.away_pass_success),
        count(m.home_fouls),
        count(m.away_fouls),
        count(m.home_yellow_cards),
        count(m.away_yellow_cards),
        count(m.home_corners),
        count(m.away_corners),
        count(m.home_red_cards),
        count(m.away_red_cards),
    ]
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    for (col_idx, name) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *name)
            .with_context(|| format!("write header ({col_idx})"))?;
    }
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row_idx: u32, cells: &[Cell<'_>]) -> Result<()> {
    for (col_idx, cell) in cells.iter().enumerate() {
        let col = col_idx as u16;
        match cell {
            Cell::Text(value) => worksheet.write_string(row_idx, col, *value),
            Cell::Number(value) => worksheet.write_number(row_idx, col, *value),
        }
        .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    Ok(())
}
