//! Quarter-over-quarter growth from the financial-data site's income table.
//!
//! The row selection is positional: the first data row is taken as sales and the
//! second-to-last row as profit, with the period labels read from the header row.

use crate::domain::outcome::GrowthOutcome;
use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};

const SALES_MARKER: &str = "Sales";
const PROFIT_MARKER: &str = "Profit before tax";

pub fn growth_from_html(html: &str) -> GrowthOutcome {
    match extract_growth(html) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(error = %err, "income table parse failed");
            GrowthOutcome::Unavailable
        }
    }
}

fn extract_growth(html: &str) -> Result<GrowthOutcome> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table")?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;
    let th_sel = selector("th")?;

    let Some(table) = doc.select(&table_sel).find(|t| {
        let text: String = t.text().collect();
        text.contains(SALES_MARKER) && text.contains(PROFIT_MARKER)
    }) else {
        return Ok(GrowthOutcome::TableMissing);
    };

    let rows: Vec<ElementRef<'_>> = table.select(&tr_sel).collect();
    anyhow::ensure!(rows.len() >= 2, "income table has {} rows", rows.len());

    let sales = cell_texts(rows[1], &td_sel);
    let profits = cell_texts(rows[rows.len() - 2], &td_sel);
    if sales.len() < 2 || profits.len() < 2 {
        return Ok(GrowthOutcome::InsufficientData);
    }

    let periods: Vec<String> = cell_texts(rows[0], &th_sel).into_iter().skip(1).collect();

    let (s0, s1) = last_two(&sales).context("sales row")?;
    let (p0, p1) = last_two(&profits).context("profit row")?;
    let period = periods.last().context("income table has no period headers")?;

    Ok(GrowthOutcome::Figures {
        revenue: format_growth(s0, s1, period)?,
        profit: format_growth(p0, p1, period)?,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css:?}: {e:?}"))
}

fn cell_texts(row: ElementRef<'_>, sel: &Selector) -> Vec<String> {
    row.select(sel)
        .map(|c| c.text().collect::<String>().trim().replace(',', ""))
        .collect()
}

fn last_two(cells: &[String]) -> Result<(f64, f64)> {
    let n = cells.len();
    let previous = parse_cell(&cells[n - 2])?;
    let latest = parse_cell(&cells[n - 1])?;
    Ok((previous, latest))
}

fn parse_cell(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .with_context(|| format!("not a number: {s:?}"))
}

pub fn qoq_change(previous: f64, latest: f64) -> Result<f64> {
    anyhow::ensure!(previous != 0.0, "previous period is zero");
    Ok((latest - previous) / previous * 100.0)
}

/// `"+20.0% QoQ (Jun 2024)"`.
pub fn format_growth(previous: f64, latest: f64, period: &str) -> Result<String> {
    Ok(format!("{:+.1}% QoQ ({period})", qoq_change(previous, latest)?))
}
