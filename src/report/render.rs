//! Report rendering
//!
//! Plain-text tables with per-compartment sections, or the whole report as
//! JSON or YAML. Tables are sized by character count so wide names line up.

use super::rows::{BucketRow, InstanceRow, LoadBalancerRow, SecurityRuleRow, VolumeRow};
use super::{CategoryReport, CategoryRows, Report};
use crate::inventory::filter::{group_by_scope, ScopedRow};
use crate::inventory::Category;
use anyhow::{Context, Result};
use clap::ValueEnum;
use crossterm::style::{Color, Stylize};
use serde::{Deserialize, Serialize};
use std::io::Write;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Colour lifecycle states and headings (table output only)
    pub color: bool,
}

pub fn heading(category: Category) -> &'static str {
    match category {
        Category::Instances => "Instance Info",
        Category::LoadBalancers => "Load Balancer Info",
        Category::SecurityGroups => "NSG Inbound Rules",
        Category::Volumes => "Volume Info",
        Category::Buckets => "Bucket Info",
    }
}

pub fn empty_marker(category: Category) -> &'static str {
    match category {
        Category::Instances => "(No Instances Matched)",
        Category::LoadBalancers => "(No Load Balancers Matched)",
        Category::SecurityGroups => "(No NSG Matched)",
        Category::Volumes => "(No Volumes Matched)",
        Category::Buckets => "(No Buckets Matched)",
    }
}

pub fn state_color(category: Category, state: &str) -> Option<Color> {
    match (category, state) {
        (Category::Instances, "RUNNING") => Some(Color::Green),
        (Category::Instances, "STOPPED" | "STOPPING") => Some(Color::Yellow),
        (Category::Instances, "STARTING" | "PROVISIONING") => Some(Color::Cyan),
        (Category::Instances, "TERMINATED") => Some(Color::Red),
        (Category::LoadBalancers, "ACTIVE") => Some(Color::Green),
        (Category::LoadBalancers, "PROVISIONING") => Some(Color::Cyan),
        (Category::LoadBalancers, "UPDATING") => Some(Color::Yellow),
        (Category::LoadBalancers, "FAILED" | "TERMINATED") => Some(Color::Red),
        (Category::Volumes, "AVAILABLE") => Some(Color::Green),
        (Category::Volumes, "FAULTY") => Some(Color::Red),
        (Category::Volumes, _) => Some(Color::White),
        _ => None,
    }
}

/// A table cell with an optional foreground colour
struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: None,
        }
    }

    fn state(category: Category, state: &str) -> Self {
        Self {
            text: state.to_string(),
            color: state_color(category, state),
        }
    }

    fn width(&self) -> usize {
        self.text.chars().count()
    }
}

trait TableRow: ScopedRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<Cell>;
}

impl TableRow for InstanceRow {
    const HEADERS: &'static [&'static str] = &[
        "Compartment",
        "Name",
        "State",
        "Subnet",
        "NSG",
        "Private IP",
        "Public IP",
        "Shape",
        "vCPUs",
        "Memory (GB)",
        "Boot Volume",
        "Block Volumes",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::plain(&self.compartment),
            Cell::plain(&self.name),
            Cell::state(Category::Instances, &self.state),
            Cell::plain(&self.subnet),
            Cell::plain(&self.nsg),
            Cell::plain(&self.private_ip),
            Cell::plain(&self.public_ip),
            Cell::plain(&self.shape),
            Cell::plain(&self.vcpus),
            Cell::plain(&self.memory_gb),
            Cell::plain(&self.boot_volume),
            Cell::plain(&self.block_volumes),
        ]
    }
}

impl TableRow for LoadBalancerRow {
    const HEADERS: &'static [&'static str] = &[
        "Compartment",
        "Name",
        "State",
        "IP Addresses",
        "Shape",
        "Type",
        "Backend Set",
        "Backend",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::plain(&self.compartment),
            Cell::plain(&self.name),
            Cell::state(Category::LoadBalancers, &self.state),
            Cell::plain(&self.ip_addresses),
            Cell::plain(&self.shape),
            Cell::plain(&self.lb_type),
            Cell::plain(&self.backend_set),
            Cell::plain(&self.backend_target),
        ]
    }
}

impl TableRow for SecurityRuleRow {
    const HEADERS: &'static [&'static str] = &[
        "Compartment",
        "NSG",
        "Description",
        "Protocol",
        "Port Range",
        "Source",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::plain(&self.compartment),
            Cell::plain(&self.nsg),
            Cell::plain(&self.description),
            Cell::plain(&self.protocol),
            Cell::plain(&self.port_range),
            Cell::plain(&self.source),
        ]
    }
}

impl TableRow for VolumeRow {
    const HEADERS: &'static [&'static str] = &[
        "Compartment",
        "Name",
        "Kind",
        "State",
        "Size",
        "Availability Domain",
        "Attached Instance",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::plain(&self.compartment),
            Cell::plain(&self.name),
            Cell::plain(&self.kind),
            Cell::state(Category::Volumes, &self.state),
            Cell::plain(&self.size),
            Cell::plain(&self.availability_domain),
            Cell::plain(&self.attached_instance),
        ]
    }
}

impl TableRow for BucketRow {
    const HEADERS: &'static [&'static str] = &[
        "Compartment",
        "Name",
        "Public Access",
        "Storage Tier",
        "Objects",
        "Size",
    ];

    fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::plain(&self.compartment),
            Cell::plain(&self.name),
            Cell::plain(&self.public_access),
            Cell::plain(&self.storage_tier),
            Cell::plain(&self.object_count.to_string()),
            Cell::plain(&self.size),
        ]
    }
}

/// Write the report in the requested format
pub fn render_report<W: Write>(report: &Report, out: &mut W, options: &RenderOptions) -> Result<()> {
    match options.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report).context("Failed to write JSON")?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut *out, report).context("Failed to write YAML")?;
        }
        OutputFormat::Table => {
            for (i, section) in report.categories.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                render_category(section, out, options.color)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn render_category<W: Write>(section: &CategoryReport, out: &mut W, color: bool) -> Result<()> {
    let title = heading(section.category);
    if color {
        writeln!(out, "{}", title.bold().underlined())?;
    } else {
        writeln!(out, "{}", title)?;
    }

    if let Some(error) = &section.error {
        if color {
            writeln!(out, "{}", error.as_str().red())?;
        } else {
            writeln!(out, "{}", error)?;
        }
        return Ok(());
    }

    if section.rows.is_empty() {
        writeln!(out, "{}", empty_marker(section.category))?;
        return Ok(());
    }

    match &section.rows {
        CategoryRows::Instances(rows) => write_table(out, rows, color),
        CategoryRows::LoadBalancers(rows) => write_table(out, rows, color),
        CategoryRows::SecurityRules(rows) => write_table(out, rows, color),
        CategoryRows::Volumes(rows) => write_table(out, rows, color),
        CategoryRows::Buckets(rows) => write_table(out, rows, color),
    }
}

/// Header, rule, then one section per compartment separated by a light rule
fn write_table<R: TableRow, W: Write>(out: &mut W, rows: &[R], color: bool) -> Result<()> {
    let mut widths: Vec<usize> = R::HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.width());
        }
    }
    let total = widths.iter().sum::<usize>() + COLUMN_GAP.len() * widths.len().saturating_sub(1);

    let headers: Vec<Cell> = R::HEADERS.iter().map(|h| Cell::plain(h)).collect();
    write_line(out, &headers, &widths, false)?;
    writeln!(out, "{}", "=".repeat(total))?;

    for (i, group) in group_by_scope(rows).iter().enumerate() {
        if i > 0 {
            writeln!(out, "{}", "-".repeat(total))?;
        }
        for row in group.rows {
            write_line(out, &row.cells(), &widths, color)?;
        }
    }
    Ok(())
}

fn write_line<W: Write>(out: &mut W, cells: &[Cell], widths: &[usize], color: bool) -> Result<()> {
    let mut line = String::new();
    let last = cells.len().saturating_sub(1);

    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_GAP);
        }
        match cell.color {
            Some(fg) if color => line.push_str(&cell.text.as_str().with(fg).to_string()),
            _ => line.push_str(&cell.text),
        }
        if i < last {
            line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
        }
    }

    writeln!(out, "{}", line)?;
    Ok(())
}
