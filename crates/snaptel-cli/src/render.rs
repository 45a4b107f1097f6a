//! Human-readable output for command results

use std::io::{self, Write};

use chrono::{DateTime, Utc};

use snaptel_core::{LoadedPlugin, PluginList, SwapOutcome, UnloadedPlugin};

/// RFC 1123 style timestamp
const TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

pub fn format_time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub fn write_loaded<W: Write>(w: &mut W, plugin: &LoadedPlugin) -> io::Result<()> {
    writeln!(w, "Plugin loaded")?;
    writeln!(w, "Name: {}", plugin.name)?;
    writeln!(w, "Version: {}", plugin.version)?;
    writeln!(w, "Type: {}", plugin.plugin_type)?;
    writeln!(w, "Signed: {}", plugin.signed)?;
    writeln!(w, "Loaded Time: {}", format_time(plugin.loaded_time()))
}

/// One block per loaded plugin, each followed by a blank line
pub fn write_load_result<W: Write>(w: &mut W, plugins: &[LoadedPlugin]) -> io::Result<()> {
    for plugin in plugins {
        write_loaded(w, plugin)?;
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_unloaded<W: Write>(w: &mut W, plugin: &UnloadedPlugin) -> io::Result<()> {
    writeln!(w, "Plugin unloaded")?;
    writeln!(w, "Name: {}", plugin.name)?;
    writeln!(w, "Version: {}", plugin.version)?;
    writeln!(w, "Type: {}", plugin.plugin_type)
}

/// Loaded block, blank line, unloaded block
pub fn write_swap<W: Write>(w: &mut W, outcome: &SwapOutcome) -> io::Result<()> {
    write_loaded(w, &outcome.loaded)?;
    writeln!(w)?;
    write_unloaded(w, &outcome.unloaded)
}

pub fn write_plugin_list<W: Write>(w: &mut W, list: &PluginList, running: bool) -> io::Result<()> {
    if running {
        if list.running_plugins.is_empty() {
            return writeln!(w, "No running plugins found. Have you started a task?");
        }
        let rows: Vec<Vec<String>> = list
            .running_plugins
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.hit_count.to_string(),
                    format_time(p.last_hit()),
                    p.plugin_type.clone(),
                    p.pprof_port.clone(),
                ]
            })
            .collect();
        write_table(
            w,
            &["NAME", "HIT COUNT", "LAST HIT", "TYPE", "PPROF PORT"],
            &rows,
        )
    } else {
        if list.loaded_plugins.is_empty() {
            return writeln!(w, "No plugins found. Have you loaded a plugin?");
        }
        let rows: Vec<Vec<String>> = list
            .loaded_plugins
            .iter()
            .map(|p| {
                vec![
                    p.name.clone(),
                    p.version.to_string(),
                    p.plugin_type.clone(),
                    p.signed.to_string(),
                    p.status.clone(),
                    format_time(p.loaded_time()),
                ]
            })
            .collect();
        write_table(
            w,
            &["NAME", "VERSION", "TYPE", "SIGNED", "STATUS", "LOADED TIME"],
            &rows,
        )
    }
}

/// Left-aligned columns separated by at least one space
fn write_table<W: Write>(w: &mut W, headers: &[&str], rows: &[Vec<String>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let last = row.len().saturating_sub(1);
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$} ", cell, width = widths[i]));
            }
        }
        writeln!(w, "{}", line)?;
    }
    Ok(())
}
