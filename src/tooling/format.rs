//! Text rendering of packs, trees and export reports.

use crate::exporter::{BuildReport, FileFailure, RevertReport};
use crate::store::StoredPack;
use crate::tree::NodeView;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Table of stored packs.
pub fn format_pack_list_text(packs: &[StoredPack]) -> String {
    if packs.is_empty() {
        return "No packs.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Pack", "Files", "Built to"]);
    for pack in packs {
        table.add_row(vec![
            pack.name.clone(),
            pack.document.entries.len().to_string(),
            pack.document
                .built_to
                .clone()
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    format!("{}\n\n{}", format_section_heading("Packs"), table)
}

/// Indented tree drawing of a pack.
pub fn format_tree_text(pack_name: &str, view: &NodeView, show_ids: bool) -> String {
    let mut out = format!(
        "{} ({} files)\n",
        format_section_heading(pack_name),
        view.leaf_count()
    );
    let count = view.children.len();
    for (i, child) in view.children.iter().enumerate() {
        render_node(&mut out, child, "", i + 1 == count, show_ids);
    }
    out.trim_end().to_string()
}

fn render_node(out: &mut String, node: &NodeView, prefix: &str, last: bool, show_ids: bool) {
    let branch = if last { "└── " } else { "├── " };
    out.push_str(prefix);
    out.push_str(branch);
    out.push_str(&node.name);
    match &node.asset {
        Some(asset) => out.push_str(&format!("  [{}]", asset.short())),
        None => out.push('/'),
    }
    if show_ids {
        out.push_str(&format!("  #{}", node.id));
    }
    out.push('\n');

    let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == count, show_ids);
    }
}

fn format_failures(out: &mut String, failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["File", "Error"]);
    for failure in failures {
        table.add_row(vec![failure.path.clone(), failure.message.clone()]);
    }
    out.push_str(&format!(
        "\n\n{}\n\n{}",
        format_section_heading("Failures"),
        table
    ));
}

pub fn format_build_report_text(pack_name: &str, report: &BuildReport) -> String {
    let mut out = format!(
        "Built pack {} into {}: {}/{} files moved",
        pack_name, report.destination, report.moved, report.total
    );
    format_failures(&mut out, &report.failures);
    out
}

pub fn format_revert_report_text(pack_name: &str, report: &RevertReport) -> String {
    let mut out = format!(
        "Reverted pack {}: {}/{} files restored",
        pack_name, report.restored, report.total
    );
    if let Some(destination) = &report.destination {
        out.push_str(&format!(", removed {}", destination));
    }
    format_failures(&mut out, &report.failures);
    out
}
