//! `menubot flows` -- print the flow table.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use menubot_core::flow::FlowRegistry;

/// Longest message preview shown in the table.
const PREVIEW_CHARS: usize = 48;

pub fn list_flows(flows: &FlowRegistry, json: bool) -> Result<()> {
    let sorted = flows.sorted();

    if json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    if sorted.is_empty() {
        println!();
        println!("  {} The flow table is empty.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("State").fg(Color::White),
        Cell::new("Options").fg(Color::White),
        Cell::new("Data request").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for flow in &sorted {
        let options = flow
            .options
            .iter()
            .map(|o| format!("{} -> {}", o.code, o.next_state))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(flow.state.as_str()).fg(Color::Cyan),
            Cell::new(options),
            Cell::new(flow.data_request.as_deref().unwrap_or("-")).fg(Color::DarkGrey),
            Cell::new(preview(&flow.message)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} flow{}",
        style(sorted.len()).bold(),
        if sorted.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// First line of `message`, cut to `PREVIEW_CHARS` characters.
fn preview(message: &str) -> String {
    let first = message.lines().next().unwrap_or_default();
    if first.chars().count() > PREVIEW_CHARS {
        let cut: String = first.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        first.to_string()
    }
}
