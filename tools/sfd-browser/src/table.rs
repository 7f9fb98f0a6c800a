use std::collections::HashMap;

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use sfd_directory::Server;

const NO_COUNTRY: &str = "-";

fn country<'a>(server: &Server, countries: &'a HashMap<String, String>) -> &'a str {
    countries
        .get(server.address_ipv4())
        .map(String::as_str)
        .unwrap_or(NO_COUNTRY)
}

pub fn server_table(servers: &[Server], countries: &HashMap<String, String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Game Name",
            "Game Mode",
            "Players",
            "Password",
            "Version",
            "Country",
            "Address",
        ]);

    for server in servers {
        table.add_row(vec![
            server.game_name().to_string(),
            server.game_mode_name().to_string(),
            format!("{}/{}", server.players(), server.max_players()),
            if server.has_password() { "Yes" } else { "No" }.to_string(),
            server.version().to_string(),
            country(server, countries).to_string(),
            server.connection_string(),
        ]);
    }

    table
}

pub fn server_details(servers: &[Server], countries: &HashMap<String, String>) -> String {
    let mut out = String::new();

    for (i, server) in servers.iter().enumerate() {
        out.push_str(&format!("Server {}:\n", i + 1));
        out.push_str(&format!("  Game Name: {}\n", server.game_name()));
        out.push_str(&format!("  Game Mode: {}\n", server.game_mode_name()));
        out.push_str(&format!("  IP Address (IPv4): {}\n", server.address_ipv4()));
        out.push_str(&format!("  Port: {}\n", server.port()));
        out.push_str(&format!("  Country: {}\n", country(server, countries)));
        out.push_str(&format!("  Map Name: {}\n", server.map_name()));
        out.push_str(&format!(
            "  Players: {}/{}{}\n",
            server.players(),
            server.max_players(),
            if server.is_full() { " (full)" } else { "" }
        ));
        if server.bots() > 0 {
            out.push_str(&format!("  Bots: {}\n", server.bots()));
        }
        out.push_str(&format!("  Has Password: {}\n", server.has_password()));
        if !server.description().is_empty() {
            out.push_str(&format!("  Description: {}\n", server.description()));
        }
        out.push_str(&format!(
            "  Version: {} ({})\n",
            server.version(),
            server.version_nr()
        ));
        if let Some(instance) = server.application_instance() {
            out.push_str(&format!("  Application Instance: {}\n", instance));
        }
        out.push_str(&format!("{}\n", "-".repeat(50)));
    }

    out
}
