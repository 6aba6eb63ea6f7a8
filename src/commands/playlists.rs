//! `spindex playlists` -- list all playlists in the user's library

use colored::Colorize;
use prettytable::{row, Table};

use crate::commands::api_client;
use crate::config::Config;
use crate::error::Result;

/// Fetches every playlist and renders them as a table.
///
/// `limit` only truncates the display; the full library is always fetched
/// so the summary line stays accurate.
pub async fn run_playlists(config: Config, limit: Option<usize>) -> Result<()> {
    let client = api_client(&config);
    let playlists = client.playlists().await?;

    let shown = limit.unwrap_or(playlists.len()).min(playlists.len());

    let mut table = Table::new();
    table.set_titles(row!["#", "Name", "Tracks", "Owner", "Visibility"]);
    for (i, playlist) in playlists.iter().take(shown).enumerate() {
        let owner = playlist.owner.display_name.as_deref().unwrap_or("-");
        let visibility = match (playlist.public, playlist.collaborative) {
            (_, true) => "collaborative",
            (Some(true), _) => "public",
            (Some(false), _) => "private",
            (None, _) => "-",
        };
        table.add_row(row![
            i + 1,
            playlist.name,
            playlist.tracks.total,
            owner,
            visibility
        ]);
    }
    table.printstd();

    if shown < playlists.len() {
        println!("... and {} more", playlists.len() - shown);
    }
    println!(
        "{}",
        format!("{} playlists total", playlists.len()).bold()
    );
    Ok(())
}
