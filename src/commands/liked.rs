//! `spindex liked` -- list the user's liked songs

use colored::Colorize;
use prettytable::{row, Table};

use crate::commands::{api_client, format_duration};
use crate::config::Config;
use crate::error::Result;

/// Fetches every liked song and renders them as a table.
pub async fn run_liked(config: Config, limit: Option<usize>) -> Result<()> {
    let client = api_client(&config);
    let liked = client.liked_songs().await?;

    let shown = limit.unwrap_or(liked.len()).min(liked.len());

    let mut table = Table::new();
    table.set_titles(row!["#", "Title", "Artists", "Album", "Length", "Added"]);
    for (i, saved) in liked.iter().take(shown).enumerate() {
        let added = saved.added_at.split('T').next().unwrap_or("");
        table.add_row(row![
            i + 1,
            saved.track.name,
            saved.track.artist_names(),
            saved.track.album.name,
            format_duration(saved.track.duration_ms),
            added
        ]);
    }
    table.printstd();

    if shown < liked.len() {
        println!("... and {} more", liked.len() - shown);
    }
    println!("{}", format!("{} liked songs total", liked.len()).bold());
    Ok(())
}
