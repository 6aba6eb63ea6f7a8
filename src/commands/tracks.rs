//! `spindex tracks` -- list the tracks of one playlist

use colored::Colorize;
use prettytable::{row, Table};

use crate::commands::{api_client, format_duration};
use crate::config::Config;
use crate::error::Result;

/// Looks up a playlist by exact name and renders its tracks as a table.
pub async fn run_tracks(config: Config, playlist_name: &str) -> Result<()> {
    let client = api_client(&config);

    let playlist = client.playlist_by_name(playlist_name).await?;
    let tracks = client.playlist_tracks(&playlist.id).await?;

    println!("{}", playlist.name.bold());

    let mut table = Table::new();
    table.set_titles(row!["#", "Title", "Artists", "Album", "Length"]);
    for (i, track) in tracks.iter().enumerate() {
        table.add_row(row![
            i + 1,
            track.name,
            track.artist_names(),
            track.album.name,
            format_duration(track.duration_ms)
        ]);
    }
    table.printstd();

    println!("{} tracks", tracks.len());
    Ok(())
}
