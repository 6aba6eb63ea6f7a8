//! `spindex whoami` -- show the authenticated user's profile

use colored::Colorize;

use crate::commands::api_client;
use crate::config::Config;
use crate::error::Result;

/// Prints the profile of the authenticated user plus library totals.
pub async fn run_whoami(config: Config) -> Result<()> {
    let client = api_client(&config);

    let user = client.current_user().await?;
    let playlist_count = client.playlist_count().await?;
    let liked_count = client.liked_count().await?;

    let name = user.display_name.unwrap_or_else(|| user.id.clone());
    println!("{} {}", "Logged in as:".bold(), name.green());
    println!("User id:      {}", user.id);
    if let Some(email) = user.email {
        println!("Email:        {email}");
    }
    println!("Playlists:    {playlist_count}");
    println!("Liked songs:  {liked_count}");
    Ok(())
}
