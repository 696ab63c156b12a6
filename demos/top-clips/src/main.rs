//! Top clips demo
//!
//! Prints the top clips of a channel, and the followed clips when an access
//! token is available.
//!
//! ```text
//! TWITCH_CLIENT_ID=... cargo run -p top-clips -- summit1g
//! RUST_LOG=kraken=debug TWITCH_CLIENT_ID=... TWITCH_ACCESS_TOKEN=... cargo run -p top-clips
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::env;
use std::process::ExitCode;

use kraken::prelude::*;
use kraken::ClipsResponse;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn client_from_env() -> Result<KrakenClient> {
    let client_id = env::var("TWITCH_CLIENT_ID").unwrap_or_default();

    let mut builder = KrakenClient::builder(client_id)
        .user_agent(concat!("top-clips/", env!("CARGO_PKG_VERSION")));
    if let Ok(token) = env::var("TWITCH_ACCESS_TOKEN") {
        builder = builder.access_token(token);
    }
    if let Ok(base_url) = env::var("KRAKEN_BASE_URL") {
        builder = builder.base_url(base_url);
    }

    builder.build(HyperClient::builder().with_logging().build())
}

fn print_clips(title: &str, response: ClipsResponse) {
    println!("== {title} (HTTP {}) ==", response.status_code);

    match response.into_result() {
        Ok(page) => {
            for clip in &page.clips {
                println!(
                    "{:>8} views  {:>5.1}s  {}  {}",
                    clip.views, clip.duration, clip.title, clip.url
                );
            }
            if !page.cursor.is_empty() {
                println!("next cursor: {}", page.cursor);
            }
        }
        Err(failure) => eprintln!("{failure}"),
    }
}

async fn run(channel: String) -> Result<()> {
    let client = client_from_env()?;
    info!(base_url = %client.base_url(), "client ready");

    let top = client
        .get_top_clips(&TopClipsParams {
            channel: channel.clone(),
            limit: 5,
            period: Some(Period::Week),
            ..TopClipsParams::default()
        })
        .await?;
    print_clips(&format!("top clips of {channel}"), top);

    if client.access_token().is_some() {
        let followed = client
            .get_followed_clips(&FollowedClipsParams {
                limit: 5,
                ..FollowedClipsParams::default()
            })
            .await?;
        print_clips("followed clips", followed);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let channel = env::args().nth(1).unwrap_or_else(|| "summit1g".to_string());

    match run(channel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "top-clips failed");
            ExitCode::FAILURE
        }
    }
}
