#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! po is a command line application based on Pushover API.
//!
//! If Pushover API token / key is "token" and user key is "user",
//!
//! ```text
//! $ po -t token -u user -m message
//! ```
//!
//! Or you can set environment variables instead, and pipe the message in,
//!
//! ```text
//! $ export PUSHOVER_TOKEN=token
//! $ export PUSHOVER_USER=user
//! $ echo message | po
//! ```
//!
//! For more information,
//!
//! ```text
//! $ po -h
//! ```

use std::io::Read as _;

use anyhow::{bail, Context as _};
use clap::Parser;
use log::{debug, Level};
use logging_timer::{finish, stimer};

use pushover::{Client, Context, Priority, Sound, Transport, DEFAULT_API_URL};

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(about, author, version)]
struct Opts {
    /// Your application's API token. <https://pushover.net/api#identifiers>
    #[arg(short, long, env = "PUSHOVER_TOKEN")]
    token: String,
    /// The user / group key (not e-mail address) of your user (or you). <https://pushover.net/api#identifiers>
    #[arg(short, long, env = "PUSHOVER_USER")]
    user: String,
    /// Your message, read from standard input if omitted. <https://pushover.net/api#messages>
    #[arg(short, long)]
    message: Option<String>,
    /// Verbose, print the request identifier.
    #[arg(short, long)]
    verbose: bool,
    /// Print the request body instead of sending it.
    #[arg(long)]
    dry_run: bool,
    /// Your user's device name to send the message directly to that device, rather than all of the user's devices. <https://pushover.net/api#identifiers>
    #[arg(long)]
    device: Option<String>,
    /// Your message's title, otherwise your app's name is used. <https://pushover.net/api#messages>
    #[arg(long)]
    title: Option<String>,
    /// A Unix timestamp of your message's date and time to display to the user, rather than the time your message is received by our API. <https://pushover.net/api#timestamp>
    #[arg(long)]
    timestamp: Option<i64>,
    /// Messages may be sent with a different priority that affects how the message is presented to the user
    /// e.g. -2, -1, 0, 1, 2, lowest, low, normal, high, emergency. <https://pushover.net/api#priority>
    #[arg(long, allow_hyphen_values = true)]
    priority: Option<Priority>,
    /// Users can choose from a number of different default sounds to play when receiving notifications. <https://pushover.net/api#sounds>
    #[arg(long)]
    sound: Option<Sound>,
    /// A supplementary URL to show with your message. <https://pushover.net/api#urls>
    #[arg(long)]
    url: Option<String>,
    /// A title for your supplementary URL, otherwise just the URL is shown. <https://pushover.net/api#urls>
    #[arg(long)]
    url_title: Option<String>,
    /// Messages API endpoint.
    #[arg(long, env = "PUSHOVER_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[doc(hidden)]
fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts: Opts = Opts::parse();

    let message = match opts.message {
        Some(ref m) => m.clone(),
        None if atty::isnt(atty::Stream::Stdin) => {
            debug!("read message from standard input");
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf.trim_end().to_string()
        }
        None => bail!("message is required, pass --message or pipe it in"),
    };

    let context = Context::new();
    let mut client = context.client();
    configure(&mut client, &opts, &message)?;

    if opts.dry_run {
        println!("{}", client.request_body()?);
        return Ok(());
    }

    let tmr = stimer!(Level::Debug; "NOTIFY");
    let sent = client.send();
    finish!(tmr);

    report(&client, sent, opts.verbose)
}

fn configure<T: Transport>(
    client: &mut Client<T>,
    opts: &Opts,
    message: &str,
) -> anyhow::Result<()> {
    client
        .set_token(opts.token.as_str())
        .set_user(opts.user.as_str())
        .set_message(message)
        .set_device(opts.device.as_deref())
        .set_title(opts.title.as_deref())
        .set_url(opts.url.as_deref())
        .set_url_title(opts.url_title.as_deref());
    if let Some(sound) = opts.sound {
        let sound: &str = sound.as_ref();
        client.set_sound(sound);
    }
    if let Some(priority) = opts.priority {
        client.set_priority(priority);
    }
    if let Some(timestamp) = opts.timestamp {
        client.set_timestamp(timestamp);
    }
    client
        .set_api_url(&opts.api_url)
        .with_context(|| format!("invalid API URL: {}", opts.api_url))?;
    Ok(())
}

/// Succeeds only if the message went through and the API accepted it.
fn report<T: Transport>(client: &Client<T>, sent: bool, verbose: bool) -> anyhow::Result<()> {
    if !sent {
        match client.last_failure() {
            Some(e) => bail!("failed to send notification: {e}"),
            None => bail!("failed to send notification"),
        }
    }

    let request = client.request_id()?;
    if client.errors_len() > 0 {
        bail!("request {request} rejected: {}", client.errors().join(", "));
    }
    if verbose {
        println!("request: {request}");
    }
    Ok(())
}
