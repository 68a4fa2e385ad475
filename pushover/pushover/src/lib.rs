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

//! Pushover is a blocking Pushover messages API client in Rust 2021 edition.
//!
//! Fields are accumulated on a [`Client`], encoded as JSON once per change,
//! and posted to the messages API. The response decides the outcome:
//!
//! - [`Client::send`] returns `false` when the exchange failed or the response
//!   could not be interpreted, see [`Client::last_failure`].
//! - [`Client::send`] returns `true` when the response was understood.
//!   The message was accepted only if [`Client::errors_len`] is zero as well.
//!
//! ```no_run
//! use pushover::{Context, Priority};
//!
//! let context = Context::new();
//! let mut client = context.client();
//! client
//!     .set_token("token")
//!     .set_user("user")
//!     .set_message("message")
//!     .set_priority(Priority::Normal);
//! if client.send() {
//!     for error in client.errors() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```

pub use client::Client;
pub use error::NotificationError;
pub use fields::{Encode, Json};
pub use transport::{Context, Transport};

mod client;
mod error;
mod fields;
mod response;
mod transport;

/// Messages API endpoint. <https://pushover.net/api#messages>
pub const DEFAULT_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Messages may be sent with a different priority
/// that affects how the message is presented to the user. <https://pushover.net/api#priority>
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString)]
pub enum Priority {
    /// Normal (default)
    #[strum(to_string = "0", serialize = "normal")]
    Normal,
    /// Lowest
    #[strum(to_string = "-2", serialize = "lowest")]
    Lowest,
    /// Low
    #[strum(to_string = "-1", serialize = "low")]
    Low,
    /// High
    #[strum(to_string = "1", serialize = "high")]
    High,
    /// Emergency
    #[strum(to_string = "2", serialize = "emergency")]
    Emergency,
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Lowest => -2,
            Priority::Low => -1,
            Priority::Normal => 0,
            Priority::High => 1,
            Priority::Emergency => 2,
        }
    }
}

/// Users can choose from a number of different default sounds
/// to play when receiving notifications. <https://pushover.net/api#sounds>
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Sound {
    /// pushover - Pushover (default)
    Pushover,
    /// bike - Bike
    Bike,
    /// bugle - Bugle
    Bugle,
    /// cashregister - Cash Register
    CashRegister,
    /// classical - Classical
    Classical,
    /// cosmic - Cosmic
    Cosmic,
    /// falling - Falling
    Falling,
    /// gamelan - Gamelan
    GameLan,
    /// incoming - Incoming
    Incoming,
    /// intermission - Intermission
    Intermission,
    /// magic - Magic
    Magic,
    /// mechanical - Mechanical
    Mechanical,
    /// pianobar - Piano Bar
    PianoBar,
    /// siren - Siren
    Siren,
    /// spacealarm - Space Alarm
    SpaceAlarm,
    /// tugboat - Tug Boat
    Tugboat,
    /// alien - Alien Alarm (long)
    Alien,
    /// climb - Climb (long)
    Climb,
    /// persistent - Persistent (long)
    Persistent,
    /// echo - Pushover Echo (long)
    Echo,
    /// updown - Up Down (long)
    UpDown,
    /// vibrate - Vibrate Only
    Vibrate,
    /// none - None (silent)
    None,
}
