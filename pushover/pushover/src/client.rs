use log::{debug, warn};
use serde_json::{Map, Value};
use ureq::Agent;
use url::Url;

use crate::fields::{Encode, Fields, Json};
use crate::transport::{Context, Transport};
use crate::{response, NotificationError, Priority, DEFAULT_API_URL};

macro_rules! text_setters {
    ($($(#[$doc:meta])* $setter:ident => $name:literal;)*) => {
        $(
            $(#[$doc])*
            ///
            /// Absent or empty value removes the field from the request.
            pub fn $setter<'v, V>(&mut self, value: V) -> &mut Self
            where
                V: Into<Option<&'v str>>,
            {
                self.fields.set_text($name, value.into());
                self
            }
        )*
    };
}

/// Pushover messages API client. <https://pushover.net/api#messages>
///
/// Fields persist across sends, so one client can send the same or a slightly
/// changed notification many times. Only the outcome of the latest send is kept.
///
/// ```no_run
/// # use pushover::{Client, Priority};
/// let mut client = Client::new();
/// client
///     .set_token("token")
///     .set_user("user")
///     .set_message("message")
///     .set_priority(Priority::High);
/// if !client.send() {
///     eprintln!("{:?}", client.last_failure());
/// } else if client.errors_len() > 0 {
///     eprintln!("rejected: {:?}", client.errors());
/// }
/// ```
#[derive(Debug)]
pub struct Client<T = Agent, E = Json> {
    transport: T,
    encoder: E,
    endpoint: String,
    fields: Fields,
    last_response: Option<Value>,
    last_errors: Vec<String>,
    last_failure: Option<NotificationError>,
}

impl Default for Client {
    fn default() -> Self {
        Context::new().client()
    }
}

impl Client {
    /// Creates a [`Client`] with its own [`Context`].
    ///
    /// Prefer [`Context::client`] when sending from many clients.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Transport> Client<T> {
    /// Creates a [`Client`] on top of a custom [`Transport`].
    pub fn with_transport(transport: T) -> Self {
        Self::with_encoder(transport, Json)
    }
}

impl<T: Transport, E: Encode> Client<T, E> {
    /// Creates a [`Client`] on top of a custom [`Transport`] and [`Encode`].
    pub fn with_encoder(transport: T, encoder: E) -> Self {
        Self {
            transport,
            encoder,
            endpoint: DEFAULT_API_URL.to_string(),
            fields: Fields::default(),
            last_response: None,
            last_errors: Vec::new(),
            last_failure: None,
        }
    }

    text_setters! {
        /// Your application's API token. <https://pushover.net/api#identifiers>
        set_token => "token";
        /// The user / group key (not e-mail address) of your user (or you). <https://pushover.net/api#identifiers>
        set_user => "user";
        /// Your message. <https://pushover.net/api#messages>
        set_message => "message";
        /// A supplementary URL to show with your message. <https://pushover.net/api#urls>
        set_url => "url";
        /// A title for your supplementary URL, otherwise just the URL is shown. <https://pushover.net/api#urls>
        set_url_title => "url_title";
        /// Your message's title, otherwise your app's name is used. <https://pushover.net/api#messages>
        set_title => "title";
        /// Your user's device name to send the message directly to that device,
        /// rather than all of the user's devices (multiple devices may be separated by a comma).
        /// <https://pushover.net/api#identifiers>
        set_device => "device";
        /// The name of one of the sounds supported by device clients,
        /// see [`crate::Sound`] for the built-in ones. <https://pushover.net/api#sounds>
        set_sound => "sound";
    }

    /// Sets any request field, including ones without a dedicated setter.
    ///
    /// Absent or empty value removes the field from the request.
    pub fn set_field(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.fields.set_text(name, value);
        self
    }

    /// Messages may be sent with a different priority
    /// that affects how the message is presented to the user. <https://pushover.net/api#priority>
    pub fn set_priority(&mut self, priority: Priority) -> &mut Self {
        self.fields.set_number("priority", priority.into());
        self
    }

    /// A Unix timestamp of your message's date and time to display to the user,
    /// rather than the time your message is received by the API. <https://pushover.net/api#timestamp>
    pub fn set_timestamp(&mut self, timestamp: i64) -> &mut Self {
        self.fields.set_number("timestamp", timestamp);
        self
    }

    /// Sends subsequent requests to `url` instead of [`DEFAULT_API_URL`].
    ///
    /// Request fields are left untouched. An invalid URL keeps the previous one.
    pub fn set_api_url(&mut self, url: &str) -> Result<&mut Self, NotificationError> {
        self.endpoint = Url::parse(url)?.to_string();
        Ok(self)
    }

    /// Where requests are sent to.
    pub fn api_url(&self) -> &str {
        &self.endpoint
    }

    /// Fields of the next request.
    pub fn fields(&self) -> &Map<String, Value> {
        self.fields.document()
    }

    /// Body of the next request, encoded only if a field changed since the last encoding.
    pub fn request_body(&mut self) -> Result<&str, NotificationError> {
        self.fields.body(&self.encoder)
    }

    /// Sends the notification and blocks until the response is interpreted.
    ///
    /// Returns `true` when the exchange completed and the response was understood,
    /// which does not mean the message was accepted: check [`Client::errors_len`]
    /// as well. On `false` the reason is kept in [`Client::last_failure`].
    pub fn send(&mut self) -> bool {
        match self.try_send() {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to send notification: {e}");
                self.last_failure = Some(e);
                false
            }
        }
    }

    /// Like [`Client::send`] but returns the failure instead of keeping it.
    pub fn try_send(&mut self) -> Result<(), NotificationError> {
        self.last_response = None;
        self.last_errors.clear();
        self.last_failure = None;

        let body = self.fields.body(&self.encoder)?;
        debug!("POST {} with {} bytes", self.endpoint, body.len());
        let raw = self.transport.post_json(&self.endpoint, body)?;

        let document = response::parse(&raw)?;
        let verdict = response::classify(&document);
        self.last_response = Some(document);
        self.last_errors = verdict?;
        debug!(
            "request {} answered with {} error(s)",
            self.request_id().unwrap_or("-"),
            self.last_errors.len()
        );
        Ok(())
    }

    /// Number of errors reported by the API for the last request.
    pub fn errors_len(&self) -> usize {
        self.last_errors.len()
    }

    /// Error reported by the API for the last request at `index`.
    pub fn error(&self, index: usize) -> Result<&str, NotificationError> {
        self.last_errors
            .get(index)
            .map(String::as_str)
            .ok_or(NotificationError::ErrorIndex {
                index,
                len: self.last_errors.len(),
            })
    }

    /// Errors reported by the API for the last request, empty when accepted.
    pub fn errors(&self) -> &[String] {
        &self.last_errors
    }

    /// Randomly-generated unique token the API associated with the last request.
    /// <https://pushover.net/api#response>
    pub fn request_id(&self) -> Result<&str, NotificationError> {
        self.last_response
            .as_ref()
            .and_then(response::request_id)
            .ok_or(NotificationError::NoResponse)
    }

    /// Last parsed response, absent before the first send or when it was not JSON.
    pub fn last_response(&self) -> Option<&Value> {
        self.last_response.as_ref()
    }

    /// Why the last [`Client::send`] returned `false`.
    pub fn last_failure(&self) -> Option<&NotificationError> {
        self.last_failure.as_ref()
    }
}
