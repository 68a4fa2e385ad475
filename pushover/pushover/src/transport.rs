use std::io::Read as _;

use log::debug;
use ureq::{Agent, AgentBuilder};
use url::Url;

use crate::{Client, NotificationError};

const MAX_REDIRECTS: u32 = 5;

const USER_AGENT: &str = concat!("pushover/", env!("CARGO_PKG_VERSION"));

/// Performs the HTTP exchange for [`Client`].
pub trait Transport {
    /// POSTs `body` to `url` as JSON and returns the complete response body.
    ///
    /// A response with an error status but a readable body is returned as is,
    /// the API reports rejected messages that way. <https://pushover.net/api#response>
    fn post_json(&self, url: &str, body: &str) -> Result<Vec<u8>, NotificationError>;
}

impl Transport for Agent {
    fn post_json(&self, url: &str, body: &str) -> Result<Vec<u8>, NotificationError> {
        let mut target = Url::parse(url)?;
        let mut redirects = 0;
        let response = loop {
            let response = match self
                .post(target.as_str())
                .set("Content-Type", "application/json")
                .send_string(body)
            {
                Ok(response) => response,
                Err(ureq::Error::Status(code, response)) => {
                    debug!("{target} responded with HTTP {code}");
                    response
                }
                Err(e) => return Err(NotificationError::UReq(Box::new(e))),
            };

            // ureq turns 301, 302 and 303 into GET by itself,
            // 307 and 308 are POSTed again here with the same body
            let location = response.header("Location").map(str::to_string);
            let next = match (response.status(), location) {
                (307 | 308, Some(location)) if redirects < MAX_REDIRECTS => {
                    target.join(&location)?
                }
                _ => break response,
            };
            debug!("{target} redirected to {next} with HTTP {}", response.status());
            target = next;
            redirects += 1;
        };

        // grows with the body, no upper bound
        let mut buffer = Vec::new();
        response.into_reader().read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// Shared HTTP state for every [`Client`] of an application.
///
/// Create one at startup and hand out clients with [`Context::client`].
/// Connections are pooled across clients and released when the last clone is dropped.
///
/// ```
/// # use pushover::Context;
/// let context = Context::new();
/// let mut client = context.client();
/// client.set_token("token").set_user("user").set_message("message");
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    agent: Agent,
}

impl Default for Context {
    fn default() -> Self {
        let agent = AgentBuilder::new()
            .redirects(MAX_REDIRECTS)
            .user_agent(USER_AGENT)
            .build();
        Self::with_agent(agent)
    }
}

impl Context {
    /// Creates a [`Context`] following up to five redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`Context`] from a preconfigured [`ureq::Agent`], e.g. with timeouts or a proxy.
    pub fn with_agent(agent: Agent) -> Self {
        Self { agent }
    }

    /// Creates a [`Client`] sharing this context's connection pool.
    pub fn client(&self) -> Client {
        Client::with_transport(self.agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mockito::mock;

    #[test]
    fn t_post_json() -> Result<(), NotificationError> {
        let m = mock("POST", "/transport/ok")
            .match_header("content-type", "application/json")
            .match_body(r#"{"token":"token"}"#)
            .with_status(200)
            .with_body(r#"{"status":1,"request":"00000000-0000-0000-0000-000000000000"}"#)
            .create();

        let url = format!("{}/transport/ok", mockito::server_url());
        let body = Context::new().agent.post_json(&url, r#"{"token":"token"}"#)?;
        assert_eq!(
            r#"{"status":1,"request":"00000000-0000-0000-0000-000000000000"}"#.as_bytes(),
            body.as_slice()
        );
        m.assert();
        Ok(())
    }

    #[test]
    fn t_error_status_keeps_body() -> Result<(), NotificationError> {
        let rejected = r#"{"user":"invalid","errors":["user identifier is invalid"],"status":0,"request":"5042853c-402d-4a18-abcb-168734a801de"}"#;
        let _m = mock("POST", "/transport/rejected")
            .with_status(400)
            .with_body(rejected)
            .create();

        let url = format!("{}/transport/rejected", mockito::server_url());
        let body = Context::new().agent.post_json(&url, "{}")?;
        assert_eq!(rejected.as_bytes(), body.as_slice());
        Ok(())
    }

    #[test]
    fn t_large_body() -> Result<(), NotificationError> {
        let large = "x".repeat(64 * 1024);
        let _m = mock("POST", "/transport/large")
            .with_status(200)
            .with_body(&large)
            .create();

        let url = format!("{}/transport/large", mockito::server_url());
        let body = Context::new().agent.post_json(&url, "{}")?;
        assert_eq!(large.len(), body.len());
        Ok(())
    }

    #[test]
    fn t_redirect_keeps_method_and_body() -> Result<(), NotificationError> {
        for (status, from) in [(307, "/transport/307"), (308, "/transport/308")] {
            let redirect = mock("POST", from)
                .with_status(status)
                .with_header("location", "/transport/moved")
                .expect(1)
                .create();
            let moved = mock("POST", "/transport/moved")
                .match_header("content-type", "application/json")
                .match_body(r#"{"token":"token"}"#)
                .with_status(200)
                .with_body(r#"{"status":1,"request":"moved"}"#)
                .expect(1)
                .create();

            let url = format!("{}{from}", mockito::server_url());
            let body = Context::new().agent.post_json(&url, r#"{"token":"token"}"#)?;
            assert_eq!(r#"{"status":1,"request":"moved"}"#.as_bytes(), body.as_slice());
            redirect.assert();
            moved.assert();
        }
        Ok(())
    }

    #[test]
    fn t_redirect_302_becomes_get() -> Result<(), NotificationError> {
        let _m = mock("POST", "/transport/302")
            .with_status(302)
            .with_header("location", "/transport/found")
            .create();
        let _n = mock("GET", "/transport/found")
            .with_status(200)
            .with_body(r#"{"status":1,"request":"found"}"#)
            .create();

        let url = format!("{}/transport/302", mockito::server_url());
        let body = Context::new().agent.post_json(&url, "{}")?;
        assert_eq!(r#"{"status":1,"request":"found"}"#.as_bytes(), body.as_slice());
        Ok(())
    }

    #[test]
    fn t_redirect_limit() -> Result<(), NotificationError> {
        let m = mock("POST", "/transport/loop")
            .with_status(307)
            .with_header("location", "/transport/loop")
            .expect(MAX_REDIRECTS as usize + 1)
            .create();

        let url = format!("{}/transport/loop", mockito::server_url());
        let body = Context::new().agent.post_json(&url, "{}")?;
        assert!(body.is_empty());
        m.assert();
        Ok(())
    }

    #[test]
    fn t_connection_refused() {
        let res = Context::new()
            .agent
            .post_json("http://127.0.0.1:1/1/messages.json", "{}");
        assert!(matches!(res, Err(NotificationError::UReq(_))));
    }
}
