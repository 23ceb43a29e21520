use axum_extra::extract::cookie::Key;
use clap::Parser;
use tracing::warn;

/// Cookie signing needs at least this much secret material.
const MIN_SECRET_BYTES: usize = 32;

#[derive(Parser, Debug)]
#[command(
    name = "math-adventure-server",
    about = "Progress API for the math adventure app"
)]
pub struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    /// Secret used to sign session cookies. Sessions survive restarts only
    /// when this is set.
    #[arg(long, env = "COOKIE_SECRET", hide_env_values = true)]
    pub cookie_secret: Option<String>,

    /// SQLite URL for server-side session rows. When omitted, the whole
    /// session document rides in the signed cookie instead.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Args {
    /// Derive the cookie signing key from the configured secret, or generate
    /// an ephemeral one.
    #[must_use]
    pub fn signing_key(&self) -> Key {
        match &self.cookie_secret {
            Some(secret) if secret.len() >= MIN_SECRET_BYTES => {
                Key::derive_from(secret.as_bytes())
            }
            Some(_) => {
                warn!(
                    "cookie secret shorter than {MIN_SECRET_BYTES} bytes; using an ephemeral key"
                );
                Key::generate()
            }
            None => {
                warn!("no cookie secret configured; sessions reset on restart");
                Key::generate()
            }
        }
    }
}
