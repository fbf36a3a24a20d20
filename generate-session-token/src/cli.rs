//! Defines the command-line interface for the application.

use clap::Parser;
use sspl_sec::session::DEFAULT_SESSION_LENGTH;

#[derive(Parser, Debug)]
#[command(
    name = "generate-session-token",
    version,
    about = "Generate a session token for a user and print it base64-encoded."
)]
pub struct Cli {
    /// Security method used to produce the token ('None' or 'PKI').
    #[arg(short, long, value_name = "METHOD", default_value = "None")]
    pub method: String,

    /// Lifetime of the session in seconds.
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_SESSION_LENGTH.as_secs())]
    pub session_length: u64,

    /// The username followed by the password.
    #[arg(value_name = "USERNAME PASSWORD")]
    pub args: Vec<String>,
}
