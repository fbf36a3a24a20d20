use crate::cli::Cli;
use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use sspl_sec::{b64, Method, SecContext};
use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

/// Validated invocation: the method, the credentials and the session length.
struct Args {
    method: Method,
    username: String,
    password: String,
    session_length: Duration,
}

enum Invocation {
    Generate(Args),
    IncorrectArgumentCount,
}

pub fn run() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = match parse_args(std::env::args_os())? {
        Invocation::Generate(args) => args,
        Invocation::IncorrectArgumentCount => {
            // Acceptance scripts match this exact line on stdout.
            println!("Error:  Incorrect number of arguments");
            return Ok(ExitCode::FAILURE);
        }
    };

    let ctx = SecContext::new(args.method);
    let token = ctx
        .generate_session_token(&args.username, args.password.as_bytes(), args.session_length)
        .with_context(|| format!("Failed to generate {} session token", args.method))?;

    let mut encoded = String::with_capacity(b64::max_encoded_len(ctx.token_length()) + 1);
    encoded.push_str(&token.to_base64());
    encoded.push('\n');
    io::stdout().write_all(encoded.as_bytes())?;

    Ok(ExitCode::SUCCESS)
}

fn parse_args<I, T>(argv: I) -> anyhow::Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        // Stray dashed words never reach the positionals, so the count is off.
        Err(err) if err.kind() == ErrorKind::UnknownArgument => {
            log::debug!("{err}");
            return Ok(Invocation::IncorrectArgumentCount);
        }
        Err(err) => err.exit(),
    };

    let Cli {
        method,
        session_length,
        args,
    } = cli;

    let Ok([username, password]) = <[String; 2]>::try_from(args) else {
        return Ok(Invocation::IncorrectArgumentCount);
    };

    let method = method.parse::<Method>()?;
    log::debug!("Using {method} security method for user '{username}'");

    Ok(Invocation::Generate(Args {
        method,
        username,
        password,
        session_length: Duration::from_secs(session_length),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sspl_sec::session::DEFAULT_SESSION_LENGTH;

    fn parse(args: &[&str]) -> Invocation {
        let argv = std::iter::once("generate-session-token").chain(args.iter().copied());
        parse_args(argv).unwrap()
    }

    #[test]
    fn parses_method_and_credentials() {
        let Invocation::Generate(args) = parse(&["-m", "PKI", "admin", "secret"]) else {
            panic!("expected a generate invocation");
        };
        assert_eq!(args.method, Method::Pki);
        assert_eq!(args.username, "admin");
        assert_eq!(args.password, "secret");
        assert_eq!(args.session_length, DEFAULT_SESSION_LENGTH);
    }

    #[test]
    fn dashed_password_counts_as_missing_argument() {
        assert!(matches!(
            parse(&["admin", "-secret"]),
            Invocation::IncorrectArgumentCount
        ));
    }

    #[test]
    fn unknown_flag_counts_as_argument_error() {
        assert!(matches!(
            parse(&["-x", "admin", "secret"]),
            Invocation::IncorrectArgumentCount
        ));
        assert!(matches!(
            parse(&["--verbose", "admin", "secret"]),
            Invocation::IncorrectArgumentCount
        ));
    }

    #[test]
    fn invalid_method_is_an_error() {
        let err = parse_args(["generate-session-token", "-m", "RSA", "admin", "secret"])
            .err()
            .expect("method is rejected");
        assert_eq!(err.to_string(), "Invalid method: 'RSA'");
    }
}
