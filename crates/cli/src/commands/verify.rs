use clap::Args;
use keyward_hasher::{HasherPool, Verification};
use secrecy::ExposeSecret;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Stored blob to check against.
    pub blob: String,
    /// Candidate password. Read from the first line of stdin when omitted.
    #[arg(long, env = "KEYWARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(
    pool: &HasherPool,
    args: &VerifyArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let password = super::read_password(args.password.as_deref())?;
    let result = pool
        .verify_hashed_password(&args.blob, password.expose_secret())
        .await?;

    match format {
        OutputFormat::Text => println!("{}", text_line(result)),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "result": result,
                "needs_rehash": result.needs_rehash(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }

    // Every outcome goes to stdout; a mismatch is signalled by the exit status.
    if !result.is_match() {
        std::process::exit(1);
    }
    Ok(())
}

fn text_line(result: Verification) -> &'static str {
    match result {
        Verification::Match => "match",
        Verification::MatchStaleParameters => "match_stale_parameters (rehash recommended)",
        Verification::NoMatch => "no_match",
    }
}
