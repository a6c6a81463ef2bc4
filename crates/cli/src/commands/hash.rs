use clap::Args;
use keyward_hasher::HasherPool;
use secrecy::ExposeSecret;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Password to hash. Read from the first line of stdin when omitted.
    #[arg(long, env = "KEYWARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn run(pool: &HasherPool, args: &HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let password = super::read_password(args.password.as_deref())?;
    let blob = pool.hash_password(password.expose_secret()).await?;

    match format {
        OutputFormat::Text => println!("{blob}"),
        OutputFormat::Json => {
            let config = pool.snapshot();
            let out = serde_json::json!({
                "blob": blob,
                "iteration_count": config.iteration_count,
                "block_size": config.block_size,
                "thread_count": config.thread_count,
                "hash_prefix": config.hash_prefix,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
