use anyhow::Context;
use clap::Args;
use keyward_hasher::{HasherPool, InnerHash, envelope, rehash_needed};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Stored blob to inspect.
    pub blob: String,
}

/// Print envelope and cost details of a blob. Salt and digest are never shown.
pub fn run(pool: &HasherPool, args: &InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let env = envelope::open(&args.blob).context("blob is not a valid base64 envelope")?;
    let hash = InnerHash::parse(&env.inner)?;
    let params = hash.params();
    let stale = rehash_needed(&params, &pool.snapshot().params());

    match format {
        OutputFormat::Text => {
            println!("Tag:             {:#04x}", env.tag);
            println!("Layout:          {}", hash.layout());
            println!("Version:         {}", hash.version());
            println!("Iteration count: {}", params.iteration_count);
            println!("Block size:      {}", params.block_size);
            println!("Thread count:    {}", params.thread_count);
            println!("Salt length:     {}", hash.salt().len());
            println!("Digest length:   {}", hash.digest().len());
            println!("Stale:           {stale}");
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "tag": env.tag,
                "layout": hash.layout().to_string(),
                "version": hash.version(),
                "params": params,
                "salt_len": hash.salt().len(),
                "digest_len": hash.digest().len(),
                "stale": stale,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
