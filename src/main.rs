use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use page_mirror::cli::MirrorCommand;
use page_mirror::session::MirrorSession;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = MirrorCommand::parse();

    // Targets are mirrored fully sequentially; one session completes before
    // the next begins.
    for url in &args.urls {
        let mut session =
            match MirrorSession::new(url, &args.output_dir, args.timeout, &args.user_agent) {
                Ok(session) => session,
                Err(e) => {
                    tracing::warn!(%url, error = %e, "skipping target");
                    continue;
                }
            };
        session.run(args.metadata).await?;
    }

    Ok(())
}
