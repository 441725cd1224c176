use anyhow::Result;
use bankprep::{run, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) fixed paths: ./bank_marketing.csv → ./{client,campaign,economics}.csv
    let config = Config::default();
    info!(
        input = %config.input_path.display(),
        out_dir = %config.output_dir.display(),
        year = config.contact_year,
        "configured"
    );

    // ─── 3) load, transform, split ───────────────────────────────────
    let summary = run(&config)?;
    for t in &summary.tables {
        info!(table = t.name, rows = t.rows, path = %t.path.display(), "output");
    }

    info!(rows = summary.input_rows, "all done");
    Ok(())
}
