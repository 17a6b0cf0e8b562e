use anyhow::Context;

use stockwise_ai::{CancellationToken, PipelineConfig, PredictionSession};
use stockwise_catalog::JsonFileCatalog;
use stockwise_cli::{CATALOG_ENV, Invocation, Output, table};

fn main() -> anyhow::Result<()> {
    stockwise_observability::init();

    let invocation = Invocation::parse(std::env::args().skip(1), std::env::var(CATALOG_ENV).ok())?;
    let config = PipelineConfig::from_env();
    let rule = config.rule;

    let session = PredictionSession::new(config);
    let provider = JsonFileCatalog::new(&invocation.catalog);
    session
        .load_catalog(&provider)
        .with_context(|| format!("loading {}", invocation.catalog.display()))?;

    let catalog = session.catalog();
    if catalog.is_empty() {
        tracing::info!("catalog is empty; nothing to predict");
        return Ok(());
    }

    let report = session
        .run(&CancellationToken::new())
        .context("prediction run failed")?;

    match invocation.output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Output::Table => {
            println!("{}", table::render_catalog(&catalog));
            println!("{}", table::render_results(rule, &report.results));
            println!(
                "{} of {} products need reordering",
                report.reorder_count(),
                report.results.len()
            );
        }
    }

    Ok(())
}
