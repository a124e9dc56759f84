//! Resource cache diagnostics.

use crate::error::CliError;
use crate::runner::CliRunner;

/// Load the resources `passes` times and print cache statistics.
///
/// Passes after the first are answered from the cache, so the counters
/// show hits next to the initial fetches.
pub async fn run_stats(runner: &CliRunner, keys: &[String], passes: usize) -> Result<(), CliError> {
    for _ in 0..passes.max(1) {
        runner.load(keys).await?;
    }

    let stats = runner.cache().stats();
    stats.log();

    println!("Resource cache ({})", runner.config().sources.base);
    println!("  Cached:    {}", list(&stats.cached_keys));
    println!("  Pending:   {}", list(&stats.pending_keys));
    println!("  Failed:    {}", list(&stats.failed_keys));
    println!("  Requests:  {}", stats.total_requests);
    println!("  Fetches:   {}", stats.fetches);
    println!("  Coalesced: {}", stats.coalesced_requests);
    println!("  Failures:  {}", stats.failures);
    println!("  Hit ratio: {:.1}%", stats.hit_ratio() * 100.0);
    if let Some(error) = &stats.last_error {
        println!("  Last error: {}", error);
    }

    Ok(())
}

fn list(keys: &[String]) -> String {
    if keys.is_empty() {
        "-".to_string()
    } else {
        keys.join(", ")
    }
}
