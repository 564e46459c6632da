//! Batch Scoring Demo
//!
//! Scores a synthetic trace with both models and prints the distribution.
//!
//! Run with: cargo run --example batch_demo
//!
//! Environment:
//!   GEORISK_ZONE_CATALOG  - JSON zone catalog (default: built-in Nagpur zones)
//!   GEORISK_BATCH_WORKERS - Parallel batch width (default: 4)

use chrono::{NaiveDate, NaiveDateTime};
use georisk::{
    eta_risk, should_trigger_alert, BatchProcessor, EngineConfig, Observation, ThreatCalculator, ZoneClassifier,
    ZoneRiskModel,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn at(hour: u32, minute: u32) -> eyre::Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 11, 5)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| eyre::eyre!("invalid demo time {}:{}", hour, minute))
}

/// Day-time cruising around the city center, plus night-time stops near MIDC
fn synthetic_trace(rng: &mut StdRng, count: usize) -> eyre::Result<Vec<Observation>> {
    let mut trace = Vec::with_capacity(count);
    for i in 0..count {
        let obs = if i % 4 == 0 {
            let hour = if rng.gen_bool(0.5) { rng.gen_range(22..24) } else { rng.gen_range(0..5) };
            Observation::new(
                21.0976 + rng.gen_range(-0.02..0.02),
                78.9772 + rng.gen_range(-0.02..0.02),
                rng.gen_range(0.0..5.0),
            )
            .with_timestamp(at(hour, rng.gen_range(0..60))?)
            .with_stopped_seconds(rng.gen_range(120..900))
            .with_deviations(rng.gen_range(8..16))
        } else {
            Observation::new(
                21.12 + rng.gen_range(-0.02..0.02),
                79.08 + rng.gen_range(-0.02..0.02),
                rng.gen_range(30.0..60.0),
            )
            .with_timestamp(at(rng.gen_range(6..22), rng.gen_range(0..60))?)
            .with_deviations(rng.gen_range(0..3))
        };
        trace.push(obs);
    }
    Ok(trace)
}

fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let config = EngineConfig::from_env();
    let catalog = config.load_catalog()?;
    info!("🗺️ {} zones loaded", catalog.len());

    let mut rng = StdRng::seed_from_u64(7);
    let trace = synthetic_trace(&mut rng, 12_000)?;

    // Zone model
    let classifier = ZoneClassifier::new(catalog);
    let advice = classifier.recommend(trace[0].coordinate)?;
    info!("📍 {}: {}", advice.zone.zone_name, advice.recommendations.join(", "));

    let zone_batch = BatchProcessor::new(ZoneRiskModel::new(classifier));
    let zone_results = zone_batch.process_parallel(&trace, config.batch_workers)?;
    println!("\n=== ZONE MODEL ===");
    print!("{}", zone_results[0].summary());
    print!("{}", zone_batch.summarize(&zone_results).report());
    let alerts = zone_results.iter().filter(|r| should_trigger_alert(r.level)).count();
    println!("Alerts raised: {}", alerts);

    // Threat model
    let threat_batch = BatchProcessor::new(ThreatCalculator::with_nagpur_hotspots());
    let threat_results = threat_batch.process(&trace)?;
    println!("\n=== THREAT MODEL ===");
    println!("{}", serde_json::to_string_pretty(&threat_results[0])?);
    print!("{}", threat_batch.summarize(&threat_results).report());

    let eta = eta_risk(35, 48);
    println!("\nETA check: {} ({:.1}% over, {})", eta.message, eta.deviation_percentage, eta.risk_level.as_str());

    Ok(())
}
