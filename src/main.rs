//! Driver of the test_cms analysis: generates toy events, runs the event
//! selection on them, and prints out the cut-flow and histograms

use eyre::WrapErr;
use log::info;

use test_cms::{
    config::Configuration,
    cutflow::CutFlow,
    evgen::EventGenerator,
    histogram::HistogramSet,
    output,
    random::RandomGenerator,
    selection::EventSelector,
    Result,
};

use std::{env, io, time::Instant};

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    env_logger::init();

    // ### CONFIGURATION READOUT ###

    let cfg = match env::args().nth(1) {
        Some(file_name) => {
            Configuration::load(&file_name).wrap_err("Failed to load the configuration")?
        }
        None => {
            info!("No configuration file given, using the defaults");
            let cfg = Configuration::default();
            cfg.log();
            cfg
        }
    };

    // ### ANALYSIS INITIALIZATION ###

    // The clock starts after configuration I/O
    let saved_time = Instant::now();

    let mut cutflow = CutFlow::new();
    let mut histograms = HistogramSet::new();
    let selector = EventSelector::new(cfg.selection.clone());
    selector
        .initialize(&mut cutflow, &mut histograms)
        .wrap_err("Failed to initialize the event selection")?;

    let evgen = EventGenerator::new(cfg.generator.clone());
    let mut rng = RandomGenerator::new(cfg.seed);

    // ### ANALYSIS EXECUTION ###

    info!("Analyzing {} events", cfg.num_events);
    for _ in 0..cfg.num_events {
        let event = evgen.generate(&mut rng);
        selector.execute(&event, &mut cutflow, &mut histograms);
    }
    selector.finalize();

    // ### RESULTS DISPLAY ###

    let elapsed_time = saved_time.elapsed();
    let stdout = io::stdout();
    output::dump_results(
        &mut stdout.lock(),
        &cfg,
        &cutflow,
        &histograms,
        elapsed_time,
    )
    .wrap_err("Failed to output the results")?;

    Ok(())
}
