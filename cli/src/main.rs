use clap::Parser;
use plotters::prelude::*;
use stratsim::core::gap::Outcome;
use stratsim::core::pace::{ArtifactStore, CompoundEncoder, LabelEncoder};
use stratsim::core::tire::Compound;
use stratsim::post::sim_result::SimulationResult;
use stratsim::pre::read_sim_pars::{read_encoder, read_model_file, read_sim_pars};
use stratsim::pre::sim_opts::SimOpts;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn output_path(prefix: &str) -> anyhow::Result<PathBuf> {
    let out_dir = Path::new("output");
    std::fs::create_dir_all(out_dir)?;
    let ts = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(out_dir.join(format!("{}_{}.png", prefix, ts)))
}

fn export_gap_plot(result: &SimulationResult, circuit: &str) -> anyhow::Result<String> {
    let (first_lap, last_lap) = match (result.lap_idxs.first(), result.lap_idxs.last()) {
        (Some(&first_lap), Some(&last_lap)) => (first_lap, last_lap),
        _ => anyhow::bail!("Simulation result is empty, nothing to plot!"),
    };

    let out_path = output_path("gap_plot")?;

    // keep the zero line in view
    let mut y_min = helpers::general::min(&result.gap_history).unwrap_or(0.0).min(0.0);
    let mut y_max = helpers::general::max(&result.gap_history).unwrap_or(0.0).max(0.0);
    let margin = ((y_max - y_min) * 0.05).max(0.5);
    y_min -= margin;
    y_max += margin;

    let root = BitMapBackend::new(&out_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} - interval history (positive = ahead)", circuit),
            ("sans-serif", 24).into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first_lap..last_lap + 1, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Lap")
        .y_desc("Gap (s)")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(first_lap, 0.0), (last_lap + 1, 0.0)],
        BLACK.stroke_width(1),
    )))?;

    let color = if result.outcome == Outcome::Overtake {
        GREEN
    } else {
        RED
    };
    let series: Vec<(u32, f64)> = result
        .lap_idxs
        .iter()
        .copied()
        .zip(result.gap_history.iter().copied())
        .collect();
    chart.draw_series(
        AreaSeries::new(series.iter().copied(), 0.0, color.mix(0.3)).border_style(&color),
    )?;
    chart.draw_series(
        series
            .iter()
            .map(|&(lap, gap)| Circle::new((lap, gap), 4, color.filled())),
    )?;

    root.present()?;
    Ok(out_path.to_string_lossy().into_owned())
}

fn export_race_trace_plot(result: &SimulationResult, circuit: &str) -> anyhow::Result<String> {
    let (first_lap, last_lap) = match (result.lap_idxs.first(), result.lap_idxs.last()) {
        (Some(&first_lap), Some(&last_lap)) => (first_lap, last_lap),
        _ => anyhow::bail!("Simulation result is empty, nothing to plot!"),
    };
    let out_path = output_path("race_trace")?;

    let racetimes = [&result.racetimes_me, &result.racetimes_opp];
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for times in racetimes.iter() {
        y_min = y_min.min(helpers::general::min(times.as_slice()).unwrap_or(0.0));
        y_max = y_max.max(helpers::general::max(times.as_slice()).unwrap_or(0.0));
    }
    let margin = ((y_max - y_min) * 0.05).max(1.0);

    let root = BitMapBackend::new(&out_path, (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} - race trace (cumulative race time)", circuit),
            ("sans-serif", 24).into_font(),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(first_lap..last_lap + 1, (y_min - margin)..(y_max + margin))?;

    chart
        .configure_mesh()
        .x_desc("Lap")
        .y_desc("Race time (s)")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (times, label, color) in [
        (&result.racetimes_me, "Me", BLUE),
        (&result.racetimes_opp, "Opponent", RED),
    ] {
        let series = result.lap_idxs.iter().copied().zip(times.iter().copied());
        chart
            .draw_series(LineSeries::new(series, color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(out_path.to_string_lossy().into_owned())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();
    init_logging(sim_opts.debug);

    // get simulation parameters
    let sim_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        info!(path = %parfile_path.display(), "reading simulation parameters");
        read_sim_pars(parfile_path)?
    } else {
        sim_opts.to_sim_pars()
    };
    let circuit_pars = sim_pars.resolve_circuit()?;
    let context = circuit_pars.context(sim_pars.pit_loss);

    // load artifacts
    let encoder = match &sim_opts.encoder_path {
        Some(encoder_path) => read_encoder(encoder_path)?,
        None => LabelEncoder::default(),
    };
    let mut codes = Vec::with_capacity(Compound::ALL.len());
    for compound in Compound::ALL.iter() {
        codes.push(encoder.encode(compound.label())?);
    }

    let mut store = ArtifactStore::new();
    for model_path in sim_opts.model_paths.iter() {
        let model_file = read_model_file(model_path)?;
        model_file.model.check_codes(&codes)?;
        info!(circuit = %model_file.circuit, path = %model_path.display(), "loaded pace model");
        store.insert_model(&model_file.circuit, model_file.model);
    }
    store.set_encoder(encoder);

    if !store.has_model(&sim_pars.circuit) {
        warn!(circuit = %sim_pars.circuit, "no pace model loaded, pass one with -m <path_to_json>");
    }

    info!(
        circuit = %sim_pars.circuit,
        layout = %circuit_pars.name,
        profile = %circuit_pars.profile,
        tot_no_laps = context.tot_no_laps,
        pit_loss = context.pit_loss,
        "simulating pit decision on lap {}",
        sim_pars.race_state.current_lap
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();
    let result = sim_pars.run(&store)?;
    info!(elapsed_us = t_start.elapsed().as_micros() as u64, "execution time");

    // POST-PROCESSING -----------------------------------------------------------------------------
    result.print_gap_table()?;

    if let Some(csv_path) = &sim_opts.csv_path {
        result.write_csv(csv_path)?;
        info!(path = %csv_path.display(), "gap history written");
    }

    if sim_opts.plot {
        match export_gap_plot(&result, &circuit_pars.name) {
            Ok(path) => info!(%path, "gap chart written"),
            Err(e) => warn!("could not export gap chart: {}", e),
        }
        match export_race_trace_plot(&result, &circuit_pars.name) {
            Ok(path) => info!(%path, "race trace written"),
            Err(e) => warn!("could not export race trace: {}", e),
        }
    }

    Ok(())
}
