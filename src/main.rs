use anyhow::Result;
use clap::{Parser, ValueEnum};

use hotspot_analyzer::config::AnalysisParams;
use hotspot_analyzer::hotspot::ConnectStrategy;
use hotspot_analyzer::{data, density, hotspot, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "hotspot-analyzer",
    about = "Network-constrained crime hotspot detection"
)]
struct Cli {
    /// Path to road network nodes CSV (id,x,y)
    #[clap(long)]
    nodes: String,

    /// Path to road network edges CSV (u,v,length)
    #[clap(long)]
    edges: String,

    /// Path to incidents CSV (x,y), projected into the graph's frame
    #[clap(long)]
    incidents: String,

    /// Output directory for results
    #[clap(long, default_value = "hotspot_results")]
    output_dir: String,

    /// Density propagation bandwidth in meters
    #[clap(long, default_value = "200.0")]
    bandwidth: f64,

    /// Minimum node density for hotspot membership
    #[clap(long, default_value = "1.0")]
    density_threshold: f64,

    /// Clustering distance threshold in meters
    #[clap(long, default_value = "300.0")]
    distance_threshold: f64,

    /// Hotspot representation to produce
    #[clap(long, value_enum, default_value = "polygons")]
    representation: Representation,

    /// How subgraph hotspots connect their members
    #[clap(long, value_enum, default_value = "all-pairs")]
    connect: Connect,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Representation {
    /// Convex-hull polygons over clustered nodes (PHAR)
    Polygons,
    /// Shortest-path road subgraphs over clustered nodes (SHAR)
    Subgraphs,
    /// Density-gated flood-fill expansions
    Expansive,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Connect {
    AllPairs,
    SpanningTree,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let params = AnalysisParams::new(
        args.bandwidth,
        args.density_threshold,
        args.distance_threshold,
    );
    params.validate()?;

    log::info!("Starting hotspot analysis");
    log::info!("Network: {} + {}", args.nodes, args.edges);
    log::info!("Incidents: {}", args.incidents);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Load the road network and the incident records
    let graph = data::load_network(&args.nodes, &args.edges)?;
    let incidents = data::load_incidents(&args.incidents)?;

    // 2. Propagate incident density over the network
    let densities = density::compute_par(&graph, &incidents, params.bandwidth)?;
    log::info!("Peak node density: {:.3}", densities.max());

    // 3. Build hotspot regions and save them
    let hotspot_count = match args.representation {
        Representation::Polygons => {
            let hotspots = hotspot::polygon_hotspots(&densities, &graph, &params)?;
            log::info!("Found {} polygon hotspots", hotspots.len());
            storage::save_hotspots(&hotspots, &args.output_dir)?;
            hotspots.len()
        }
        Representation::Subgraphs => {
            let strategy = match args.connect {
                Connect::AllPairs => ConnectStrategy::AllPairs,
                Connect::SpanningTree => ConnectStrategy::SpanningTree,
            };
            let hotspots = hotspot::subgraph_hotspots(&densities, &graph, &params, strategy)?;
            log::info!("Found {} subgraph hotspots", hotspots.len());
            storage::save_hotspots(&hotspots, &args.output_dir)?;
            hotspots.len()
        }
        Representation::Expansive => {
            let expansions =
                hotspot::expansion::expand(&densities, &graph, params.density_threshold);
            log::info!("Found {} expansions", expansions.len());
            storage::save_hotspots(&expansions, &args.output_dir)?;
            expansions.len()
        }
    };

    // 4. Save run summary
    storage::save_summary(
        &graph,
        &densities,
        &params,
        incidents.len(),
        hotspot_count,
        &args.output_dir,
    )?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
