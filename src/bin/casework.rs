use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use casework::{
    io::{EdgeListRead, FileFormat, GraphWrite},
    gens::RandomGraph,
    prelude::*,
    scenarios::{
        Scenario, alerts::AlertCenter, city::City, counters::ServiceHall, dispatch::Hospital,
        flood::FloodMonitor, freight::{FreightNetwork, Truck}, parking::ParkingLot, pricing::Shop,
        security::SecurityMonitor, transit::TrafficControl, venue::Venue,
    },
};
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "casework")]
#[command(about = "Runs operations scenarios on their sample data and prints a report", long_about = None)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emergency patient triage and ambulance dispatch
    Dispatch,
    /// Traffic control on a city street network
    Transit {
        /// Street network in edge-list format replacing the sample streets
        #[arg(short, long)]
        network: Option<PathBuf>,
    },
    /// Bank and government service counters
    Counters,
    /// Parking lot slot allocation
    Parking,
    /// Shop inventory, orders and dynamic pricing
    Pricing {
        /// Hour of the day used for pricing
        #[arg(long, default_value_t = 12)]
        hour: u32,
    },
    /// Login monitoring and malware signature scanning
    Security,
    /// Emergency keyword alerts and evacuation
    Alerts,
    /// Flood sensors and flood spread
    Flood,
    /// Smart city zones and districts
    City,
    /// Event schedule, ads and crowd evacuation
    Venue,
    /// Freight assignment and route optimization
    Freight {
        /// Maximum number of 2-opt improvement rounds per route
        #[arg(long, default_value_t = 200)]
        two_opt_limit: usize,
        /// Capacity in tonnes of the extra truck evaluated in the what-if analysis
        #[arg(long, default_value_t = 12.0)]
        extra_capacity: f64,
    },
    /// Runs every scenario on its sample data
    All,
    /// Writes a random connected road network
    Generate {
        /// Number of junctions
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(NumNodes).range(1..))]
        nodes: NumNodes,
        /// Probability of a road between two junctions
        #[arg(short, long, default_value_t = 0.2, value_parser = parse_probability)]
        prob: f64,
        /// Seed of the random generator
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output format (`edgelist` or `dot`)
        #[arg(short, long, default_value = "edgelist")]
        format: FileFormat,
    },
}

fn parse_probability(arg: &str) -> std::result::Result<f64, String> {
    let p: f64 = arg.parse().map_err(|e| format!("`{arg}` is not a number: {e}"))?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(format!("{p} is not in [0, 1]"))
    }
}

fn run<S: Scenario, W: Write>(mut scenario: S, out: &mut W) -> Result<()> {
    info!(scenario = S::NAME, "running scenario");
    writeln!(out, "##### {} #####", S::NAME)?;
    scenario.write_report(out)?;
    writeln!(out)?;
    Ok(())
}

fn run_all<W: Write>(out: &mut W) -> Result<()> {
    run(Hospital::sample(), out)?;
    run(TrafficControl::sample(), out)?;
    run(ServiceHall::sample(), out)?;
    run(ParkingLot::sample(), out)?;
    run(Shop::sample(), out)?;
    run(SecurityMonitor::sample(), out)?;
    run(AlertCenter::sample(), out)?;
    run(FloodMonitor::sample(), out)?;
    run(City::sample(), out)?;
    run(Venue::sample(), out)?;
    run(FreightNetwork::sample(), out)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default = if args.verbose { "casework=debug,info" } else { "casework=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut out = BufWriter::new(io::stdout().lock());

    match args.command {
        Command::Dispatch => run(Hospital::sample(), &mut out)?,
        Command::Transit { network } => {
            let mut control = TrafficControl::sample();
            if let Some(path) = network {
                let streets = AdjArray::<i64>::try_read_edge_list_file(&path)?;
                info!(path = %path.display(), n = streets.number_of_nodes(), "street network loaded");
                control = control.with_streets(streets);
            }
            run(control, &mut out)?;
        }
        Command::Counters => run(ServiceHall::sample(), &mut out)?,
        Command::Parking => run(ParkingLot::sample(), &mut out)?,
        Command::Pricing { hour } => {
            let mut shop = Shop::sample();
            shop.set_hour(hour);
            run(shop, &mut out)?;
        }
        Command::Security => run(SecurityMonitor::sample(), &mut out)?,
        Command::Alerts => run(AlertCenter::sample(), &mut out)?,
        Command::Flood => run(FloodMonitor::sample(), &mut out)?,
        Command::City => run(City::sample(), &mut out)?,
        Command::Venue => run(Venue::sample(), &mut out)?,
        Command::Freight {
            two_opt_limit,
            extra_capacity,
        } => {
            let network = FreightNetwork::sample()
                .two_opt_limit(two_opt_limit)
                .what_if_truck(Truck::new(4, 0, extra_capacity, 1.6, 0.28));
            run(network, &mut out)?;
        }
        Command::All => run_all(&mut out)?,
        Command::Generate {
            nodes,
            prob,
            seed,
            format,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let g = AdjArrayUndir::<u32>::gnp_connected(&mut rng, nodes, prob, 1..=20);
            debug!(n = g.number_of_nodes(), m = g.number_of_edges(), "network generated");
            g.try_write_to_writer(&mut out, format)?;
        }
    }

    out.flush()?;
    Ok(())
}
