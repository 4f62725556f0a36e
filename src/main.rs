use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;

use ring_election::{ElectionDriver, InitiatorPolicy, RingConfig, RingTopology};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (overrides the flags below)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of processes on the ring
    #[arg(long, default_value_t = 5)]
    ring_size: u32,

    /// Identifiers that self-initiate, comma separated; every even identifier when omitted
    #[arg(long, value_delimiter = ',')]
    initiators: Option<Vec<u32>>,
}

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let args = Args::parse();

    let driver = match &args.config {
        Some(path) => {
            let config = RingConfig::from_file(path)?;
            ElectionDriver::from_config(&config)?
        }
        None => {
            let topology = RingTopology::new(args.ring_size)?;
            let policy = match args.initiators {
                Some(ids) => InitiatorPolicy::Explicit(ids),
                None => InitiatorPolicy::EveryEven,
            };
            ElectionDriver::new(topology, policy)
        }
    };

    let outcome = driver.run().await?;
    info!(
        "winner of the election over {} processes: {}",
        outcome.ring_size, outcome.winner_id
    );

    Ok(())
}
