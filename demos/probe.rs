use async_ping::IterationConfigBuilder;
use clap::Parser;
use futures::StreamExt;
use std::io::Write;
use std::pin::pin;
use std::time::Duration;

/// Simple example to show repeated ICMP latency measurement
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Hosts to probe, by name or IPv4 address
    #[arg(required = true)]
    targets: Vec<String>,
    /// Echo requests per host in every round
    #[arg(short = 'n', long, default_value_t = 4)]
    echo_requests: u32,
    /// Number of rounds
    #[arg(short, long, conflicts_with = "continuous")]
    count: Option<u64>,
    /// Keep probing until interrupted
    #[arg(short = 't', long)]
    continuous: bool,
    /// Delay between the start of two rounds, in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut builder = IterationConfigBuilder::new()
        .with_echo_requests(args.echo_requests)
        .with_interval(Duration::from_millis(args.interval));
    if let Some(count) = args.count {
        builder = builder.with_count(count);
    }
    if args.continuous {
        builder = builder.continuous();
    }
    let config = builder.build().unwrap();

    let mut rounds = pin!(async_ping::probe(args.targets, config).unwrap());
    while let Some(round) = rounds.next().await {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Round {}:", round.index).unwrap();
        for report in &round.reports {
            writeln!(stdout, "  {}", report).unwrap();
        }
    }
}
