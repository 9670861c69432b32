use async_ping::{AddressRange, IterationConfigBuilder, SweepOptions};
use clap::Parser;
use std::io::Write;
use std::time::Duration;

/// Simple example to show ICMP sweep capabilities
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Subnet to sweep, either in CIDR notation or combined with --mask
    #[arg(short, long)]
    subnet: String,
    /// Dotted-quad subnet mask, when the subnet has no prefix length
    #[arg(short, long)]
    mask: Option<String>,
    /// Also probe the network and broadcast addresses
    #[arg(long)]
    include_network_and_broadcast: bool,
    /// Per-probe timeout in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    timeout: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    let range = AddressRange::parse_subnet(
        &args.subnet,
        args.mask.as_deref(),
        args.include_network_and_broadcast,
    )
    .unwrap();
    let config = IterationConfigBuilder::new()
        .with_echo_requests(1)
        .with_timeout(Duration::from_millis(args.timeout))
        .build()
        .unwrap();
    let options = SweepOptions {
        online_only: true,
        sort_by_address: true,
    };

    let reports = async_ping::sweep(&range, options, &config).await.unwrap();

    {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "Found hosts:").unwrap();
        for report in reports {
            writeln!(stdout, "{}", report).unwrap();
        }
    }
}
