use clap::Parser;
use dotmatrix::Args;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    dotmatrix::run(Args::parse())
}
