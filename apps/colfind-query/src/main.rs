use clap::Parser;

use colfind_query::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	colfind_query::run(args).await
}
