use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = colfind_api::Args::parse();

	colfind_api::run(args).await
}
