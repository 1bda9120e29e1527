use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = finder_api::Args::parse();
	finder_api::run(args).await
}
