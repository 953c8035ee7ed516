use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vidprep::args::{Cli, Command};
use vidprep::retry::RetryPolicy;
use vidprep::{collect, convert, download, filter, inference, split, verify};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Download {
            repo,
            local_dir,
            max_per_class,
            seed,
        } => {
            let manifest =
                download::run(&repo, &local_dir, max_per_class, seed, RetryPolicy::default())?;
            println!("downloaded {} videos", manifest.len());
        }
        Command::FilterGt { dataset_dir } => filter::run(&dataset_dir)?,
        Command::Convert { input, output } => {
            let count = convert::run(&input, &output)?;
            println!("converted {count} records");
        }
        Command::Split {
            input,
            train,
            test,
            ratio,
        } => {
            let (train_count, test_count) = split::run(&input, &train, &test, ratio)?;
            println!("{train_count} train / {test_count} test records");
        }
        Command::Collect {
            source_root,
            target_videos_dir,
        } => {
            let copied = collect::run(&source_root, &target_videos_dir)?;
            println!("copied {copied} videos");
        }
        Command::Verify { jsonl, video_dir } => {
            let report = verify::verify_dataset(&jsonl, &video_dir)?;
            report.print();
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Infer {
            input,
            output_csv,
            model_path,
            limit,
        } => {
            let processed = inference::run(&input, &output_csv, &model_path, limit)?;
            println!("processed {processed} records");
        }
    }
    Ok(())
}
