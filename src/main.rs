//! deck_patcher CLI: パッチ計画を単語帳 JSON に適用します。
//! ファイル単位のエラーは報告のみで終了コードには反映しません。
use clap::Parser;
use deck_patcher::{
    application::{PatchService, report},
    cli::{Cli, Cmd},
    domain::plan::{PatchPlan, PatchSet, PatchTarget},
    infrastructure::{config::PatcherConfig, deck::JsonFileDeckRepo, plan::load_plan},
    utils::{config::EnvConfig, env::load_env},
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 読み込み
    load_env();
    EnvConfig::init()?;
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init()
        .map_err(|e| format!("unable to init tracing_subscriber: {e}"))?;

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Apply {
            plan,
            deck_dir,
            dry_run,
            only,
        } => {
            let config = PatcherConfig::resolve(deck_dir, plan);
            let plan = load_plan(&config.plan_path)?.select(&only)?;
            run(config, &plan, dry_run);
        }
        Cmd::Bump {
            file,
            version,
            deck_dir,
            dry_run,
        } => {
            let config = PatcherConfig::resolve(deck_dir, None);
            let plan = PatchPlan {
                patch_sets: vec![PatchSet {
                    name: "bump".into(),
                    description: None,
                    targets: vec![PatchTarget {
                        file,
                        version: Some(version),
                        corrections: Default::default(),
                    }],
                }],
            };
            plan.validate()?;
            run(config, &plan, dry_run);
        }
        Cmd::List { plan, deck_dir } => {
            let config = PatcherConfig::resolve(deck_dir, plan);
            let plan = load_plan(&config.plan_path)?;
            for line in report::plan_lines(&plan) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn run(config: PatcherConfig, plan: &PatchPlan, dry_run: bool) {
    let service = PatchService::new(JsonFileDeckRepo::new(), config).with_dry_run(dry_run);
    let report = service.run(plan);
    for line in report::run_lines(&report) {
        println!("{line}");
    }
}
