use futures_util::future::join_all;
use loginstore::app::App;
use loginstore::logger::*;
use loginstore::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let app = App::try_new(&project_settings).await?;
    let result = run(&app, cli.command).await;
    app.shutdown().await;

    result
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { usernames } => {
            let results = join_all(
                usernames
                    .iter()
                    .map(|username| app.user_store.upsert(username)),
            )
            .await;

            let mut failed = 0;
            for (username, result) in usernames.iter().zip(results) {
                match result {
                    Ok(outcome) => println!("{username}: {outcome}"),
                    Err(e) => {
                        error!("{e}");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                return Err(anyhow::anyhow!(
                    "{failed} of {} login(s) failed",
                    usernames.len()
                ));
            }
        }
        Command::Show { username } => match app.user_store.get(&username).await? {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => return Err(anyhow::anyhow!("no such user: {username:?}")),
        },
        Command::Migrate => app.migrate().await?,
    }

    Ok(())
}
