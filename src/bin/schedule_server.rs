use schedule_kit::ScheduleConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init()
        .ok();

    let config = ScheduleConfig::from_env()?;
    schedule_kit::http::serve(&config).await?;
    Ok(())
}
