use anyhow::Result;
use slimefun_automation::{
    bot::AutomationBot,
    config::ConfigLoader,
    logging::init_logger,
    machine::MachineDescriptor,
};
use tokio::runtime::Handle;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Loads the config and data files the way the client does and reports what
/// the automation core would work with. An optional argument names the
/// config file to use.
#[tokio::main]
async fn main() -> Result<()> {
    let loader = match std::env::args().nth(1) {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader.load()?;
    init_logger(&loader.config_dir().join("logs"), config.default_log_level())?;
    info!("Starting Slimefun automation v{}", VERSION);
    info!("Config directory: {:?}", loader.config_dir());

    let (bot, writer) = AutomationBot::bootstrap(&loader, &Handle::current())?;

    let (electric, multiblock): (Vec<_>, Vec<_>) = bot
        .machines()
        .iter()
        .partition(|m| matches!(m, MachineDescriptor::Electric { .. }));
    info!(
        "Machines: {} electric, {} multiblock",
        electric.len(),
        multiblock.len()
    );
    for machine in bot.machines().iter() {
        let recipes = bot.recipes().recipes_for_machine(machine.id()).len();
        if recipes == 0 {
            info!("{} ({}) has no recipes", machine.display_name(), machine.id());
        }
    }
    bot.recipes().log_stats();

    let cached = bot.multiblocks().statistics();
    info!("Cached multiblocks: {}", cached.total);
    for (machine_id, count) in &cached.by_machine {
        info!("  {}: {}", machine_id, count);
    }
    info!("Remembered recipes: {}", bot.memory().len());
    info!(
        "Automation {} (delay {} ms)",
        if bot.is_automation_enabled() { "ENABLED" } else { "DISABLED" },
        bot.config().automation_delay_ms
    );

    // Dropping the bot closes the persistence queue
    drop(bot);
    writer.await?;
    Ok(())
}
