use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Seed => commands::seed::handle(ctx, flags).await,
        Commands::Project { action } => commands::project::handle(&action, ctx, flags).await,
        Commands::Zone { action } => commands::zone::handle(&action, ctx, flags).await,
        Commands::Suitability { action } => {
            commands::suitability::handle(&action, ctx, flags).await
        }
        Commands::Compat { action } => commands::compat::handle(&action, ctx, flags).await,
        Commands::Cluster { action } => commands::cluster::handle(&action, ctx, flags).await,
        Commands::Budget { action } => commands::budget::handle(&action, ctx, flags).await,
        Commands::Analytics { action } => commands::analytics::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Init(_) => unreachable!("init is pre-dispatched in main"),
    }
}
