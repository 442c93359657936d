use clap::Subcommand;

/// Project type vs zone type compatibility commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CompatCommands {
    /// Is a project type allowed in a zone?
    Validate { project_type: String, zone: String },
    /// Best zones for a project type.
    Recommend {
        project_type: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Zones allowing a project type, primary first.
    Allowed { project_type: String },
    /// Known project types.
    Types,
    /// Add or replace a project type.
    AddType {
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Set how a zone treats a project type.
    SetRule {
        project_type: String,
        zone: String,
        /// primary, conditional, prohibited
        use_class: String,
    },
    /// All allowed-use rules.
    Rules,
}
