use clap::Subcommand;

/// Budget request commands.
#[derive(Clone, Debug, Subcommand)]
pub enum BudgetCommands {
    /// File a budget increase request.
    Request {
        project_id: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        reason: String,
    },
    /// Get a request with its status history.
    Get { id: String },
    /// List requests, newest first.
    List {
        /// pending, approved, rejected
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Approve a pending request and add the amount to the project cost.
    Approve {
        id: String,
        /// Approved amount; defaults to the requested amount.
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Reject a pending request.
    Reject {
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },
}
