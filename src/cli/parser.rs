use clap::{Parser, Subcommand};

/// Command-line interface for rtimeclock:
/// clock workers in and out, fix sessions retroactively and run payroll over SQLite
#[derive(Parser)]
#[command(
    name = "rtimeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Time session lifecycle engine: clock-in/out, audited edits, autoclose and payout on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Tenant every operation is scoped to (defaults to the configured one)
    #[arg(global = true, long = "tenant")]
    pub tenant: Option<i64>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin "now" to a fixed UTC instant (YYYY-MM-DD HH:MM[:SS])
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the audit log
    Log {
        #[arg(long = "print", help = "Print rows from the audit log")]
        print: bool,

        #[arg(long = "op", help = "Only rows of this operation (edit, pay, autoclose, ...)")]
        op: Option<String>,
    },

    /// Open a session for a worker (returns the open one if it exists)
    ClockIn {
        #[arg(long = "worker", short = 'w')]
        worker: String,

        #[arg(long = "shift", help = "Advisory shift reference")]
        shift: Option<String>,

        #[arg(long = "ip")]
        ip: Option<String>,

        #[arg(long = "source", help = "Origin tag (defaults to the configured one)")]
        source: Option<String>,
    },

    /// Close the worker's open session and freeze its pay
    ClockOut {
        #[arg(long = "worker", short = 'w')]
        worker: String,

        #[arg(long = "ip")]
        ip: Option<String>,

        #[arg(long = "source")]
        source: Option<String>,
    },

    /// Create a session manually on behalf of a worker
    Add {
        #[arg(long = "worker", short = 'w')]
        worker: String,

        #[arg(long = "in", help = "Clock-in (YYYY-MM-DD HH:MM[:SS], UTC)")]
        clock_in: String,

        #[arg(long = "out", help = "Clock-out (omit to leave the session OPEN)")]
        clock_out: Option<String>,

        #[arg(long = "status", help = "open, closed, approved or paid")]
        status: Option<String>,

        #[arg(long = "rate", help = "Hourly rate to freeze instead of the directory rate")]
        rate: Option<String>,

        #[arg(long = "shift")]
        shift: Option<String>,

        #[arg(long = "notes")]
        notes: Option<String>,

        #[arg(long = "by", default_value = "admin", help = "Acting user")]
        by: String,
    },

    /// Retroactively edit a session
    Edit {
        /// Session id
        id: String,

        #[arg(long = "in")]
        clock_in: Option<String>,

        #[arg(long = "out", conflicts_with = "clear_out")]
        clock_out: Option<String>,

        #[arg(long = "clear-out", help = "Remove clock-out and reopen the session")]
        clear_out: bool,

        #[arg(long = "status", help = "Explicit transition: open, closed, approved, paid")]
        status: Option<String>,

        #[arg(long = "rate")]
        rate: Option<String>,

        #[arg(long = "shift")]
        shift: Option<String>,

        #[arg(long = "notes")]
        notes: Option<String>,

        #[arg(long = "reason", help = "Why the session is being changed")]
        reason: Option<String>,

        #[arg(long = "by", default_value = "admin")]
        by: String,
    },

    /// Delete a session by id
    Del {
        /// Session id
        id: String,

        #[arg(long = "reason")]
        reason: Option<String>,

        #[arg(long = "by", default_value = "admin")]
        by: String,

        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },

    /// Force-close sessions left open for too long
    Autoclose {
        #[arg(long = "max-hours", help = "Threshold in hours (defaults to the configured one)")]
        max_hours: Option<i64>,
    },

    /// Mark closed/approved sessions as paid
    Pay {
        #[arg(long = "worker", short = 'w', required = true, num_args = 1..)]
        workers: Vec<String>,

        #[arg(long, short, help = "Window on clock-in: YYYY, YYYY-MM, YYYY-MM-DD or FROM:TO")]
        period: Option<String>,
    },

    /// List sessions
    List {
        #[arg(long = "worker", short = 'w')]
        worker: Option<String>,

        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "status", default_value = "all", help = "all, open, closed, approved, paid, unpaid")]
        status: String,

        #[arg(long = "open", requires = "worker", help = "Show only the worker's open session")]
        open: bool,
    },

    /// Per-worker totals and payroll KPIs
    Summary {
        #[arg(long = "worker", short = 'w')]
        worker: Option<String>,

        #[arg(long, short)]
        period: Option<String>,

        #[arg(long = "status", default_value = "all")]
        status: String,

        #[arg(long = "json", help = "Machine-readable output")]
        json: bool,
    },

    /// Show or set a worker's hourly rate
    Rate {
        #[arg(long = "worker", short = 'w')]
        worker: String,

        #[arg(long = "set", value_name = "AMOUNT")]
        set: Option<String>,
    },
}
