use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(
    name = "goalboard",
    version,
    about = "Track personal goals with SQLite and a small web UI"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "GOALBOARD_DB",
        value_name = "PATH",
        help = "SQLite database file (defaults to ~/.goalboard/goals.db)"
    )]
    pub db: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server
    Serve(ServeArgs),
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Count goals per category
    Stats(StatsArgs),
    /// Write the category chart as SVG
    Chart(ChartArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "GOALBOARD_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: SocketAddr,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    Add(GoalAdd),
    List(GoalList),
    Show(GoalShow),
    Update(GoalUpdate),
    Done(GoalDone),
    Remove(GoalRemove),
}

#[derive(Args, Debug)]
pub struct GoalAdd {
    pub description: String,
    #[arg(long, value_enum)]
    pub category: CategoryArg,
    #[arg(long)]
    pub date: String,
    #[arg(long, value_enum, default_value = "unachieved")]
    pub status: GoalStatusArg,
}

#[derive(Args, Debug)]
pub struct GoalList {
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
    #[arg(long, value_enum)]
    pub status: Option<GoalStatusArg>,
    #[arg(long, value_name = "TEXT", help = "Substring of the target date")]
    pub date: Option<String>,
    #[arg(long, conflicts_with = "json")]
    pub count: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GoalShow {
    pub id: i64,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GoalUpdate {
    pub id: i64,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
    #[arg(long, value_enum)]
    pub status: Option<GoalStatusArg>,
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct GoalDone {
    #[arg(value_name = "ID", num_args = 1..)]
    pub ids: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct GoalRemove {
    #[arg(value_name = "ID", num_args = 1..)]
    pub ids: Vec<i64>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CategoryArg {
    Hobby,
    Skill,
    Work,
    Future,
    BeautyHealth,
    Qol,
    Personality,
    Other,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum GoalStatusArg {
    Unachieved,
    Achieved,
}
