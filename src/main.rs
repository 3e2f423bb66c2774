mod app;
mod chart;
mod cli;
mod db;
mod entities;
mod error;
mod form;
mod model;
mod util;
mod web;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::cli::{
    CategoryArg, ChartArgs, Cli, Command, GoalAdd, GoalCommand, GoalDone, GoalList, GoalRemove,
    GoalShow, GoalStatusArg, GoalUpdate, ServeArgs, StatsArgs,
};
use crate::entities::goal;
use crate::error::AppError;
use crate::model::{Category, GoalChanges, GoalFilter, GoalInput, GoalStatus};
use crate::util::{format_category_counts, format_goal_detail, GoalView};
use crate::web::state::AppState;

const HOME_ENV: &str = "GOALBOARD_HOME";

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let Cli { db, command } = Cli::parse();
    init_tracing(matches!(command, Command::Serve(_)));

    let db_path = match db {
        Some(path) => path,
        None => db::resolve_db_path(&resolve_home()?),
    };
    db::ensure_parent_dir(&db_path)?;

    match command {
        Command::Serve(args) => handle_serve(&db_path, args).await,
        command => run_command(&db_path, command).await,
    }
}

async fn run_command(db_path: &Path, command: Command) -> Result<(), AppError> {
    let mut lock = db::open_lock(db_path)?;
    let _guard = lock.write()?;

    let conn = db::connect(db_path).await?;
    db::ensure_schema(&conn).await?;
    let app = App::new(conn);

    match command {
        Command::Goal(command) => handle_goal(&app, command).await,
        Command::Stats(args) => handle_stats(&app, args).await,
        Command::Chart(args) => handle_chart(&app, args).await,
        Command::Serve(_) => Err(AppError::InvalidInput(
            "serve must be handled before opening the command lock".to_string(),
        )),
    }
}

/// `RUST_LOG` wins; otherwise the server logs at info and CLI commands stay quiet.
fn init_tracing(serving: bool) {
    let default_level = if serving { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn handle_serve(db_path: &Path, args: ServeArgs) -> Result<(), AppError> {
    let conn = db::connect(db_path).await?;
    db::ensure_schema(&conn).await?;
    tracing::info!(db = %db_path.display(), "database ready");
    let state = AppState::new(App::new(conn), web::templates::load()?);
    web::serve(state, args.addr).await
}

async fn handle_goal(app: &App, command: GoalCommand) -> Result<(), AppError> {
    match command {
        GoalCommand::Add(args) => handle_goal_add(app, args).await,
        GoalCommand::List(args) => handle_goal_list(app, args).await,
        GoalCommand::Show(args) => handle_goal_show(app, args).await,
        GoalCommand::Update(args) => handle_goal_update(app, args).await,
        GoalCommand::Done(args) => handle_goal_done(app, args).await,
        GoalCommand::Remove(args) => handle_goal_remove(app, args).await,
    }
}

async fn handle_goal_add(app: &App, args: GoalAdd) -> Result<(), AppError> {
    let goal = app
        .add_goal(GoalInput {
            description: args.description,
            category: category_from_arg(args.category),
            status: goal_status_from_arg(args.status),
            date: args.date,
        })
        .await?;
    println!("Created goal ID: {}", goal.id);
    Ok(())
}

async fn handle_goal_list(app: &App, args: GoalList) -> Result<(), AppError> {
    let filter = GoalFilter {
        category: args.category.map(category_from_arg),
        status: args.status.map(goal_status_from_arg),
        date: args.date.filter(|date| !date.trim().is_empty()),
    };

    if args.count {
        let total = app.count_goals(&filter).await?;
        println!("Total: {total}");
        return Ok(());
    }

    let goals = app.list_goals(&filter).await?;
    if args.json {
        let views: Vec<GoalView> = goals.iter().map(GoalView::from).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }
    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    print_goal_list(&goals);
    Ok(())
}

async fn handle_goal_show(app: &App, args: GoalShow) -> Result<(), AppError> {
    let goal = app.get_goal(args.id).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&GoalView::from(&goal))?);
    } else {
        println!("{}", format_goal_detail(&goal));
    }
    Ok(())
}

async fn handle_goal_update(app: &App, args: GoalUpdate) -> Result<(), AppError> {
    let goal = app
        .update_goal(
            args.id,
            GoalChanges {
                description: args.description,
                category: args.category.map(category_from_arg),
                status: args.status.map(goal_status_from_arg),
                date: args.date,
            },
        )
        .await?;
    println!("Updated goal {}.", goal.id);
    Ok(())
}

async fn handle_goal_done(app: &App, args: GoalDone) -> Result<(), AppError> {
    let updated = app.mark_achieved(&args.ids).await?;
    println!("Marked {updated} goal(s) achieved.");
    Ok(())
}

async fn handle_goal_remove(app: &App, args: GoalRemove) -> Result<(), AppError> {
    let deleted = app.delete_goals(&args.ids).await?;
    println!("Deleted {deleted} goal(s).");
    Ok(())
}

async fn handle_stats(app: &App, args: StatsArgs) -> Result<(), AppError> {
    let counts = app.count_by_category().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("{}", format_category_counts(&counts));
    }
    Ok(())
}

async fn handle_chart(app: &App, args: ChartArgs) -> Result<(), AppError> {
    let counts = app.count_by_category().await?;
    let svg = chart::render_category_chart(&counts)?;
    db::ensure_parent_dir(&args.out)?;
    fs::write(&args.out, svg)?;
    println!("Wrote chart to {}", args.out.display());
    Ok(())
}

fn resolve_home() -> Result<PathBuf, AppError> {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home));
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    Err(AppError::InvalidInput(format!(
        "unable to resolve home directory; pass --db or set {HOME_ENV}"
    )))
}

fn category_from_arg(arg: CategoryArg) -> Category {
    match arg {
        CategoryArg::Hobby => Category::Hobby,
        CategoryArg::Skill => Category::Skill,
        CategoryArg::Work => Category::Work,
        CategoryArg::Future => Category::Future,
        CategoryArg::BeautyHealth => Category::BeautyHealth,
        CategoryArg::Qol => Category::Qol,
        CategoryArg::Personality => Category::Personality,
        CategoryArg::Other => Category::Other,
    }
}

fn goal_status_from_arg(arg: GoalStatusArg) -> GoalStatus {
    match arg {
        GoalStatusArg::Unachieved => GoalStatus::Unachieved,
        GoalStatusArg::Achieved => GoalStatus::Achieved,
    }
}

fn print_goal_list(goals: &[goal::Model]) {
    println!(
        "{:<4} {:<10} {:<13} {:<12} {}",
        "ID", "STATUS", "CATEGORY", "DATE", "DESCRIPTION"
    );
    for goal in goals {
        println!(
            "{:<4} {:<10} {:<13} {:<12} {}",
            goal.id, goal.status, goal.category, goal.date, goal.description
        );
    }
}
