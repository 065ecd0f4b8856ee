//! # dVRK CLI
//!
//! Command-line interface for dVRK arm sessions.
//!
//! 每个命令独立执行：读取配置 → 启动模拟控制桥 → 连接 → 执行 → 断开。
//!
//! ```bash
//! # 归零
//! dvrk-cli --arm PSM1 home
//!
//! # 关节目标运动（只移动第 3 个关节）
//! dvrk-cli move --joints 0.1 --indices 2
//!
//! # 笛卡尔增量运动（直接模式）
//! dvrk-cli dmove --translation 0,0,-0.01 --direct
//!
//! # 以 JSON 输出当前状态
//! dvrk-cli state --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod connection;
mod validation;

use commands::{DmoveCommand, MonitorCommand, MoveCommand, StateCommand};
use connection::{Connection, ConnectionArgs};

/// dVRK CLI - 机械臂会话命令行工具
#[derive(Parser, Debug)]
#[command(name = "dvrk-cli")]
#[command(about = "Command-line interface for dVRK arm sessions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// 输出更详细的日志（可重复）
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 归零
    Home,

    /// 关闭（进入 DVRK_UNINITIALIZED）
    Shutdown,

    /// 绝对关节运动
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 增量运动（关节或笛卡尔平移）
    Dmove {
        #[command(flatten)]
        args: DmoveCommand,
    },

    /// 查询当前状态
    State {
        #[command(flatten)]
        args: StateCommand,
    },

    /// 监控机械臂状态
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },
}

fn init_tracing(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "warn,dvrk_cli={level},dvrk_client={level},dvrk_driver={level}"
        ))
        .context("invalid log filter")?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let connection = Connection::open(&cli.connection)?;
    let arm = connection.arm();

    match cli.command {
        Commands::Home => commands::home(arm),

        Commands::Shutdown => commands::shutdown(arm),

        Commands::Move { args } => args.execute(arm),

        Commands::Dmove { args } => args.execute(arm),

        Commands::State { args } => args.execute(arm),

        Commands::Monitor { args } => args.execute(arm),
    }?;

    connection.report();
    Ok(())
}
