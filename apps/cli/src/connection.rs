//! 会话连接
//!
//! 读取 TOML 配置（可选），启动模拟控制桥并建立会话。
//!
//! ```toml
//! [arm]
//! namespace = "/dvrk/"
//! goal_timeout_ms = 5000
//!
//! [sim]
//! joint_count = 7
//! initial_state = "DVRK_READY"
//! goal_latency_ms = 200
//! homing = "stall"
//! ```

use anyhow::{Context, Result};
use clap::Args;
use dvrk_sdk::transport::{GoalBehavior, HomingBehavior, SimConfig, SimController};
use dvrk_sdk::{Arm, ArmAddress, ArmBuilder, ArmConfig, ArmState};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// 连接参数（所有子命令共享）
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// 机械臂名称（PSM1、MTML、ECM 等）
    #[arg(short, long, global = true, default_value = "PSM1")]
    pub arm: String,

    /// 主题命名空间（覆盖配置文件）
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    /// 配置文件（TOML）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 模拟器关节数量（覆盖配置文件）
    #[arg(long, global = true)]
    pub sim_joints: Option<usize>,

    /// 模拟器初始状态（覆盖配置文件）
    #[arg(long, global = true)]
    pub initial_state: Option<ArmState>,
}

/// 模拟器归零行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimHoming {
    #[default]
    Succeed,
    Stall,
    Ignore,
}

/// 模拟器配置段
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimSection {
    pub joint_count: usize,
    pub initial_state: String,
    pub goal_latency_ms: u64,
    pub homing: SimHoming,
}

impl Default for SimSection {
    fn default() -> Self {
        Self {
            joint_count: 6,
            initial_state: ArmState::Uninitialized.to_string(),
            goal_latency_ms: 100,
            homing: SimHoming::Succeed,
        }
    }
}

impl SimSection {
    fn to_sim_config(&self) -> SimConfig {
        let homing = match self.homing {
            SimHoming::Succeed => HomingBehavior::Succeed,
            SimHoming::Stall => HomingBehavior::Stall,
            SimHoming::Ignore => HomingBehavior::Ignore,
        };
        SimConfig::default()
            .with_joint_count(self.joint_count)
            .with_initial_state(ArmState::from(self.initial_state.as_str()))
            .with_homing(homing)
            .with_goal(GoalBehavior::Reach, Duration::from_millis(self.goal_latency_ms))
    }
}

/// CLI 配置文件
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub arm: ArmConfig,
    pub sim: SimSection,
}

impl CliConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("解析配置文件失败")
    }

    /// 未指定路径时使用默认配置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// 命令行参数覆盖配置文件
    pub fn apply(&mut self, args: &ConnectionArgs) {
        if let Some(namespace) = &args.namespace {
            self.arm.namespace = namespace.clone();
        }
        if let Some(joints) = args.sim_joints {
            self.sim.joint_count = joints;
        }
        if let Some(state) = &args.initial_state {
            self.sim.initial_state = state.to_string();
        }
    }
}

/// 已建立的会话（附带模拟控制桥）
pub struct Connection {
    arm: Arm,
    bridge: SimController,
}

impl Connection {
    pub fn open(args: &ConnectionArgs) -> Result<Self> {
        let mut config = CliConfig::load(args.config.as_deref())?;
        config.apply(args);
        if config.sim.joint_count == 0 {
            anyhow::bail!("模拟器关节数量不能为 0");
        }

        let address = ArmAddress::new(&config.arm.namespace, args.arm.as_str());
        println!("⏳ 启动模拟控制桥 {}...", address);
        let (transport, bridge) = SimController::launch(address, config.sim.to_sim_config());

        let arm = ArmBuilder::new(args.arm.as_str())
            .config(config.arm)
            .require_feedback(true)
            .connect(transport)
            .context("连接机械臂失败")?;
        println!("✅ 已连接（状态: {}）", arm.robot_state());

        Ok(Self { arm, bridge })
    }

    pub fn arm(&self) -> &Arm {
        &self.arm
    }

    /// 打印会话统计
    pub fn report(&self) {
        let metrics = self.arm.metrics();
        info!(
            "{}: {} commands sent, {} notifications applied, {} dropped, bridge saw {} commands",
            self.arm.address(),
            metrics.commands_sent,
            metrics.notifications_applied,
            metrics.notifications_dropped(),
            self.bridge.command_count()
        );
    }
}
