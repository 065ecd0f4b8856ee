//! 监控命令
//!
//! 按固定频率打印状态快照，Ctrl-C 或到达时长后退出。

use super::state::ArmSnapshot;
use anyhow::{Context, Result};
use clap::Args;
use dvrk_sdk::Arm;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// 监控命令参数
#[derive(Args, Debug)]
pub struct MonitorCommand {
    /// 更新频率（Hz）
    #[arg(short, long, default_value_t = 10)]
    pub frequency: u32,

    /// 监控时长（秒，省略时直到 Ctrl-C）
    #[arg(short, long)]
    pub duration: Option<u64>,
}

impl MonitorCommand {
    pub fn execute(&self, arm: &Arm) -> Result<()> {
        if self.frequency == 0 {
            anyhow::bail!("更新频率必须大于 0");
        }

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
        })
        .context("无法注册 Ctrl-C 处理")?;

        let period = Duration::from_secs_f64(1.0 / f64::from(self.frequency));
        let deadline = self.duration.map(|s| Instant::now() + Duration::from_secs(s));
        println!("📡 监控 {}（{} Hz），Ctrl-C 退出", arm.address(), self.frequency);

        let mut samples = 0u64;
        while running.load(Ordering::SeqCst) {
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                break;
            }
            let snapshot = ArmSnapshot::capture(arm.name(), arm.observer());
            println!(
                "[{}] {} q={:?}",
                samples, snapshot.state, snapshot.joint_position_current
            );
            samples += 1;
            thread::sleep(period);
        }

        println!("✅ 监控结束（{} 个样本）", samples);
        Ok(())
    }
}
