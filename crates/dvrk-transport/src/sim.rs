//! 模拟控制桥
//!
//! 在独立线程中扮演 dVRK 控制桥：读取客户端命令，按 [`SimConfig`]
//! 描述的行为发布状态、关节、位姿和目标到达通知。
//!
//! 模拟器不做任何运动学或轨迹计算：
//! - 直接位置命令立即生效（期望值 = 实测值 = 命令值）
//! - 目标位置命令在 `goal_latency` 之后生效，并发布 `goal_reached`
//!
//! 每条由命令触发的通知都会回显命令的请求序号（可通过 `echo_seq` 关闭，
//! 用于模拟不支持序号的旧版控制桥）。

use crate::TransportError;
use crate::loopback::{BridgeEndpoint, BridgeNotifier, LoopbackTransport, loopback};
use dvrk_messages::{
    ArmAddress, ArmState, Channel, Command, Envelope, JointState, Notification, Pose, Wrench,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// 命令轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// 归零行为
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomingBehavior {
    /// 依次报告中间状态，最终进入 `DVRK_READY`
    Succeed,
    /// 只报告中间状态，永不就绪
    Stall,
    /// 不响应归零请求
    Ignore,
}

/// 目标运动行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalBehavior {
    /// 延迟后到达目标，报告 `goal_reached = true`
    Reach,
    /// 延迟后报告 `goal_reached = false`（目标未到达）
    Fail,
    /// 不报告 `goal_reached`
    Ignore,
}

/// 模拟器配置
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 关节数量（PSM 为 6 + 夹爪，MTM 为 7 + 夹爪）
    pub joint_count: usize,
    /// 启动时的控制器状态
    pub initial_state: ArmState,
    /// 启动时是否发布完整初始状态（状态、关节、位姿）
    pub publish_initial_state: bool,
    /// 是否响应普通状态转换请求
    pub respond_to_state_requests: bool,
    /// 归零行为
    pub homing: HomingBehavior,
    /// 归零过程中报告的中间状态
    pub homing_steps: Vec<String>,
    /// 每个归零中间状态之间的间隔
    pub homing_step_delay: Duration,
    /// 目标运动行为
    pub goal_behavior: GoalBehavior,
    /// 目标运动耗时
    pub goal_latency: Duration,
    /// 是否在通知中回显请求序号
    pub echo_seq: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            joint_count: 6,
            initial_state: ArmState::Uninitialized,
            publish_initial_state: true,
            respond_to_state_requests: true,
            homing: HomingBehavior::Succeed,
            homing_steps: vec![
                "DVRK_HOMING_POWERING".to_string(),
                "DVRK_HOMING_CALIBRATING_ARM".to_string(),
            ],
            homing_step_delay: Duration::from_millis(10),
            goal_behavior: GoalBehavior::Reach,
            goal_latency: Duration::from_millis(50),
            echo_seq: true,
        }
    }
}

impl SimConfig {
    /// 设置关节数量
    pub fn with_joint_count(mut self, joint_count: usize) -> Self {
        self.joint_count = joint_count;
        self
    }

    /// 设置初始状态
    pub fn with_initial_state(mut self, state: ArmState) -> Self {
        self.initial_state = state;
        self
    }

    /// 设置归零行为
    pub fn with_homing(mut self, homing: HomingBehavior) -> Self {
        self.homing = homing;
        self
    }

    /// 设置目标运动行为和耗时
    pub fn with_goal(mut self, behavior: GoalBehavior, latency: Duration) -> Self {
        self.goal_behavior = behavior;
        self.goal_latency = latency;
        self
    }
}

/// 模拟器可观测的内部状态
#[derive(Debug, Default)]
struct SimShared {
    state: Mutex<ArmState>,
    commands: Mutex<Vec<Envelope<Command>>>,
    last_wrench: Mutex<Option<(Channel, Wrench)>>,
    wrench_orientation_absolute: AtomicBool,
}

/// 模拟控制桥
///
/// Drop 时停止并回收后台线程。
pub struct SimController {
    address: ArmAddress,
    shared: Arc<SimShared>,
    notifier: BridgeNotifier,
    is_running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimController {
    /// 创建回环总线并启动模拟器
    ///
    /// 返回客户端一侧的传输和模拟器句柄。
    pub fn launch(address: ArmAddress, config: SimConfig) -> (LoopbackTransport, SimController) {
        let (transport, endpoint) = loopback();
        let sim = SimController::spawn(address, config, endpoint);
        (transport, sim)
    }

    /// 在已有控制桥端点上启动模拟器
    pub fn spawn(address: ArmAddress, config: SimConfig, endpoint: BridgeEndpoint) -> Self {
        let shared = Arc::new(SimShared {
            state: Mutex::new(config.initial_state.clone()),
            ..SimShared::default()
        });
        let notifier = endpoint.notifier();
        let is_running = Arc::new(AtomicBool::new(true));

        let worker = SimWorker {
            address: address.clone(),
            desired_joint: vec![0.0; config.joint_count],
            desired_pose: Pose::identity(),
            pending_goal: None,
            config,
            shared: shared.clone(),
            endpoint,
        };
        let running = is_running.clone();
        let handle = thread::Builder::new()
            .name(format!("dvrk-sim-{}", address.arm()))
            .spawn(move || worker.run(&running))
            .ok();
        if handle.is_none() {
            warn!("Failed to spawn simulator thread for {}", address);
        }

        Self {
            address,
            shared,
            notifier,
            is_running,
            handle,
        }
    }

    /// 模拟的机械臂地址
    pub fn address(&self) -> &ArmAddress {
        &self.address
    }

    /// 模拟器当前状态
    pub fn state(&self) -> ArmState {
        self.shared.state.lock().clone()
    }

    /// 已收到的全部命令（按到达顺序）
    pub fn commands(&self) -> Vec<Envelope<Command>> {
        self.shared.commands.lock().clone()
    }

    /// 已收到的命令数量
    pub fn command_count(&self) -> usize {
        self.shared.commands.lock().len()
    }

    /// 清空命令记录
    pub fn clear_commands(&self) {
        self.shared.commands.lock().clear();
    }

    /// 最近一次力旋量命令（通道 + 力旋量）
    pub fn last_wrench(&self) -> Option<(Channel, Wrench)> {
        *self.shared.last_wrench.lock()
    }

    /// 本体力旋量是否使用绝对方向
    pub fn wrench_orientation_absolute(&self) -> bool {
        self.shared.wrench_orientation_absolute.load(Ordering::Acquire)
    }

    /// 注入任意通知（例如过期的带序号通知）
    pub fn inject(
        &self,
        notification: Notification,
        seq: Option<u64>,
    ) -> Result<(), TransportError> {
        self.notifier.notify_arm(&self.address, notification, seq)
    }

    /// 通知发布句柄
    pub fn notifier(&self) -> BridgeNotifier {
        self.notifier.clone()
    }

    /// 停止模拟器线程
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("Simulator thread panicked");
        }
    }
}

impl Drop for SimController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 待完成的目标运动
enum PendingGoal {
    Joint(Vec<f64>),
    Cartesian(Pose),
}

struct SimWorker {
    address: ArmAddress,
    config: SimConfig,
    shared: Arc<SimShared>,
    endpoint: BridgeEndpoint,
    desired_joint: Vec<f64>,
    desired_pose: Pose,
    pending_goal: Option<(Instant, PendingGoal, Option<u64>)>,
}

impl SimWorker {
    fn run(mut self, is_running: &AtomicBool) {
        info!("Simulated control bridge started for {}", self.address);

        if self.config.publish_initial_state {
            let state = self.shared.state.lock().clone();
            self.publish(Notification::RobotState(state), None);
            self.publish_joints(None);
            self.publish_poses(None);
        }

        while is_running.load(Ordering::Acquire) {
            let timeout = match &self.pending_goal {
                Some((deadline, _, _)) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(POLL_INTERVAL),
                None => POLL_INTERVAL,
            };

            match self.endpoint.recv_command_timeout(timeout) {
                Ok(envelope) => self.handle_command(envelope),
                Err(TransportError::Timeout) => {},
                Err(e) => {
                    debug!("Simulator stopping: {}", e);
                    break;
                },
            }

            self.complete_goal_if_due();
        }

        info!("Simulated control bridge stopped for {}", self.address);
    }

    fn handle_command(&mut self, envelope: Envelope<Command>) {
        trace!("Simulator received {} (seq={:?})", envelope.topic, envelope.seq);

        // 其他机械臂的命令直接忽略
        if envelope.topic.address() != &self.address || !envelope.is_consistent() {
            debug!("Simulator ignoring command on {}", envelope.topic);
            return;
        }
        self.shared.commands.lock().push(envelope.clone());

        let seq = if self.config.echo_seq { envelope.seq } else { None };
        match envelope.body {
            Command::SetRobotState(ArmState::Home) => self.handle_home(seq),
            Command::SetRobotState(target) => {
                if self.config.respond_to_state_requests {
                    self.set_state(target, seq);
                }
            },
            Command::SetPositionJoint(joints) => {
                if joints.position.len() == self.config.joint_count {
                    self.desired_joint = joints.position;
                    self.publish_joints(seq);
                } else {
                    warn!(
                        "Simulator rejecting joint command with {} positions (expected {})",
                        joints.position.len(),
                        self.config.joint_count
                    );
                }
            },
            Command::SetPositionGoalJoint(joints) => {
                if joints.position.len() == self.config.joint_count {
                    self.schedule_goal(PendingGoal::Joint(joints.position), seq);
                }
            },
            Command::SetPositionCartesian(pose) => {
                self.desired_pose = pose;
                self.publish_poses(seq);
            },
            Command::SetPositionGoalCartesian(pose) => {
                self.schedule_goal(PendingGoal::Cartesian(pose), seq);
            },
            Command::SetWrenchBody(wrench) => {
                *self.shared.last_wrench.lock() = Some((Channel::SetWrenchBody, wrench));
            },
            Command::SetWrenchSpatial(wrench) => {
                *self.shared.last_wrench.lock() = Some((Channel::SetWrenchSpatial, wrench));
            },
            Command::SetWrenchBodyOrientationAbsolute(absolute) => {
                self.shared
                    .wrench_orientation_absolute
                    .store(absolute, Ordering::Release);
            },
        }
    }

    fn handle_home(&mut self, seq: Option<u64>) {
        if self.config.homing == HomingBehavior::Ignore {
            return;
        }
        let steps = self.config.homing_steps.clone();
        for step in steps {
            self.set_state(ArmState::from(step), seq);
            thread::sleep(self.config.homing_step_delay);
        }
        if self.config.homing == HomingBehavior::Succeed {
            self.set_state(ArmState::Ready, seq);
        }
    }

    fn set_state(&mut self, state: ArmState, seq: Option<u64>) {
        debug!("Simulator state -> {}", state);
        *self.shared.state.lock() = state.clone();
        self.publish(Notification::RobotState(state), seq);
    }

    fn schedule_goal(&mut self, goal: PendingGoal, seq: Option<u64>) {
        if self.config.goal_behavior == GoalBehavior::Ignore {
            return;
        }
        // 耗时无法表示为截止时间时，目标永远不会完成
        let Some(deadline) = Instant::now().checked_add(self.config.goal_latency) else {
            return;
        };
        self.pending_goal = Some((deadline, goal, seq));
    }

    fn complete_goal_if_due(&mut self) {
        let now = Instant::now();
        let due = matches!(&self.pending_goal, Some((deadline, _, _)) if now >= *deadline);
        if !due {
            return;
        }
        let Some((_, goal, seq)) = self.pending_goal.take() else {
            return;
        };

        let reached = self.config.goal_behavior == GoalBehavior::Reach;
        if reached {
            match goal {
                PendingGoal::Joint(position) => {
                    self.desired_joint = position;
                    self.publish_joints(seq);
                },
                PendingGoal::Cartesian(pose) => {
                    self.desired_pose = pose;
                    self.publish_poses(seq);
                },
            }
        }
        self.publish(Notification::GoalReached(reached), seq);
    }

    fn publish_joints(&self, seq: Option<u64>) {
        let state = JointState {
            name: Vec::new(),
            position: self.desired_joint.clone(),
            velocity: vec![0.0; self.config.joint_count],
            effort: vec![0.0; self.config.joint_count],
        };
        self.publish(Notification::JointDesired(state.clone()), seq);
        self.publish(Notification::JointCurrent(state), seq);
    }

    fn publish_poses(&self, seq: Option<u64>) {
        self.publish(Notification::CartesianDesired(self.desired_pose), seq);
        self.publish(Notification::CartesianCurrent(self.desired_pose), seq);
    }

    fn publish(&self, notification: Notification, seq: Option<u64>) {
        let envelope = Envelope::notification(&self.address, notification).with_optional_seq(seq);
        if let Err(e) = self.endpoint.notify(envelope) {
            trace!("Simulator failed to publish notification: {}", e);
        }
    }
}
