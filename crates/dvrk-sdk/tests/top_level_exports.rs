//! 顶层导出测试
//!
//! 验证核心类型可以从 `dvrk_sdk` 直接导入。

use dvrk_sdk::{
    ArmBuilder, ArmConfig, ArmError, ArmState, DriverError, MotionMode, Pose, TransportError,
};

#[test]
fn test_top_level_exports() {
    let _builder: ArmBuilder = ArmBuilder::new("PSM1");
    let _config: ArmConfig = ArmConfig::default();
    let _error: ArmError = ArmError::JointCountUnknown;
    let _driver_error: DriverError = DriverError::Timeout;
    let _transport_error: TransportError = TransportError::Timeout;
    assert_eq!(MotionMode::default(), MotionMode::Goal);
    assert_eq!(ArmState::default(), ArmState::Uninitialized);
    assert_eq!(Pose::default(), Pose::identity());
}

#[test]
fn test_prelude_exports() {
    use dvrk_sdk::prelude::*;

    let address = ArmAddress::new(DEFAULT_NAMESPACE, "ECM");
    assert_eq!(address.to_string(), "/dvrk/ECM");
    let _translation = CartesianTarget::from(Vector3::new(0.0, 0.0, 1.0));
    let _frame = WrenchFrame::default();
}
