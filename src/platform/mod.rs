#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(target_os = "macos"))]
mod fallback;

#[cfg(target_os = "macos")]
use macos as imp;
#[cfg(not(target_os = "macos"))]
use fallback as imp;

use crate::config::PolicyBackend;
use crate::dnd::{DndBridge, RestrictedBridge};

/// 按配置选择桥接 handler。
///
/// - `Native`：平台默认实现（macOS 走通知中心偏好域，其余平台受限）
/// - `Disabled`：强制受限 handler，仅保留设置页跳转
pub fn bridge(backend: PolicyBackend) -> Box<dyn DndBridge> {
    match backend {
        PolicyBackend::Native => imp::native_bridge(),
        PolicyBackend::Disabled => Box::new(RestrictedBridge::new(imp::settings_opener())),
    }
}
