use crate::dnd::{DndBridge, RestrictedBridge, SettingsOpener};

/// 仅剩通用设置页跳转的受限平台实现。
pub struct SystemSettings;

impl SettingsOpener for SystemSettings {
    fn open_settings(&self) -> anyhow::Result<()> {
        #[cfg(windows)]
        {
            use anyhow::Context as _;
            use std::process::Command;

            let status = Command::new("cmd")
                .args(["/C", "start", "", "ms-settings:notifications"])
                .status()
                .context("spawn settings")?;
            if status.success() {
                return Ok(());
            }
            anyhow::bail!("打开通知设置失败: status={status}");
        }

        #[cfg(not(windows))]
        {
            anyhow::bail!("当前平台不支持自动打开通知设置")
        }
    }
}

pub fn native_bridge() -> Box<dyn DndBridge> {
    // 本平台没有可编程的通知策略 API，原生即受限
    Box::new(RestrictedBridge::new(SystemSettings))
}

pub fn settings_opener() -> SystemSettings {
    SystemSettings
}
