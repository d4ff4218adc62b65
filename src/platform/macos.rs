use std::process::Command;

use anyhow::Context as _;
use core_foundation::base::{Boolean, CFTypeRef, TCFType};
use core_foundation::boolean::CFBoolean;
use core_foundation::string::{CFString, CFStringRef};

use crate::dnd::{DndBridge, FilterLevel, NotificationPolicy, PolicyBridge, SettingsOpener};

/// 通知中心的偏好设置域。Monterey 之后 Focus 不再维护这个布尔开关，
/// 读到的会固定是 off；届时需要改走 Focus 的配置文件。
const NC_DOMAIN: &str = "com.apple.notificationcenterui";
const NC_KEY: &str = "doNotDisturb";

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFPreferencesGetAppBooleanValue(
        key: CFStringRef,
        application_id: CFStringRef,
        key_exists_and_has_valid_format: *mut Boolean,
    ) -> Boolean;
    fn CFPreferencesSetAppValue(key: CFStringRef, value: CFTypeRef, application_id: CFStringRef);
    fn CFPreferencesAppSynchronize(application_id: CFStringRef) -> Boolean;
}

fn read_dnd_flag() -> bool {
    let key = CFString::new(NC_KEY);
    let domain = CFString::new(NC_DOMAIN);
    let mut exists: Boolean = 0;
    let value = unsafe {
        CFPreferencesGetAppBooleanValue(
            key.as_concrete_TypeRef(),
            domain.as_concrete_TypeRef(),
            &mut exists,
        )
    };
    exists != 0 && value != 0
}

fn write_dnd_flag(on: bool) -> anyhow::Result<()> {
    let key = CFString::new(NC_KEY);
    let domain = CFString::new(NC_DOMAIN);
    let value = if on {
        CFBoolean::true_value()
    } else {
        CFBoolean::false_value()
    };
    unsafe {
        CFPreferencesSetAppValue(
            key.as_concrete_TypeRef(),
            value.as_CFTypeRef(),
            domain.as_concrete_TypeRef(),
        );
        if CFPreferencesAppSynchronize(domain.as_concrete_TypeRef()) == 0 {
            anyhow::bail!("CFPreferencesAppSynchronize failed for {NC_DOMAIN}");
        }
    }

    // 通知中心只在重启后重读该域
    let status = Command::new("killall")
        .arg("NotificationCenter")
        .status()
        .context("killall NotificationCenter")?;
    if status.success() {
        return Ok(());
    }
    anyhow::bail!("killall NotificationCenter failed: status={status}")
}

fn open_notification_settings() -> anyhow::Result<()> {
    // macOS 13+ 可直达“系统设置 -> 通知”；更早版本落到系统偏好设置首页
    let status = Command::new("open")
        .arg("x-apple.systempreferences:com.apple.preference.notifications")
        .status()
        .context("spawn open")?;
    if status.success() {
        return Ok(());
    }
    anyhow::bail!("open failed: status={status}")
}

/// 通知中心偏好域实现的策略端口。macOS 只有开/关两态：
/// 开启统一映射到 none 档，关闭即 allow-all。
pub struct NotificationCenterPolicy;

impl NotificationPolicy for NotificationCenterPolicy {
    fn permission_granted(&self) -> bool {
        let domain = CFString::new(NC_DOMAIN);
        unsafe { CFPreferencesAppSynchronize(domain.as_concrete_TypeRef()) != 0 }
    }

    fn current_filter(&self) -> anyhow::Result<FilterLevel> {
        if read_dnd_flag() {
            Ok(FilterLevel::None)
        } else {
            Ok(FilterLevel::AllowAll)
        }
    }

    fn set_filter(&self, level: FilterLevel) -> anyhow::Result<()> {
        write_dnd_flag(level != FilterLevel::AllowAll)
    }

    fn open_settings(&self) -> anyhow::Result<()> {
        open_notification_settings()
    }
}

pub struct SystemSettings;

impl SettingsOpener for SystemSettings {
    fn open_settings(&self) -> anyhow::Result<()> {
        open_notification_settings()
    }
}

pub fn native_bridge() -> Box<dyn DndBridge> {
    Box::new(PolicyBridge::new(NotificationCenterPolicy))
}

pub fn settings_opener() -> SystemSettings {
    SystemSettings
}
