use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

/// 前端与平台侧共享的通道标识。
pub const DND_CHANNEL: &str = "mynotes/dnd";

/// 无权限/平台不支持时返回的状态哨兵值（成功应答，不是错误）。
pub const STATUS_UNKNOWN: i32 = -1;

/// OS 中断过滤级别，四档。状态码与桥接参数 `mode` 编号一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterLevel {
    AllowAll,
    PriorityOnly,
    None,
    AlarmsOnly,
}

impl FilterLevel {
    /// 从桥接参数 `mode` 解码；缺省或未知值一律回退到 `AllowAll`。
    pub fn from_mode(mode: Option<i64>) -> Self {
        match mode {
            Some(2) => Self::PriorityOnly,
            Some(3) => Self::None,
            Some(4) => Self::AlarmsOnly,
            _ => Self::AllowAll,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::AllowAll => 1,
            Self::PriorityOnly => 2,
            Self::None => 3,
            Self::AlarmsOnly => 4,
        }
    }
}

/// 桥接请求的封闭集合。未知方法名在字符串解码边界被拒，
/// 不会进入 handler。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DndRequest {
    CheckPermission,
    OpenSettings,
    Enable { level: FilterLevel },
    Disable,
    Status,
}

impl DndRequest {
    /// 方法名 + 可选 `mode` 参数 → 请求。未知方法返回 `None`，
    /// 由桥接层映射为 not_implemented 应答。
    pub fn decode(method: &str, mode: Option<i64>) -> Option<Self> {
        match method {
            "checkDndPermission" => Some(Self::CheckPermission),
            "openDndSettings" => Some(Self::OpenSettings),
            "enableDnd" => Some(Self::Enable {
                level: FilterLevel::from_mode(mode),
            }),
            "disableDnd" => Some(Self::Disable),
            "getDndStatus" => Some(Self::Status),
            _ => None,
        }
    }
}

/// 成功应答：单个 bool 或状态码。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DndValue {
    Bool(bool),
    Status(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    SettingsError,
    EnableFailed,
    DisableFailed,
    StatusFailed,
}

/// 类型化错误应答 `(kind, message?, details: null)`。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeError {
    pub kind: ErrorKind,
    pub message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl BridgeError {
    pub fn permission_denied() -> Self {
        Self {
            kind: ErrorKind::PermissionDenied,
            message: Some("DND permission not granted".to_string()),
            details: None,
        }
    }

    pub fn from_os(kind: ErrorKind, err: &anyhow::Error) -> Self {
        Self {
            kind,
            message: Some(format!("{err:#}")),
            details: None,
        }
    }
}

/// 桥接应答外壳。unknown method 与类型化错误是两种不同的信号：
/// 前者说明调用方和桥接契约不匹配，后者是运行期故障。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MethodReply {
    Success {
        value: DndValue,
    },
    Error {
        #[serde(flatten)]
        error: BridgeError,
    },
    NotImplemented {
        method: String,
    },
}

impl MethodReply {
    pub fn from_result(result: Result<DndValue, BridgeError>) -> Self {
        match result {
            Ok(value) => Self::Success { value },
            Err(error) => Self::Error { error },
        }
    }
}

/// 通知策略端口：对 OS 中断过滤状态的直通访问，不做任何缓存。
/// 真实实现绑定在 `platform/`，测试注入 mock。
pub trait NotificationPolicy: Send + Sync {
    fn permission_granted(&self) -> bool;
    fn current_filter(&self) -> anyhow::Result<FilterLevel>;
    fn set_filter(&self, level: FilterLevel) -> anyhow::Result<()>;
    fn open_settings(&self) -> anyhow::Result<()>;
}

/// 受限平台仅剩的能力：打开通用设置页。
pub trait SettingsOpener: Send + Sync {
    fn open_settings(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait DndBridge: Send + Sync {
    async fn handle(&self, request: DndRequest) -> Result<DndValue, BridgeError>;
}

/// 具备通知策略 API 的平台上的桥接 handler。
pub struct PolicyBridge<P> {
    policy: P,
}

impl<P: NotificationPolicy> PolicyBridge<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }
}

#[async_trait]
impl<P: NotificationPolicy> DndBridge for PolicyBridge<P> {
    async fn handle(&self, request: DndRequest) -> Result<DndValue, BridgeError> {
        match request {
            DndRequest::CheckPermission => {
                Ok(DndValue::Bool(self.policy.permission_granted()))
            }
            DndRequest::OpenSettings => match self.policy.open_settings() {
                Ok(()) => Ok(DndValue::Bool(true)),
                Err(err) => Err(BridgeError::from_os(ErrorKind::SettingsError, &err)),
            },
            DndRequest::Enable { level } => {
                // 权限检查先行，未授权时不触碰过滤状态
                if !self.policy.permission_granted() {
                    return Err(BridgeError::permission_denied());
                }
                match self.policy.set_filter(level) {
                    Ok(()) => {
                        debug!(target: "dnd", level = ?level, "DND 已开启 | DND enabled");
                        Ok(DndValue::Bool(true))
                    }
                    Err(err) => Err(BridgeError::from_os(ErrorKind::EnableFailed, &err)),
                }
            }
            DndRequest::Disable => {
                if !self.policy.permission_granted() {
                    return Err(BridgeError::permission_denied());
                }
                // 关闭即恢复 allow-all
                match self.policy.set_filter(FilterLevel::AllowAll) {
                    Ok(()) => {
                        debug!(target: "dnd", "DND 已关闭 | DND disabled");
                        Ok(DndValue::Bool(true))
                    }
                    Err(err) => Err(BridgeError::from_os(ErrorKind::DisableFailed, &err)),
                }
            }
            DndRequest::Status => {
                if !self.policy.permission_granted() {
                    return Ok(DndValue::Status(STATUS_UNKNOWN));
                }
                match self.policy.current_filter() {
                    Ok(level) => Ok(DndValue::Status(level.code())),
                    Err(err) => Err(BridgeError::from_os(ErrorKind::StatusFailed, &err)),
                }
            }
        }
    }
}

/// 无通知策略 API 的平台上的桥接 handler：固定应答 `false`/`-1`，
/// 仅保留打开通用设置页的能力。
pub struct RestrictedBridge<O> {
    opener: Arc<O>,
}

impl<O: SettingsOpener> RestrictedBridge<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener: Arc::new(opener),
        }
    }
}

#[async_trait]
impl<O: SettingsOpener + 'static> DndBridge for RestrictedBridge<O> {
    async fn handle(&self, request: DndRequest) -> Result<DndValue, BridgeError> {
        match request {
            DndRequest::CheckPermission | DndRequest::Enable { .. } | DndRequest::Disable => {
                Ok(DndValue::Bool(false))
            }
            DndRequest::Status => Ok(DndValue::Status(STATUS_UNKNOWN)),
            DndRequest::OpenSettings => {
                // 打开动作在调用栈之外完成，完成后回传最终 bool；
                // 失败不升级为类型化错误
                let opener = self.opener.clone();
                let outcome = tokio::task::spawn_blocking(move || opener.open_settings())
                    .await
                    .unwrap_or_else(|err| Err(anyhow::anyhow!("settings task failed: {err}")));
                match outcome {
                    Ok(()) => Ok(DndValue::Bool(true)),
                    Err(err) => {
                        warn!(
                            target: "dnd",
                            error = %format!("{err:#}"),
                            "打开设置页失败 | Settings open failed"
                        );
                        Ok(DndValue::Bool(false))
                    }
                }
            }
        }
    }
}
