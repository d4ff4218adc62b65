#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod dnd;
mod logging;
mod platform;

use tauri::Manager;
use tracing::{debug, info, warn};

use crate::dnd::{DndBridge, DndRequest, MethodReply};

struct BridgeState {
    bridge: Box<dyn DndBridge>,
}

#[derive(serde::Serialize)]
struct ClientConfigResponse {
    config: config::ClientConfig,
    path: Option<String>,
}

#[tauri::command]
fn load_client_config() -> ClientConfigResponse {
    let (config, path) = config::load_with_path();
    ClientConfigResponse {
        config,
        path: path.map(|p| p.display().to_string()),
    }
}

#[tauri::command]
fn save_client_config(config: config::ClientConfig) -> Result<ClientConfigResponse, String> {
    let (_, path) = config::load_with_path();
    let saved = config::save_to_path(&config, path).map_err(|err| err.to_string())?;
    Ok(ClientConfigResponse {
        config,
        path: Some(saved.display().to_string()),
    })
}

/// `mynotes/dnd` 通道的唯一入口：方法名字符串 + 可选 `mode` 参数。
/// 未知方法映射为 not_implemented 应答，其余交给平台 handler。
#[tauri::command]
async fn dnd_method_call(
    method: String,
    mode: Option<i64>,
    state: tauri::State<'_, BridgeState>,
) -> Result<MethodReply, String> {
    let Some(request) = DndRequest::decode(&method, mode) else {
        warn!(
            target: "dnd",
            method = %method,
            "未知桥接方法 | Unknown bridge method"
        );
        return Ok(MethodReply::NotImplemented { method });
    };

    debug!(target: "dnd", method = %method, mode = ?mode, "桥接调用 | Bridge call");
    Ok(MethodReply::from_result(state.bridge.handle(request).await))
}

fn main() {
    logging::init();

    info!(
        target: "app",
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "应用启动 | App starting"
    );

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            load_client_config,
            save_client_config,
            dnd_method_call
        ])
        .setup(|app| {
            let (config, config_path) = config::load_with_path();
            let config_path = config_path
                .map(|p| p.display().to_string())
                .unwrap_or_default();

            info!(
                target: "config",
                path = config_path.as_str(),
                backend = ?config.dnd.backend,
                channel = dnd::DND_CHANNEL,
                "配置已加载 | Config loaded"
            );

            app.manage(BridgeState {
                bridge: platform::bridge(config.dnd.backend),
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
