use anyhow::Result;
use exam_extract::capture::{CaptureHandler, Command, HELP};
use exam_extract::{logger, Config};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::from_env();

    let mut handler = CaptureHandler::from_config(&config)?;

    info!("🟢 录入工具已启动，当前题号 {}", handler.session().current_qid);
    info!("\n{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = Command::parse(&line) else {
            warn!("⚠️ 无法识别的命令: {}", line.trim());
            continue;
        };

        match handler.handle(command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error!("❌ {:#}", e),
        }
    }

    info!("👋 已退出，会话保存在 {}", config.capture_state_file);
    Ok(())
}
