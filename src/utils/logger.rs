use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日誌輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 終端機用的精簡單行格式
    #[default]
    Compact,
    /// 每筆事件一行 JSON，方便排程環境收集
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        }
    }
}

/// RUST_LOG 未設定時使用的過濾規則
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "deck_diff=debug,info"
    } else {
        "deck_diff=info"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber. Call once, before the engine runs.
pub fn init_logger(format: LogFormat, verbose: bool) {
    let compact = (format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .compact()
    });
    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .json()
            .with_current_span(false)
    });

    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(compact)
        .with(json)
        .init();
}
