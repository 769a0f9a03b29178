use tracing::Subscriber;
use tracing_subscriber::{
    filter::LevelFilter, fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt, EnvFilter, Layer,
};

pub const DEFAULT_LOGGER_LEVEL: &str = "info";

/// Переводит имя уровня в фильтр. Понимает и стандартные имена, и старые
/// имена java.util.logging; неизвестное имя даёт уровень по умолчанию.
pub fn resolve_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "error" | "severe" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "info" | "config" => LevelFilter::INFO,
        "debug" | "fine" => LevelFilter::DEBUG,
        "trace" | "finer" | "finest" | "all" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

pub fn init(level: &str) {
    let level = resolve_level(level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pulse_monitoring={},warn", level)));

    // Повторная инициализация (например, в тестах) не должна паниковать
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(std::io::stdout))
        .try_init();
}

// Записи пачки обрабатываются параллельно, поэтому в строке есть id потока
fn fmt_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
}
