use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RuntimeEnv;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Production logs are JSON lines,
/// everything else gets compact text.
pub fn init_tracing(log_level: &str, runtime_env: RuntimeEnv) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(format!("{log_level},actix_web=info,reqwest=warn,hyper=warn"))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let (json_layer, text_layer) = if runtime_env == RuntimeEnv::Prod {
        let layer = fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)
            .json();
        (Some(layer), None)
    } else {
        (None, Some(fmt::layer().with_target(false).compact()))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
