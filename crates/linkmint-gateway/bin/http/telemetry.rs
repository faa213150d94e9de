use crate::cli::LogFormatArg;
use tracing_subscriber::EnvFilter;

pub fn init(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormatArg::Json => builder.json().init(),
        LogFormatArg::Pretty => builder.init(),
    }
}
