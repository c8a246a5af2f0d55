use adminkit::{cli, config, AdminkitError};

fn init_tracing() {
    use tracing_subscriber::{
        filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt as _, Registry,
    };

    let filter = EnvFilter::try_from_env(config::env::LOG_DIRECTIVE)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    Registry::default()
        .with(
            fmt::Layer::new()
                .with_ansi(true)
                .with_file(false)
                .with_line_number(false)
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .on_thread_start(|| tracing::trace!("thread start"))
        .on_thread_stop(|| tracing::trace!("thread stop"))
        .enable_io()
        .enable_time()
        .build();

    match runtime {
        Ok(runtime) => runtime.block_on(run()),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

async fn run() {
    if let Err(err) = cli::parse().run().await {
        let code = match err {
            AdminkitError::Unauthenticated => {
                eprintln!("unauthenticated");
                2
            }
            AdminkitError::Authentication { .. } => {
                eprintln!("{}", err);
                2
            }
            _ => {
                eprintln!("{}", err);
                1
            }
        };
        std::process::exit(code);
    };
}
